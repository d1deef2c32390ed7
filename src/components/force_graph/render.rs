use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use crate::components::canvas::Surface;
use crate::components::canvas::draw::{begin_frame, fill_circle, glow, in_world, no_glow, screen_text};
use crate::theme;

const LABEL_GAP: f64 = 8.0;

pub fn render(state: &ForceGraphState, surface: &Surface) {
	let ctx = surface.ctx();
	begin_frame(surface, theme::BACKGROUND);
	if state.nodes.is_empty() {
		return;
	}
	in_world(ctx, &state.viewport, || {
		draw_edges(state, ctx);
		draw_nodes(state, ctx);
	});
	draw_labels(state, ctx);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport.zoom;
	ctx.set_line_width(1.0 / k);
	for edge in &state.edges {
		let (Some(a), Some(b)) = (state.nodes.get(edge.source), state.nodes.get(edge.target)) else {
			continue;
		};
		if a.dropped && b.dropped {
			ctx.set_stroke_style_str(theme::EDGE_DROPPED);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0 / k),
				&JsValue::from_f64(4.0 / k),
			));
		} else {
			ctx.set_stroke_style_str(theme::EDGE);
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let hovered = state.pointer.hovered;
	for (i, node) in state.nodes.iter().enumerate() {
		if hovered == Some(i) {
			glow(
				ctx,
				20.0,
				if node.dropped { theme::DROPPED_SHADOW } else { node.color },
			);
		}
		let fill = if node.dropped { theme::DROPPED_FILL } else { node.color };
		fill_circle(ctx, node.x, node.y, node.size, fill);
		no_glow(ctx);
	}
}

// Labels go on after the world transform is popped so their font size does
// not follow the zoom.
fn draw_labels(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let hovered = state.pointer.hovered;
	let k = state.viewport.zoom;
	for (i, node) in state.nodes.iter().enumerate() {
		let anchor = state.viewport.world_to_screen(node.x, node.y);
		let y = anchor.y - node.size * k - LABEL_GAP;
		let is_hovered = hovered == Some(i);
		let color = if node.dropped { theme::DROPPED_TEXT } else { theme::TEXT };
		let size = if is_hovered { 13.0 } else { 11.0 };
		screen_text(ctx, &node.label, anchor.x, y, size, is_hovered, color);
	}
}
