use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::radial::RadialNode;
use super::state::ResponseGraphState;
use crate::components::canvas::Surface;
use crate::components::canvas::draw::{
	FONT_FAMILY, begin_frame, fill_circle, glow, in_world, no_glow, screen_label_pill, screen_text,
};
use crate::theme;

const FOCUS_SIZE: f64 = 140.0;
const FOCUS_CORNER: f64 = 12.0;

pub fn render(state: &ResponseGraphState, surface: &Surface) {
	let ctx = surface.ctx();
	begin_frame(surface, theme::BACKGROUND);
	draw_backdrop(ctx, surface);
	if state.is_empty() {
		return;
	}

	let nodes = state.nodes();
	let center = state.center();
	in_world(ctx, &state.viewport, || {
		draw_spokes(ctx, &nodes, center.x, center.y);
		draw_focus(ctx, center.x, center.y);
		draw_nodes(state, ctx, &nodes);
	});
	draw_focus_text(state, ctx);
	draw_labels(state, ctx, &nodes);
}

fn draw_backdrop(ctx: &CanvasRenderingContext2d, surface: &Surface) {
	let (cx, cy) = (surface.width / 2.0, surface.height / 2.0);
	let Ok(gradient) = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, surface.width / 2.0) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, theme::RADIAL_BACKGROUND_INNER);
	let _ = gradient.add_color_stop(1.0, theme::BACKGROUND);
	ctx.set_fill_style_canvas_gradient(&gradient);
	ctx.fill_rect(0.0, 0.0, surface.width, surface.height);
}

fn draw_spokes(ctx: &CanvasRenderingContext2d, nodes: &[RadialNode], cx: f64, cy: f64) {
	for node in nodes {
		let gradient = ctx.create_linear_gradient(cx, cy, node.x, node.y);
		if node.selected {
			let _ = gradient.add_color_stop(0.0, "rgba(59, 130, 246, 0.4)");
			let _ = gradient.add_color_stop(1.0, "rgba(34, 211, 238, 0.4)");
			ctx.set_line_width(2.5);
		} else {
			let _ = gradient.add_color_stop(0.0, "rgba(71, 85, 105, 0.1)");
			let _ = gradient.add_color_stop(1.0, "rgba(100, 116, 139, 0.1)");
			ctx.set_line_width(1.0);
		}
		ctx.set_stroke_style_canvas_gradient(&gradient);
		ctx.begin_path();
		ctx.move_to(cx, cy);
		ctx.line_to(node.x, node.y);
		ctx.stroke();
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, size: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + size, y, x + size, y + size, r);
	let _ = ctx.arc_to(x + size, y + size, x, y + size, r);
	let _ = ctx.arc_to(x, y + size, x, y, r);
	let _ = ctx.arc_to(x, y, x + size, y, r);
	ctx.close_path();
}

fn draw_focus(ctx: &CanvasRenderingContext2d, cx: f64, cy: f64) {
	let (x, y) = (cx - FOCUS_SIZE / 2.0, cy - FOCUS_SIZE / 2.0);
	glow(ctx, 30.0, "rgba(59, 130, 246, 0.6)");
	ctx.set_fill_style_str(theme::RADIAL_FOCUS);
	rounded_rect(ctx, x, y, FOCUS_SIZE, FOCUS_CORNER);
	ctx.fill();

	glow(ctx, 15.0, "rgba(96, 165, 250, 0.8)");
	ctx.set_fill_style_str("rgba(59, 130, 246, 0.8)");
	rounded_rect(ctx, x + 5.0, y + 5.0, FOCUS_SIZE - 10.0, FOCUS_CORNER - 2.0);
	ctx.fill();
	no_glow(ctx);
}

fn draw_nodes(state: &ResponseGraphState, ctx: &CanvasRenderingContext2d, nodes: &[RadialNode]) {
	for (i, node) in nodes.iter().enumerate() {
		let hovered = state.pointer.hovered == Some(i);
		let (x, y, size) = (node.x, node.y, node.size);
		if node.selected {
			glow(ctx, 25.0, "rgba(34, 211, 238, 0.8)");
			fill_circle(ctx, x, y, size + if hovered { 3.0 } else { 0.0 }, theme::RADIAL_SELECTED);

			glow(ctx, 10.0, "rgba(165, 243, 252, 0.9)");
			if let Ok(inner) =
				ctx.create_radial_gradient(x - size / 3.0, y - size / 3.0, 0.0, x, y, size)
			{
				let _ = inner.add_color_stop(0.0, "rgba(165, 243, 252, 0.8)");
				let _ = inner.add_color_stop(1.0, "rgba(34, 211, 238, 0.4)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, size * 0.7, 0.0, 2.0 * PI);
				ctx.set_fill_style_canvas_gradient(&inner);
				ctx.fill();
			}
		} else {
			glow(ctx, 5.0, "rgba(71, 85, 105, 0.3)");
			let fill = if hovered {
				theme::RADIAL_DROPPED_HOVER
			} else {
				theme::RADIAL_DROPPED
			};
			fill_circle(ctx, x, y, size, fill);
			no_glow(ctx);
			fill_circle(ctx, x, y, size * 0.6, "rgba(100, 116, 139, 0.3)");
		}
		no_glow(ctx);
	}
}

fn draw_focus_text(state: &ResponseGraphState, ctx: &CanvasRenderingContext2d) {
	let center = state.center();
	let at = state.viewport.world_to_screen(center.x, center.y);
	screen_text(ctx, "Response", at.x, at.y - 5.0, 18.0, true, theme::TEXT);
	let count = format!("{} chunks", state.context.selected_count());
	screen_text(ctx, &count, at.x, at.y + 15.0, 12.0, false, "rgba(255, 255, 255, 0.7)");
}

// Screen-space pass: pill labels above and score badges below each node.
fn draw_labels(state: &ResponseGraphState, ctx: &CanvasRenderingContext2d, nodes: &[RadialNode]) {
	let k = state.viewport.zoom;
	for node in nodes {
		let at = state.viewport.world_to_screen(node.x, node.y);
		let offset = node.size * k;
		let label_color = if node.selected { theme::TEXT } else { theme::TEXT_MUTED };
		screen_label_pill(ctx, state.label(node), at.x, at.y - offset - 15.0, label_color);

		let score = format!("{:.0}%", node.influence * 100.0);
		let badge = if node.selected { theme::RADIAL_SELECTED } else { "#64748b" };
		ctx.set_font(&format!("bold 10px {FONT_FAMILY}"));
		ctx.set_text_align("center");
		ctx.set_fill_style_str(badge);
		let _ = ctx.fill_text(&score, at.x, at.y + offset + 18.0);
	}
}
