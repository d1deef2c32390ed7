use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::surface::Surface;
use super::viewport::Viewport;

pub const FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif";

/// Clear to a flat background in CSS-pixel space.
pub fn begin_frame(surface: &Surface, background: &str) {
	let ctx = surface.ctx();
	surface.reset_transform();
	ctx.set_fill_style_str(background);
	ctx.fill_rect(0.0, 0.0, surface.width, surface.height);
}

/// Run `draw` with the viewport applied as a single transform.
pub fn in_world(ctx: &CanvasRenderingContext2d, viewport: &Viewport, draw: impl FnOnce()) {
	ctx.save();
	let _ = ctx.translate(viewport.pan.x, viewport.pan.y);
	let _ = ctx.scale(viewport.zoom, viewport.zoom);
	draw();
	ctx.restore();
}

pub fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: &str) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius.max(0.0), 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
}

pub fn glow(ctx: &CanvasRenderingContext2d, blur: f64, color: &str) {
	ctx.set_shadow_blur(blur);
	ctx.set_shadow_color(color);
}

pub fn no_glow(ctx: &CanvasRenderingContext2d) {
	ctx.set_shadow_blur(0.0);
}

/// Centered text in screen space at a fixed pixel size.
pub fn screen_text(
	ctx: &CanvasRenderingContext2d,
	text: &str,
	x: f64,
	y: f64,
	size: f64,
	bold: bool,
	color: &str,
) {
	let weight = if bold { "bold " } else { "" };
	ctx.set_font(&format!("{weight}{size}px {FONT_FAMILY}"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(color);
	let _ = ctx.fill_text(text, x, y);
}

/// `screen_text` on a dark rounded pill sized to the text.
pub fn screen_label_pill(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, color: &str) {
	ctx.set_font(&format!("12px {FONT_FAMILY}"));
	let width = ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);
	ctx.set_fill_style_str("rgba(15, 23, 42, 0.8)");
	ctx.fill_rect(x - width / 2.0 - 4.0, y - 10.0, width + 8.0, 18.0);
	screen_text(ctx, text, x, y, 12.0, false, color);
}
