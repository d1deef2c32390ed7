//! Machinery shared by the canvas views: viewport math, hit testing, the
//! pointer state machine, surface handling and the frame loop.

pub mod draw;
pub mod frame_loop;
pub mod pointer;
pub mod surface;
pub mod viewport;

pub use frame_loop::{FrameLoop, ResizeListener};
pub use hit_test::{HitTarget, hit_test};
pub use pointer::{PointerAction, PointerButton, PointerState};
pub use surface::Surface;
pub use viewport::{Point, Viewport};

use web_sys::{HtmlCanvasElement, MouseEvent};

/// Pointer position relative to the canvas, in CSS pixels.
pub fn event_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}
