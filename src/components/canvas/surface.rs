use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Why a canvas could not be drawn on.
#[derive(Error, Debug)]
pub enum SurfaceError {
	#[error("no browser window")]
	NoWindow,
	#[error("canvas has no 2d context")]
	NoContext,
	#[error("canvas context is not a CanvasRenderingContext2d")]
	WrongContext,
}

/// A canvas and its 2d context, sized in CSS pixels and scaled for the
/// device pixel ratio.
pub struct Surface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

impl Surface {
	pub fn acquire(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.ok_or(SurfaceError::NoContext)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| SurfaceError::WrongContext)?;
		let mut surface = Self {
			canvas,
			ctx,
			width: 0.0,
			height: 0.0,
			pixel_ratio: 1.0,
		};
		surface.fit()?;
		Ok(surface)
	}

	/// Match the backing store to the element's layout size and the current
	/// device pixel ratio.
	pub fn fit(&mut self) -> Result<(), SurfaceError> {
		let window = web_sys::window().ok_or(SurfaceError::NoWindow)?;
		let ratio = window.device_pixel_ratio().max(1.0);
		let (w, h) = (
			self.canvas.offset_width() as f64,
			self.canvas.offset_height() as f64,
		);
		let (w, h) = if w > 0.0 && h > 0.0 {
			(w, h)
		} else {
			self.canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.filter(|&(pw, ph)| pw > 0.0 && ph > 0.0)
				.unwrap_or((800.0, 600.0))
		};
		self.canvas.set_width((w * ratio) as u32);
		self.canvas.set_height((h * ratio) as u32);
		self.width = w;
		self.height = h;
		self.pixel_ratio = ratio;
		Ok(())
	}

	pub fn ctx(&self) -> &CanvasRenderingContext2d {
		&self.ctx
	}

	pub fn set_cursor(&self, cursor: &str) {
		let _ = self.canvas.style().set_property("cursor", cursor);
	}

	/// Reset to device-pixel scale, CSS-pixel coordinates.
	pub fn reset_transform(&self) {
		let r = self.pixel_ratio;
		let _ = self.ctx.set_transform(r, 0.0, 0.0, r, 0.0, 0.0);
	}
}
