/// Smallest zoom factor the view allows.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest zoom factor the view allows.
pub const MAX_ZOOM: f64 = 3.0;
/// Additive zoom change per wheel notch.
pub const WHEEL_STEP: f64 = 0.1;
/// Additive zoom change per toolbar button press.
pub const BUTTON_STEP: f64 = 0.2;

/// A point in either screen (CSS pixel) or world space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Zoom and pan applied between world space and the screen.
///
/// `screen = world * zoom + pan`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub zoom: f64,
	pub pan: Point,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			zoom: 1.0,
			pan: Point::default(),
		}
	}
}

impl Viewport {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.pan.x) / self.zoom, (sy - self.pan.y) / self.zoom)
	}

	pub fn world_to_screen(&self, wx: f64, wy: f64) -> Point {
		Point::new(wx * self.zoom + self.pan.x, wy * self.zoom + self.pan.y)
	}

	/// Set a new zoom, keeping the world point under `anchor` fixed on screen.
	pub fn zoom_to(&mut self, zoom: f64, anchor: Point) {
		let next = if zoom.is_finite() {
			zoom.clamp(MIN_ZOOM, MAX_ZOOM)
		} else {
			self.zoom
		};
		let ratio = next / self.zoom;
		self.pan.x = anchor.x - (anchor.x - self.pan.x) * ratio;
		self.pan.y = anchor.y - (anchor.y - self.pan.y) * ratio;
		self.zoom = next;
	}

	/// One wheel notch: scrolling down zooms out, up zooms in.
	pub fn wheel(&mut self, delta_y: f64, anchor: Point) {
		let step = if delta_y > 0.0 { -WHEEL_STEP } else { WHEEL_STEP };
		self.zoom_to(self.zoom + step, anchor);
	}

	pub fn zoom_in(&mut self, anchor: Point) {
		self.zoom_to(self.zoom + BUTTON_STEP, anchor);
	}

	pub fn zoom_out(&mut self, anchor: Point) {
		self.zoom_to(self.zoom - BUTTON_STEP, anchor);
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.pan.x += dx;
		self.pan.y += dy;
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Zoom as a whole percentage, for the toolbar.
	pub fn percent(&self) -> u32 {
		(self.zoom * 100.0).round() as u32
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	#[test]
	fn zoom_stays_in_range() {
		let mut viewport = Viewport::default();
		let anchor = Point::new(120.0, 80.0);
		for _ in 0..40 {
			viewport.wheel(-1.0, anchor);
			viewport.zoom_in(anchor);
		}
		assert!(viewport.zoom <= MAX_ZOOM + EPS);
		for _ in 0..40 {
			viewport.wheel(1.0, anchor);
			viewport.zoom_out(anchor);
		}
		assert!(viewport.zoom >= MIN_ZOOM - EPS);

		for i in 0..200 {
			match i % 5 {
				0 => viewport.wheel(-3.0, anchor),
				1 => viewport.zoom_out(anchor),
				2 => viewport.zoom_in(anchor),
				3 => viewport.wheel(2.0, anchor),
				_ => viewport.zoom_in(anchor),
			}
			assert!((MIN_ZOOM - EPS..=MAX_ZOOM + EPS).contains(&viewport.zoom));
		}
	}

	#[test]
	fn screen_world_round_trip() {
		let viewport = Viewport {
			zoom: 2.3,
			pan: Point::new(-41.5, 17.25),
		};
		for &(x, y) in &[(0.0, 0.0), (12.5, -3.0), (1024.0, 768.0), (-500.0, 333.3)] {
			let screen = viewport.world_to_screen(x, y);
			let world = viewport.screen_to_world(screen.x, screen.y);
			assert!((world.x - x).abs() < EPS);
			assert!((world.y - y).abs() < EPS);
		}
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut viewport = Viewport {
			zoom: 1.0,
			pan: Point::new(30.0, -10.0),
		};
		let anchor = Point::new(200.0, 150.0);
		let before = viewport.screen_to_world(anchor.x, anchor.y);
		viewport.wheel(-1.0, anchor);
		assert!((viewport.zoom - 1.1).abs() < EPS);
		let after = viewport.screen_to_world(anchor.x, anchor.y);
		assert!((before.x - after.x).abs() < EPS);
		assert!((before.y - after.y).abs() < EPS);
	}

	#[test]
	fn clamped_zoom_does_not_move_pan() {
		let mut viewport = Viewport {
			zoom: MAX_ZOOM,
			pan: Point::new(5.0, 6.0),
		};
		viewport.zoom_in(Point::new(400.0, 300.0));
		assert_eq!(viewport.zoom, MAX_ZOOM);
		assert_eq!(viewport.pan, Point::new(5.0, 6.0));
	}

	#[test]
	fn reset_restores_identity() {
		let mut viewport = Viewport::default();
		viewport.zoom_in(Point::new(10.0, 10.0));
		viewport.pan_by(40.0, -20.0);
		viewport.reset();
		assert_eq!(viewport, Viewport::default());
		assert_eq!(viewport.percent(), 100);
	}
}
