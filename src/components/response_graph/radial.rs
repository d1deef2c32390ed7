use std::f64::consts::{FRAC_PI_2, TAU};

use log::debug;

use crate::components::canvas::{HitTarget, Point};
use crate::records::ResponseContext;

pub const RADIUS_FRACTION: f64 = 0.35;
pub const SELECTED_BASE: f64 = 20.0;
pub const DROPPED_BASE: f64 = 16.0;
pub const SCORE_SCALE: f64 = 35.0;

/// A response-context chunk placed around the focal response.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialNode {
	pub id: String,
	pub influence: f64,
	pub selected: bool,
	pub x: f64,
	pub y: f64,
	pub angle: f64,
	pub size: f64,
}

impl HitTarget for RadialNode {
	fn center(&self) -> Point {
		Point::new(self.x, self.y)
	}

	fn radius(&self) -> f64 {
		self.size
	}
}

/// Radius of a node in the radial view.
pub fn radial_size(influence: f64, selected: bool) -> f64 {
	let base = if selected { SELECTED_BASE } else { DROPPED_BASE };
	base + influence * SCORE_SCALE
}

/// Ring radius for a canvas of the given size.
pub fn ring_radius(width: f64, height: f64) -> f64 {
	RADIUS_FRACTION * width.min(height)
}

/// Place every chunk of `context` evenly on a ring around `center`, index 0
/// at the top and continuing clockwise. Pure: same input, same layout.
pub fn layout(context: &ResponseContext, center: Point, width: f64, height: f64) -> Vec<RadialNode> {
	let count = context.len();
	if count == 0 {
		return Vec::new();
	}
	let radius = ring_radius(width, height);
	let step = TAU / count as f64;

	let nodes: Vec<RadialNode> = context
		.iter()
		.enumerate()
		.map(|(i, chunk)| {
			let angle = i as f64 * step - FRAC_PI_2;
			let influence = chunk.influence();
			RadialNode {
				id: chunk.id.clone(),
				influence,
				selected: chunk.selected,
				x: center.x + angle.cos() * radius,
				y: center.y + angle.sin() * radius,
				angle,
				size: radial_size(influence, chunk.selected),
			}
		})
		.collect();
	debug!("radial layout: {} nodes at radius {radius}", nodes.len());
	nodes
}
