use crate::components::canvas::{HitTarget, Point};

/// A context chunk as laid out by the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	pub color: &'static str,
	pub label: String,
	pub dropped: bool,
}

impl HitTarget for Node {
	fn center(&self) -> Point {
		Point::new(self.x, self.y)
	}

	fn radius(&self) -> f64 {
		self.size
	}
}

/// Undirected relation between two nodes, by index into the node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
	pub source: usize,
	pub target: usize,
}

/// A caller-supplied relation between two chunk ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
	pub source: String,
	pub target: String,
}

/// Something the graph view reports back to the application.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	NodeClicked(String),
	DroppedToggled { id: String, dropped: bool },
}
