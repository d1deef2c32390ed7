use std::f64::consts::TAU;

use super::types::Node;

/// Tunables of the living layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
	/// Magnitude of the unit pull towards the canvas center.
	pub centering: f64,
	/// Scale of the `(size_a + size_b) / d²` push between node pairs.
	pub repulsion: f64,
	/// Velocity multiplier applied after forces, every step.
	pub damping: f64,
	/// Distance floor for repulsion.
	pub min_distance: f64,
}

impl Default for ForceParams {
	fn default() -> Self {
		Self {
			centering: 0.01,
			repulsion: 50.0,
			damping: 0.95,
			min_distance: 1.0,
		}
	}
}

/// Advance every node by one frame inside a `width` x `height` box.
///
/// Nodes are integrated in order and in place, so later nodes see the
/// positions earlier nodes moved to during this same step.
pub fn step(nodes: &mut [Node], params: &ForceParams, width: f64, height: f64) {
	let (cx, cy) = (width / 2.0, height / 2.0);

	for i in 0..nodes.len() {
		let (x, y, size) = (nodes[i].x, nodes[i].y, nodes[i].size);
		let (mut fx, mut fy) = (0.0, 0.0);

		let (dx, dy) = (cx - x, cy - y);
		let to_center = (dx * dx + dy * dy).sqrt();
		if to_center > 0.0 {
			fx += dx / to_center * params.centering;
			fy += dy / to_center * params.centering;
		}

		for (j, other) in nodes.iter().enumerate() {
			if j == i {
				continue;
			}
			let (dx, dy) = (x - other.x, y - other.y);
			let raw = (dx * dx + dy * dy).sqrt();
			let (ux, uy) = if raw > 1e-9 {
				(dx / raw, dy / raw)
			} else {
				// Coincident nodes: push apart along a fixed per-pair direction.
				let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * TAU;
				(angle.cos(), angle.sin())
			};
			let dist = raw.max(params.min_distance);
			let force = (size + other.size) / (dist * dist) * params.repulsion;
			fx += ux * force;
			fy += uy * force;
		}

		let node = &mut nodes[i];
		node.vx = (node.vx + fx) * params.damping;
		node.vy = (node.vy + fy) * params.damping;
		node.x += node.vx;
		node.y += node.vy;
		clamp_into(node, width, height);
	}
}

// Must not panic when the box is narrower than the node, unlike `f64::clamp`.
fn clamp_into(node: &mut Node, width: f64, height: f64) {
	if node.x < node.size {
		node.x = node.size;
	}
	if node.x > width - node.size {
		node.x = width - node.size;
	}
	if node.y < node.size {
		node.y = node.size;
	}
	if node.y > height - node.size {
		node.y = height - node.size;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, x: f64, y: f64, size: f64) -> Node {
		Node {
			id: id.into(),
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			size,
			color: "#fff",
			label: id.into(),
			dropped: false,
		}
	}

	#[test]
	fn empty_step_is_a_no_op() {
		let mut nodes: Vec<Node> = Vec::new();
		step(&mut nodes, &ForceParams::default(), 800.0, 600.0);
		assert!(nodes.is_empty());
	}

	#[test]
	fn lone_node_drifts_to_center() {
		let mut nodes = vec![node("a", 100.0, 300.0, 10.0)];
		step(&mut nodes, &ForceParams::default(), 800.0, 600.0);
		let n = &nodes[0];
		assert!((n.vx - 0.01 * 0.95).abs() < 1e-12);
		assert!(n.vy.abs() < 1e-12);
		assert!((n.x - (100.0 + 0.0095)).abs() < 1e-12);
	}

	#[test]
	fn node_at_center_feels_no_centering() {
		let mut nodes = vec![node("a", 400.0, 300.0, 10.0)];
		step(&mut nodes, &ForceParams::default(), 800.0, 600.0);
		assert_eq!((nodes[0].x, nodes[0].y), (400.0, 300.0));
	}

	#[test]
	fn pair_repels_symmetrically_about_center() {
		let mut nodes = vec![node("a", 390.0, 300.0, 10.0), node("b", 410.0, 300.0, 10.0)];
		step(&mut nodes, &ForceParams::default(), 800.0, 600.0);
		// a: centering +0.01, repulsion -(20 / 400) * 50 = -2.5
		assert!((nodes[0].vx - (0.01 - 2.5) * 0.95).abs() < 1e-12);
		assert!(nodes[0].x < 390.0);
		assert!(nodes[1].x > 410.0);
	}

	#[test]
	fn coincident_nodes_separate() {
		let mut nodes = vec![node("a", 200.0, 200.0, 10.0), node("b", 200.0, 200.0, 10.0)];
		for _ in 0..5 {
			step(&mut nodes, &ForceParams::default(), 800.0, 600.0);
		}
		let (dx, dy) = (nodes[0].x - nodes[1].x, nodes[0].y - nodes[1].y);
		assert!((dx * dx + dy * dy).sqrt() > 1.0);
	}

	#[test]
	fn positions_stay_inside_bounds() {
		let (w, h) = (640.0, 480.0);
		let mut nodes: Vec<Node> = (0..24)
			.map(|i| {
				let f = i as f64;
				node(
					&format!("n{i}"),
					(f * 97.0) % 900.0 - 100.0,
					(f * 53.0) % 700.0 - 80.0,
					8.0 + (f * 0.37) % 1.0 * 22.0,
				)
			})
			.collect();
		nodes[3].vx = 500.0;
		nodes[7].vy = -500.0;
		for _ in 0..300 {
			step(&mut nodes, &ForceParams::default(), w, h);
			for n in &nodes {
				assert!(n.x >= n.size && n.x <= w - n.size, "{} x={}", n.id, n.x);
				assert!(n.y >= n.size && n.y <= h - n.size, "{} y={}", n.id, n.y);
			}
		}
	}

	#[test]
	fn clamp_is_not_a_bounce() {
		let mut nodes = vec![node("a", 790.0, 300.0, 10.0)];
		nodes[0].vx = 50.0;
		step(&mut nodes, &ForceParams::default(), 800.0, 600.0);
		assert_eq!(nodes[0].x, 790.0);
		assert!(nodes[0].vx > 0.0);
	}
}
