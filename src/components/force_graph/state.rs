use super::model::GraphModel;
use super::simulation::{ForceParams, step};
use super::types::{Edge, GraphEvent, Node, Relation};
use crate::components::canvas::{Point, PointerAction, PointerButton, PointerState, Viewport};
use crate::records::ContextChunk;

/// Everything the graph view mutates between frames. Created when the view
/// mounts, dropped when it unmounts; the stepper and the renderer borrow it.
pub struct ForceGraphState {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	pub viewport: Viewport,
	pub pointer: PointerState,
	pub params: ForceParams,
	pub width: f64,
	pub height: f64,
}

impl ForceGraphState {
	pub fn new(chunks: &[ContextChunk], relations: &[Relation], width: f64, height: f64) -> Self {
		let GraphModel { nodes, edges } = GraphModel::build(chunks, relations, width, height);
		Self {
			nodes,
			edges,
			viewport: Viewport::default(),
			pointer: PointerState::default(),
			params: ForceParams::default(),
			width,
			height,
		}
	}

	/// Replace the node set after the chunk list changed. The viewport is kept.
	pub fn rebuild(&mut self, chunks: &[ContextChunk], relations: &[Relation]) {
		let GraphModel { nodes, edges } = GraphModel::build(chunks, relations, self.width, self.height);
		self.nodes = nodes;
		self.edges = edges;
		self.pointer.hovered = None;
	}

	pub fn tick(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		step(&mut self.nodes, &self.params, self.width, self.height);
	}

	/// New drawing-surface size. Node positions are kept.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	pub fn hovered(&self) -> Option<&Node> {
		self.pointer.hovered.and_then(|i| self.nodes.get(i))
	}

	pub fn pointer_down(&mut self, button: PointerButton, pos: Point) {
		self.pointer.pointer_down(button, pos, &self.nodes, &self.viewport);
	}

	pub fn pointer_move(&mut self, pos: Point) {
		self.pointer.pointer_move(pos, &self.nodes, &mut self.viewport);
	}

	pub fn pointer_up(&mut self) {
		self.pointer.pointer_up();
	}

	pub fn pointer_leave(&mut self) {
		self.pointer.pointer_leave();
	}

	pub fn click(&mut self, button: PointerButton, pos: Point) -> Option<GraphEvent> {
		match self.pointer.click(button, pos, &self.nodes, &self.viewport)? {
			PointerAction::Activate(i) => Some(GraphEvent::NodeClicked(self.nodes[i].id.clone())),
			PointerAction::Toggle(i) => self.toggle_dropped(i),
		}
	}

	pub fn context_menu(&mut self, pos: Point) -> Option<GraphEvent> {
		match self.pointer.context_menu(pos, &self.nodes, &self.viewport)? {
			PointerAction::Toggle(i) => self.toggle_dropped(i),
			PointerAction::Activate(i) => Some(GraphEvent::NodeClicked(self.nodes[i].id.clone())),
		}
	}

	/// Flip a node's dropped flag in place.
	pub fn toggle_dropped(&mut self, index: usize) -> Option<GraphEvent> {
		let node = self.nodes.get_mut(index)?;
		node.dropped = !node.dropped;
		Some(GraphEvent::DroppedToggled {
			id: node.id.clone(),
			dropped: node.dropped,
		})
	}

	pub fn wheel(&mut self, delta_y: f64, anchor: Point) {
		self.viewport.wheel(delta_y, anchor);
	}

	pub fn zoom_in(&mut self) {
		let center = self.center();
		self.viewport.zoom_in(center);
	}

	pub fn zoom_out(&mut self) {
		let center = self.center();
		self.viewport.zoom_out(center);
	}

	pub fn reset_view(&mut self) {
		self.viewport.reset();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::canvas::viewport::{MAX_ZOOM, MIN_ZOOM};

	fn chunk(id: &str, file: &str, influence: f64) -> ContextChunk {
		ContextChunk {
			id: id.into(),
			file: file.into(),
			total_influence: influence,
			..Default::default()
		}
	}

	fn state() -> ForceGraphState {
		ForceGraphState::new(
			&[
				chunk("c1", "src/a.ts", 0.5),
				chunk("c2", "src/b.ts", 0.2),
				chunk("c3", "src/a.ts", 1.0),
			],
			&[],
			800.0,
			600.0,
		)
	}

	fn screen_of(state: &ForceGraphState, index: usize) -> Point {
		let node = &state.nodes[index];
		state.viewport.world_to_screen(node.x, node.y)
	}

	#[test]
	fn toggling_twice_restores_and_reports_alternating() {
		let mut state = state();
		let pos = screen_of(&state, 1);
		let original = state.nodes[1].dropped;

		let mut events = Vec::new();
		events.extend(state.context_menu(pos));
		events.extend(state.context_menu(pos));

		assert_eq!(state.nodes[1].dropped, original);
		assert_eq!(
			events,
			vec![
				GraphEvent::DroppedToggled {
					id: "c2".into(),
					dropped: !original
				},
				GraphEvent::DroppedToggled {
					id: "c2".into(),
					dropped: original
				},
			]
		);
	}

	#[test]
	fn primary_click_reports_node_without_mutation() {
		let mut state = state();
		let pos = screen_of(&state, 0);
		state.pointer_down(PointerButton::Primary, pos);
		state.pointer_up();
		let before = state.nodes.clone();
		assert_eq!(
			state.click(PointerButton::Primary, pos),
			Some(GraphEvent::NodeClicked("c1".into()))
		);
		assert_eq!(state.nodes, before);
		assert!(!state.pointer.is_panning());
	}

	#[test]
	fn empty_graph_is_steady() {
		let mut state = ForceGraphState::new(&[], &[], 800.0, 600.0);
		state.tick();
		state.pointer_move(Point::new(400.0, 300.0));
		assert!(state.hovered().is_none());
		assert_eq!(state.click(PointerButton::Primary, Point::new(400.0, 300.0)), None);
		assert_eq!(state.context_menu(Point::new(400.0, 300.0)), None);
	}

	#[test]
	fn bounds_hold_after_many_ticks() {
		let chunks: Vec<ContextChunk> = (0..30)
			.map(|i| chunk(&format!("c{i}"), &format!("f{}.ts", i % 4), (i as f64) / 30.0))
			.collect();
		let mut state = ForceGraphState::new(&chunks, &[], 500.0, 400.0);
		for frame in 0..240 {
			if frame == 120 {
				state.resize(420.0, 360.0);
			}
			state.tick();
		}
		for node in &state.nodes {
			assert!(node.x >= node.size && node.x <= state.width - node.size);
			assert!(node.y >= node.size && node.y <= state.height - node.size);
		}
	}

	#[test]
	fn rebuild_replaces_nodes_and_keeps_viewport() {
		let mut state = state();
		state.zoom_in();
		state.pointer_move(screen_of(&state, 0));
		assert!(state.hovered().is_some());
		let viewport = state.viewport;

		state.rebuild(&[chunk("d1", "src/z.ts", 0.0)], &[]);
		assert_eq!(state.nodes.len(), 1);
		assert_eq!(state.nodes[0].id, "d1");
		assert!(state.edges.is_empty());
		assert!(state.hovered().is_none());
		assert_eq!(state.viewport, viewport);
	}

	#[test]
	fn resize_keeps_positions() {
		let mut state = state();
		state.tick();
		let before: Vec<(f64, f64)> = state.nodes.iter().map(|n| (n.x, n.y)).collect();
		state.resize(1024.0, 768.0);
		let after: Vec<(f64, f64)> = state.nodes.iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn toolbar_zoom_is_clamped_and_resettable() {
		let mut state = state();
		let center = state.center();
		let before = state.viewport.screen_to_world(center.x, center.y);
		state.zoom_in();
		let after = state.viewport.screen_to_world(center.x, center.y);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
		state.pointer_down(PointerButton::Primary, Point::new(5.0, 5.0));
		state.pointer_move(Point::new(45.0, 25.0));
		state.pointer_up();
		let before = state.viewport.screen_to_world(center.x, center.y);
		state.zoom_out();
		let after = state.viewport.screen_to_world(center.x, center.y);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);

		for _ in 0..20 {
			state.zoom_in();
		}
		assert_eq!(state.viewport.zoom, MAX_ZOOM);
		for _ in 0..20 {
			state.zoom_out();
		}
		assert_eq!(state.viewport.zoom, MIN_ZOOM);
		state.wheel(-1.0, Point::new(10.0, 10.0));
		state.reset_view();
		assert_eq!(state.viewport, Viewport::default());
	}

	#[test]
	fn pan_then_click_on_node_is_swallowed() {
		let mut state = state();
		state.pointer_down(PointerButton::Primary, Point::new(5.0, 5.0));
		state.pointer_move(Point::new(25.0, 5.0));
		state.pointer_up();
		let pos = screen_of(&state, 0);
		assert_eq!(state.click(PointerButton::Primary, pos), None);
		assert_eq!(state.click(PointerButton::Primary, pos), Some(GraphEvent::NodeClicked("c1".into())));
	}
}
