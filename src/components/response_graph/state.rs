use super::radial::{RadialNode, layout};
use crate::components::canvas::{Point, PointerAction, PointerButton, PointerState, Viewport};
use crate::records::{ContextChunk, ResponseContext};

/// View state of the per-response radial graph. Node positions are not
/// stored; they are recomputed from the context on every use.
pub struct ResponseGraphState {
	pub context: ResponseContext,
	pub chunks: Vec<ContextChunk>,
	pub viewport: Viewport,
	pub pointer: PointerState,
	pub width: f64,
	pub height: f64,
}

impl ResponseGraphState {
	pub fn new(context: ResponseContext, chunks: Vec<ContextChunk>, width: f64, height: f64) -> Self {
		Self {
			context,
			chunks,
			viewport: Viewport::default(),
			pointer: PointerState::default(),
			width,
			height,
		}
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// A response with no chunks draws only its backdrop.
	pub fn is_empty(&self) -> bool {
		self.context.is_empty()
	}

	pub fn nodes(&self) -> Vec<RadialNode> {
		layout(&self.context, self.center(), self.width, self.height)
	}

	pub fn set_context(&mut self, context: ResponseContext, chunks: Vec<ContextChunk>) {
		self.context = context;
		self.chunks = chunks;
		self.pointer.hovered = None;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// The context-store record behind a response chunk, if the store has it.
	pub fn chunk(&self, id: &str) -> Option<&ContextChunk> {
		self.chunks.iter().find(|chunk| chunk.id == id)
	}

	pub fn label<'a>(&'a self, node: &'a RadialNode) -> &'a str {
		self.chunk(&node.id).map_or(node.id.as_str(), ContextChunk::label)
	}

	pub fn pointer_down(&mut self, button: PointerButton, pos: Point) {
		let nodes = self.nodes();
		self.pointer.pointer_down(button, pos, &nodes, &self.viewport);
	}

	pub fn pointer_move(&mut self, pos: Point) {
		let nodes = self.nodes();
		self.pointer.pointer_move(pos, &nodes, &mut self.viewport);
	}

	pub fn pointer_up(&mut self) {
		self.pointer.pointer_up();
	}

	pub fn pointer_leave(&mut self) {
		self.pointer.pointer_leave();
	}

	/// Id of the chunk under a primary click.
	pub fn click(&mut self, button: PointerButton, pos: Point) -> Option<String> {
		let nodes = self.nodes();
		match self.pointer.click(button, pos, &nodes, &self.viewport)? {
			PointerAction::Activate(i) | PointerAction::Toggle(i) => Some(nodes[i].id.clone()),
		}
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
