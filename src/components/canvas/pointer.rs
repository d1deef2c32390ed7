use super::hit_test::{HitTarget, hit_test};
use super::viewport::{Point, Viewport};

/// Movement (in screen pixels) after which a press counts as a drag.
const CLICK_SLOP: f64 = 3.0;

/// Mouse button of a pointer event, by DOM `button` code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	Primary,
	Secondary,
	Other,
}

impl PointerButton {
	pub fn from_code(code: i16) -> Self {
		match code {
			0 => Self::Primary,
			2 => Self::Secondary,
			_ => Self::Other,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerMode {
	#[default]
	Idle,
	/// Dragging the background. `anchor` is the last pointer position.
	Panning { anchor: Point, travelled: f64 },
}

/// A node-level outcome of a pointer event, by target index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
	Activate(usize),
	Toggle(usize),
}

/// Pointer state machine shared by the canvas views.
#[derive(Clone, Debug, Default)]
pub struct PointerState {
	pub mode: PointerMode,
	pub hovered: Option<usize>,
	suppress_click: bool,
}

impl PointerState {
	pub fn is_panning(&self) -> bool {
		matches!(self.mode, PointerMode::Panning { .. })
	}

	/// A primary press over empty space starts a pan; presses on targets
	/// are left for `click`.
	pub fn pointer_down<T: HitTarget>(
		&mut self,
		button: PointerButton,
		pos: Point,
		targets: &[T],
		viewport: &Viewport,
	) {
		self.suppress_click = false;
		if button != PointerButton::Primary {
			return;
		}
		if hit_test(targets, viewport, pos.x, pos.y).is_none() {
			self.mode = PointerMode::Panning {
				anchor: pos,
				travelled: 0.0,
			};
		}
	}

	/// Pans while dragging, otherwise refreshes the hovered target.
	pub fn pointer_move<T: HitTarget>(&mut self, pos: Point, targets: &[T], viewport: &mut Viewport) {
		match self.mode {
			PointerMode::Panning { anchor, travelled } => {
				viewport.pan_by(pos.x - anchor.x, pos.y - anchor.y);
				self.mode = PointerMode::Panning {
					anchor: pos,
					travelled: travelled + anchor.distance(pos),
				};
			}
			PointerMode::Idle => {
				self.hovered = hit_test(targets, viewport, pos.x, pos.y);
			}
		}
	}

	pub fn pointer_up(&mut self) {
		if let PointerMode::Panning { travelled, .. } = self.mode {
			self.suppress_click = travelled > CLICK_SLOP;
		}
		self.mode = PointerMode::Idle;
	}

	pub fn pointer_leave(&mut self) {
		self.mode = PointerMode::Idle;
		self.hovered = None;
		self.suppress_click = false;
	}

	/// A completed click. Primary clicks on a target activate it; a click
	/// that ends a pan gesture is swallowed.
	pub fn click<T: HitTarget>(
		&mut self,
		button: PointerButton,
		pos: Point,
		targets: &[T],
		viewport: &Viewport,
	) -> Option<PointerAction> {
		if std::mem::take(&mut self.suppress_click) || self.is_panning() {
			return None;
		}
		if button != PointerButton::Primary {
			return None;
		}
		hit_test(targets, viewport, pos.x, pos.y).map(PointerAction::Activate)
	}

	/// A secondary (context-menu) action on a target toggles it.
	pub fn context_menu<T: HitTarget>(
		&mut self,
		pos: Point,
		targets: &[T],
		viewport: &Viewport,
	) -> Option<PointerAction> {
		if self.is_panning() {
			return None;
		}
		hit_test(targets, viewport, pos.x, pos.y).map(PointerAction::Toggle)
	}

	/// CSS cursor for the current state.
	pub fn cursor(&self) -> &'static str {
		if self.is_panning() {
			"grabbing"
		} else if self.hovered.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}
}
