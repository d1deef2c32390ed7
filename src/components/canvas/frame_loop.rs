use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Self-rescheduling `requestAnimationFrame` loop with an explicit stop.
///
/// The tick closure holds a handle to itself so it can reschedule; `stop`
/// (or dropping the loop) cancels the pending frame and breaks that cycle.
pub struct FrameLoop {
	name: &'static str,
	callback: FrameCallback,
	pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	pub fn start(name: &'static str, mut tick: impl FnMut() + 'static) -> Self {
		let callback: FrameCallback = Rc::new(RefCell::new(None));
		let pending = Rc::new(Cell::new(None));
		let (callback_inner, pending_inner) = (callback.clone(), pending.clone());

		*callback.borrow_mut() = Some(Closure::new(move || {
			pending_inner.set(None);
			tick();
			if let Some(ref cb) = *callback_inner.borrow() {
				pending_inner.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *callback.borrow() {
			pending.set(request_frame(cb));
		}
		info!("{name}: frame loop started");

		Self {
			name,
			callback,
			pending,
		}
	}

	pub fn stop(&mut self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		if self.callback.borrow_mut().take().is_some() {
			info!("{}: frame loop stopped", self.name);
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	let window = web_sys::window()?;
	match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
		Ok(id) => Some(id),
		Err(err) => {
			warn!("requestAnimationFrame failed: {err:?}");
			None
		}
	}
}

/// A window `resize` listener that is removed on `stop` or drop.
pub struct ResizeListener {
	callback: Option<Closure<dyn FnMut()>>,
}

impl ResizeListener {
	pub fn attach(on_resize: impl FnMut() + 'static) -> Self {
		let callback: Closure<dyn FnMut()> = Closure::new(on_resize);
		let attached = web_sys::window()
			.map(|window| {
				window
					.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
					.is_ok()
			})
			.unwrap_or(false);
		Self {
			callback: attached.then_some(callback),
		}
	}

	pub fn stop(&mut self) {
		if let (Some(cb), Some(window)) = (self.callback.take(), web_sys::window()) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	}
}

impl Drop for ResizeListener {
	fn drop(&mut self) {
		self.stop();
	}
}
