use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::warn;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use super::types::{GraphEvent, Relation};
use crate::components::canvas::{
	FrameLoop, Point, PointerButton, ResizeListener, Surface, event_point,
};
use crate::records::ContextChunk;

type Shared<T> = Rc<RefCell<Option<T>>>;

fn canvas_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	Some(event_point(&canvas, ev))
}

/// Living force-directed map of the whole context store.
///
/// Left-click opens a chunk, right-click toggles it between in-use and
/// dropped, dragging the background pans and the wheel zooms.
#[component]
pub fn ContextGraphView(
	#[prop(into)] chunks: Signal<Vec<ContextChunk>>,
	#[prop(into)] on_node_click: Callback<String>,
	#[prop(into)] on_back: Callback<()>,
	#[prop(optional, into)] on_toggle_dropped: Option<Callback<(String, bool)>>,
	#[prop(optional)] relations: Vec<Relation>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: Shared<ForceGraphState> = Rc::new(RefCell::new(None));
	let surface: Shared<Surface> = Rc::new(RefCell::new(None));
	let zoom_percent = RwSignal::new(100u32);
	let handles = StoredValue::new_local(None::<(FrameLoop, ResizeListener)>);

	let dispatch = move |event: GraphEvent| match event {
		GraphEvent::NodeClicked(id) => on_node_click.run(id),
		GraphEvent::DroppedToggled { id, dropped } => {
			if let Some(cb) = on_toggle_dropped {
				cb.run((id, dropped));
			}
		}
	};

	let (state_init, surface_init) = (state.clone(), surface.clone());
	Effect::new(move |_| {
		let chunks = chunks.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.rebuild(&chunks, &relations);
			return;
		}

		let (w, h) = match Surface::acquire(canvas) {
			Ok(acquired) => {
				let size = (acquired.width, acquired.height);
				*surface_init.borrow_mut() = Some(acquired);
				size
			}
			Err(err) => {
				warn!("context graph: {err}, rendering disabled");
				(800.0, 600.0)
			}
		};
		*state_init.borrow_mut() = Some(ForceGraphState::new(&chunks, &relations, w, h));

		let (state_resize, surface_resize) = (state_init.clone(), surface_init.clone());
		let resize = ResizeListener::attach(move || {
			let mut surface = surface_resize.borrow_mut();
			let Some(surface) = surface.as_mut() else {
				return;
			};
			if let Err(err) = surface.fit() {
				warn!("context graph: resize failed: {err}");
				return;
			}
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(surface.width, surface.height);
			}
		});

		let (state_anim, surface_anim) = (state_init.clone(), surface_init.clone());
		let frames = FrameLoop::start("context graph", move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				if let Some(ref surface) = *surface_anim.borrow() {
					render::render(s, surface);
					surface.set_cursor(s.pointer.cursor());
				}
			}
		});
		handles.set_value(Some((frames, resize)));
	});

	on_cleanup(move || {
		let _ = handles.try_update_value(|h| h.take());
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(pos) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(PointerButton::from_code(ev.button()), pos);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(pos) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(pos);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_cl = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(pos) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let event = state_cl
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.click(PointerButton::from_code(ev.button()), pos));
		if let Some(event) = event {
			dispatch(event);
		}
	};

	let state_cm = state.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some(pos) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let event = state_cm.borrow_mut().as_mut().and_then(|s| s.context_menu(pos));
		if let Some(event) = event {
			dispatch(event);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(pos) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y(), pos);
			zoom_percent.set(s.viewport.percent());
		}
	};

	let state_zo = state.clone();
	let zoom_out = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zo.borrow_mut() {
			s.zoom_out();
			zoom_percent.set(s.viewport.percent());
		}
	};

	let state_zr = state.clone();
	let reset_view = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zr.borrow_mut() {
			s.reset_view();
			zoom_percent.set(s.viewport.percent());
		}
	};

	let state_zi = state.clone();
	let zoom_in = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_zi.borrow_mut() {
			s.zoom_in();
			zoom_percent.set(s.viewport.percent());
		}
	};

	view! {
		<div class="graph-view">
			<div class="graph-toolbar">
				<div class="graph-toolbar-title">
					<button class="ghost" on:click=move |_| on_back.run(())>
						"← Back to chat"
					</button>
					<h1>"Graph view"</h1>
				</div>
				<div class="zoom-controls">
					<button class="ghost" title="Zoom out" on:click=zoom_out>"−"</button>
					<button class="ghost" title="Reset view" on:click=reset_view>
						{move || format!("{}%", zoom_percent.get())}
					</button>
					<button class="ghost" title="Zoom in" on:click=zoom_in>"+"</button>
				</div>
			</div>
			<canvas
				node_ref=canvas_ref
				class="graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:contextmenu=on_contextmenu
				on:wheel=on_wheel
			/>
			<div class="graph-legend">
				<div>"Node size = influence score"</div>
				<div class="small">"Left-click: View details"</div>
				<div class="small">"Right-click: Toggle use/drop"</div>
				<div class="small">"Drag to pan • Scroll to zoom"</div>
			</div>
		</div>
	}
}
