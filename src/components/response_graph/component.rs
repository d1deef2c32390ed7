use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::warn;
use web_sys::{HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ResponseGraphState;
use crate::components::canvas::{
	FrameLoop, Point, PointerButton, ResizeListener, Surface, event_point,
};
use crate::records::{ContextChunk, ResponseContext, ResponseContextChunk};

const PREVIEW_LIMIT: usize = 500;

type Shared<T> = Rc<RefCell<Option<T>>>;

fn canvas_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	Some(event_point(&canvas, ev))
}

/// Explanation shown when the backend gave no rationale for a chunk.
pub fn fallback_rationale(chunk: &ResponseContextChunk, file: &str) -> String {
	let score = chunk.influence() * 100.0;
	if chunk.selected {
		format!(
			"This context from {file} was selected because it contains relevant information \
			 with an influence score of {score:.1}%."
		)
	} else {
		format!(
			"This context from {file} was not included in the final response. It had an \
			 influence score of {score:.1}%, but other chunks were deemed more relevant."
		)
	}
}

/// First `PREVIEW_LIMIT` characters of a preview, with an ellipsis if cut.
pub fn truncate_preview(preview: &str) -> String {
	match preview.char_indices().nth(PREVIEW_LIMIT) {
		Some((at, _)) => format!("{}...", &preview[..at]),
		None => preview.to_owned(),
	}
}

/// Radial view of the context one response was built from, with the
/// response at the center and its selected and dropped chunks around it.
#[component]
pub fn ResponseContextView(
	#[prop(into)] response: Signal<ResponseContext>,
	#[prop(into)] chunks: Signal<Vec<ContextChunk>>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: Shared<ResponseGraphState> = Rc::new(RefCell::new(None));
	let surface: Shared<Surface> = Rc::new(RefCell::new(None));
	let zoom_percent = RwSignal::new(100u32);
	let selected = RwSignal::new(None::<String>);
	let handles = StoredValue::new_local(None::<(FrameLoop, ResizeListener)>);

	let (state_init, surface_init) = (state.clone(), surface.clone());
	Effect::new(move |_| {
		let (context, store) = (response.get(), chunks.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.set_context(context, store);
			return;
		}

		let (w, h) = match Surface::acquire(canvas) {
			Ok(acquired) => {
				let size = (acquired.width, acquired.height);
				*surface_init.borrow_mut() = Some(acquired);
				size
			}
			Err(err) => {
				warn!("response context: {err}, rendering disabled");
				(800.0, 600.0)
			}
		};
		*state_init.borrow_mut() = Some(ResponseGraphState::new(context, store, w, h));

		let (state_resize, surface_resize) = (state_init.clone(), surface_init.clone());
		let resize = ResizeListener::attach(move || {
			let mut surface = surface_resize.borrow_mut();
			let Some(surface) = surface.as_mut() else {
				return;
			};
			if let Err(err) = surface.fit() {
				warn!("response context: resize failed: {err}");
				return;
			}
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(surface.width, surface.height);
			}
		});

		let (state_anim, surface_anim) = (state_init.clone(), surface_init.clone());
		let frames = FrameLoop::start("response context", move || {
			if let (Some(s), Some(surface)) = (&*state_anim.borrow(), &*surface_anim.borrow()) {
				render::render(s, surface);
				surface.set_cursor(s.pointer.cursor());
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
		let hit = state_cl
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.click(PointerButton::from_code(ev.button()), pos));
		if hit.is_some() {
			selected.set(hit);
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

	let counts = move || {
		let context = response.get();
		let picked = context.selected_count();
		format!("{picked} selected, {} dropped", context.len() - picked)
	};

	let detail = move || {
		let id = selected.get()?;
		let context = response.get();
		let chunk = context.iter().find(|c| c.id == id)?.clone();
		let info = chunks.get().into_iter().find(|c| c.id == id);
		Some((chunk, info))
	};

	view! {
		<div class="response-overlay">
			<div class="response-panel">
				<div class="response-header">
					<div>
						<h2>"Response Context"</h2>
						<p class="muted">{counts}</p>
					</div>
					<div class="zoom-controls">
						<button class="ghost" title="Zoom out" on:click=zoom_out>"−"</button>
						<button class="ghost" title="Reset view" on:click=reset_view>
							{move || format!("{}%", zoom_percent.get())}
						</button>
						<button class="ghost" title="Zoom in" on:click=zoom_in>"+"</button>
						<button class="ghost" title="Close" on:click=move |_| on_close.run(())>"✕"</button>
					</div>
				</div>
				<canvas
					node_ref=canvas_ref
					class="response-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:click=on_click
					on:wheel=on_wheel
				/>
				<div class="graph-legend">
					<div class="legend-row"><span class="dot selected"></span>"Selected context"</div>
					<div class="legend-row muted"><span class="dot dropped"></span>"Dropped context"</div>
					<div class="small muted">"Node size = influence score"</div>
					<div class="small muted">"Drag to pan • Scroll to zoom"</div>
				</div>
			</div>
			{move || {
				detail()
					.map(|(chunk, info)| {
						let file = info.as_ref().map(|c| c.file.clone()).unwrap_or_default();
						let lines = info
							.as_ref()
							.map(|c| format!("{}–{}", c.line_start, c.line_end))
							.unwrap_or_default();
						let category = info
							.as_ref()
							.map(|c| c.category().as_str())
							.unwrap_or_default();
						let preview = info
							.as_ref()
							.map(|c| truncate_preview(&c.preview))
							.filter(|p| !p.is_empty())
							.unwrap_or_else(|| "No content available".to_owned());
						let rationale = if chunk.rationale.is_empty() {
							fallback_rationale(&chunk, &file)
						} else {
							chunk.rationale.clone()
						};
						let (status, status_class) = if chunk.selected {
							("Selected", "status selected")
						} else {
							("Dropped", "status dropped")
						};
						let score = format!("{:.1}%", chunk.influence() * 100.0);
						view! {
							<div class="detail-overlay">
								<div class="detail-panel">
									<div class="detail-header">
										<div>
											<h3>"Context Explanation"</h3>
											<p class="muted">{file}</p>
										</div>
										<button class="ghost" on:click=move |_| selected.set(None)>
											"✕"
										</button>
									</div>
									<dl>
										<dt>"Status"</dt>
										<dd class=status_class>
											{status}
										</dd>
										<dt>"Influence Score"</dt>
										<dd>{score}</dd>
										<dt>"Lines"</dt>
										<dd>{lines}</dd>
										<dt>"Category"</dt>
										<dd>{category}</dd>
									</dl>
									<h4>"Reasoning"</h4>
									<p class="rationale">{rationale}</p>
									<h4>"Context Preview"</h4>
									<pre class="preview">{preview}</pre>
								</div>
							</div>
						}
					})
			}}
		</div>
	}
}
