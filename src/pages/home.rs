use leptos::prelude::*;
use log::{info, warn};

use crate::components::force_graph::ContextGraphView;
use crate::components::response_graph::ResponseContextView;
use crate::records::{ResponseContext, Session, TraceEvent};

const SAMPLE_SESSION: &str = include_str!("sample_session.json");

/// Parse the bundled session. Only invalid JSON yields an empty session.
pub fn load_sample_session() -> Session {
	Session::from_json(SAMPLE_SESSION).unwrap_or_else(|err| {
		warn!("sample session rejected: {err}");
		Session::default()
	})
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
	Graph,
	Timeline,
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let session = StoredValue::new(load_sample_session());
	let chunks = RwSignal::new(session.with_value(|s| s.context_store.clone()));
	let screen = RwSignal::new(Screen::Graph);
	let opened_chunk = RwSignal::new(None::<String>);
	let active_run = RwSignal::new(None::<String>);
	let toggles = RwSignal::new(0usize);

	let response = Signal::derive(move || {
		active_run
			.get()
			.and_then(|run| session.with_value(|s| s.response_for_run(&run).cloned()))
			.unwrap_or_else(ResponseContext::default)
	});

	let on_node_click = move |id: String| {
		info!("open chunk {id}");
		opened_chunk.set(Some(id));
	};
	let on_toggle_dropped = move |(id, dropped): (String, bool)| {
		info!("chunk {id} dropped={dropped}");
		toggles.update(|n| *n += 1);
	};
	let on_back = move |_: ()| screen.set(Screen::Timeline);

	let opened = move || {
		let id = opened_chunk.get()?;
		let chunk = chunks.get().into_iter().find(|c| c.id == id)?;
		Some(view! {
			<div class="chunk-card">
				<button class="ghost" on:click=move |_| opened_chunk.set(None)>"✕"</button>
				<h3>{chunk.file.clone()}</h3>
				<p class="muted">
					{format!("lines {}–{} · influence {:.0}%", chunk.line_start, chunk.line_end, chunk.influence() * 100.0)}
				</p>
				<pre class="preview">{chunk.preview.clone()}</pre>
			</div>
		})
	};

	let timeline = move || {
		session.with_value(|s| {
			s.timeline
				.iter()
				.map(|event| match event {
					TraceEvent::Run(run) => {
						let run_id = run.run_id.clone();
						let has_context = s.response_for_run(&run.run_id).is_some();
						view! {
							<li class="event run">
								<span class="time">{event.timestamp().to_owned()}</span>
								<span>{event.summary().to_owned()}</span>
								<button
									class="ghost"
									disabled=!has_context
									on:click=move |_| active_run.set(Some(run_id.clone()))
								>
									"View context"
								</button>
							</li>
						}
						.into_any()
					}
					TraceEvent::ContextChange(change) => view! {
						<li class="event change">
							<span class="time">{event.timestamp().to_owned()}</span>
							<span>{event.summary().to_owned()}</span>
							<span class="muted">{change.details.affected_chunks.join(", ")}</span>
						</li>
					}
					.into_any(),
				})
				.collect_view()
		})
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<Show
				when=move || screen.get() == Screen::Graph
				fallback=move || {
					view! {
						<div class="timeline-screen">
							<div class="timeline-header">
								<h1>"Trace log"</h1>
								<button class="ghost" on:click=move |_| screen.set(Screen::Graph)>
									"Graph view"
								</button>
							</div>
							<ul class="timeline">{timeline}</ul>
						</div>
					}
				}
			>
				<div class="fullscreen-graph">
					<ContextGraphView
						chunks=chunks
						on_node_click=on_node_click
						on_toggle_dropped=on_toggle_dropped
						on_back=on_back
					/>
					<div class="graph-status">
						{move || format!("{} toggles this session", toggles.get())}
					</div>
					{opened}
				</div>
			</Show>
			{move || {
				active_run
					.get()
					.map(|_| {
						view! {
							<ResponseContextView
								response=response
								chunks=chunks
								on_close=move |_: ()| active_run.set(None)
							/>
						}
					})
			}}
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_session_loads() {
		let session = load_sample_session();
		assert_eq!(session.context_store.len(), 8);
		assert_eq!(session.runs().count(), 2);
		for run in session.runs() {
			assert!(session.response_for_run(&run.run_id).is_some());
		}
		let context = session.response_for_run("run-1").unwrap();
		assert_eq!(context.selected_count(), 3);
		assert_eq!(context.dropped_chunks.len(), 1);
	}
}
