//! Records handed to the canvas views by the surrounding application.
//!
//! Decoding is per record: a record that cannot be read is skipped with a
//! warning and the rest of the list is kept. Chunk fields that are missing,
//! `null` or of the wrong type read as `0`, empty or `false`.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure to decode a session payload.
#[derive(Error, Debug)]
pub enum RecordError {
	#[error("invalid session payload: {0}")]
	Json(#[from] serde_json::Error),
}

/// A retrieved unit of source text with its overall influence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextChunk {
	#[serde(deserialize_with = "text")]
	pub id: String,
	#[serde(deserialize_with = "text")]
	pub file: String,
	#[serde(deserialize_with = "line")]
	pub line_start: u32,
	#[serde(deserialize_with = "line")]
	pub line_end: u32,
	#[serde(deserialize_with = "text")]
	pub preview: String,
	#[serde(deserialize_with = "number")]
	pub total_influence: f64,
	#[serde(deserialize_with = "numbers")]
	pub usage_timeline: Vec<f64>,
	#[serde(deserialize_with = "text")]
	pub category: String,
	#[serde(deserialize_with = "flag")]
	pub dropped: bool,
}

impl ContextChunk {
	/// Influence clamped into `[0, 1]`; non-finite values read as `0`.
	pub fn influence(&self) -> f64 {
		unit_score(self.total_influence)
	}

	/// Last path segment of the file, or the chunk id when the path is empty.
	pub fn label(&self) -> &str {
		match self.file.rsplit('/').next() {
			Some(name) if !name.is_empty() => name,
			_ => &self.id,
		}
	}

	/// Declared category, or one inferred from the file path.
	pub fn category(&self) -> Category {
		Category::parse(&self.category).unwrap_or_else(|| Category::infer(&self.file))
	}
}

/// One chunk as seen by a single response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseContextChunk {
	#[serde(deserialize_with = "text")]
	pub id: String,
	#[serde(deserialize_with = "number")]
	pub influence_score: f64,
	#[serde(deserialize_with = "flag")]
	pub selected: bool,
	#[serde(deserialize_with = "text")]
	pub rationale: String,
}

impl ResponseContextChunk {
	/// Influence clamped into `[0, 1]`; non-finite values read as `0`.
	pub fn influence(&self) -> f64 {
		unit_score(self.influence_score)
	}
}

/// The selected and dropped context of one response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseContext {
	#[serde(deserialize_with = "records")]
	pub chunks: Vec<ResponseContextChunk>,
	#[serde(deserialize_with = "records")]
	pub dropped_chunks: Vec<ResponseContextChunk>,
}

impl ResponseContext {
	/// Selected chunks first, then dropped ones, in list order.
	pub fn iter(&self) -> impl Iterator<Item = &ResponseContextChunk> {
		self.chunks.iter().chain(self.dropped_chunks.iter())
	}

	pub fn len(&self) -> usize {
		self.chunks.len() + self.dropped_chunks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn selected_count(&self) -> usize {
		self.iter().filter(|chunk| chunk.selected).count()
	}
}

/// Broad kind of source a chunk was retrieved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	Component,
	Utility,
	Documentation,
	Hook,
	Api,
}

impl Category {
	fn parse(raw: &str) -> Option<Self> {
		match raw.to_ascii_lowercase().as_str() {
			"component" => Some(Self::Component),
			"utility" => Some(Self::Utility),
			"documentation" => Some(Self::Documentation),
			"hook" => Some(Self::Hook),
			"api" => Some(Self::Api),
			_ => None,
		}
	}

	/// Guess a category from a file path. Falls back to `Utility`.
	pub fn infer(file: &str) -> Self {
		let path = file.to_lowercase();
		if path.contains("components/") || path.contains("/ui/") {
			return Self::Component;
		}
		if path.contains("/hooks/") || has_hook_prefix(&path) {
			return Self::Hook;
		}
		if path.ends_with(".md") || path.ends_with(".mdx") || path.contains("/docs/") {
			return Self::Documentation;
		}
		if path.contains("/api/") || path.contains("/server/") {
			return Self::Api;
		}
		Self::Utility
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Component => "component",
			Self::Utility => "utility",
			Self::Documentation => "documentation",
			Self::Hook => "hook",
			Self::Api => "api",
		}
	}
}

// `use` followed by a lowercase letter, digit or underscore anywhere in the path.
fn has_hook_prefix(path: &str) -> bool {
	path.match_indices("use").any(|(at, _)| {
		path[at + 3..]
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
	})
}

/// Chunks a run's retriever kept and discarded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrieveStep {
	pub selected_chunks: Vec<String>,
	pub dropped_chunks: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkScore {
	pub chunk_id: String,
	pub score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkInfluence {
	pub chunk_id: String,
	pub influence: f64,
}

/// A single pipeline run on the trace timeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraceRun {
	#[serde(rename = "run_id")]
	pub run_id: String,
	pub summary: String,
	pub timestamp: String,
	pub message_id: Option<String>,
	pub retrieve_step: Option<RetrieveStep>,
	pub scoring_summary: Vec<ChunkScore>,
	pub influence_map: Vec<ChunkInfluence>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
	#[default]
	User,
	Agent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
	#[default]
	Added,
	Removed,
	Boosted,
	Dropped,
	Summarised,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeDetails {
	pub action: ChangeAction,
	pub affected_chunks: Vec<String>,
	pub description: String,
}

/// A user or agent edit to the context store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextChange {
	pub source: ChangeSource,
	pub summary: String,
	pub timestamp: String,
	pub details: ChangeDetails,
}

/// One entry on the trace timeline, discriminated by its `type` field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
	Run(TraceRun),
	ContextChange(ContextChange),
}

impl TraceEvent {
	pub fn summary(&self) -> &str {
		match self {
			Self::Run(run) => &run.summary,
			Self::ContextChange(change) => &change.summary,
		}
	}

	pub fn timestamp(&self) -> &str {
		match self {
			Self::Run(run) => &run.timestamp,
			Self::ContextChange(change) => &change.timestamp,
		}
	}
}

/// A context store, the timeline and per-run response context, as one payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
	#[serde(deserialize_with = "records")]
	pub context_store: Vec<ContextChunk>,
	#[serde(deserialize_with = "records")]
	pub timeline: Vec<TraceEvent>,
	#[serde(deserialize_with = "records")]
	pub responses: Vec<RunResponse>,
}

/// Response context attached to a run id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunResponse {
	pub run_id: String,
	pub context: ResponseContext,
}

impl Session {
	/// Decode a session. Only malformed JSON fails; unreadable records are
	/// skipped.
	pub fn from_json(raw: &str) -> Result<Self, RecordError> {
		Ok(serde_json::from_str(raw)?)
	}

	pub fn runs(&self) -> impl Iterator<Item = &TraceRun> {
		self.timeline.iter().filter_map(|event| match event {
			TraceEvent::Run(run) => Some(run),
			TraceEvent::ContextChange(_) => None,
		})
	}

	pub fn response_for_run(&self, run_id: &str) -> Option<&ResponseContext> {
		self.responses
			.iter()
			.find(|response| response.run_id == run_id)
			.map(|response| &response.context)
	}
}

fn unit_score(value: f64) -> f64 {
	if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 }
}

/// Keep every list entry that decodes as `T`; anything that is not a list
/// reads as empty.
fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let Value::Array(items) = Value::deserialize(deserializer)? else {
		return Ok(Vec::new());
	};
	Ok(items
		.into_iter()
		.enumerate()
		.filter_map(|(i, item)| match T::deserialize(item) {
			Ok(record) => Some(record),
			Err(err) => {
				warn!("skipping record {i}: {err}");
				None
			}
		})
		.collect())
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::String(s) => s,
		_ => String::new(),
	})
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
	Ok(Value::deserialize(deserializer)?.as_f64().unwrap_or(0.0))
}

// Saturating cast: negatives read as 0, fractions are truncated.
fn line<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
	Ok(Value::deserialize(deserializer)?.as_f64().map_or(0, |n| n as u32))
}

fn numbers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
	Ok(match Value::deserialize(deserializer)? {
		Value::Array(items) => items.iter().filter_map(Value::as_f64).collect(),
		_ => Vec::new(),
	})
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
	Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_default() {
		let chunk: ContextChunk = serde_json::from_str(r#"{"id": "c-1"}"#).unwrap();
		assert_eq!(chunk.id, "c-1");
		assert_eq!(chunk.file, "");
		assert_eq!(chunk.total_influence, 0.0);
		assert!(!chunk.dropped);
		assert_eq!(chunk.label(), "c-1");
	}

	#[test]
	fn camel_case_fields_decode() {
		let chunk: ContextChunk = serde_json::from_str(
			r#"{"id":"c-2","file":"src/lib/api.ts","lineStart":3,"lineEnd":9,
			"totalInfluence":0.7,"usageTimeline":[0.1,0.2],"dropped":true}"#,
		)
		.unwrap();
		assert_eq!(chunk.line_start, 3);
		assert_eq!(chunk.line_end, 9);
		assert_eq!(chunk.usage_timeline.len(), 2);
		assert!(chunk.dropped);
		assert_eq!(chunk.label(), "api.ts");
	}

	#[test]
	fn influence_is_sanitised() {
		let mut chunk = ContextChunk {
			total_influence: 1.8,
			..Default::default()
		};
		assert_eq!(chunk.influence(), 1.0);
		chunk.total_influence = -0.3;
		assert_eq!(chunk.influence(), 0.0);
		chunk.total_influence = f64::NAN;
		assert_eq!(chunk.influence(), 0.0);
	}

	#[test]
	fn category_inference() {
		assert_eq!(Category::infer("app/components/Button.tsx"), Category::Component);
		assert_eq!(Category::infer("src/hooks/data.ts"), Category::Hook);
		assert_eq!(Category::infer("src/useTheme.ts"), Category::Hook);
		assert_eq!(Category::infer("README.md"), Category::Documentation);
		assert_eq!(Category::infer("src/server/routes.ts"), Category::Api);
		assert_eq!(Category::infer("src/lib/math.ts"), Category::Utility);
		assert_eq!(Category::infer("main.rs"), Category::Utility);

		let declared = ContextChunk {
			file: "README.md".into(),
			category: "API".into(),
			..Default::default()
		};
		assert_eq!(declared.category(), Category::Api);
	}

	#[test]
	fn trace_events_are_tagged() {
		let events: Vec<TraceEvent> = serde_json::from_str(
			r#"[
				{"type":"run","run_id":"r1","summary":"first","timestamp":"t0","messageId":"m1",
				 "retrieveStep":{"selectedChunks":["a"],"droppedChunks":["b"]}},
				{"type":"context_change","source":"agent","summary":"drop b","timestamp":"t1",
				 "details":{"action":"dropped","affectedChunks":["b"],"description":""}}
			]"#,
		)
		.unwrap();
		match &events[0] {
			TraceEvent::Run(run) => {
				assert_eq!(run.run_id, "r1");
				assert_eq!(run.message_id.as_deref(), Some("m1"));
				assert_eq!(run.retrieve_step.as_ref().unwrap().dropped_chunks, vec!["b"]);
			}
			other => panic!("expected run, got {other:?}"),
		}
		match &events[1] {
			TraceEvent::ContextChange(change) => {
				assert_eq!(change.source, ChangeSource::Agent);
				assert_eq!(change.details.action, ChangeAction::Dropped);
			}
			other => panic!("expected context change, got {other:?}"),
		}
		assert_eq!(events[1].summary(), "drop b");
		assert_eq!(events[0].timestamp(), "t0");
	}

	#[test]
	fn bad_records_are_skipped_not_fatal() {
		let session = Session::from_json(
			r#"{
				"contextStore": [
					{"id":"a","file":"src/a.ts","totalInfluence":null},
					{"id":"b","file":null,"lineStart":4.7,"lineEnd":-2,"dropped":"yes"},
					42,
					{"id":"c","totalInfluence":0.4,"usageTimeline":[0.1,"x",0.3]}
				],
				"timeline": [
					{"type":"mystery"},
					{"type":"run","run_id":"r1","summary":"ok","timestamp":"t0"}
				],
				"responses": [
					{"runId":"r0","context":{"chunks":"nope"}},
					{"runId":"r1","context":{"chunks":[{"id":"a","influenceScore":null,"selected":true},7]}}
				]
			}"#,
		)
		.unwrap();

		let ids: Vec<_> = session.context_store.iter().map(|c| c.id.as_str()).collect();
		assert_eq!(ids, ["a", "b", "c"]);
		assert_eq!(session.context_store[0].total_influence, 0.0);
		assert_eq!(session.context_store[1].file, "");
		assert_eq!(session.context_store[1].line_start, 4);
		assert_eq!(session.context_store[1].line_end, 0);
		assert!(!session.context_store[1].dropped);
		assert_eq!(session.context_store[2].usage_timeline, vec![0.1, 0.3]);

		assert_eq!(session.timeline.len(), 1);
		assert_eq!(session.runs().next().map(|run| run.run_id.as_str()), Some("r1"));

		assert!(session.response_for_run("r0").unwrap().is_empty());
		let context = session.response_for_run("r1").unwrap();
		assert_eq!(context.len(), 1);
		assert_eq!(context.chunks[0].influence_score, 0.0);
	}

	#[test]
	fn malformed_json_is_an_error() {
		let result = Session::from_json("{ not json");
		assert!(matches!(result, Err(RecordError::Json(_))));
	}

	#[test]
	fn response_context_orders_selected_first() {
		let context = ResponseContext {
			chunks: vec![
				ResponseContextChunk {
					id: "a".into(),
					selected: true,
					..Default::default()
				},
				ResponseContextChunk {
					id: "b".into(),
					selected: true,
					..Default::default()
				},
			],
			dropped_chunks: vec![ResponseContextChunk {
				id: "c".into(),
				..Default::default()
			}],
		};
		let ids: Vec<_> = context.iter().map(|chunk| chunk.id.as_str()).collect();
		assert_eq!(ids, ["a", "b", "c"]);
		assert_eq!(context.selected_count(), 2);
		assert_eq!(context.len(), 3);
	}
}
