use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::debug;

use super::types::{Edge, Node, Relation};
use crate::records::ContextChunk;
use crate::theme::color_for_file;

pub const BASE_SIZE: f64 = 8.0;
pub const INFLUENCE_SCALE: f64 = 22.0;

/// Node radius for an influence in `[0, 1]`.
pub fn node_size(influence: f64) -> f64 {
	BASE_SIZE + influence * INFLUENCE_SCALE
}

/// Nodes plus the edges between them, built once per dataset.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl GraphModel {
	/// Build a model from chunk records. Chunks from the same file are linked
	/// in record order; `relations` add further links by chunk id. Relations
	/// naming unknown ids or a node and itself are discarded.
	pub fn build(chunks: &[ContextChunk], relations: &[Relation], width: f64, height: f64) -> Self {
		let count = chunks.len();
		let (cx, cy) = (width / 2.0, height / 2.0);
		let ring = (width.min(height) * 0.3).max(1.0);

		let nodes: Vec<Node> = chunks
			.iter()
			.enumerate()
			.map(|(i, chunk)| {
				let angle = (i as f64) * 2.0 * PI / count as f64;
				Node {
					id: chunk.id.clone(),
					x: cx + ring * angle.cos(),
					y: cy + ring * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					size: node_size(chunk.influence()),
					color: color_for_file(&chunk.file),
					label: chunk.label().to_owned(),
					dropped: chunk.dropped,
				}
			})
			.collect();

		let mut index_by_id = HashMap::with_capacity(count);
		for (i, node) in nodes.iter().enumerate() {
			index_by_id.entry(node.id.as_str()).or_insert(i);
		}

		let mut seen = HashSet::new();
		let mut edges = Vec::new();
		let mut push = |a: usize, b: usize| {
			if a != b && seen.insert((a.min(b), a.max(b))) {
				edges.push(Edge {
					source: a,
					target: b,
				});
			}
		};

		let mut last_in_file: HashMap<&str, usize> = HashMap::new();
		for (i, chunk) in chunks.iter().enumerate() {
			if chunk.file.is_empty() {
				continue;
			}
			if let Some(prev) = last_in_file.insert(chunk.file.as_str(), i) {
				push(prev, i);
			}
		}

		for relation in relations {
			if let (Some(&a), Some(&b)) = (
				index_by_id.get(relation.source.as_str()),
				index_by_id.get(relation.target.as_str()),
			) {
				push(a, b);
			}
		}

		debug!(
			"graph model built with {} nodes and {} edges",
			nodes.len(),
			edges.len()
		);
		Self { nodes, edges }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chunk(id: &str, file: &str, influence: f64) -> ContextChunk {
		ContextChunk {
			id: id.into(),
			file: file.into(),
			total_influence: influence,
			..Default::default()
		}
	}

	#[test]
	fn one_node_per_chunk_with_derived_size() {
		let model = GraphModel::build(&[chunk("c1", "src/a.ts", 0.5)], &[], 800.0, 600.0);
		assert_eq!(model.nodes.len(), 1);
		let node = &model.nodes[0];
		assert_eq!(node.size, 19.0);
		assert_eq!(node.label, "a.ts");
		assert_eq!((node.vx, node.vy), (0.0, 0.0));
		assert!(!node.dropped);
	}

	#[test]
	fn same_file_same_color() {
		let model = GraphModel::build(
			&[
				chunk("c1", "src/a.ts", 0.1),
				chunk("c2", "src/b.ts", 0.1),
				chunk("c3", "src/a.ts", 0.9),
			],
			&[],
			800.0,
			600.0,
		);
		assert_eq!(model.nodes[0].color, model.nodes[2].color);
	}

	#[test]
	fn malformed_records_are_kept() {
		let chunks = [
			ContextChunk::default(),
			chunk("c2", "", f64::NAN),
			ContextChunk {
				id: "c3".into(),
				dropped: true,
				..Default::default()
			},
		];
		let model = GraphModel::build(&chunks, &[], 800.0, 600.0);
		assert_eq!(model.nodes.len(), 3);
		assert_eq!(model.nodes[1].size, BASE_SIZE);
		assert_eq!(model.nodes[1].label, "c2");
		assert!(model.nodes[2].dropped);
		assert!(model.edges.is_empty());
	}

	#[test]
	fn edges_link_chunks_of_one_file() {
		let model = GraphModel::build(
			&[
				chunk("c1", "src/a.ts", 0.1),
				chunk("c2", "src/b.ts", 0.1),
				chunk("c3", "src/a.ts", 0.1),
				chunk("c4", "src/a.ts", 0.1),
			],
			&[],
			800.0,
			600.0,
		);
		assert_eq!(
			model.edges,
			vec![
				Edge {
					source: 0,
					target: 2
				},
				Edge {
					source: 2,
					target: 3
				},
			]
		);
	}

	#[test]
	fn relations_are_validated_and_deduplicated() {
		let relations = [
			Relation {
				source: "c1".into(),
				target: "c2".into(),
			},
			Relation {
				source: "c2".into(),
				target: "c1".into(),
			},
			Relation {
				source: "c1".into(),
				target: "missing".into(),
			},
			Relation {
				source: "c2".into(),
				target: "c2".into(),
			},
		];
		let model = GraphModel::build(
			&[chunk("c1", "x.ts", 0.2), chunk("c2", "y.ts", 0.2)],
			&relations,
			800.0,
			600.0,
		);
		assert_eq!(model.edges.len(), 1);
		for edge in &model.edges {
			assert!(edge.source < model.nodes.len());
			assert!(edge.target < model.nodes.len());
		}
	}

	#[test]
	fn build_is_deterministic() {
		let chunks = [chunk("c1", "a", 0.3), chunk("c2", "b", 0.6), chunk("c3", "a", 0.9)];
		let first = GraphModel::build(&chunks, &[], 640.0, 480.0);
		let second = GraphModel::build(&chunks, &[], 640.0, 480.0);
		assert_eq!(first.nodes, second.nodes);
		assert_eq!(first.edges, second.edges);
		assert_eq!(first.nodes[2].id, "c3");
	}
}
