//! Force-directed view of the whole context store.

mod component;
mod model;
mod render;
mod simulation;
mod state;
mod types;

pub use component::ContextGraphView;
pub use model::{GraphModel, node_size};
pub use simulation::{ForceParams, step};
pub use state::ForceGraphState;
pub use types::{Edge, GraphEvent, Node, Relation};
