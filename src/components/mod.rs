//! Canvas views and the machinery they share.

pub mod canvas;
pub mod force_graph;
pub mod response_graph;
