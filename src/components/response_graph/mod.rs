//! Radial view of the chunks behind a single response.

mod component;
mod radial;
mod render;
mod state;

pub use component::ResponseContextView;
pub use radial::{RadialNode, layout, radial_size};
