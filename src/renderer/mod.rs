//! Rendering
//!
//! [`scene`] turns a game state into colored triangles in grid units.
//! [`pipeline`] maps them to clip space and draws them with wgpu.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, grid_to_ndc};
pub use scene::build_scene;
pub use vertex::Vertex;
