//! WebGPU rendering module
//!
//! Tessellates a `Snapshot` into flat-colored triangles and draws them in a
//! single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, arena_to_ndc, viewport_to_arena};
pub use scene::scene_vertices;
pub use vertex::Vertex;
