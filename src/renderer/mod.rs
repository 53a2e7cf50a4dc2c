//! WebGPU rendering module
//!
//! The scene is tessellated into flat-colored triangles on the CPU each frame
//! and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, game_to_ndc};
pub use scene::{SceneOptions, build};
pub use vertex::Vertex;
