//! Level data
//!
//! Hand-authored layouts come from `levels.json` (or the built-in fallback);
//! past a configured level number they are generated from the level seed.

pub mod generator;
pub mod layout;
pub mod repository;

pub use generator::{SeededRandom, generate};
pub use layout::{LevelLayout, ObstacleSpec, ProceduralConfig, TargetSpec};
pub use repository::LevelRepository;
