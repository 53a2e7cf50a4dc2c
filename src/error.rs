//! Error kinds
//!
//! None of these is fatal. Each one degrades a single non-core feature, except
//! an invalid layout, which blocks that one level from starting.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Remote level data could not be fetched or parsed
    #[error("level data unavailable: {0}")]
    LevelDataUnavailable(String),
    /// A layout failed structural validation
    #[error("invalid level layout: {0}")]
    InvalidLevelLayout(String),
    /// No audio capability in this environment
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
    /// Durable storage threw on read or write
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
    /// WebGPU could not be initialized; the game runs without drawing
    #[error("renderer unavailable: {0}")]
    RendererUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
