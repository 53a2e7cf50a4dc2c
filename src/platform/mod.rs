//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input mapping (keys, pointer, touch)
//! - Storage (LocalStorage on web)

pub mod input;
pub mod storage;

pub use input::{Command, Drag, aim_from_pointer, command_for_key, to_canvas};
