//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by body handle)
//! - No rendering or platform dependencies

pub mod lifecycle;
pub mod outcome;
pub mod physics;
pub mod sdf;
pub mod state;
pub mod tick;
pub mod trajectory;

pub use lifecycle::{SettlePolicy, Settlement};
pub use outcome::{Outcome, evaluate};
pub use physics::{Body, BodyHandle, BodyLabel, BodyProps, CollisionPair, Shape, World};
pub use state::{AimState, Flight, GameEvent, GamePhase, ProjectileSpec, RoundState};
pub use tick::{GameState, TickInput, tick};
pub use trajectory::{PredictedPath, Predictor, PredictorConfig, Throttle, predict};
