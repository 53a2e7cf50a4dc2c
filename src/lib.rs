//! Lobshot - an angle-and-power projectile game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics world, trajectory preview, launch lifecycle)
//! - `levels`: Hand-authored level data and the procedural generator
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input mapping and storage access
//! - `persistence`: High score load/save
//! - `audio`: Procedural sound effects

pub mod audio;
pub mod error;
pub mod levels;
pub mod particles;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use score::Score;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Logical canvas size (game coordinates, Y grows downward)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Downward gravity (pixels/s²)
    pub const GRAVITY_Y: f32 = 900.0;

    /// Where the projectile spawns
    pub const LAUNCH_ORIGIN: Vec2 = Vec2::new(100.0, 470.0);
    /// Launch speed per unit of power (pixels/s)
    pub const VELOCITY_SCALE: f32 = 8.0;

    /// Projectile body
    pub const BALL_RADIUS: f32 = 12.0;
    pub const BALL_RESTITUTION: f32 = 0.5;
    pub const BALL_FRICTION: f32 = 0.05;
    /// Fraction of velocity lost per 60 Hz frame
    pub const BALL_AIR_FRICTION: f32 = 0.005;

    pub const TARGET_RADIUS: f32 = 20.0;

    /// Ground slab (center + size)
    pub const GROUND_CENTER: Vec2 = Vec2::new(400.0, 580.0);
    pub const GROUND_WIDTH: f32 = 800.0;
    pub const GROUND_HEIGHT: f32 = 40.0;
    pub const GROUND_FRICTION: f32 = 0.1;

    /// Settlement poll cadence (500 ms at 120 Hz)
    pub const SETTLE_POLL_TICKS: u32 = 60;
    /// Speed below which an in-flight ball counts as at rest (pixels/s)
    pub const SETTLE_SPEED: f32 = 6.0;
    /// Below this Y the ball has fallen out of the playfield
    pub const FLOOR_Y: f32 = CANVAS_HEIGHT + 50.0;
    /// Horizontal slack beyond the canvas before the ball counts as gone
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Trajectory preview
    pub const PREDICT_STEPS: usize = 90;
    pub const PREDICT_DT: f32 = 1.0 / 60.0;
    pub const PREDICT_MAX_X: f32 = CANVAS_WIDTH + 50.0;
    pub const PREDICT_MAX_Y: f32 = CANVAS_HEIGHT + 50.0;
    pub const PREDICT_THROTTLE_MS: f64 = 16.0;

    /// Scoring
    pub const POINTS_PER_TARGET: u32 = 1;
    pub const LEVEL_COMPLETE_BONUS: u32 = 5;

    /// Transition delays (ticks at 120 Hz)
    pub const LEVEL_ADVANCE_DELAY_TICKS: u32 = 180;
    pub const RETRY_DELAY_TICKS: u32 = 180;
    pub const GAME_WON_RESET_DELAY_TICKS: u32 = 480;

    /// Aim limits and keyboard step sizes
    pub const MIN_ANGLE: f32 = 10.0;
    pub const MAX_ANGLE: f32 = 80.0;
    pub const MAX_POWER: f32 = 100.0;
    pub const ANGLE_STEP: f32 = 1.0;
    pub const POWER_STEP: f32 = 2.0;
    /// Pointer drag distance that maps to full power
    pub const MAX_DRAG_DISTANCE: f32 = 250.0;

    /// Particles spawned per target hit
    pub const HIT_BURST_PARTICLES: usize = 24;
    pub const MAX_PARTICLES: usize = 256;
}

/// Unit direction for a launch angle in degrees (Y up on screen, so negative Y)
#[inline]
pub fn launch_direction(angle_degrees: f32) -> Vec2 {
    let theta = angle_degrees.to_radians();
    Vec2::new(theta.cos(), -theta.sin())
}

/// Rotate a vector by the given angle (radians)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
