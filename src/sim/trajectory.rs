//! Aim preview
//!
//! Runs a throwaway `World` holding only a copy of the projectile and records
//! where it goes. The preview is free flight: targets, obstacles and ground are
//! not part of the scratch world, so the path passes through them.

use glam::Vec2;

use super::physics::{Shape, World};
use super::state::{AimState, ProjectileSpec};
use crate::consts::*;

/// Polyline for the aim preview, one point per simulated step
pub type PredictedPath = Vec<Vec2>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorConfig {
    /// Maximum number of steps (and points)
    pub steps: usize,
    pub dt: f32,
    /// Stop once the ball passes either bound
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            steps: PREDICT_STEPS,
            dt: PREDICT_DT,
            max_x: PREDICT_MAX_X,
            max_y: PREDICT_MAX_Y,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Predictor {
    pub config: PredictorConfig,
    pub projectile: ProjectileSpec,
}

impl Predictor {
    pub fn new(config: PredictorConfig, projectile: ProjectileSpec) -> Self {
        Self { config, projectile }
    }

    pub fn predict(&self, origin: Vec2, aim: AimState, gravity_y: f32) -> PredictedPath {
        let mut scratch = World::new(Vec2::new(0.0, gravity_y));
        let ball = scratch.create_body(
            Shape::Circle {
                radius: self.projectile.radius,
            },
            origin,
            self.projectile.body_props(),
        );
        scratch.add(&[ball]);
        scratch.set_velocity(ball, self.projectile.launch_velocity(aim));

        let mut path = Vec::with_capacity(self.config.steps);
        for _ in 0..self.config.steps {
            scratch.step(self.config.dt);
            let Some(body) = scratch.body(ball) else {
                break;
            };
            path.push(body.position);
            if body.position.y > self.config.max_y || body.position.x > self.config.max_x {
                break;
            }
        }
        path
    }
}

/// Free-function form using the default projectile and step budget
pub fn predict(origin: Vec2, aim: AimState, gravity_y: f32) -> PredictedPath {
    Predictor::default().predict(origin, aim, gravity_y)
}

/// Rate limiter: lets a call through at most once per interval
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(PREDICT_THROTTLE_MS)
    }
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Returns true (and arms the throttle) if enough time has passed
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// Let the next call through regardless of timing
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
