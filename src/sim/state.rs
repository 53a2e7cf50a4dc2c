//! Round state and core simulation types

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{BodyHandle, BodyLabel, BodyProps};
use crate::consts::*;
use crate::launch_direction;

/// Launch aim: angle above horizontal and power percentage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimState {
    angle_degrees: f32,
    power: f32,
}

impl Default for AimState {
    fn default() -> Self {
        Self {
            angle_degrees: 45.0,
            power: 50.0,
        }
    }
}

impl AimState {
    /// Build an aim, clamping both components into range
    pub fn new(angle_degrees: f32, power: f32) -> Self {
        Self {
            angle_degrees: angle_degrees.clamp(MIN_ANGLE, MAX_ANGLE),
            power: power.clamp(0.0, MAX_POWER),
        }
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn with_angle(self, angle_degrees: f32) -> Self {
        Self::new(angle_degrees, self.power)
    }

    pub fn with_power(self, power: f32) -> Self {
        Self::new(self.angle_degrees, power)
    }
}

/// Physical description shared by the live projectile and the preview body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub radius: f32,
    pub restitution: f32,
    pub friction: f32,
    pub air_friction: f32,
    pub velocity_scale: f32,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            restitution: BALL_RESTITUTION,
            friction: BALL_FRICTION,
            air_friction: BALL_AIR_FRICTION,
            velocity_scale: VELOCITY_SCALE,
        }
    }
}

impl ProjectileSpec {
    /// Initial velocity for an aim: `power · scale · (cos θ, −sin θ)`
    pub fn launch_velocity(&self, aim: AimState) -> Vec2 {
        launch_direction(aim.angle_degrees) * aim.power * self.velocity_scale
    }

    pub fn body_props(&self) -> BodyProps {
        BodyProps {
            label: BodyLabel::Projectile,
            is_static: false,
            restitution: self.restitution,
            friction: self.friction,
            air_friction: self.air_friction,
            angle: 0.0,
        }
    }
}

/// The single projectile slot of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flight {
    /// Nothing in the air, a launch is allowed
    #[default]
    Idle,
    /// A projectile is live; `ticks` counts sim ticks since launch
    InFlight { projectile: BodyHandle, ticks: u32 },
}

/// State for one attempt at one level
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    pub level: u32,
    pub tries_left: u32,
    pub targets_remaining: BTreeSet<BodyHandle>,
    pub flight: Flight,
}

impl RoundState {
    pub fn new(level: u32, targets: BTreeSet<BodyHandle>) -> Self {
        Self {
            level,
            tries_left: targets.len() as u32,
            targets_remaining: targets,
            flight: Flight::Idle,
        }
    }

    pub fn launched(&self) -> bool {
        matches!(self.flight, Flight::InFlight { .. })
    }

    pub fn projectile(&self) -> Option<BodyHandle> {
        match self.flight {
            Flight::InFlight { projectile, .. } => Some(projectile),
            Flight::Idle => None,
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    /// Aiming or ball in flight
    Playing,
    /// Game is paused
    Paused,
    /// Level cleared, advancing when the countdown ends
    LevelComplete { ticks_left: u32 },
    /// Tries exhausted, rebuilding the same level when the countdown ends
    OutOfTries { ticks_left: u32 },
    /// Last level cleared, full reset when the countdown ends
    GameWon { ticks_left: u32 },
    /// The current level's layout is invalid; the round never started
    LevelError { message: String },
}

/// Side effects for the host to act on (sound, persistence, HUD)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32, name: String },
    Launched,
    TargetHit { pos: Vec2 },
    LevelComplete { level: u32, bonus: u32 },
    OutOfTries { level: u32 },
    GameWon { score: u32 },
    NewHighScore(u32),
    LevelError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_clamps() {
        let aim = AimState::new(5.0, 150.0);
        assert_eq!(aim.angle_degrees(), MIN_ANGLE);
        assert_eq!(aim.power(), MAX_POWER);
        let aim = aim.with_angle(95.0).with_power(-3.0);
        assert_eq!(aim.angle_degrees(), MAX_ANGLE);
        assert_eq!(aim.power(), 0.0);
    }

    #[test]
    fn test_launch_velocity_points_up_and_right() {
        let spec = ProjectileSpec::default();
        let v = spec.launch_velocity(AimState::new(45.0, 100.0));
        assert!(v.x > 0.0 && v.y < 0.0);
        assert!((v.length() - 100.0 * VELOCITY_SCALE).abs() < 1e-3);
        assert!((v.x + v.y).abs() < 1e-3);
    }

    #[test]
    fn test_round_tries_equal_targets() {
        let mut world = super::super::physics::World::new(Vec2::ZERO);
        let targets: BTreeSet<_> = (0..4)
            .map(|i| {
                world.create_body(
                    super::super::physics::Shape::Circle { radius: 1.0 },
                    Vec2::splat(i as f32),
                    BodyProps::fixed(BodyLabel::Target),
                )
            })
            .collect();
        let round = RoundState::new(3, targets);
        assert_eq!(round.tries_left, 4);
        assert!(!round.launched());
        assert_eq!(round.projectile(), None);
    }
}
