//! Launch/settle lifecycle for the single in-flight projectile
//!
//! `Idle → InFlight → (Settled | OffScreen)`, collapsing back to `Idle` once
//! the round has been evaluated. The rest check runs on a coarse tick cadence
//! rather than every frame.

use glam::Vec2;

use super::physics::{Shape, World};
use super::state::{AimState, Flight, ProjectileSpec, RoundState};
use crate::consts::*;

/// Why a projectile left play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Came to rest inside the playfield
    Settled,
    /// Fell below the floor or left the sides
    OffScreen,
}

/// Rest policy and poll cadence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlePolicy {
    pub poll_ticks: u32,
    pub rest_speed: f32,
    pub floor_y: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            poll_ticks: SETTLE_POLL_TICKS,
            rest_speed: SETTLE_SPEED,
            floor_y: FLOOR_Y,
            min_x: -OFFSCREEN_MARGIN,
            max_x: CANVAS_WIDTH + OFFSCREEN_MARGIN,
        }
    }
}

impl SettlePolicy {
    /// Classify a sampled position and speed
    pub fn classify(&self, position: Vec2, speed: f32) -> Option<Settlement> {
        if position.y > self.floor_y || position.x < self.min_x || position.x > self.max_x {
            Some(Settlement::OffScreen)
        } else if speed < self.rest_speed {
            Some(Settlement::Settled)
        } else {
            None
        }
    }
}

/// Try to launch. Returns false (and changes nothing) if a ball is already in
/// the air or no tries remain. The caller checks the game phase.
pub fn launch(
    world: &mut World,
    round: &mut RoundState,
    spec: &ProjectileSpec,
    origin: Vec2,
    aim: AimState,
) -> bool {
    if round.launched() || round.tries_left == 0 {
        return false;
    }

    round.tries_left -= 1;
    let projectile = world.create_body(
        Shape::Circle {
            radius: spec.radius,
        },
        origin,
        spec.body_props(),
    );
    world.set_velocity(projectile, spec.launch_velocity(aim));
    world.add(&[projectile]);
    round.flight = Flight::InFlight {
        projectile,
        ticks: 0,
    };
    true
}

/// Advance the poll counter by one tick and, on a poll tick, sample the
/// projectile. On a verdict the projectile is removed and the flight cleared.
pub fn poll(world: &mut World, round: &mut RoundState, policy: &SettlePolicy) -> Option<Settlement> {
    let Flight::InFlight { projectile, ticks } = round.flight else {
        return None;
    };
    let ticks = ticks + 1;
    round.flight = Flight::InFlight { projectile, ticks };

    if ticks % policy.poll_ticks.max(1) != 0 {
        return None;
    }

    let verdict = match world.body(projectile) {
        Some(body) => policy.classify(body.position, body.speed()),
        None => Some(Settlement::Settled),
    };

    if let Some(verdict) = verdict {
        log::debug!("Projectile {:?} after {} ticks: {:?}", projectile, ticks, verdict);
        world.remove(&[projectile]);
        round.flight = Flight::Idle;
    }
    verdict
}

/// Drop any in-flight projectile without evaluating (level rebuild/reset)
pub fn cancel(world: &mut World, round: &mut RoundState) {
    if let Some(projectile) = round.projectile() {
        world.remove(&[projectile]);
    }
    round.flight = Flight::Idle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::{BodyLabel, BodyProps};
    use std::collections::BTreeSet;

    fn setup(tries: u32) -> (World, RoundState) {
        let mut world = World::new(Vec2::new(0.0, GRAVITY_Y));
        let ground = world.create_body(
            Shape::Rect {
                width: GROUND_WIDTH,
                height: GROUND_HEIGHT,
            },
            GROUND_CENTER,
            BodyProps::fixed(BodyLabel::Ground).with_friction(GROUND_FRICTION),
        );
        world.add(&[ground]);
        let round = RoundState {
            level: 1,
            tries_left: tries,
            targets_remaining: BTreeSet::new(),
            flight: Flight::Idle,
        };
        (world, round)
    }

    #[test]
    fn test_launch_consumes_try_and_creates_body() {
        let (mut world, mut round) = setup(2);
        let spec = ProjectileSpec::default();
        assert!(launch(&mut world, &mut round, &spec, LAUNCH_ORIGIN, AimState::default()));
        assert_eq!(round.tries_left, 1);
        let projectile = round.projectile().unwrap();
        let body = world.body(projectile).unwrap();
        assert_eq!(body.position, LAUNCH_ORIGIN);
        assert_eq!(body.velocity, spec.launch_velocity(AimState::default()));
    }

    #[test]
    fn test_second_launch_is_noop() {
        let (mut world, mut round) = setup(3);
        let spec = ProjectileSpec::default();
        assert!(launch(&mut world, &mut round, &spec, LAUNCH_ORIGIN, AimState::default()));
        let bodies = world.bodies().len();
        assert!(!launch(&mut world, &mut round, &spec, LAUNCH_ORIGIN, AimState::default()));
        assert_eq!(round.tries_left, 2);
        assert_eq!(world.bodies().len(), bodies);
    }

    #[test]
    fn test_no_launch_without_tries() {
        let (mut world, mut round) = setup(0);
        let spec = ProjectileSpec::default();
        assert!(!launch(&mut world, &mut round, &spec, LAUNCH_ORIGIN, AimState::default()));
        assert!(!round.launched());
    }

    #[test]
    fn test_poll_only_samples_on_cadence() {
        let (mut world, mut round) = setup(1);
        let spec = ProjectileSpec::default();
        // Zero power: ball drops straight onto the ground
        launch(&mut world, &mut round, &spec, LAUNCH_ORIGIN, AimState::new(45.0, 0.0));
        let policy = SettlePolicy::default();
        for _ in 0..policy.poll_ticks - 1 {
            world.step(SIM_DT);
            assert_eq!(poll(&mut world, &mut round, &policy), None);
        }
        assert!(round.launched());
    }

    #[test]
    fn test_settlement_terminates() {
        let spec = ProjectileSpec::default();
        let policy = SettlePolicy::default();
        for (angle, power) in [(10.0, 100.0), (45.0, 50.0), (80.0, 100.0), (30.0, 15.0)] {
            let (mut world, mut round) = setup(1);
            launch(&mut world, &mut round, &spec, LAUNCH_ORIGIN, AimState::new(angle, power));
            let mut verdict = None;
            for _ in 0..120 * 60 {
                world.step(SIM_DT);
                verdict = poll(&mut world, &mut round, &policy);
                if verdict.is_some() {
                    break;
                }
            }
            assert!(verdict.is_some(), "aim ({angle}, {power}) never settled");
            assert!(!round.launched());
            assert_eq!(world.bodies().len(), 1, "projectile should be removed");
        }
    }

    #[test]
    fn test_falling_off_the_edge_is_offscreen() {
        let policy = SettlePolicy::default();
        assert_eq!(
            policy.classify(Vec2::new(400.0, FLOOR_Y + 1.0), 500.0),
            Some(Settlement::OffScreen)
        );
        assert_eq!(
            policy.classify(Vec2::new(CANVAS_WIDTH + OFFSCREEN_MARGIN + 1.0, 300.0), 500.0),
            Some(Settlement::OffScreen)
        );
        assert_eq!(policy.classify(Vec2::new(400.0, 300.0), 1.0), Some(Settlement::Settled));
        assert_eq!(policy.classify(Vec2::new(400.0, 300.0), 100.0), None);
    }

    #[test]
    fn test_cancel_removes_projectile() {
        let (mut world, mut round) = setup(1);
        launch(&mut world, &mut round, &ProjectileSpec::default(), LAUNCH_ORIGIN, AimState::default());
        let projectile = round.projectile().unwrap();
        cancel(&mut world, &mut round);
        assert!(!world.contains(projectile));
        assert_eq!(round.flight, Flight::Idle);
    }
}
