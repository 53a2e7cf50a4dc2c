//! Fixed timestep simulation tick
//!
//! `GameState` owns the live world and everything a round mutates. The host
//! feeds it aim changes between frames and calls `tick` at `SIM_DT`.

use std::collections::BTreeSet;

use glam::Vec2;

use super::lifecycle::{self, SettlePolicy};
use super::outcome::{Outcome, evaluate};
use super::physics::{BodyHandle, BodyLabel, BodyProps, CollisionPair, Shape, World};
use super::state::{AimState, Flight, GameEvent, GamePhase, ProjectileSpec, RoundState};
use super::trajectory::{PredictedPath, Predictor, Throttle};
use crate::consts::*;
use crate::levels::{LevelLayout, LevelRepository};
use crate::particles::ParticlePool;
use crate::score::Score;

/// Burst color for a destroyed target
const TARGET_BURST_COLOR: [f32; 3] = [1.0, 0.55, 0.2];

/// One-shot commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Launch ball (release/tap/space)
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Full game reset
    pub reset: bool,
}

/// What an expired countdown leads to
enum Transition {
    Advance,
    Retry,
    Restart,
}

pub struct GameState {
    pub levels: LevelRepository,
    /// Live physics world
    pub world: World,
    pub round: RoundState,
    pub score: Score,
    pub phase: GamePhase,
    pub aim: AimState,
    /// Aim preview (empty while a ball is in flight)
    pub path: PredictedPath,
    pub level_name: String,
    /// Draw the aim preview at all
    pub show_preview: bool,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticlePool,
    pub projectile: ProjectileSpec,
    pub predictor: Predictor,
    pub settle: SettlePolicy,
    /// Simulation tick counter
    pub time_ticks: u64,
    throttle: Throttle,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session on level 1
    pub fn new(levels: LevelRepository, high_score: u32) -> Self {
        let projectile = ProjectileSpec::default();
        let mut state = Self {
            levels,
            world: World::new(Vec2::new(0.0, GRAVITY_Y)),
            round: RoundState::default(),
            score: Score::with_high(high_score),
            phase: GamePhase::Playing,
            aim: AimState::default(),
            path: Vec::new(),
            level_name: String::new(),
            show_preview: true,
            particles: ParticlePool::new(MAX_PARTICLES),
            projectile,
            predictor: Predictor::new(Default::default(), projectile),
            settle: SettlePolicy::default(),
            time_ticks: 0,
            throttle: Throttle::default(),
            events: Vec::new(),
        };
        state.build_level(1);
        state
    }

    /// Tear down the current round and build `level` from scratch
    pub fn build_level(&mut self, level: u32) {
        lifecycle::cancel(&mut self.world, &mut self.round);
        self.world.clear();
        self.path.clear();
        self.throttle.reset();
        self.round = RoundState {
            level,
            ..Default::default()
        };

        let layout = match self.levels.layout_for(level) {
            Ok(layout) => layout,
            Err(e) => {
                let message = e.to_string();
                log::error!("Level {}: {}", level, message);
                self.level_name.clear();
                self.phase = GamePhase::LevelError {
                    message: message.clone(),
                };
                self.events.push(GameEvent::LevelError(message));
                return;
            }
        };

        let targets = self.spawn_layout(&layout);
        self.round = RoundState::new(level, targets);
        self.level_name = layout.name.clone();
        self.phase = GamePhase::Playing;
        log::info!(
            "Level {} \"{}\": {} targets, {} obstacles",
            level,
            layout.name,
            layout.targets.len(),
            layout.obstacles.len()
        );
        self.events.push(GameEvent::LevelStarted {
            level,
            name: layout.name,
        });
        self.repredict();
    }

    /// Add ground, obstacles and targets to the (already cleared) world
    fn spawn_layout(&mut self, layout: &LevelLayout) -> BTreeSet<BodyHandle> {
        let mut handles = Vec::with_capacity(1 + layout.obstacles.len() + layout.targets.len());

        handles.push(self.world.create_body(
            Shape::Rect {
                width: GROUND_WIDTH,
                height: GROUND_HEIGHT,
            },
            GROUND_CENTER,
            BodyProps::fixed(BodyLabel::Ground).with_friction(GROUND_FRICTION),
        ));

        for o in &layout.obstacles {
            handles.push(self.world.create_body(
                Shape::Rect {
                    width: o.width,
                    height: o.height,
                },
                Vec2::new(o.x, o.y),
                BodyProps::fixed(BodyLabel::Obstacle).with_angle(o.angle),
            ));
        }

        let mut targets = BTreeSet::new();
        for t in &layout.targets {
            let h = self.world.create_body(
                Shape::Circle {
                    radius: TARGET_RADIUS,
                },
                Vec2::new(t.x, t.y),
                BodyProps::fixed(BodyLabel::Target),
            );
            targets.insert(h);
            handles.push(h);
        }

        self.world.add(&handles);
        targets
    }

    /// Full reset: score back to zero, level 1
    pub fn reset(&mut self) {
        log::info!("Game reset (final score {})", self.score.current);
        self.score.reset_current();
        self.particles.clear();
        self.build_level(1);
    }

    /// Update the aim; re-predicts unless throttled
    pub fn set_aim(&mut self, aim: AimState, now_ms: f64) {
        self.aim = aim;
        if self.throttle.ready(now_ms) {
            self.repredict();
        }
    }

    pub fn set_show_preview(&mut self, show: bool) {
        self.show_preview = show;
        self.repredict();
    }

    fn repredict(&mut self) {
        if self.show_preview && self.phase == GamePhase::Playing && !self.round.launched() {
            self.path = self
                .predictor
                .predict(LAUNCH_ORIGIN, self.aim, self.world.gravity.y);
        } else {
            self.path.clear();
        }
    }

    /// Launch with the current aim. No-op unless playing with a free slot and tries left.
    pub fn launch(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let launched = lifecycle::launch(
            &mut self.world,
            &mut self.round,
            &self.projectile,
            LAUNCH_ORIGIN,
            self.aim,
        );
        if launched {
            self.path.clear();
            self.events.push(GameEvent::Launched);
        }
        launched
    }

    /// React to contacts from a physics step: projectile hits remove targets
    pub fn apply_collisions(&mut self, pairs: &[CollisionPair]) {
        let Some(projectile) = self.round.projectile() else {
            return;
        };
        for pair in pairs.iter().filter(|p| p.involves(projectile)) {
            let other = if pair.dynamic == projectile {
                pair.other
            } else {
                pair.dynamic
            };
            if !self.round.targets_remaining.remove(&other) {
                continue;
            }
            let pos = self
                .world
                .body(other)
                .map(|b| b.position)
                .unwrap_or(Vec2::ZERO);
            self.world.remove(&[other]);
            self.particles.burst(pos, HIT_BURST_PARTICLES, TARGET_BURST_COLOR);
            self.events.push(GameEvent::TargetHit { pos });
            self.add_points(POINTS_PER_TARGET);
        }
    }

    fn add_points(&mut self, points: u32) {
        if let Some(high) = self.score.add(points) {
            self.events.push(GameEvent::NewHighScore(high));
        }
    }

    /// Judge the round after the projectile left play
    fn on_settled(&mut self) {
        let level = self.round.level;
        let outcome = evaluate(
            self.round.targets_remaining.len(),
            self.round.tries_left,
            level,
            self.levels.has_level_after(level),
        );
        match outcome {
            Outcome::LevelComplete => {
                let bonus = outcome.bonus();
                self.add_points(bonus);
                self.phase = GamePhase::LevelComplete {
                    ticks_left: LEVEL_ADVANCE_DELAY_TICKS,
                };
                self.events.push(GameEvent::LevelComplete { level, bonus });
            }
            Outcome::GameWon => {
                self.phase = GamePhase::GameWon {
                    ticks_left: GAME_WON_RESET_DELAY_TICKS,
                };
                self.events.push(GameEvent::GameWon {
                    score: self.score.current,
                });
            }
            Outcome::OutOfTries => {
                self.phase = GamePhase::OutOfTries {
                    ticks_left: RETRY_DELAY_TICKS,
                };
                self.events.push(GameEvent::OutOfTries { level });
            }
            Outcome::StillPlaying => {
                self.throttle.reset();
                self.repredict();
            }
        }
    }

    /// Drain side effects accumulated since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.round.flight, Flight::InFlight { .. })
    }
}

/// Count a timer down; true once it reaches zero
fn countdown(ticks_left: &mut u32) -> bool {
    *ticks_left = ticks_left.saturating_sub(1);
    *ticks_left == 0
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.reset {
        state.reset();
        return;
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;
    state.particles.update(dt);

    if state.phase == GamePhase::Playing {
        if input.launch {
            state.launch();
        }
        // Collisions from this step are handled before the settle poll
        let pairs = state.world.step(dt);
        state.apply_collisions(&pairs);
        if lifecycle::poll(&mut state.world, &mut state.round, &state.settle).is_some() {
            state.on_settled();
        }
        return;
    }

    let transition = match &mut state.phase {
        GamePhase::LevelComplete { ticks_left } => countdown(ticks_left).then_some(Transition::Advance),
        GamePhase::OutOfTries { ticks_left } => countdown(ticks_left).then_some(Transition::Retry),
        GamePhase::GameWon { ticks_left } => countdown(ticks_left).then_some(Transition::Restart),
        _ => None,
    };

    match transition {
        Some(Transition::Advance) => state.build_level(state.round.level + 1),
        Some(Transition::Retry) => state.build_level(state.round.level),
        Some(Transition::Restart) => state.reset(),
        None => {}
    }
}
