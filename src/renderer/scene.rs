//! Frame geometry from the game state
//!
//! Pure CPU-side tessellation, so it can be tested without a GPU.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{BALL_RADIUS, LAUNCH_ORIGIN};
use crate::launch_direction;
use crate::sim::{BodyLabel, GameState, Shape};

/// What to draw besides the bodies
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    pub particles: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self { particles: true }
    }
}

/// Triangle list for one frame, back to front
pub fn build(state: &GameState, options: SceneOptions) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for handle in state.world.bodies() {
        let Some(body) = state.world.body(handle) else {
            continue;
        };
        match (body.label(), body.shape) {
            (BodyLabel::Ground, _) => {
                vertices.extend(shapes::polygon(&body.vertices(), colors::GROUND));
            }
            (BodyLabel::Obstacle, _) => {
                vertices.extend(shapes::polygon(&body.vertices(), colors::OBSTACLE));
            }
            (BodyLabel::Target, Shape::Circle { radius }) => {
                vertices.extend(shapes::circle(body.position, radius, colors::TARGET, 24));
                vertices.extend(shapes::ring(
                    body.position,
                    radius * 0.45,
                    radius * 0.6,
                    colors::TARGET_RING,
                    24,
                ));
            }
            (BodyLabel::Projectile, Shape::Circle { radius }) => {
                vertices.extend(shapes::circle(body.position, radius, colors::BALL, 20));
            }
            _ => {}
        }
    }

    // Launcher barrel points along the current aim
    let barrel_end = LAUNCH_ORIGIN + launch_direction(state.aim.angle_degrees()) * 36.0;
    vertices.extend(shapes::line(LAUNCH_ORIGIN, barrel_end, 10.0, colors::LAUNCHER));
    if !state.in_flight() {
        vertices.extend(shapes::circle(LAUNCH_ORIGIN, BALL_RADIUS, colors::BALL, 20));
    }

    vertices.extend(shapes::dots(&state.path, 2.5, colors::PREVIEW, 3));

    if options.particles {
        for p in state.particles.active() {
            let color = [p.color[0], p.color[1], p.color[2], p.life.clamp(0.0, 1.0)];
            vertices.extend(shapes::circle(p.pos, p.size, color, 6));
        }
    }

    vertices
}

/// Bounding box of a vertex list (for quick sanity checks)
pub fn bounds(vertices: &[Vertex]) -> Option<(Vec2, Vec2)> {
    let mut iter = vertices.iter().map(|v| Vec2::from(v.position));
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelRepository;
    use crate::sim::{TickInput, tick};

    fn count_color(vertices: &[Vertex], color: [f32; 4]) -> usize {
        vertices.iter().filter(|v| v.color == color).count()
    }

    #[test]
    fn test_scene_has_level_geometry() {
        let state = GameState::new(LevelRepository::fallback(), 0);
        let vertices = build(&state, SceneOptions::default());
        // Three targets at 24 segments each
        assert_eq!(count_color(&vertices, colors::TARGET), 3 * 24 * 3);
        assert!(count_color(&vertices, colors::GROUND) > 0);
        assert!(count_color(&vertices, colors::PREVIEW) > 0);

        let ground: Vec<Vertex> = vertices
            .iter()
            .copied()
            .filter(|v| v.color == colors::GROUND)
            .collect();
        let (lo, hi) = bounds(&ground).unwrap();
        assert!((lo - Vec2::new(0.0, 560.0)).length() < 1e-3);
        assert!((hi - Vec2::new(800.0, 600.0)).length() < 1e-3);
    }

    #[test]
    fn test_preview_hidden_in_flight() {
        let mut state = GameState::new(LevelRepository::fallback(), 0);
        tick(
            &mut state,
            &TickInput {
                launch: true,
                ..Default::default()
            },
            crate::consts::SIM_DT,
        );
        let vertices = build(&state, SceneOptions::default());
        assert_eq!(count_color(&vertices, colors::PREVIEW), 0);
        // Only the flying ball, no ball resting in the launcher
        assert_eq!(count_color(&vertices, colors::BALL), 20 * 3);
    }

    #[test]
    fn test_particles_optional() {
        let mut state = GameState::new(LevelRepository::fallback(), 0);
        state.particles.burst(Vec2::new(300.0, 300.0), 5, [0.0, 1.0, 0.0]);
        let with = build(&state, SceneOptions { particles: true });
        let without = build(&state, SceneOptions { particles: false });
        assert_eq!(with.len() - without.len(), 5 * 6 * 3);
    }
}
