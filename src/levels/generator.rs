//! Procedural level generator
//!
//! A pure function of (level number, config). The random source is a sine hash
//! keyed by the level number, so a failed procedural level rebuilds with the
//! exact same layout.

use super::layout::{LevelLayout, ObstacleSpec, ProceduralConfig, TargetSpec};

/// Deterministic sine-hash sequence
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: f64,
}

impl SeededRandom {
    pub fn new(seed: f64) -> Self {
        Self { seed }
    }

    /// Value in `[min, max)`; advances the sequence
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        let x = (self.seed * 12.9898 + min * 78.233 + max * 37.719).sin() * 43758.5453;
        let frac = x - x.floor();
        self.seed += 1.0;
        min + frac * (max - min)
    }

    /// Integer in `[min, max]`
    pub fn int(&mut self, min: u32, max: u32) -> u32 {
        let v = self.range(min as f64, max as f64 + 1.0).floor() as u32;
        v.min(max)
    }
}

pub fn generate(level_number: u32, config: &ProceduralConfig) -> LevelLayout {
    let mut rng = SeededRandom::new(level_number as f64);

    let target_count = rng.int(config.target_count.min, config.target_count.max);
    let area = &config.target_spawn_area;
    let targets = (0..target_count)
        .map(|_| {
            let x = rng.range(area.min_x as f64, area.max_x as f64) as f32;
            let y = rng.range(area.min_y as f64, area.max_y as f64) as f32;
            TargetSpec { x, y }
        })
        .collect();

    let obstacle_count = rng.int(config.obstacle_count.min, config.obstacle_count.max);
    let area = &config.obstacle_spawn_area;
    let size = &config.obstacle_size;
    let angle = &config.obstacle_angle_range;
    let obstacles = (0..obstacle_count)
        .map(|_| {
            let x = rng.range(area.min_x as f64, area.max_x as f64) as f32;
            let y = rng.range(area.min_y as f64, area.max_y as f64) as f32;
            let width = rng.range(size.min_width as f64, size.max_width as f64) as f32;
            let angle = rng.range(angle.min as f64, angle.max as f64) as f32;
            ObstacleSpec {
                x,
                y,
                width,
                height: size.height,
                angle,
            }
        })
        .collect();

    LevelLayout {
        id: level_number,
        name: format!("Procedural Level {level_number}"),
        targets,
        obstacles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::layout::{CountRange, FloatRange, ObstacleSize, SpawnArea};
    use proptest::prelude::*;

    fn config_strategy() -> impl Strategy<Value = ProceduralConfig> {
        (
            1u32..6,
            0u32..4,
            0u32..5,
            (0.0f32..400.0, 0.0f32..400.0),
            (0.0f32..300.0, 0.0f32..300.0),
            (1.0f32..100.0, 0.0f32..100.0, 1.0f32..40.0),
            (-1.0f32..0.0, 0.0f32..1.0),
        )
            .prop_map(
                |(tmin, tspan, ospan, (x0, w), (y0, h), (wmin, wspan, height), (amin, amax))| {
                    ProceduralConfig {
                        enabled: true,
                        start_after_level: 0,
                        target_count: CountRange {
                            min: tmin,
                            max: tmin + tspan,
                        },
                        obstacle_count: CountRange {
                            min: ospan / 2,
                            max: ospan,
                        },
                        target_spawn_area: SpawnArea {
                            min_x: x0,
                            max_x: x0 + w,
                            min_y: y0,
                            max_y: y0 + h,
                        },
                        obstacle_spawn_area: SpawnArea {
                            min_x: y0,
                            max_x: y0 + w,
                            min_y: x0,
                            max_y: x0 + h,
                        },
                        obstacle_size: ObstacleSize {
                            min_width: wmin,
                            max_width: wmin + wspan,
                            height,
                        },
                        obstacle_angle_range: FloatRange {
                            min: amin,
                            max: amax,
                        },
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn prop_generation_is_deterministic(level in 1u32..10_000, config in config_strategy()) {
            prop_assert_eq!(generate(level, &config), generate(level, &config));
        }

        #[test]
        fn prop_generated_values_stay_in_range(level in 1u32..10_000, config in config_strategy()) {
            let layout = generate(level, &config);
            let tc = config.target_count;
            let oc = config.obstacle_count;
            prop_assert!((tc.min..=tc.max).contains(&(layout.targets.len() as u32)));
            prop_assert!((oc.min..=oc.max).contains(&(layout.obstacles.len() as u32)));

            let a = config.target_spawn_area;
            for t in &layout.targets {
                prop_assert!(t.x >= a.min_x && t.x <= a.max_x);
                prop_assert!(t.y >= a.min_y && t.y <= a.max_y);
            }
            let s = config.obstacle_size;
            let r = config.obstacle_angle_range;
            for o in &layout.obstacles {
                prop_assert!(o.width >= s.min_width && o.width <= s.max_width);
                prop_assert!(o.angle >= r.min && o.angle <= r.max);
                prop_assert_eq!(o.height, s.height);
            }
            prop_assert!(layout.validate().is_ok());
        }
    }

    #[test]
    fn test_different_levels_differ() {
        let config = ProceduralConfig::default();
        assert_ne!(generate(6, &config), generate(7, &config));
    }

    #[test]
    fn test_successive_draws_differ() {
        let mut rng = SeededRandom::new(6.0);
        let a = rng.range(0.0, 100.0);
        let b = rng.range(0.0, 100.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_int_covers_both_ends() {
        let mut rng = SeededRandom::new(1.0);
        let draws: Vec<u32> = (0..500).map(|_| rng.int(2, 4)).collect();
        assert!(draws.iter().all(|v| (2..=4).contains(v)));
        assert!(draws.contains(&2) && draws.contains(&4));
    }

    #[test]
    fn test_layout_metadata() {
        let layout = generate(12, &ProceduralConfig::default());
        assert_eq!(layout.id, 12);
        assert_eq!(layout.name, "Procedural Level 12");
    }
}
