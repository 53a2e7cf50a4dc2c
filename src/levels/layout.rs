//! Level layout and procedural generation config types
//!
//! These mirror the `levels.json` document (camelCase keys).

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Rotation in radians
    #[serde(default)]
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub id: u32,
    pub name: String,
    pub targets: Vec<TargetSpec>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
}

impl LevelLayout {
    /// Structural checks: at least one target, positive obstacle sizes, finite numbers
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidLevelLayout(msg));

        if self.targets.is_empty() {
            return invalid(format!("level {} has no targets", self.id));
        }
        for (i, t) in self.targets.iter().enumerate() {
            if !t.x.is_finite() || !t.y.is_finite() {
                return invalid(format!("level {} target {} is not finite", self.id, i));
            }
        }
        for (i, o) in self.obstacles.iter().enumerate() {
            if ![o.x, o.y, o.width, o.height, o.angle].iter().all(|v| v.is_finite()) {
                return invalid(format!("level {} obstacle {} is not finite", self.id, i));
            }
            if o.width <= 0.0 || o.height <= 0.0 {
                return invalid(format!(
                    "level {} obstacle {} has non-positive size {}x{}",
                    self.id, i, o.width, o.height
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnArea {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleSize {
    pub min_width: f32,
    pub max_width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProceduralConfig {
    pub enabled: bool,
    /// Levels above this number are generated
    pub start_after_level: u32,
    pub target_count: CountRange,
    pub obstacle_count: CountRange,
    pub target_spawn_area: SpawnArea,
    pub obstacle_spawn_area: SpawnArea,
    pub obstacle_size: ObstacleSize,
    pub obstacle_angle_range: FloatRange,
}

impl Default for ProceduralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_after_level: 5,
            target_count: CountRange { min: 2, max: 5 },
            obstacle_count: CountRange { min: 1, max: 3 },
            target_spawn_area: SpawnArea {
                min_x: 420.0,
                max_x: 760.0,
                min_y: 200.0,
                max_y: 540.0,
            },
            obstacle_spawn_area: SpawnArea {
                min_x: 300.0,
                max_x: 700.0,
                min_y: 250.0,
                max_y: 500.0,
            },
            obstacle_size: ObstacleSize {
                min_width: 60.0,
                max_width: 160.0,
                height: 16.0,
            },
            obstacle_angle_range: FloatRange { min: -0.4, max: 0.4 },
        }
    }
}

impl ProceduralConfig {
    /// Reject ranges that would make generation produce unplayable layouts
    pub fn validate(&self) -> Result<()> {
        let bad = |what: &str| Err(Error::LevelDataUnavailable(format!("procedural {what}")));
        let area_ok = |a: &SpawnArea| {
            [a.min_x, a.max_x, a.min_y, a.max_y].iter().all(|v| v.is_finite())
                && a.min_x <= a.max_x
                && a.min_y <= a.max_y
        };

        if self.target_count.min == 0 || self.target_count.min > self.target_count.max {
            return bad("targetCount must satisfy 1 <= min <= max");
        }
        if self.obstacle_count.min > self.obstacle_count.max {
            return bad("obstacleCount min exceeds max");
        }
        if !area_ok(&self.target_spawn_area) || !area_ok(&self.obstacle_spawn_area) {
            return bad("spawn area is inverted or not finite");
        }
        let size = &self.obstacle_size;
        if !(size.min_width > 0.0 && size.min_width <= size.max_width && size.height > 0.0)
            || !size.max_width.is_finite()
            || !size.height.is_finite()
        {
            return bad("obstacleSize must be positive with minWidth <= maxWidth");
        }
        let angle = &self.obstacle_angle_range;
        if !(angle.min.is_finite() && angle.max.is_finite() && angle.min <= angle.max) {
            return bad("obstacleAngleRange min exceeds max");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LevelLayout {
        LevelLayout {
            id: 1,
            name: "Test".into(),
            targets: vec![TargetSpec { x: 600.0, y: 540.0 }],
            obstacles: vec![ObstacleSpec {
                x: 400.0,
                y: 500.0,
                width: 20.0,
                height: 100.0,
                angle: 0.0,
            }],
        }
    }

    #[test]
    fn test_valid_layout() {
        assert!(layout().validate().is_ok());
    }

    #[test]
    fn test_empty_targets_rejected() {
        let mut l = layout();
        l.targets.clear();
        assert!(matches!(l.validate(), Err(Error::InvalidLevelLayout(_))));
    }

    #[test]
    fn test_bad_obstacle_rejected() {
        let mut l = layout();
        l.obstacles[0].width = 0.0;
        assert!(l.validate().is_err());

        let mut l = layout();
        l.obstacles[0].angle = f32::NAN;
        assert!(l.validate().is_err());
    }

    #[test]
    fn test_obstacle_angle_defaults_to_zero() {
        let o: ObstacleSpec =
            serde_json::from_str(r#"{"x": 1, "y": 2, "width": 3, "height": 4}"#).unwrap();
        assert_eq!(o.angle, 0.0);
    }

    #[test]
    fn test_config_camel_case_roundtrip_keys() {
        let json = serde_json::to_string(&ProceduralConfig::default()).unwrap();
        assert!(json.contains("startAfterLevel"));
        assert!(json.contains("targetSpawnArea"));
        assert!(json.contains("minWidth"));
    }

    #[test]
    fn test_config_validation() {
        assert!(ProceduralConfig::default().validate().is_ok());
        let mut c = ProceduralConfig::default();
        c.target_count = CountRange { min: 4, max: 2 };
        assert!(c.validate().is_err());
        let mut c = ProceduralConfig::default();
        c.obstacle_size.min_width = 0.0;
        assert!(c.validate().is_err());
    }
}
