//! Level repository: hand-authored levels first, generated ones after

use serde::Deserialize;

use super::generator::generate;
use super::layout::{LevelLayout, ObstacleSpec, ProceduralConfig, TargetSpec};
use crate::{Error, Result};

/// Raw document shape of `levels.json`. Levels stay as JSON values so one
/// malformed entry only blocks that level.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelDocument {
    levels: Vec<serde_json::Value>,
    #[serde(default)]
    procedural_generation: Option<ProceduralConfig>,
}

#[derive(Debug, Clone)]
pub struct LevelRepository {
    levels: Vec<Result<LevelLayout>>,
    procedural: Option<ProceduralConfig>,
}

impl LevelRepository {
    pub fn new(levels: Vec<LevelLayout>, procedural: Option<ProceduralConfig>) -> Self {
        Self {
            levels: levels.into_iter().map(Ok).collect(),
            procedural: procedural.filter(validated),
        }
    }

    /// Parse a `levels.json` document
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: LevelDocument =
            serde_json::from_str(json).map_err(|e| Error::LevelDataUnavailable(e.to_string()))?;
        if doc.levels.is_empty() {
            return Err(Error::LevelDataUnavailable("no levels in document".into()));
        }

        let levels = doc
            .levels
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                serde_json::from_value::<LevelLayout>(value).map_err(|e| {
                    Error::InvalidLevelLayout(format!("level entry {}: {}", i + 1, e))
                })
            })
            .collect();

        Ok(Self {
            levels,
            procedural: doc.procedural_generation.filter(validated),
        })
    }

    /// Built-in layouts used when level data cannot be loaded
    pub fn fallback() -> Self {
        let t = |x, y| TargetSpec { x, y };
        let o = |x, y, width, height, angle| ObstacleSpec {
            x,
            y,
            width,
            height,
            angle,
        };
        Self::new(
            vec![
                LevelLayout {
                    id: 1,
                    name: "First Shot".into(),
                    targets: vec![t(600.0, 540.0), t(650.0, 480.0), t(700.0, 420.0)],
                    obstacles: vec![],
                },
                LevelLayout {
                    id: 2,
                    name: "Over the Wall".into(),
                    targets: vec![t(560.0, 540.0), t(690.0, 540.0)],
                    obstacles: vec![o(450.0, 480.0, 20.0, 160.0, 0.0)],
                },
                LevelLayout {
                    id: 3,
                    name: "Shelves".into(),
                    targets: vec![t(500.0, 392.0), t(620.0, 540.0), t(720.0, 282.0)],
                    obstacles: vec![
                        o(500.0, 420.0, 120.0, 16.0, 0.0),
                        o(720.0, 310.0, 100.0, 16.0, -0.2),
                    ],
                },
            ],
            None,
        )
    }

    /// Use fetched level data if it parses, otherwise the built-in levels
    pub fn load_or_fallback(fetched: Result<String>) -> Self {
        match fetched.and_then(|json| Self::from_json(&json)) {
            Ok(repo) => {
                log::info!(
                    "Loaded {} levels (procedural: {})",
                    repo.level_count(),
                    repo.procedural_enabled()
                );
                repo
            }
            Err(e) => {
                log::warn!("{e}; using built-in levels");
                Self::fallback()
            }
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn procedural_enabled(&self) -> bool {
        self.procedural.is_some_and(|p| p.enabled)
    }

    /// Whether finishing `level` leads somewhere other than the win screen
    pub fn has_level_after(&self, level: u32) -> bool {
        (level as usize) < self.levels.len() || self.procedural_enabled()
    }

    /// Layout for a 1-based level number, validated
    pub fn layout_for(&self, level: u32) -> Result<LevelLayout> {
        let layout = match self.procedural {
            Some(config) if config.enabled && level > config.start_after_level => {
                generate(level, &config)
            }
            _ => {
                if self.levels.is_empty() {
                    return Err(Error::InvalidLevelLayout("no levels loaded".into()));
                }
                let index = (level.max(1) as usize - 1) % self.levels.len();
                self.levels[index].clone()?
            }
        };
        layout.validate()?;
        Ok(layout)
    }
}

fn validated(config: &ProceduralConfig) -> bool {
    match config.validate() {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{e}; procedural generation disabled");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "levels": [
            { "id": 1, "name": "One", "targets": [{ "x": 500, "y": 540 }] },
            { "id": 2, "name": "Two", "targets": [{ "x": 600, "y": 540 }, { "x": 650, "y": 540 }],
              "obstacles": [{ "x": 400, "y": 500, "width": 20, "height": 100, "angle": 0.1 }] }
        ],
        "proceduralGeneration": {
            "enabled": true,
            "startAfterLevel": 2,
            "targetCount": { "min": 2, "max": 4 },
            "obstacleCount": { "min": 0, "max": 2 },
            "targetSpawnArea": { "minX": 400, "maxX": 750, "minY": 200, "maxY": 540 },
            "obstacleSpawnArea": { "minX": 300, "maxX": 700, "minY": 250, "maxY": 500 },
            "obstacleSize": { "minWidth": 60, "maxWidth": 150, "height": 16 },
            "obstacleAngleRange": { "min": -0.3, "max": 0.3 }
        }
    }"#;

    #[test]
    fn test_bundled_levels_parse() {
        let repo = LevelRepository::from_json(include_str!("../../assets/levels.json")).unwrap();
        assert_eq!(repo.level_count(), 5);
        assert!(repo.procedural_enabled());
        for level in 1..=8 {
            assert!(repo.layout_for(level).is_ok(), "level {level}");
        }
        assert_eq!(repo.layout_for(6).unwrap().name, "Procedural Level 6");
    }

    #[test]
    fn test_fallback_levels() {
        let repo = LevelRepository::load_or_fallback(Err(Error::LevelDataUnavailable(
            "network down".into(),
        )));
        assert_eq!(repo.level_count(), 3);
        let first = repo.layout_for(1).unwrap();
        let targets: Vec<(f32, f32)> = first.targets.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(targets, vec![(600.0, 540.0), (650.0, 480.0), (700.0, 420.0)]);
    }

    #[test]
    fn test_unparseable_document_falls_back() {
        let repo = LevelRepository::load_or_fallback(Ok("{ not json".into()));
        assert_eq!(repo.level_count(), 3);
        assert!(!repo.procedural_enabled());
    }

    #[test]
    fn test_parses_document() {
        let repo = LevelRepository::from_json(DOC).unwrap();
        assert_eq!(repo.level_count(), 2);
        assert!(repo.procedural_enabled());
        assert_eq!(repo.layout_for(2).unwrap().obstacles.len(), 1);
    }

    #[test]
    fn test_generates_past_threshold() {
        let repo = LevelRepository::from_json(DOC).unwrap();
        let layout = repo.layout_for(3).unwrap();
        assert_eq!(layout.name, "Procedural Level 3");
        assert_eq!(layout, repo.layout_for(3).unwrap());
        assert!(repo.has_level_after(50));
    }

    #[test]
    fn test_cycles_without_generation() {
        let repo = LevelRepository::fallback();
        assert_eq!(repo.layout_for(4).unwrap().name, "First Shot");
        assert_eq!(repo.layout_for(5).unwrap().name, "Over the Wall");
        assert!(repo.has_level_after(2));
        assert!(!repo.has_level_after(3));
    }

    #[test]
    fn test_disabled_generation_is_ignored() {
        let doc = DOC.replace("\"enabled\": true", "\"enabled\": false");
        let repo = LevelRepository::from_json(&doc).unwrap();
        assert!(!repo.procedural_enabled());
        assert_eq!(repo.layout_for(3).unwrap().name, "One");
        assert!(!repo.has_level_after(2));
    }

    #[test]
    fn test_bad_entry_only_blocks_that_level() {
        let doc = r#"{ "levels": [
            { "id": 1, "name": "Good", "targets": [{ "x": 1, "y": 2 }] },
            { "id": 2, "name": "Bad", "targets": [{ "x": 1, "y": 2 }],
              "obstacles": [{ "x": "left", "y": 2, "width": 3, "height": 4 }] },
            { "id": 3, "name": "Empty", "targets": [] }
        ] }"#;
        let repo = LevelRepository::from_json(doc).unwrap();
        assert!(repo.layout_for(1).is_ok());
        assert!(matches!(repo.layout_for(2), Err(Error::InvalidLevelLayout(_))));
        assert!(matches!(repo.layout_for(3), Err(Error::InvalidLevelLayout(_))));
    }

    #[test]
    fn test_empty_document_is_unavailable() {
        assert!(matches!(
            LevelRepository::from_json(r#"{ "levels": [] }"#),
            Err(Error::LevelDataUnavailable(_))
        ));
    }

    #[test]
    fn test_invalid_procedural_config_disables_generation() {
        let doc = DOC.replace("\"min\": 2, \"max\": 4", "\"min\": 5, \"max\": 1");
        let repo = LevelRepository::from_json(&doc).unwrap();
        assert!(!repo.procedural_enabled());
    }
}
