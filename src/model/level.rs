use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collider::Collider;
use crate::utils::{hash01, lerp_range, Aabb};

/// Errors from loading, parsing or validating a level
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid level: {0}")]
    Invalid(String),
    #[error("unknown level preset: {0:?}")]
    UnknownPreset(String),
}

/// A static world: where the actor starts, where it is put back, and what it can stand on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub spawn: Vec3,
    /// Teleport target after falling below `reset_threshold`
    pub safe_spawn: Vec3,
    pub reset_threshold: f32,
    pub colliders: Vec<Collider>,
}

pub const PRESET_NAMES: [&str; 3] = ["flat", "forest", "container"];

const FOREST_GROUND_SIZE: f32 = 200.0;
const FOREST_ROCK_COUNT: i32 = 100;

impl Level {
    /// Single ground plane at y = 0
    pub fn flat() -> Self {
        Self {
            name: "flat".to_string(),
            spawn: Vec3::new(0.0, 5.0, 0.0),
            safe_spawn: Vec3::new(0.0, 10.0, 0.0),
            reset_threshold: -20.0,
            colliders: vec![Collider::ground("ground", Vec3::ZERO, 100.0, 100.0)],
        }
    }

    /// Open forest: wide ground, five wooden platforms and scattered rocks
    pub fn forest() -> Self {
        let mut colliders = vec![Collider::ground(
            "ground",
            Vec3::ZERO,
            FOREST_GROUND_SIZE,
            FOREST_GROUND_SIZE,
        )];

        let platforms = [
            ("platform1", Vec3::new(20.0, 2.0, -15.0), 4.0),
            ("platform2", Vec3::new(-30.0, 5.0, 25.0), 4.0),
            ("platform3", Vec3::new(40.0, 8.0, 10.0), 3.0),
            ("platform4", Vec3::new(-50.0, 3.0, -30.0), 5.0),
            ("platform5", Vec3::new(0.0, 6.0, 40.0), 3.0),
        ];
        for (name, center, side) in platforms {
            colliders.push(Collider::cuboid(name, center, Vec3::new(side, 0.5, side)));
        }

        // Rocks rest slightly above the ground; placement is a fixed hash so the level is reproducible
        let area = FOREST_GROUND_SIZE / 2.0 - 5.0;
        for i in 0..FOREST_ROCK_COUNT {
            let x = lerp_range(hash01(i, 1), -area, area);
            let z = lerp_range(hash01(i, 2), -area, area);
            let diameter = lerp_range(hash01(i, 3), 0.5, 2.0);
            let center = Vec3::new(x, diameter * 0.5 + 0.1, z);
            colliders.push(Collider::sphere(format!("rock{i}"), center, diameter));
        }

        Self {
            name: "forest".to_string(),
            spawn: Vec3::new(0.0, 5.0, 0.0),
            safe_spawn: Vec3::new(0.0, 10.0, 0.0),
            reset_threshold: -20.0,
            colliders,
        }
    }

    /// 10x10x10 box with the player standing near its floor
    pub fn container() -> Self {
        Self {
            name: "container".to_string(),
            spawn: Vec3::new(0.0, -4.0, 0.0),
            safe_spawn: Vec3::new(0.0, -4.0, 0.0),
            reset_threshold: -20.0,
            colliders: vec![Collider::ground("container_floor", Vec3::new(0.0, -5.0, 0.0), 10.0, 10.0)],
        }
    }

    pub fn preset(name: &str) -> Result<Self, LevelError> {
        match name.to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::flat()),
            "forest" => Ok(Self::forest()),
            "container" => Ok(Self::container()),
            _ => Err(LevelError::UnknownPreset(name.to_string())),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            name = %level.name,
            colliders = level.colliders.len(),
            "level loaded"
        );
        Ok(level)
    }

    /// Load a level file, keeping `fallback` when it cannot be read or is invalid
    pub fn load_or(path: impl AsRef<Path>, fallback: Level) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(level) => level,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "error loading level, using {}", fallback.name);
                fallback
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), name = %self.name, "level saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if !self.spawn.is_finite() || !self.safe_spawn.is_finite() {
            return Err(LevelError::Invalid("spawn points must be finite".to_string()));
        }
        if !self.reset_threshold.is_finite() {
            return Err(LevelError::Invalid("reset threshold must be finite".to_string()));
        }
        if self.safe_spawn.y <= self.reset_threshold {
            return Err(LevelError::Invalid(format!(
                "safe spawn y {} is below the reset threshold {}",
                self.safe_spawn.y, self.reset_threshold
            )));
        }
        if let Some(bad) = self.colliders.iter().find(|c| !c.is_valid()) {
            return Err(LevelError::Invalid(format!("collider {:?} has bad extents", bad.name)));
        }
        Ok(())
    }

    /// Box enclosing every collider
    pub fn bounds(&self) -> Option<Aabb> {
        self.colliders
            .iter()
            .map(Collider::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::flat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for name in PRESET_NAMES {
            let level = Level::preset(name).unwrap();
            level.validate().unwrap();
            assert_eq!(level.name, name);
        }
        assert!(matches!(Level::preset("moon"), Err(LevelError::UnknownPreset(_))));
    }

    #[test]
    fn test_forest_layout() {
        let forest = Level::forest();
        // ground + 5 platforms + 100 rocks
        assert_eq!(forest.colliders.len(), 106);
        let platform3 = forest.colliders.iter().find(|c| c.name == "platform3").unwrap();
        assert_eq!(platform3.top(), 8.25);

        let area = FOREST_GROUND_SIZE / 2.0 - 5.0;
        for rock in forest.colliders.iter().filter(|c| c.name.starts_with("rock")) {
            assert!(rock.center.x.abs() <= area && rock.center.z.abs() <= area);
            // bottom sits 0.1 above the ground
            assert!((rock.bounds().min.y - 0.1).abs() < 1e-5);
        }
        assert_eq!(Level::forest(), forest);
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("levels").join("forest.json");
        let forest = Level::forest();
        forest.save(&path).unwrap();
        let loaded = Level::load(&path).unwrap();
        assert_eq!(loaded, forest);
    }

    #[test]
    fn test_missing_shape_defaults_to_box() {
        let json = r#"{
            "name": "tiny",
            "spawn": [0.0, 3.0, 0.0],
            "safe_spawn": [0.0, 3.0, 0.0],
            "reset_threshold": -10.0,
            "colliders": [
                { "name": "floor", "center": [0.0, 0.0, 0.0], "half_extents": [5.0, 0.5, 5.0] }
            ]
        }"#;
        let level = Level::from_json(json).unwrap();
        assert_eq!(level.colliders[0].top(), 0.5);
    }

    #[test]
    fn test_rejects_spawn_below_threshold() {
        let mut level = Level::flat();
        level.safe_spawn.y = -30.0;
        assert!(matches!(level.validate(), Err(LevelError::Invalid(_))));
    }

    #[test]
    fn test_load_or_falls_back_on_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let level = Level::load_or(tmp.path().join("level.glb.json"), Level::container());
        assert_eq!(level.name, "container");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Level::load(&path), Err(LevelError::Json(_))));
    }

    #[test]
    fn test_bounds_span_platforms() {
        let bounds = Level::forest().bounds().unwrap();
        assert_eq!(bounds.min.x, -100.0);
        assert_eq!(bounds.max.y, 8.25);
    }
}
