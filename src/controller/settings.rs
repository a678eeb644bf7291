use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::input::KeyBindings;

/// Errors from building or loading controller settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which collider wins when several qualify as a landing surface in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingPolicy {
    /// Snap to the highest qualifying top surface
    #[default]
    Highest,
    /// Snap to whichever qualifying collider comes last in the list
    LastMatch,
}

/// Axis convention of the host engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// +Z is forward (Babylon.js)
    #[default]
    Left,
    /// -Z is forward (three.js)
    Right,
}

impl Handedness {
    pub fn world_forward(self) -> Vec3 {
        match self {
            Handedness::Left => Vec3::Z,
            Handedness::Right => Vec3::NEG_Z,
        }
    }

    /// Direction to the viewer's right when looking along `forward`
    pub fn right_of(self, forward: Vec3) -> Vec3 {
        match self {
            Handedness::Left => Vec3::Y.cross(forward),
            Handedness::Right => forward.cross(Vec3::Y),
        }
    }
}

/// Tuning for one scene variant of the kinematic controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Vertical acceleration (m/s², negative is down)
    pub gravity: f32,
    /// Horizontal speed while a movement key is held (m/s)
    pub move_speed: f32,
    /// Vertical velocity applied on jump (m/s)
    pub jump_force: f32,
    /// Per-frame multiplier on horizontal velocity with no input
    pub damping_factor: f32,
    /// Steer relative to the camera facing instead of the world axes
    pub camera_relative: bool,
    /// Drop the facing's vertical component before steering
    pub flatten_facing: bool,
    pub handedness: Handedness,
    pub landing: LandingPolicy,
    /// Release the jump key after a jump so holding it does not bounce
    pub consume_jump: bool,
    /// Frame time above this is clamped (seconds)
    pub max_frame_dt: f32,
    pub bindings: KeyBindings,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            move_speed: 8.0,
            jump_force: 5.0,
            damping_factor: 0.9,
            camera_relative: false,
            flatten_facing: true,
            handedness: Handedness::Left,
            landing: LandingPolicy::Highest,
            consume_jump: true,
            max_frame_dt: 0.1,
            bindings: KeyBindings::default(),
        }
    }
}

pub const PRESET_NAMES: [&str; 3] = ["forest", "orbit", "container"];

impl ControllerSettings {
    /// World-axis steering, jump consumed on use
    pub fn forest() -> Self {
        Self::default()
    }

    /// Camera-relative steering with arrow keys turning the orbit camera
    pub fn orbit() -> Self {
        Self {
            camera_relative: true,
            consume_jump: false,
            bindings: KeyBindings::arrows_orbit(),
            ..Self::default()
        }
    }

    /// Weightless walk inside the container box; stops dead on release
    pub fn container() -> Self {
        Self {
            gravity: 0.0,
            move_speed: 4.8,
            jump_force: 0.0,
            damping_factor: 0.0,
            handedness: Handedness::Right,
            ..Self::default()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "forest" => Some(Self::forest()),
            "orbit" => Some(Self::orbit()),
            "container" => Some(Self::container()),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: ControllerSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
            SettingsError::Invalid { field, reason: reason.into() }
        }

        if !self.gravity.is_finite() || self.gravity > 0.0 {
            return Err(invalid("gravity", format!("{} must be finite and not point up", self.gravity)));
        }
        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            return Err(invalid("move_speed", format!("{} must be a non-negative number", self.move_speed)));
        }
        if !self.jump_force.is_finite() || self.jump_force < 0.0 {
            return Err(invalid("jump_force", format!("{} must be a non-negative number", self.jump_force)));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(invalid("damping_factor", format!("{} is outside [0, 1]", self.damping_factor)));
        }
        if !self.max_frame_dt.is_finite() || self.max_frame_dt <= 0.0 {
            return Err(invalid("max_frame_dt", format!("{} must be positive", self.max_frame_dt)));
        }
        if self.bindings.jump.is_empty() {
            return Err(invalid("bindings.jump", "at least one jump key is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for name in PRESET_NAMES {
            ControllerSettings::preset(name).unwrap().validate().unwrap();
        }
        assert!(ControllerSettings::preset("moon").is_none());
    }

    #[test]
    fn test_right_vector_follows_handedness() {
        assert_eq!(Handedness::Left.right_of(Handedness::Left.world_forward()), Vec3::X);
        assert_eq!(Handedness::Right.right_of(Handedness::Right.world_forward()), Vec3::X);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = ControllerSettings::from_json(r#"{ "move_speed": 12.0, "landing": "last_match" }"#).unwrap();
        assert_eq!(settings.move_speed, 12.0);
        assert_eq!(settings.landing, LandingPolicy::LastMatch);
        assert_eq!(settings.gravity, -9.81);
        assert_eq!(settings.bindings, KeyBindings::default());
    }

    #[test]
    fn test_rejects_bad_damping() {
        let err = ControllerSettings::from_json(r#"{ "damping_factor": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "damping_factor", .. }));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("orbit.json");
        std::fs::write(&path, serde_json::to_string(&ControllerSettings::orbit()).unwrap()).unwrap();
        assert_eq!(ControllerSettings::load(&path).unwrap(), ControllerSettings::orbit());

        let missing = ControllerSettings::load(tmp.path().join("missing.json"));
        assert!(matches!(missing, Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_rejects_upward_gravity() {
        let settings = ControllerSettings { gravity: 3.0, ..Default::default() };
        assert!(settings.validate().is_err());
    }
}
