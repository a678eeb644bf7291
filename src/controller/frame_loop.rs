use std::path::Path;

use glam::Vec3;

use super::camera_controller::CameraController;
use super::input::{InputEvent, InputProcessor, InputState};
use super::physics::KinematicController;
use super::settings::{ControllerSettings, SettingsError};
use crate::model::{Actor, Camera, CameraRig, Level};

pub const SCENE_NAMES: [&str; 4] = ["forest", "orbit", "container", "editor"];

/// What one frame produced, for the host renderer and for logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub dt: f32,
    pub actor: Actor,
    pub jumped: bool,
    pub landed_on: Option<usize>,
    /// The actor came down onto `landed_on` this frame after being airborne
    pub touched_down: bool,
    pub reset: bool,
    pub eye: Vec3,
    pub target: Vec3,
}

/// Main game loop state: the actor, its world, the keyboard and the camera
pub struct Session {
    actor: Actor,
    input: InputState,
    level: Level,
    camera: Camera,
    camera_controller: CameraController,
    controller: KinematicController,
    processor: InputProcessor,
    frame: u64,
}

impl Session {
    pub fn new(level: Level, settings: ControllerSettings, rig: CameraRig) -> Result<Self, SettingsError> {
        let processor = InputProcessor::new(settings.bindings.clone());
        let controller = KinematicController::new(settings)?;
        let camera_controller = CameraController::new(rig);
        let actor = Actor::new(level.spawn);
        let camera = camera_controller.initial_camera(actor.position);
        tracing::info!(level = %level.name, colliders = level.colliders.len(), "session started");
        Ok(Self {
            actor,
            input: InputState::new(),
            level,
            camera,
            camera_controller,
            controller,
            processor,
            frame: 0,
        })
    }

    /// Level, settings and camera rig of a built-in scene
    pub fn scene_parts(name: &str) -> Option<(Level, ControllerSettings, CameraRig)> {
        let parts = match name.to_ascii_lowercase().as_str() {
            "forest" => (Level::forest(), ControllerSettings::forest(), CameraRig::forest_follow()),
            "orbit" => (Level::forest(), ControllerSettings::orbit(), CameraRig::orbit()),
            "container" => (Level::container(), ControllerSettings::container(), CameraRig::chase()),
            "editor" => (Level::forest(), ControllerSettings::forest(), CameraRig::editor()),
            _ => return None,
        };
        Some(parts)
    }

    /// One of the built-in scenes: forest, orbit, container or editor
    pub fn scene(name: &str) -> Option<Self> {
        let (level, settings, rig) = Self::scene_parts(name)?;
        // presets always validate
        Self::new(level, settings, rig).ok()
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn settings(&self) -> &ControllerSettings {
        self.controller.settings()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        self.input.process_event(event);
    }

    pub fn key_down(&mut self, key: &str) {
        self.input.set_key(key, true);
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.set_key(key, false);
    }

    /// Swap in a new level and respawn the actor there
    pub fn set_level(&mut self, level: Level) {
        tracing::info!(level = %level.name, colliders = level.colliders.len(), "level changed");
        self.actor = Actor::new(level.spawn).with_half_extents(self.actor.half_extents);
        self.level = level;
        self.camera = self.camera_controller.initial_camera(self.actor.position);
    }

    /// Load a level file; on failure the current level stays and the error is logged
    pub fn load_level(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match Level::load(path) {
            Ok(level) => self.set_level(level),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "error loading level"),
        }
    }

    /// Host frame time arrives in milliseconds
    pub fn tick_millis(&mut self, delta_ms: f64) -> FrameReport {
        self.tick((delta_ms / 1000.0) as f32)
    }

    /// Update actor and camera for one frame
    pub fn tick(&mut self, dt: f32) -> FrameReport {
        // Sample input once
        let snapshot = self.input.snapshot();
        let intent = self.processor.intent(&snapshot);

        // Camera first so steering uses this frame's orbit angle
        if let Some(step) = self.controller.clamp_dt(dt) {
            self.camera_controller
                .apply_orbit_input(self.processor.orbit_axis(&snapshot), step);
        }
        self.camera_controller
            .sync_camera_from_actor(&mut self.camera, self.actor.position);
        let facing = self.camera_controller.facing(&self.camera);

        // Player physics
        let outcome = self.controller.step(&self.actor, &intent, facing, dt, &self.level);
        self.actor = outcome.actor;

        if outcome.jumped && self.controller.settings().consume_jump {
            for key in self.processor.jump_keys() {
                self.input.release(key);
            }
        }

        // Update camera to match actor after physics
        self.camera_controller
            .sync_camera_from_actor(&mut self.camera, self.actor.position);

        self.frame += 1;
        FrameReport {
            frame: self.frame,
            dt: outcome.dt,
            actor: self.actor,
            jumped: outcome.jumped,
            landed_on: outcome.landed_on,
            touched_down: outcome.touched_down,
            reset: outcome.reset,
            eye: self.camera.eye,
            target: self.camera.target(),
        }
    }
}
