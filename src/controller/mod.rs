// CONTROLLER: Input, movement, camera and the per-frame update
pub mod camera_controller;
pub mod frame_loop;
pub mod input;
pub mod physics;
pub mod settings;

pub use camera_controller::CameraController;
pub use frame_loop::{FrameReport, Session};
pub use input::{parse_key_script, InputEvent, InputProcessor, InputSnapshot, InputState, KeyBindings, MoveIntent, ScriptedKey};
pub use physics::{KinematicController, StepOutcome};
pub use settings::{ControllerSettings, Handedness, LandingPolicy, SettingsError};
