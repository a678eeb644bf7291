use glam::Vec3;

use super::input::MoveIntent;
use super::settings::{ControllerSettings, LandingPolicy, SettingsError};
use crate::model::{Actor, Collider, Level};

/// Slack when checking that the actor starts the frame on or above a surface
pub const CONTACT_EPSILON: f32 = 1e-4;

/// Result of advancing the actor by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub actor: Actor,
    /// Time step actually integrated (after clamping)
    pub dt: f32,
    pub jumped: bool,
    /// Index of the collider the actor was snapped onto this frame
    pub landed_on: Option<usize>,
    /// Snapped onto a collider after starting the frame airborne
    pub touched_down: bool,
    /// The actor fell below the level and was put back at the safe spawn
    pub reset: bool,
}

/// Kinematic player controller: gravity, steering, jumping, ground snapping
#[derive(Debug, Clone)]
pub struct KinematicController {
    settings: ControllerSettings,
}

impl KinematicController {
    pub fn new(settings: ControllerSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Usable time step for a raw frame time, or None when the frame should be skipped
    pub fn clamp_dt(&self, dt: f32) -> Option<f32> {
        if !dt.is_finite() || dt <= 0.0 {
            return None;
        }
        Some(dt.min(self.settings.max_frame_dt))
    }

    /// Unit horizontal steering direction for the held keys, or zero
    pub fn move_direction(&self, intent: &MoveIntent, facing: Vec3) -> Vec3 {
        let handedness = self.settings.handedness;
        let forward = if self.settings.camera_relative {
            let mut f = facing;
            if self.settings.flatten_facing {
                f.y = 0.0;
            }
            let f = f.normalize_or_zero();
            // looking straight down leaves nothing to steer by
            if f == Vec3::ZERO {
                handedness.world_forward()
            } else {
                f
            }
        } else {
            handedness.world_forward()
        };
        let right = handedness.right_of(forward).normalize_or_zero();

        let mut dir = Vec3::ZERO;
        if intent.forward {
            dir += forward;
        }
        if intent.backward {
            dir -= forward;
        }
        if intent.right {
            dir += right;
        }
        if intent.left {
            dir -= right;
        }
        dir.normalize_or_zero()
    }

    /// Apply gravity, steering, damping and jump to `actor.velocity`.
    /// Returns the candidate position and whether a jump started.
    pub fn integrate(&self, actor: &mut Actor, intent: &MoveIntent, facing: Vec3, dt: f32) -> (Vec3, bool) {
        let s = &self.settings;

        // Apply gravity
        actor.velocity.y += s.gravity * dt;

        // Horizontal input overwrites velocity; no input decays it
        let dir = self.move_direction(intent, facing);
        if dir != Vec3::ZERO {
            actor.velocity.x = dir.x * s.move_speed;
            actor.velocity.z = dir.z * s.move_speed;
        } else {
            actor.velocity.x *= s.damping_factor;
            actor.velocity.z *= s.damping_factor;
        }

        // Jump handling
        let mut jumped = false;
        if intent.jump && actor.grounded {
            actor.velocity.y = s.jump_force;
            actor.grounded = false;
            jumped = true;
        }

        (actor.position + actor.velocity * dt, jumped)
    }

    /// Snap `candidate` onto a collider the actor crosses downward this frame.
    /// Returns the index of the collider landed on.
    pub fn resolve_ground(&self, actor: &mut Actor, candidate: &mut Vec3, colliders: &[Collider]) -> Option<usize> {
        let mut landed: Option<(usize, f32)> = None;

        // Rising actors never land
        if actor.velocity.y <= 0.0 {
            let half_height = actor.half_extents.y;
            let bottom_now = actor.bottom();
            let bottom_next = candidate.y - half_height;
            let footprint = actor.bounds_at(*candidate);

            for (i, collider) in colliders.iter().enumerate() {
                let top = collider.top();
                let crossing = bottom_now >= top - CONTACT_EPSILON && bottom_next <= top;
                if !crossing || !footprint.overlaps_xz(&collider.bounds()) {
                    continue;
                }
                landed = match (self.settings.landing, landed) {
                    (LandingPolicy::Highest, Some((_, best))) if best >= top => landed,
                    _ => Some((i, top)),
                };
            }

            if let Some((_, top)) = landed {
                candidate.y = top + half_height;
                actor.velocity.y = 0.0;
                actor.grounded = true;
            }
        }

        if actor.velocity.y < 0.0 && landed.is_none() {
            actor.grounded = false;
        } else if actor.velocity.y > 0.0 {
            actor.grounded = false;
        }

        landed.map(|(i, _)| i)
    }

    /// Put the actor back at the safe spawn if it fell out of the level
    pub fn recover(&self, actor: &mut Actor, level: &Level) -> bool {
        if actor.position.y < level.reset_threshold {
            actor.reset_to(level.safe_spawn);
            return true;
        }
        false
    }

    /// Advance `actor` by one frame. `facing` is the camera's look direction,
    /// used only when steering is camera-relative.
    pub fn step(&self, actor: &Actor, intent: &MoveIntent, facing: Vec3, dt: f32, level: &Level) -> StepOutcome {
        let mut next = *actor;
        let Some(dt) = self.clamp_dt(dt) else {
            return StepOutcome {
                actor: next,
                dt: 0.0,
                jumped: false,
                landed_on: None,
                touched_down: false,
                reset: false,
            };
        };

        let was_grounded = actor.grounded;
        let (mut candidate, jumped) = self.integrate(&mut next, intent, facing, dt);
        let landed_on = self.resolve_ground(&mut next, &mut candidate, &level.colliders);
        next.position = candidate;
        let reset = self.recover(&mut next, level);

        if jumped {
            tracing::debug!(y = next.position.y, "jump");
        }
        let touched_down = landed_on.is_some() && !was_grounded;
        if let Some(i) = landed_on.filter(|_| touched_down) {
            tracing::debug!(collider = %level.colliders[i].name, y = next.position.y, "landed");
        }
        if reset {
            tracing::debug!(spawn = ?level.safe_spawn, "fell below {}, reset to safe spawn", level.reset_threshold);
        }

        StepOutcome { actor: next, dt, jumped, landed_on, touched_down, reset }
    }
}

impl Default for KinematicController {
    fn default() -> Self {
        Self { settings: ControllerSettings::default() }
    }
}
