use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Viewpoint handed to the host renderer each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub up: Vec3,
}

impl Camera {
    pub fn new(eye: Vec3) -> Self {
        Self {
            eye,
            yaw: 0.0,
            pitch: 0.0,
            up: Vec3::Y,
        }
    }

    /// Camera at `eye` already looking at `target`
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let mut cam = Self::new(eye);
        cam.set_look_at(target);
        cam
    }

    pub fn forward(&self) -> Vec3 {
        let cy = self.yaw;
        let cp = self.pitch.clamp(-1.5533, 1.5533); // Slightly less than π/2 to avoid gimbal lock
        Vec3::new(cy.cos() * cp.cos(), cp.sin(), cy.sin() * cp.cos()).normalize()
    }

    pub fn target(&self) -> Vec3 {
        self.eye + self.forward()
    }

    pub fn set_look_at(&mut self, target: Vec3) {
        let delta = target - self.eye;
        if delta.length_squared() <= f32::EPSILON {
            return;
        }
        let dir = delta.normalize();
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-1.5533, 1.5533);
    }
}

/// How the camera is placed relative to the actor every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraRig {
    /// Fixed offset from the actor; orientation is kept unless `look_at_actor`
    Follow { offset: Vec3, look_at_actor: bool },
    /// Circles the actor at `distance`/`height`; `angle` in radians
    Orbit {
        angle: f32,
        distance: f32,
        height: f32,
        /// radians per second while an orbit key is held
        rotation_speed: f32,
    },
    /// Editor camera spinning around a fixed point
    ArcRotate {
        alpha: f32,
        beta: f32,
        radius: f32,
        target: Vec3,
        /// radians per second while an orbit key is held
        rotation_speed: f32,
    },
}

impl CameraRig {
    /// Forest scene: high and behind, never re-aimed
    pub fn forest_follow() -> Self {
        CameraRig::Follow {
            offset: Vec3::new(0.0, 8.0, -15.0),
            look_at_actor: false,
        }
    }

    /// Container scene: close chase camera aimed at the actor
    pub fn chase() -> Self {
        CameraRig::Follow {
            offset: Vec3::new(0.0, 1.5, 3.0),
            look_at_actor: true,
        }
    }

    pub fn orbit() -> Self {
        CameraRig::Orbit {
            angle: 0.0,
            distance: 15.0,
            height: 8.0,
            rotation_speed: 3.0,
        }
    }

    pub fn editor() -> Self {
        CameraRig::ArcRotate {
            alpha: std::f32::consts::FRAC_PI_2,
            beta: std::f32::consts::FRAC_PI_4,
            radius: 50.0,
            target: Vec3::ZERO,
            rotation_speed: 1.0,
        }
    }

    /// Eye position for an actor at `actor_pos`
    pub fn eye_for(&self, actor_pos: Vec3) -> Vec3 {
        match *self {
            CameraRig::Follow { offset, .. } => actor_pos + offset,
            CameraRig::Orbit { angle, distance, height, .. } => {
                actor_pos + Vec3::new(distance * angle.sin(), height, distance * angle.cos())
            }
            CameraRig::ArcRotate { alpha, beta, radius, target, .. } => {
                // beta measured from the +Y axis
                target
                    + Vec3::new(
                        radius * alpha.cos() * beta.sin(),
                        radius * beta.cos(),
                        radius * alpha.sin() * beta.sin(),
                    )
            }
        }
    }

    /// Point the rig aims at, or None when the orientation is left alone
    pub fn target_for(&self, actor_pos: Vec3) -> Option<Vec3> {
        match *self {
            CameraRig::Follow { look_at_actor, .. } => look_at_actor.then_some(actor_pos),
            CameraRig::Orbit { .. } => Some(actor_pos),
            CameraRig::ArcRotate { target, .. } => Some(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_look_at_points_forward() {
        let cam = Camera::looking_at(Vec3::new(0.0, 10.0, -20.0), Vec3::ZERO);
        let expected = Vec3::new(0.0, -10.0, 20.0).normalize();
        assert!(approx(cam.forward(), expected));
    }

    #[test]
    fn test_orbit_eye_circles_actor() {
        let rig = CameraRig::Orbit { angle: 0.0, distance: 15.0, height: 8.0, rotation_speed: 3.0 };
        assert!(approx(rig.eye_for(Vec3::ZERO), Vec3::new(0.0, 8.0, 15.0)));

        let rig = CameraRig::Orbit {
            angle: std::f32::consts::FRAC_PI_2,
            distance: 15.0,
            height: 8.0,
            rotation_speed: 3.0,
        };
        assert!(approx(rig.eye_for(Vec3::new(1.0, 0.0, 1.0)), Vec3::new(16.0, 8.0, 1.0)));
    }

    #[test]
    fn test_follow_without_look_keeps_no_target() {
        let rig = CameraRig::forest_follow();
        assert_eq!(rig.eye_for(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 10.0, -12.0));
        assert_eq!(rig.target_for(Vec3::ZERO), None);
        assert_eq!(CameraRig::chase().target_for(Vec3::ONE), Some(Vec3::ONE));
    }

    #[test]
    fn test_arc_rotate_radius() {
        let rig = CameraRig::editor();
        let eye = rig.eye_for(Vec3::new(100.0, 0.0, 0.0));
        assert!((eye.length() - 50.0).abs() < 1e-3);
    }
}
