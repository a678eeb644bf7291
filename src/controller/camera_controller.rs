use glam::Vec3;

use crate::model::{Camera, CameraRig};

/// Places the camera from the actor position every frame
#[derive(Debug, Clone)]
pub struct CameraController {
    pub rig: CameraRig,
}

impl CameraController {
    pub fn new(rig: CameraRig) -> Self {
        Self { rig }
    }

    /// Initial camera for an actor at `actor_pos`. Follow rigs that never
    /// re-aim start out looking at the actor's spawn.
    pub fn initial_camera(&self, actor_pos: Vec3) -> Camera {
        let eye = self.rig.eye_for(actor_pos);
        let target = self.rig.target_for(actor_pos).unwrap_or(actor_pos);
        Camera::looking_at(eye, target)
    }

    /// Turn an orbit rig; `axis` is -1, 0 or 1 from the orbit keys
    pub fn apply_orbit_input(&mut self, axis: f32, dt: f32) {
        match &mut self.rig {
            CameraRig::Orbit { angle, rotation_speed, .. } => {
                *angle = (*angle + axis * *rotation_speed * dt).rem_euclid(std::f32::consts::TAU);
            }
            CameraRig::ArcRotate { alpha, rotation_speed, .. } => {
                *alpha = (*alpha + axis * *rotation_speed * dt).rem_euclid(std::f32::consts::TAU);
            }
            CameraRig::Follow { .. } => {}
        }
    }

    /// Sync camera from actor position
    pub fn sync_camera_from_actor(&self, camera: &mut Camera, actor_pos: Vec3) {
        camera.eye = self.rig.eye_for(actor_pos);
        if let Some(target) = self.rig.target_for(actor_pos) {
            camera.set_look_at(target);
        }
    }

    /// Direction used as "forward" for camera-relative steering
    pub fn facing(&self, camera: &Camera) -> Vec3 {
        camera.forward()
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraRig::forest_follow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_keeps_orientation() {
        let ctrl = CameraController::default();
        let mut cam = ctrl.initial_camera(Vec3::ZERO);
        let before = cam.forward();
        ctrl.sync_camera_from_actor(&mut cam, Vec3::new(30.0, 2.0, -4.0));
        assert_eq!(cam.eye, Vec3::new(30.0, 10.0, -19.0));
        assert_eq!(cam.forward(), before);
    }

    #[test]
    fn test_orbit_faces_actor() {
        let mut ctrl = CameraController::new(CameraRig::orbit());
        ctrl.apply_orbit_input(1.0, 0.5);
        let actor = Vec3::new(3.0, 1.0, 3.0);
        let mut cam = ctrl.initial_camera(actor);
        ctrl.sync_camera_from_actor(&mut cam, actor);
        let expected = (actor - cam.eye).normalize();
        assert!((ctrl.facing(&cam) - expected).length() < 1e-4);
        match ctrl.rig {
            CameraRig::Orbit { angle, .. } => assert!((angle - 1.5).abs() < 1e-6),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_arc_rotate_uses_its_rotation_speed() {
        let rig = CameraRig::ArcRotate {
            alpha: 0.0,
            beta: std::f32::consts::FRAC_PI_4,
            radius: 50.0,
            target: Vec3::ZERO,
            rotation_speed: 2.0,
        };
        let mut ctrl = CameraController::new(rig);
        ctrl.apply_orbit_input(-1.0, 0.25);
        match ctrl.rig {
            CameraRig::ArcRotate { alpha, .. } => {
                assert!((alpha - (std::f32::consts::TAU - 0.5)).abs() < 1e-5)
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_orbit_input_ignored_by_follow() {
        let mut ctrl = CameraController::new(CameraRig::chase());
        ctrl.apply_orbit_input(1.0, 1.0);
        assert_eq!(ctrl.rig, CameraRig::chase());
    }
}
