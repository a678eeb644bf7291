use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::utils::Aabb;

/// The player-controlled box: position, velocity and ground contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    /// Half size of the actor's bounding box (a unit cube by default)
    pub half_extents: Vec3,
}

impl Actor {
    pub const DEFAULT_HALF_EXTENTS: Vec3 = Vec3::splat(0.5);

    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            grounded: false,
            half_extents: Self::DEFAULT_HALF_EXTENTS,
        }
    }

    pub fn with_half_extents(mut self, half_extents: Vec3) -> Self {
        self.half_extents = half_extents;
        self
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.half_extents.y
    }

    /// Bounds the actor would occupy if centred at `position`
    pub fn bounds_at(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(position, self.half_extents)
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    /// Teleport to `spawn` with all motion cleared
    pub fn reset_to(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.velocity = Vec3::ZERO;
        self.grounded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_actor_is_airborne_and_still() {
        let actor = Actor::new(Vec3::new(0.0, 5.0, 0.0));
        assert!(!actor.grounded);
        assert_eq!(actor.velocity, Vec3::ZERO);
        assert_eq!(actor.bottom(), 4.5);
    }

    #[test]
    fn test_reset_clears_motion() {
        let mut actor = Actor::new(Vec3::ZERO);
        actor.velocity = Vec3::new(3.0, -40.0, 1.0);
        actor.grounded = true;
        actor.reset_to(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(actor.position, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(actor.velocity, Vec3::ZERO);
        assert!(!actor.grounded);
    }
}
