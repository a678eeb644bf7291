use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::utils::Aabb;

/// Shape tag of a collider. Contact tests use box bounds for every shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderShape {
    #[default]
    Box,
    Sphere,
}

/// Static obstacle the actor can land on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub name: String,
    pub center: Vec3,
    pub half_extents: Vec3,
    #[serde(default)]
    pub shape: ColliderShape,
}

impl Collider {
    /// Box of full size `size` centred at `center`
    pub fn cuboid(name: impl Into<String>, center: Vec3, size: Vec3) -> Self {
        Self {
            name: name.into(),
            center,
            half_extents: size * 0.5,
            shape: ColliderShape::Box,
        }
    }

    pub fn sphere(name: impl Into<String>, center: Vec3, diameter: f32) -> Self {
        Self {
            name: name.into(),
            center,
            half_extents: Vec3::splat(diameter * 0.5),
            shape: ColliderShape::Sphere,
        }
    }

    /// Flat ground plane with no thickness: its top is `center.y`
    pub fn ground(name: impl Into<String>, center: Vec3, width: f32, depth: f32) -> Self {
        Self::cuboid(name, center, Vec3::new(width, 0.0, depth))
    }

    /// Height of the upper face
    pub fn top(&self) -> f32 {
        self.center.y + self.half_extents.y
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.half_extents.is_finite()
            && self.half_extents.cmpge(Vec3::ZERO).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_top() {
        let p = Collider::cuboid("platform1", Vec3::new(20.0, 2.0, -15.0), Vec3::new(4.0, 0.5, 4.0));
        assert_eq!(p.top(), 2.25);
        assert_eq!(p.bounds().min.x, 18.0);
        assert_eq!(p.bounds().max.z, -13.0);
    }

    #[test]
    fn test_sphere_uses_box_bounds() {
        let rock = Collider::sphere("rock0", Vec3::new(1.0, 1.5, 1.0), 2.0);
        assert_eq!(rock.shape, ColliderShape::Sphere);
        assert_eq!(rock.top(), 2.5);
        assert_eq!(rock.bounds().min, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_negative_extent_is_invalid() {
        let mut c = Collider::ground("ground", Vec3::ZERO, 10.0, 10.0);
        assert!(c.is_valid());
        c.half_extents.x = -1.0;
        assert!(!c.is_valid());
        c.half_extents.x = f32::NAN;
        assert!(!c.is_valid());
    }
}
