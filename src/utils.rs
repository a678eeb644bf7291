use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Strict overlap on the X and Z axes only (touching edges do not count)
    pub fn overlaps_xz(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Integer hash mapped to [0, 1). Stable across platforms, used for scatter.
pub fn hash01(x: i32, z: i32) -> f32 {
    let mut n = x.wrapping_mul(374761393).wrapping_add(z.wrapping_mul(668265263));
    n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    // top 24 bits so the f32 division can never round up to 1.0
    (((n ^ (n >> 16)) as u32) >> 8) as f32 / 16777216.0
}

/// Map a [0, 1) sample into [lo, hi)
pub fn lerp_range(t: f32, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let touching = Aabb::from_center_half_extents(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
        let inside = Aabb::from_center_half_extents(Vec3::new(0.9, 3.0, 0.2), Vec3::splat(0.5));
        assert!(!a.overlaps_xz(&touching));
        // Y is ignored
        assert!(a.overlaps_xz(&inside));
    }

    #[test]
    fn test_hash_is_deterministic_and_in_range() {
        for i in -50..50 {
            let h = hash01(i, i * 7);
            assert!((0.0..1.0).contains(&h));
            assert_eq!(h, hash01(i, i * 7));
        }
        assert_ne!(hash01(1, 2), hash01(2, 1));
    }

    #[test]
    fn test_union_covers_both() {
        let a = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_half_extents(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE);
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(u.max, Vec3::new(6.0, 1.0, 1.0));
    }
}
