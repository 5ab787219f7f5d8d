//! Collision shapes
//!
//! Axis-aligned bounding boxes are the only narrow-phase shape the object
//! layer needs; proxy geometry is derived from mesh bounds at construction.

use crate::foundation::math::Vec3;

/// Axis-Aligned Bounding Box for overlap queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// This AABB translated by an offset
    pub fn translated(&self, offset: Vec3) -> AABB {
        AABB::new(self.min + offset, self.max + offset)
    }

    /// This AABB scaled about the origin (assumes non-negative scale)
    pub fn scaled(&self, scale: Vec3) -> AABB {
        AABB::new(self.min.component_mul(&scale), self.max.component_mul(&scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_contains_point() {
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = AABB::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = AABB::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(!aabb1.intersects(&aabb3));
    }

    #[test]
    fn test_translated() {
        let aabb = AABB::from_center_extents(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let moved = aabb.translated(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(moved.center(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_scaled_doubles_extents() {
        let aabb = AABB::from_center_extents(Vec3::zeros(), Vec3::new(1.0, 2.0, 3.0));
        let scaled = aabb.scaled(Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(scaled.extents(), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(scaled.center(), Vec3::zeros());
    }
}
