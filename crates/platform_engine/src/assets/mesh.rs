//! Triangle mesh resource
//!
//! A mesh is immutable once built; physics proxies derive their collision
//! geometry from it at construction time and never mutate it afterwards.

use super::AssetError;
use crate::foundation::math::Vec3;
use crate::physics::shapes::AABB;

/// An immutable triangle mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Build a mesh from vertex positions and triangle indices
    ///
    /// Validates that the mesh is non-empty, the index count is a multiple
    /// of three, and every index references an existing vertex.
    pub fn new(name: &str, positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, AssetError> {
        if positions.is_empty() || indices.len() < 3 {
            return Err(AssetError::EmptyMesh(name.to_string()));
        }
        if indices.len() % 3 != 0 {
            return Err(AssetError::EmptyMesh(name.to_string()));
        }
        for &index in &indices {
            if index as usize >= positions.len() {
                return Err(AssetError::IndexOutOfRange {
                    name: name.to_string(),
                    index,
                    vertex_count: positions.len(),
                });
            }
        }
        Ok(Self { positions, indices })
    }

    /// Axis-aligned box mesh centered at the origin
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let positions = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 2, 3, 0, // back
            4, 6, 5, 6, 4, 7, // front
            0, 3, 7, 7, 4, 0, // left
            1, 5, 6, 6, 2, 1, // right
            3, 2, 6, 6, 7, 3, // top
            0, 4, 5, 5, 1, 0, // bottom
        ];
        Self { positions, indices }
    }

    /// Flat quad mesh in the XZ plane, centered at the origin
    pub fn quad(half_x: f32, half_z: f32) -> Self {
        let positions = vec![
            Vec3::new(-half_x, 0.0, -half_z),
            Vec3::new(half_x, 0.0, -half_z),
            Vec3::new(half_x, 0.0, half_z),
            Vec3::new(-half_x, 0.0, half_z),
        ];
        let indices = vec![0, 2, 1, 2, 0, 3];
        Self { positions, indices }
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The mesh's bounding box in local space
    pub fn local_bounds(&self) -> AABB {
        let mut min = self.positions[0];
        let mut max = self.positions[0];
        for p in &self.positions[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        AABB::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_bounds() {
        let mesh = Mesh::cuboid(Vec3::new(1.0, 2.0, 3.0));
        let bounds = mesh.local_bounds();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let positions = vec![Vec3::zeros(), Vec3::x(), Vec3::y()];
        let result = Mesh::new("bad", positions, vec![0, 1, 9]);
        assert!(matches!(result, Err(AssetError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        assert!(matches!(
            Mesh::new("empty", Vec::new(), Vec::new()),
            Err(AssetError::EmptyMesh(_))
        ));
    }
}
