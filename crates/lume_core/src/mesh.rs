//! Mesh geometry representation.
//!
//! A renderer-agnostic mesh that can be fed to the ray tracer as a
//! triangle soup or unpacked into the rasterizer's vertex buffers.

use lume_math::{Aabb, Vec3};

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - computed on demand)
    pub normals: Option<Vec<Vec3>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box of the positions
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    ///
    /// Normals are NOT computed automatically; call `ensure_normals()`
    /// if a consumer needs them.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        let mut bounds = Aabb::empty();
        for pos in positions {
            bounds.grow(*pos);
        }
        bounds
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Each vertex normal is the normalized, area-weighted average of
    /// the face normals of all faces sharing that vertex. Triangles use
    /// CCW winding (the OBJ convention).
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks(3) {
            if face.len() < 3 {
                continue;
            }

            let i0 = face[0] as usize;
            let i1 = face[1] as usize;
            let i2 = face[2] as usize;

            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let edge1 = self.positions[i1] - self.positions[i0];
            let edge2 = self.positions[i2] - self.positions[i0];
            // Cross product length is proportional to face area, so
            // accumulating unnormalized face normals area-weights them.
            let face_normal = edge1.cross(edge2);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            let len = normal.length();
            if len > 0.0 {
                *normal /= len;
            } else {
                *normal = Vec3::Y; // Default up normal for degenerate cases
            }
        }

        self.normals = Some(normals);
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Ensure the mesh has one normal per vertex, computing them if
    /// missing or if the existing array doesn't match the vertex count.
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            if let Some(normals) = &self.normals {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the mesh size (diagonal length of bounding box).
    pub fn size(&self) -> f32 {
        (self.bounds.max - self.bounds.min).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
            None,
        )
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = unit_triangle();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_compute_normals() {
        let mut mesh = unit_triangle();
        mesh.compute_normals();

        // CCW triangle in the XY plane faces +Z
        let normals = mesh.normals.as_ref().unwrap();
        for normal in normals {
            assert!((normal.z - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ensure_normals_recomputes_mismatched() {
        let mut mesh = unit_triangle();
        mesh.normals = Some(vec![Vec3::Z]); // wrong length
        mesh.ensure_normals();

        assert_eq!(mesh.normals.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_bounds_computation() {
        let mesh = Mesh::new(
            vec![
                Vec3::new(-1.0, -2.0, -3.0),
                Vec3::new(4.0, 5.0, 6.0),
                Vec3::ZERO,
            ],
            vec![0, 1, 2],
            None,
        );

        assert_eq!(mesh.bounds.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds.max, Vec3::new(4.0, 5.0, 6.0));
    }
}
