//! Object-space / world-space transform handling.
//!
//! Each object stores the accumulated inverse of its transform (plus
//! the inverse 3x3 for normals): intersection math runs in object
//! space on the inverse-transformed ray, and hit results are mapped
//! back to world space.

use lume_math::{Mat3, Mat4, Ray, Vec3};

/// An object's accumulated transform, kept as forward and inverse
/// matrices plus the inverse normal matrix.
#[derive(Clone, Copy, Debug)]
pub struct ObjectTransform {
    forward: Mat4,
    inv: Mat4,
    inv_normal: Mat3,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ObjectTransform {
    pub fn identity() -> Self {
        Self {
            forward: Mat4::IDENTITY,
            inv: Mat4::IDENTITY,
            inv_normal: Mat3::IDENTITY,
        }
    }

    /// Compose a new transform onto the object.
    ///
    /// Accumulates `inv = M^-1 * inv_old`, so repeated calls compose in
    /// object space. The matrix must be invertible; a singular matrix
    /// is a caller bug, not a renderable state.
    pub fn apply(&mut self, m: Mat4) {
        debug_assert!(
            m.determinant().abs() > f32::EPSILON,
            "object transform must be invertible"
        );
        self.forward *= m;
        self.inv = m.inverse() * self.inv;
        self.inv_normal = Mat3::from_mat4(m).inverse() * self.inv_normal;
    }

    pub fn is_identity(&self) -> bool {
        self.inv == Mat4::IDENTITY
    }

    /// World-space ray to object space; the direction is normalized so
    /// object-space t stays a distance.
    pub fn ray_to_object(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.inv.project_point3(ray.origin),
            self.inv.transform_vector3(ray.direction).normalize(),
        )
    }

    pub fn point_to_world(&self, p: Vec3) -> Vec3 {
        self.forward.project_point3(p)
    }

    pub fn point_to_object(&self, p: Vec3) -> Vec3 {
        self.inv.project_point3(p)
    }

    /// Object-space normal to a unit world-space normal.
    pub fn normal_to_world(&self, n: Vec3) -> Vec3 {
        (self.inv_normal.transpose() * n).normalize()
    }
}
