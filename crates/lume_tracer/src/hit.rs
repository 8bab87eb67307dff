//! The result payload of a successful ray-object intersection.

use lume_math::{Ray, Vec3};

/// Record of a ray-object intersection, entirely in world space.
#[derive(Clone, Debug)]
pub struct HitRecord {
    /// The incident ray
    pub ray: Ray,
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at the intersection; flipped against the ray for
    /// transparent objects entered from the inside
    pub normal: Vec3,
    /// World-space distance from the ray origin to the hit point
    pub t: f32,
    /// Remaining bounce budget for recursive materials
    pub bounces_left: u32,
    /// Refractive indices straddling the surface: (incident medium,
    /// transmitted medium). (1, 1) for opaque materials.
    pub eta: (f32, f32),
}
