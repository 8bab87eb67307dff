//! A traceable scene object: shape + material + accumulated transform.

use lume_math::{Aabb, Interval, Mat4, Ray};

use crate::hit::HitRecord;
use crate::material::Material;
use crate::shape::Shape;
use crate::transform::ObjectTransform;
use crate::RAY_EPS;

/// A shape placed in the world with a material.
pub struct Object {
    pub shape: Shape,
    pub material: Material,
    transform: ObjectTransform,
}

impl Object {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self {
            shape,
            material,
            transform: ObjectTransform::identity(),
        }
    }

    /// Compose an affine transform onto the object.
    pub fn apply_transform(&mut self, m: Mat4) {
        self.transform.apply(m);
    }

    /// Builder form of [`apply_transform`](Self::apply_transform).
    pub fn with_transform(mut self, m: Mat4) -> Self {
        self.apply_transform(m);
        self
    }

    /// Intersect a world-space ray against this object.
    ///
    /// The ray is moved to object space, the shape test runs there, and
    /// the result is mapped back; `t` in the record is the world-space
    /// distance and is checked against `window` so the caller's
    /// shrinking-interval search stays exact under scaling transforms.
    pub fn hit(&self, ray: &Ray, window: Interval, bounces_left: u32) -> Option<HitRecord> {
        let os_ray = self.transform.ray_to_object(ray);
        let shape_hit = self
            .shape
            .hit(&os_ray, Interval::new(RAY_EPS, f32::INFINITY))?;

        let point = self.transform.point_to_world(shape_hit.point);
        let t = (point - ray.origin).length();
        if !window.contains(t) {
            return None;
        }

        let mut normal = self.transform.normal_to_world(shape_hit.normal);
        let mut eta = (1.0, 1.0);
        if let Material::Transparent { ior } = self.material {
            if shape_hit.inside {
                // Leaving the medium: flip the normal against the ray
                // and swap the indices.
                eta = (ior, 1.0);
                normal = -normal;
            } else {
                eta = (1.0, ior);
            }
        }

        Some(HitRecord {
            ray: *ray,
            point,
            normal,
            t,
            bounces_left,
            eta,
        })
    }

    /// World-space bounding box (object-space box, corners transformed).
    pub fn bounding_box(&self) -> Aabb {
        let local = self.shape.bounding_box();
        let mut world = Aabb::empty();
        for corner in local.corners() {
            world.grow(self.transform.point_to_world(corner));
        }
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_math::Vec3;

    fn hit_window() -> Interval {
        Interval::new(RAY_EPS, f32::INFINITY)
    }

    #[test]
    fn test_translated_sphere() {
        let mut object = Object::new(
            Shape::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
            Material::Normal,
        );
        object.apply_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let rec = object.hit(&ray, hit_window(), 0).unwrap();

        assert!((rec.t - 4.0).abs() < 1e-3);
        assert!((rec.point - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-3);
        assert!((rec.normal - Vec3::Z).length() < 1e-3);
        assert_eq!(rec.eta, (1.0, 1.0));
    }

    #[test]
    fn test_scaled_sphere_world_t() {
        // A unit sphere scaled by 2: the world-space entry distance
        // must reflect the scaled surface, not the object-space t.
        let object = Object::new(
            Shape::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
            Material::Normal,
        )
        .with_transform(Mat4::from_scale(Vec3::splat(2.0)));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let rec = object.hit(&ray, hit_window(), 0).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-3, "t = {}", rec.t);
    }

    #[test]
    fn test_transparent_inside_flips_normal_and_eta() {
        let object = Object::new(
            Shape::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
            Material::Transparent { ior: 1.5 },
        );

        // From outside
        let rec = object
            .hit(&Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z), hit_window(), 0)
            .unwrap();
        assert_eq!(rec.eta, (1.0, 1.5));
        assert!(rec.normal.z > 0.0);

        // From the center, exiting
        let rec = object
            .hit(&Ray::new(Vec3::ZERO, -Vec3::Z), hit_window(), 0)
            .unwrap();
        assert_eq!(rec.eta, (1.5, 1.0));
        // Normal flipped back against the ray
        assert!(rec.normal.z > 0.0);
    }

    #[test]
    fn test_window_rejects_far_hit() {
        let object = Object::new(
            Shape::Sphere {
                center: Vec3::new(0.0, 0.0, -5.0),
                radius: 1.0,
            },
            Material::Normal,
        );
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(object.hit(&ray, Interval::new(RAY_EPS, 2.0), 0).is_none());
    }

    #[test]
    fn test_world_bounding_box() {
        let object = Object::new(
            Shape::Box(Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))),
            Material::Normal,
        )
        .with_transform(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));

        let bbox = object.bounding_box();
        assert!((bbox.min - Vec3::new(9.0, -1.0, -1.0)).length() < 1e-4);
        assert!((bbox.max - Vec3::new(11.0, 1.0, 1.0)).length() < 1e-4);
    }
}
