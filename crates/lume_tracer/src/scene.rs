//! Scene: camera, objects, lights, and the two tracing evaluators.

use lume_math::{Camera, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hit::HitRecord;
use crate::object::Object;
use crate::RAY_EPS;

/// A point light source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Light {
    pub fn new(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }
}

/// A renderable scene.
///
/// Constructed once with a fixed object and light set; the lists are
/// read-only for the duration of a render call. External mutation (e.g.
/// moving an object) must happen strictly between frames.
pub struct Scene {
    pub camera: Camera,
    pub objects: Vec<Object>,
    pub lights: Vec<Light>,
    /// Hard recursion limit for `trace_ray`
    pub max_bounces: u32,
    pub width: u32,
    pub height: u32,
    /// Radiance returned by rays that escape the scene
    pub background: Vec3,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        let aspect = width as f32 / height as f32;
        Self {
            camera: Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), aspect),
            objects: Vec::new(),
            lights: Vec::new(),
            max_bounces: 6,
            width,
            height,
            background: Vec3::ZERO,
        }
    }

    /// Add an object; returns its index in the scene.
    pub fn add_object(&mut self, object: Object) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Primary ray through the center of pixel (px, py).
    pub fn primary_ray(&self, px: u32, py: u32) -> Ray {
        self.camera.primary_ray(px, py, self.width, self.height)
    }

    /// Nearest hit over all objects: a linear scan with a shrinking
    /// window, so later objects are pruned against the closest t found
    /// so far.
    fn nearest_hit(&self, ray: &Ray, bounces_left: u32) -> Option<(&Object, HitRecord)> {
        let mut closest = f32::INFINITY;
        let mut found = None;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(RAY_EPS, closest), bounces_left) {
                closest = rec.t;
                found = Some((object, rec));
            }
        }

        found
    }

    /// Whitted-style recursive tracer with a hard depth limit.
    ///
    /// With `bounces == 0` the background is returned immediately,
    /// before any object is tested.
    pub fn trace_ray(&self, ray: &Ray, bounces: u32) -> Vec3 {
        if bounces == 0 {
            return self.background;
        }
        match self.nearest_hit(ray, bounces - 1) {
            Some((object, rec)) => object.material.shade(&rec, self),
            None => self.background,
        }
    }

    /// Path-tracing evaluator: no depth cutoff, termination is the
    /// materials' Russian roulette.
    pub fn trace_path(&self, ray: &Ray, rng: &mut dyn RngCore) -> Vec3 {
        match self.nearest_hit(ray, 0) {
            Some((object, rec)) => object.material.shade_path(&rec, self, rng),
            None => self.background,
        }
    }

    /// Shadow query: is the segment from `point` to `light_pos` blocked
    /// by any object? Any hit fully occludes the light.
    pub(crate) fn occluded(&self, point: Vec3, light_pos: Vec3) -> bool {
        let to_light = light_pos - point;
        let distance = to_light.length();
        let ray = Ray::new(point, to_light / distance);
        let window = Interval::new(RAY_EPS, distance);

        self.objects
            .iter()
            .any(|object| object.hit(&ray, window, 0).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::shape::Shape;

    fn sphere(center: Vec3, radius: f32, material: Material) -> Object {
        Object::new(Shape::Sphere { center, radius }, material)
    }

    #[test]
    fn test_zero_bounces_returns_background_without_testing_objects() {
        let mut scene = Scene::new(16, 16);
        scene.background = Vec3::new(0.2, 0.0, 0.0);
        scene.add_object(sphere(Vec3::new(0.0, 0.0, -2.0), 1.0, Material::Normal));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(scene.trace_ray(&ray, 0), scene.background);
        // The sphere is right there; with a budget it shades
        assert_ne!(scene.trace_ray(&ray, 1), scene.background);
    }

    #[test]
    fn test_nearest_hit_prefers_closer_object() {
        let mut scene = Scene::new(16, 16);
        scene.add_object(sphere(
            Vec3::new(0.0, 0.0, -10.0),
            1.0,
            Material::Emissive {
                radiance: Vec3::X, // red, far
            },
        ));
        scene.add_object(sphere(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Material::Emissive {
                radiance: Vec3::Y, // green, near
            },
        ));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert_eq!(scene.trace_ray(&ray, 1), Vec3::Y);
    }

    #[test]
    fn test_diffuse_shadowing() {
        let mut scene = Scene::new(16, 16);
        // Light above and in front of the surface point at (0, 0, -1)
        scene.add_light(Light::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE, 20.0));
        scene.add_object(sphere(
            Vec3::new(0.0, 0.0, -2.0),
            1.0,
            Material::Diffuse {
                albedo: Vec3::splat(0.8),
            },
        ));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        let lit = scene.trace_ray(&ray, 2);
        assert!(lit.length() > 0.0);

        // Drop an occluder onto the shadow-ray segment
        scene.add_object(sphere(Vec3::new(0.0, 2.5, -0.5), 1.0, Material::Normal));
        let shadowed = scene.trace_ray(&ray, 2);
        assert_eq!(shadowed, Vec3::ZERO);
    }

    #[test]
    fn test_transparent_tir_is_pure_reflection() {
        // The hit record is constructed directly: glass-to-air interface
        // at 60 degrees incidence, beyond the ~41.8 degree critical
        // angle, so only the reflected ray may contribute.
        let mut scene = Scene::new(16, 16);
        scene.background = Vec3::ZERO;
        // Reflection target: emissive sphere along the mirrored path
        let incident = Vec3::new(0.866, -0.5, 0.0); // 60 deg off the +Y normal
        let reflected_dir = incident - 2.0 * incident.dot(Vec3::Y) * Vec3::Y;
        scene.add_object(sphere(
            reflected_dir * 5.0,
            0.5,
            Material::Emissive {
                radiance: Vec3::new(0.0, 1.0, 0.0),
            },
        ));
        // Refraction would continue below the surface; plant a red
        // emitter there to catch any illegal refracted contribution.
        scene.add_object(sphere(
            Vec3::new(0.866, -0.5, 0.0) * 5.0,
            0.5,
            Material::Emissive {
                radiance: Vec3::new(1.0, 0.0, 0.0),
            },
        ));

        let rec = crate::HitRecord {
            ray: Ray::new(-incident * 2.0, incident),
            point: Vec3::ZERO,
            normal: Vec3::Y,
            t: 2.0,
            bounces_left: 3,
            eta: (1.5, 1.0), // exiting glass
        };

        let material = Material::Transparent { ior: 1.5 };
        let color = material.shade(&rec, &scene);

        assert!(color.y > 0.5, "reflection must contribute: {color}");
        assert_eq!(color.x, 0.0, "no refracted contribution under TIR");
    }
}
