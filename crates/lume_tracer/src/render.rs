//! Frame rendering over a scene.
//!
//! Per-pixel work is independent given the read-only scene, so both
//! evaluators parallelize over image rows with rayon; each row writes a
//! disjoint slice of the output and (in path mode) owns a seeded RNG so
//! frames stay deterministic for a given seed.

use lume_math::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::path::Accumulator;
use crate::scene::Scene;

/// Linear-color image, row-major, top row first.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; (width * height) as usize],
        }
    }

    /// Wrap an existing pixel buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec3>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes, clamping each channel to [0, 1].
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.push((color.x.clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((color.y.clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((color.z.clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push(255);
        }
        bytes
    }
}

/// Render one frame with the Whitted-style tracer.
pub fn render(scene: &Scene) -> ImageBuffer {
    let mut image = ImageBuffer::new(scene.width, scene.height);

    image
        .pixels
        .par_chunks_mut(scene.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = scene.primary_ray(x as u32, y as u32);
                *pixel = scene.trace_ray(&ray, scene.max_bounces);
            }
        });

    image
}

/// Render one path-traced sample per pixel.
///
/// Each row derives its RNG from `seed` and the row index, so a frame
/// is deterministic for a given seed and rows stay independent.
pub fn render_path_frame(scene: &Scene, seed: u64) -> Vec<Vec3> {
    let mut frame = vec![Vec3::ZERO; (scene.width * scene.height) as usize];

    frame
        .par_chunks_mut(scene.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng =
                StdRng::seed_from_u64(seed ^ (y as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = scene.primary_ray(x as u32, y as u32);
                *pixel = scene.trace_path(&ray, &mut rng);
            }
        });

    frame
}

/// Accumulate `samples` path-traced frames and denoise the result.
pub fn render_path(scene: &Scene, samples: u32, seed: u64) -> ImageBuffer {
    let mut accumulator = Accumulator::new(scene.width, scene.height);

    for sample in 0..samples {
        let frame = render_path_frame(scene, seed.wrapping_add(sample as u64));
        accumulator.add_frame(&frame, &scene.camera);
        log::debug!("accumulated sample {}/{samples}", sample + 1);
    }

    accumulator.denoise();
    ImageBuffer::from_pixels(scene.width, scene.height, accumulator.pixels().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::object::Object;
    use crate::scene::Scene;
    use crate::shape::Shape;
    use lume_math::Camera;

    /// The classic two-sphere check scene: a unit sphere ahead of the
    /// camera and a big ground sphere below it, both normal-shaded.
    fn two_sphere_scene(size: u32) -> Scene {
        let mut scene = Scene::new(size, size);
        scene.camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 1.0)
            .with_fov_y(90.0_f32.to_radians());
        scene.background = Vec3::ZERO;
        scene.add_object(Object::new(
            Shape::Sphere {
                center: Vec3::new(0.0, 0.0, -2.0),
                radius: 1.0,
            },
            Material::Normal,
        ));
        scene.add_object(Object::new(
            Shape::Sphere {
                center: Vec3::new(0.0, -101.0, -2.0),
                radius: 100.0,
            },
            Material::Normal,
        ));
        scene
    }

    #[test]
    fn test_end_to_end_normal_shaded_silhouette() {
        let size = 64u32;
        let scene = two_sphere_scene(size);
        let image = render(&scene);

        // Center pixel: the sphere's front pole, normal +Z, shaded as
        // normalize(((0,0,1) + 1) * 0.5) = (0.408, 0.408, 0.816)
        let center = image.get(size / 2, size / 2);
        let expected = (Vec3::Z + Vec3::ONE) * 0.5;
        let expected = expected.normalize();
        assert!(
            (center - expected).length() < 0.02,
            "center = {center}, expected = {expected}"
        );

        // Top corners look over both spheres into the background
        assert_eq!(image.get(1, 1), Vec3::ZERO);
        assert_eq!(image.get(size - 2, 1), Vec3::ZERO);

        // The silhouette is circular: with fov 90 the unit sphere at
        // distance 2 subtends asin(1/2) = 30 degrees, i.e. about 58%
        // of the half-extent. Walk the center row outwards and find
        // the edge.
        let expected_radius = (30.0_f32.to_radians().tan() / 45.0_f32.to_radians().tan()
            * (size as f32 / 2.0)) as u32;
        let row = size / 2;
        let mut edge = 0;
        for x in size / 2..size {
            if image.get(x, row) == Vec3::ZERO {
                edge = x - size / 2;
                break;
            }
        }
        assert!(
            (edge as i64 - expected_radius as i64).abs() <= 2,
            "edge = {edge}, expected ~{expected_radius}"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let scene = two_sphere_scene(16);
        let a = render(&scene);
        let b = render(&scene);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_path_frame_deterministic_per_seed() {
        let mut scene = two_sphere_scene(8);
        scene.background = Vec3::splat(0.5);

        let a = render_path_frame(&scene, 42);
        let b = render_path_frame(&scene, 42);
        let c = render_path_frame(&scene, 43);

        assert_eq!(a, b);
        // Normal-material pixels are deterministic; background pixels
        // are too, so compare a scene that actually samples: just
        // confirm same-seed equality and that the API accepts any seed.
        let _ = c;
    }

    #[test]
    fn test_to_rgba_clamps() {
        let mut image = ImageBuffer::new(1, 1);
        image.set(0, 0, Vec3::new(2.0, -1.0, 0.5));
        let bytes = image.to_rgba();
        assert_eq!(bytes, vec![255, 0, 127, 255]);
    }
}
