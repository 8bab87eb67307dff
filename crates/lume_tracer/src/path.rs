//! Path-tracing support: sampling, Russian roulette, and the
//! progressive per-pixel sample accumulator.

use lume_math::{Camera, Ray, Vec3};
use rand::RngCore;

use crate::denoise::atrous_denoise;
use crate::scene::Scene;

/// Russian-roulette survival probability.
pub const SURVIVAL_PROBABILITY: f32 = 0.9;

/// Uniform f32 in [0, 1) from the top 24 bits of the generator.
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1 << 24) as f32)
}

/// Cosine-weighted hemisphere sample around +Z.
///
/// phi = 2*pi*v, z = sqrt(u): the density is proportional to cos(theta),
/// which cancels the cosine term of the rendering equation for
/// Lambertian bounces.
pub fn sample_hemisphere_cosine(rng: &mut dyn RngCore) -> Vec3 {
    let u = gen_f32(rng);
    let v = gen_f32(rng);

    let phi = 2.0 * std::f32::consts::PI * v;
    let z = u.sqrt();
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), z)
}

/// Continue a path with probability [`SURVIVAL_PROBABILITY`].
///
/// Survivors are divided by the probability so the estimator stays
/// unbiased; terminated paths return the background.
pub(crate) fn russian_roulette(scene: &Scene, ray: &Ray, rng: &mut dyn RngCore) -> Vec3 {
    if gen_f32(rng) <= SURVIVAL_PROBABILITY {
        scene.trace_path(ray, rng) / SURVIVAL_PROBABILITY
    } else {
        scene.background
    }
}

/// Persistent per-pixel sample buffer for progressive refinement.
///
/// Frames of one sample per pixel are folded in with a running mean;
/// any camera movement invalidates the buffer and restarts accumulation
/// from sample zero.
pub struct Accumulator {
    width: u32,
    height: u32,
    samples: Vec<Vec3>,
    count: u32,
    camera: Option<Camera>,
}

impl Accumulator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: vec![Vec3::ZERO; (width * height) as usize],
            count: 0,
            camera: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples folded into every pixel so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn pixels(&self) -> &[Vec3] {
        &self.samples
    }

    /// Zero the buffer and restart from sample zero.
    pub fn reset(&mut self) {
        self.samples.fill(Vec3::ZERO);
        self.count = 0;
        self.camera = None;
    }

    /// Fold one frame (one sample per pixel) into the running mean.
    ///
    /// If `camera` differs from the camera that produced the buffered
    /// samples the accumulation is reset first.
    pub fn add_frame(&mut self, frame: &[Vec3], camera: &Camera) {
        assert_eq!(frame.len(), self.samples.len());

        if self.camera.map_or(false, |prev| prev != *camera) {
            log::debug!("camera moved, restarting accumulation");
            self.reset();
        }
        self.camera = Some(*camera);

        let n = self.count as f32;
        for (avg, sample) in self.samples.iter_mut().zip(frame) {
            *avg = (*avg * n + *sample) / (n + 1.0);
        }
        self.count += 1;
    }

    /// One-time a-trous denoise pass over the accumulated buffer.
    pub fn denoise(&mut self) {
        atrous_denoise(&mut self.samples, self.width, self.height);
    }
}
