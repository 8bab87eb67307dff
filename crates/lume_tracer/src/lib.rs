//! Lume Tracer - CPU ray tracing.
//!
//! Two evaluators over the same scene representation:
//!
//! - `Scene::trace_ray`: a Whitted-style recursive tracer with a hard
//!   bounce limit, point lights, and shadow rays
//! - `Scene::trace_path`: a Monte Carlo path tracer terminated purely
//!   by Russian roulette, with progressive sample accumulation and an
//!   a-trous wavelet denoise pass
//!
//! All intersection math runs in object space by transforming rays
//! with each object's accumulated inverse transform.

mod color;
mod denoise;
mod hit;
mod material;
mod object;
mod path;
mod render;
mod scene;
mod shape;
mod transform;

pub use color::{gamma_correct, gamma_restore};
pub use denoise::atrous_denoise;
pub use hit::HitRecord;
pub use material::Material;
pub use object::Object;
pub use path::{sample_hemisphere_cosine, Accumulator, SURVIVAL_PROBABILITY};
pub use render::{render, render_path, render_path_frame, ImageBuffer};
pub use scene::{Light, Scene};
pub use shape::Shape;
pub use transform::ObjectTransform;

/// Re-export common math types from lume_math
pub use lume_math::{Aabb, Camera, Interval, Mat3, Mat4, Ray, Vec3};

/// Self-intersection epsilon for secondary rays leaving a surface.
pub(crate) const RAY_EPS: f32 = 1e-3;

/// Epsilon for degenerate-geometry tests (parallel rays, zero dets).
pub(crate) const GEOM_EPS: f32 = 1e-6;
