//! Material shading models.
//!
//! Each material consumes a world-space `HitRecord` and the scene and
//! produces a radiance color. Reflective and refractive materials
//! re-enter the tracer with the record's decremented bounce budget;
//! the depth cutoff itself lives in `Scene::trace_ray`, not here.

use lume_math::Vec3;
use rand::RngCore;

use crate::color::{gamma_correct, gamma_restore};
use crate::hit::HitRecord;
use crate::path::{gen_f32, russian_roulette, sample_hemisphere_cosine};
use crate::scene::Scene;
use crate::GEOM_EPS;

/// The closed set of surface models.
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Visualize the surface normal as a color
    Normal,
    /// Constant radiance light source
    Emissive { radiance: Vec3 },
    /// Lambertian surface lit by shadow-tested point lights
    Diffuse { albedo: Vec3 },
    /// Blinn-Phong with an added mirror term
    BlinnPhong {
        ambient: Vec3,
        diffuse: Vec3,
        specular: Vec3,
        reflective: Vec3,
        shininess: f32,
    },
    /// Fresnel-weighted reflection + refraction
    Transparent { ior: f32 },
    /// Pure specular with Fresnel reflectance at normal incidence
    Metallic { f0: Vec3 },
}

impl Material {
    /// Shade a hit for the Whitted-style tracer.
    pub fn shade(&self, rec: &HitRecord, scene: &Scene) -> Vec3 {
        match self {
            Material::Normal => shade_normal(rec),
            Material::Emissive { radiance } => *radiance,
            Material::Diffuse { albedo } => shade_diffuse(*albedo, rec, scene),
            Material::BlinnPhong {
                ambient,
                diffuse,
                specular,
                reflective,
                shininess,
            } => shade_blinn_phong(*ambient, *diffuse, *specular, *reflective, *shininess, rec, scene),
            Material::Transparent { .. } => shade_transparent(rec, scene),
            Material::Metallic { f0 } => shade_metallic(*f0, rec, scene),
        }
    }

    /// Shade a hit for the path tracer.
    ///
    /// Termination is Russian roulette only; materials that keep the
    /// path alive divide by the survival probability to stay unbiased.
    pub fn shade_path(&self, rec: &HitRecord, scene: &Scene, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Material::Normal => shade_normal(rec),
            Material::Emissive { radiance } => *radiance,
            Material::Diffuse { albedo } => path_diffuse(*albedo, rec, scene, rng),
            // The Blinn-Phong model has no sampling strategy here; in
            // path mode it reads as background, as the reference does.
            Material::BlinnPhong { .. } => scene.background,
            Material::Transparent { .. } => path_transparent(rec, scene, rng),
            Material::Metallic { f0 } => path_metallic(*f0, rec, scene, rng),
        }
    }
}

/// Mirror reflection of the incident direction about the normal.
fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}

fn shade_normal(rec: &HitRecord) -> Vec3 {
    ((rec.normal + Vec3::ONE) * 0.5).normalize()
}

fn shade_diffuse(albedo: Vec3, rec: &HitRecord, scene: &Scene) -> Vec3 {
    let mut color = Vec3::ZERO;

    for light in &scene.lights {
        if scene.occluded(rec.point, light.position) {
            continue;
        }
        let to_light = light.position - rec.point;
        let r_sq = to_light.length_squared();
        let cos = to_light.normalize().dot(rec.normal.normalize()).abs();
        color += gamma_correct(albedo) * gamma_correct(light.color) * light.intensity * cos / r_sq;
    }

    gamma_restore(color)
}

#[allow(clippy::too_many_arguments)]
fn shade_blinn_phong(
    ambient: Vec3,
    diffuse: Vec3,
    specular: Vec3,
    reflective: Vec3,
    shininess: f32,
    rec: &HitRecord,
    scene: &Scene,
) -> Vec3 {
    let mut color = gamma_correct(ambient) * 0.05;

    let n = rec.normal;
    let v = (-rec.ray.direction).normalize();
    for light in &scene.lights {
        let l = (light.position - rec.point).normalize();
        let h = (v + l).normalize();
        let r_sq = (light.position - rec.point).length_squared();
        let irradiance = gamma_correct(light.color) * light.intensity / r_sq;

        color += gamma_correct(diffuse) * irradiance * n.dot(l).max(0.0)
            + gamma_correct(specular) * irradiance * n.dot(h).max(0.0).powf(shininess);
    }

    let reflected = crate::Ray::new(rec.point, reflect(rec.ray.direction, n));
    color += gamma_correct(reflective) * gamma_correct(scene.trace_ray(&reflected, rec.bounces_left));

    gamma_restore(color)
}

/// Snell refraction direction for unit incident `i` (pointing away from
/// the surface), normal `n`, and index ratio `eta1/eta2`.
fn refract_direction(i: Vec3, n: Vec3, eta_ratio: f32) -> Vec3 {
    let ndoti = n.dot(i);
    let k = (1.0 - eta_ratio * eta_ratio * (1.0 - ndoti * ndoti)).max(0.0);
    ((eta_ratio * ndoti - k.sqrt()) * n - eta_ratio * i).normalize()
}

/// Schlick reflectance with the asymmetric cosine choice
/// `max(cos_incident, cos_transmitted)`.
fn schlick_reflectance(eta: (f32, f32), cos_incident: f32, cos_transmitted: f32) -> f32 {
    let r0 = ((eta.0 - eta.1) / (eta.0 + eta.1)).powi(2);
    let cos_max = cos_incident.max(cos_transmitted);
    r0 + (1.0 - r0) * (1.0 - cos_max).powi(5)
}

/// Total internal reflection: exiting a denser medium past the
/// critical angle.
fn total_internal_reflection(eta: (f32, f32), i: Vec3, n: Vec3) -> bool {
    let (eta1, eta2) = eta;
    if eta2 >= eta1 {
        return false;
    }
    let critical = (eta2 / eta1).asin();
    i.dot(n).clamp(-1.0, 1.0).acos() > critical
}

fn shade_transparent(rec: &HitRecord, scene: &Scene) -> Vec3 {
    let n = rec.normal;
    let i = (-rec.ray.direction).normalize();
    let reflected = crate::Ray::new(rec.point, reflect(rec.ray.direction, n).normalize());

    if total_internal_reflection(rec.eta, i, n) {
        return scene.trace_ray(&reflected, rec.bounces_left);
    }

    let eta_ratio = rec.eta.0 / rec.eta.1;
    let refracted = crate::Ray::new(rec.point, refract_direction(i, n, eta_ratio));

    let r = schlick_reflectance(rec.eta, n.dot(i), refracted.direction.dot(-n));
    let reflect_color = gamma_correct(scene.trace_ray(&reflected, rec.bounces_left));
    let refract_color = gamma_correct(scene.trace_ray(&refracted, rec.bounces_left));

    gamma_restore(r * reflect_color + (1.0 - r) * refract_color)
}

fn shade_metallic(f0: Vec3, rec: &HitRecord, scene: &Scene) -> Vec3 {
    let n = rec.normal;
    let i = (-rec.ray.direction).normalize();
    let reflected = crate::Ray::new(rec.point, reflect(rec.ray.direction, n).normalize());

    let fresnel = f0 + (Vec3::ONE - f0) * (1.0 - n.dot(i)).powi(5);
    gamma_restore(fresnel * gamma_correct(scene.trace_ray(&reflected, rec.bounces_left)))
}

fn path_diffuse(albedo: Vec3, rec: &HitRecord, scene: &Scene, rng: &mut dyn RngCore) -> Vec3 {
    let n = rec.normal;

    // Orthonormal basis around the normal, built from its first
    // non-negligible component.
    let mut perp1 = Vec3::ZERO;
    for axis in 0..3 {
        if n[axis].abs() > GEOM_EPS {
            perp1[axis] = -n[(axis + 1) % 3];
            perp1[(axis + 1) % 3] = n[axis];
            break;
        }
    }
    let perp1 = perp1.normalize();
    let perp2 = n.cross(perp1);

    let sample = sample_hemisphere_cosine(rng);
    let bounce = crate::Ray::new(
        rec.point,
        perp2 * sample.x + perp1 * sample.y + n * sample.z,
    );

    gamma_restore(gamma_correct(albedo) * gamma_correct(russian_roulette(scene, &bounce, rng)))
}

fn path_transparent(rec: &HitRecord, scene: &Scene, rng: &mut dyn RngCore) -> Vec3 {
    let n = rec.normal;
    let i = (-rec.ray.direction).normalize();
    let reflected = crate::Ray::new(rec.point, reflect(rec.ray.direction, n).normalize());

    if total_internal_reflection(rec.eta, i, n) {
        return russian_roulette(scene, &reflected, rng);
    }

    let eta_ratio = rec.eta.0 / rec.eta.1;
    let refracted = crate::Ray::new(rec.point, refract_direction(i, n, eta_ratio));
    let r = schlick_reflectance(rec.eta, n.dot(i), refracted.direction.dot(-n));

    // One stochastic branch per path instead of tracing both sides.
    let ray = if gen_f32(rng) < r { reflected } else { refracted };
    gamma_restore(gamma_correct(russian_roulette(scene, &ray, rng)))
}

fn path_metallic(f0: Vec3, rec: &HitRecord, scene: &Scene, rng: &mut dyn RngCore) -> Vec3 {
    let n = rec.normal;
    let i = (-rec.ray.direction).normalize();
    let reflected = crate::Ray::new(rec.point, reflect(rec.ray.direction, n).normalize());

    let fresnel = f0 + (Vec3::ONE - f0) * (1.0 - n.dot(i)).powi(5);
    gamma_restore(fresnel * gamma_correct(russian_roulette(scene, &reflected, rng)))
}
