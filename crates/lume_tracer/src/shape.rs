//! Ray/primitive intersection routines.
//!
//! All tests here run in object space; the owning `Object` transforms
//! the ray in and the results back out. Degenerate configurations
//! (parallel rays, zero-area triangles) resolve to "no hit", never a
//! panic.

use std::sync::Arc;

use lume_core::Mesh;
use lume_math::{Aabb, Interval, Ray, Vec3};

use crate::{GEOM_EPS, RAY_EPS};

/// A hit in object space, before mapping back to world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ShapeHit {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
    /// True when the ray origin started inside the shape's volume
    pub inside: bool,
}

/// The closed set of ray-traceable primitives.
pub enum Shape {
    Sphere { center: Vec3, radius: f32 },
    Plane { point: Vec3, normal: Vec3 },
    Box(Aabb),
    Triangle { a: Vec3, b: Vec3, c: Vec3 },
    Mesh(Arc<Mesh>),
}

impl Shape {
    /// Nearest intersection within the window, in object space.
    pub(crate) fn hit(&self, ray: &Ray, window: Interval) -> Option<ShapeHit> {
        match self {
            Shape::Sphere { center, radius } => hit_sphere(*center, *radius, ray, window),
            Shape::Plane { point, normal } => hit_plane(*point, *normal, ray, window),
            Shape::Box(aabb) => hit_box(aabb, ray, window),
            Shape::Triangle { a, b, c } => {
                hit_triangle(*a, *b, *c, ray, window).map(|(t, normal, _, _)| ShapeHit {
                    t,
                    point: ray.at(t),
                    normal,
                    inside: false,
                })
            }
            Shape::Mesh(mesh) => hit_mesh(mesh, ray, window),
        }
    }

    /// Object-space bounding box.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere { center, radius } => {
                Aabb::from_points(*center - Vec3::splat(*radius), *center + Vec3::splat(*radius))
            }
            // A plane is unbounded; give it a box big enough that the
            // pre-test never culls it.
            Shape::Plane { .. } => Aabb::from_points(Vec3::splat(-1e9), Vec3::splat(1e9)),
            Shape::Box(aabb) => *aabb,
            Shape::Triangle { a, b, c } => {
                let mut aabb = Aabb::from_points(*a, *b);
                aabb.grow(*c);
                aabb
            }
            Shape::Mesh(mesh) => mesh.bounds,
        }
    }
}

fn hit_sphere(center: Vec3, radius: f32, ray: &Ray, window: Interval) -> Option<ShapeHit> {
    let oc = center - ray.origin;
    let h = ray.direction.dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Near root first; the far root continues rays that started inside
    // the sphere (e.g. a refracted ray on its way out).
    let mut root = h - sqrtd;
    if !window.contains(root) {
        root = h + sqrtd;
        if !window.contains(root) {
            return None;
        }
    }

    let point = ray.at(root);
    Some(ShapeHit {
        t: root,
        point,
        normal: (point - center) / radius,
        inside: oc.length() <= radius + RAY_EPS,
    })
}

fn hit_plane(plane_point: Vec3, normal: Vec3, ray: &Ray, window: Interval) -> Option<ShapeHit> {
    let denom = normal.dot(ray.direction);
    if denom.abs() < GEOM_EPS {
        return None; // parallel
    }

    let t = (plane_point - ray.origin).dot(normal) / denom;
    if !window.contains(t) {
        return None;
    }

    Some(ShapeHit {
        t,
        point: ray.at(t),
        normal,
        inside: false,
    })
}

fn hit_box(aabb: &Aabb, ray: &Ray, window: Interval) -> Option<ShapeHit> {
    let (t_enter, t_exit) = aabb.slab_range(ray)?;

    // Entering hit preferred; the exit face serves rays cast from
    // inside the box.
    let t = if window.contains(t_enter) {
        t_enter
    } else if window.contains(t_exit) {
        t_exit
    } else {
        return None;
    };

    let point = ray.at(t);
    Some(ShapeHit {
        t,
        point,
        normal: box_face_normal(aabb, point),
        inside: aabb.contains_point(ray.origin, RAY_EPS),
    })
}

/// Face normal of the bounding plane nearest to the hit point.
fn box_face_normal(aabb: &Aabb, point: Vec3) -> Vec3 {
    let faces = [
        ((point.x - aabb.min.x).abs(), -Vec3::X),
        ((point.x - aabb.max.x).abs(), Vec3::X),
        ((point.y - aabb.min.y).abs(), -Vec3::Y),
        ((point.y - aabb.max.y).abs(), Vec3::Y),
        ((point.z - aabb.min.z).abs(), -Vec3::Z),
        ((point.z - aabb.max.z).abs(), Vec3::Z),
    ];

    let mut best = faces[0];
    for face in &faces[1..] {
        if face.0 < best.0 {
            best = *face;
        }
    }
    best.1
}

/// Moller-Trumbore. Returns (t, unit face normal, u, v) with u, v the
/// barycentric weights of vertices b and c.
fn hit_triangle(
    a: Vec3,
    b: Vec3,
    c: Vec3,
    ray: &Ray,
    window: Interval,
) -> Option<(f32, Vec3, f32, f32)> {
    let e1 = b - a;
    let e2 = c - a;

    let pvec = ray.direction.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() < GEOM_EPS {
        return None; // parallel or degenerate
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(e1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(qvec) * inv_det;
    if !window.contains(t) {
        return None;
    }

    Some((t, e1.cross(e2).normalize(), u, v))
}

fn hit_mesh(mesh: &Mesh, ray: &Ray, window: Interval) -> Option<ShapeHit> {
    // Whole-mesh rejection before the linear triangle scan.
    if !mesh.bounds.hit(ray, window) {
        return None;
    }

    let mut closest = window.max;
    let mut found = None;

    for face in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
        if i0 >= mesh.positions.len() || i1 >= mesh.positions.len() || i2 >= mesh.positions.len() {
            continue;
        }
        let (a, b, c) = (mesh.positions[i0], mesh.positions[i1], mesh.positions[i2]);

        if let Some((t, face_normal, u, v)) =
            hit_triangle(a, b, c, ray, Interval::new(window.min, closest))
        {
            let normal = match &mesh.normals {
                Some(normals) => {
                    ((1.0 - u - v) * normals[i0] + u * normals[i1] + v * normals[i2])
                        .normalize_or(face_normal)
                }
                None => face_normal,
            };
            closest = t;
            found = Some(ShapeHit {
                t,
                point: ray.at(t),
                normal,
                inside: false,
            });
        }
    }

    found
}
