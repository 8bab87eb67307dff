use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box stored as min/max corners.
///
/// Doubles as the box primitive for the ray tracer and as the
/// rejection volume for mesh intersection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two corner points (any opposite pair).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an empty AABB (contains nothing).
    pub fn empty() -> Self {
        Self::EMPTY
    }

    /// The smallest AABB containing both inputs.
    pub fn union(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Grow to include a point.
    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Test whether a point lies inside the box, expanded by `pad`.
    pub fn contains_point(&self, p: Vec3, pad: f32) -> bool {
        p.x >= self.min.x - pad
            && p.x <= self.max.x + pad
            && p.y >= self.min.y - pad
            && p.y <= self.max.y + pad
            && p.z >= self.min.z - pad
            && p.z <= self.max.z + pad
    }

    /// Slab-method ray/box overlap test within the given t interval.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (self.min[axis] - r.origin[axis]) * adinv;
            let mut t1 = (self.max[axis] - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Entry/exit parameters of the slab intersection, or None.
    ///
    /// Returns (t_enter, t_exit) with t_enter <= t_exit; the caller
    /// decides which root is usable. Rays parallel to a slab produce
    /// infinite per-axis intervals and fall out of the min/max folds.
    pub fn slab_range(&self, r: &Ray) -> Option<(f32, f32)> {
        let inv = Vec3::new(
            1.0 / r.direction.x,
            1.0 / r.direction.y,
            1.0 / r.direction.z,
        );
        let t0 = (self.min - r.origin) * inv;
        let t1 = (self.max - r.origin) * inv;
        let tmin = t0.min(t1);
        let tmax = t0.max(t1);

        let t_enter = tmin.x.max(tmin.y).max(tmin.z);
        let t_exit = tmax.x.min(tmax.y).min(tmax.z);

        if t_exit < 0.0 || t_enter > t_exit {
            None
        } else {
            Some((t_enter, t_exit))
        }
    }

    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(5.0, -1.0, 2.0), Vec3::new(-3.0, 4.0, 0.0));

        assert_eq!(aabb.min, Vec3::new(-3.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(5.0, 4.0, 2.0));
    }

    #[test]
    fn test_union() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let b = Aabb::from_points(Vec3::splat(3.0), Vec3::splat(10.0));
        let u = Aabb::union(&a, &b);

        assert_eq!(u.min, Vec3::ZERO);
        assert_eq!(u.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_hit() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));

        // Ray pointing at the center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_slab_range() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        let (t_enter, t_exit) = aabb.slab_range(&ray).unwrap();
        assert!((t_enter - 4.0).abs() < 1e-5);
        assert!((t_exit - 6.0).abs() < 1e-5);

        // Behind the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(aabb.slab_range(&ray).is_none());
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);

        assert!(aabb.contains_point(Vec3::splat(0.5), 0.0));
        assert!(!aabb.contains_point(Vec3::splat(1.5), 0.0));
        assert!(aabb.contains_point(Vec3::splat(1.0005), 1e-3));
    }
}
