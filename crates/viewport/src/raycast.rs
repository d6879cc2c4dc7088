//! Ray intersection tests used by the in-memory scene graph.
//!
//! Bounding boxes use the slab method; spheres use the quadratic form. Both
//! report the distance along a unit-direction ray to the nearest hit in front
//! of the origin.

use glam::DVec3;

use crate::types::{Aabb, Ray};

/// Epsilon for floating point comparisons in ray intersection
const EPSILON: f64 = 1e-9;

/// Slab-method ray/box intersection.
///
/// Returns the entry distance, or the exit distance when the origin is inside
/// the box. `None` when the ray misses or the box lies behind the origin.
pub fn ray_aabb_intersection(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if dir.abs() < EPSILON {
            // Parallel to this slab: must already be between the planes
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    if t_max < EPSILON {
        return None;
    }
    Some(if t_min > EPSILON { t_min } else { t_max })
}

/// Ray-sphere intersection test.
/// Returns the distance to the closest intersection point, or None if no hit.
pub fn ray_sphere_intersection(ray: &Ray, center: DVec3, radius: f64) -> Option<f64> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 > EPSILON {
        Some(t1)
    } else if t2 > EPSILON {
        Some(t2)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(DVec3::splat(-0.5), DVec3::splat(0.5))
    }

    #[test]
    fn test_ray_hits_box_front_face() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        let t = ray_aabb_intersection(&ray, &unit_box()).unwrap();
        assert!((t - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_ray_misses_box() {
        let ray = Ray::new(DVec3::new(2.0, 0.0, 5.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(ray_aabb_intersection(&ray, &unit_box()).is_none());
    }

    #[test]
    fn test_box_behind_ray() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 0.0, 1.0));
        assert!(ray_aabb_intersection(&ray, &unit_box()).is_none());
    }

    #[test]
    fn test_origin_inside_box_reports_exit() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let t = ray_aabb_intersection(&ray, &unit_box()).unwrap();
        assert!((t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ray_sphere_hit_and_miss() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::new(0.0, 0.0, -1.0));
        let t = ray_sphere_intersection(&ray, DVec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-12);

        let ray = Ray::new(DVec3::new(3.0, 0.0, 10.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(ray_sphere_intersection(&ray, DVec3::ZERO, 1.0).is_none());
    }
}
