//! Ray intersection tests
//!
//! Both tests return the distance along the ray to the hit, or `None`. A
//! returned distance can still be zero when the ray starts exactly on the
//! surface; callers that treat "distance <= 0" as a miss must check it.

use super::{Aabb, Ray, Triangle};

/// Determinant threshold below which a ray counts as parallel to a triangle
pub const EPSILON: f32 = 0.000_001;

/// Slab test of a ray against an AABB
///
/// Returns the entry distance, or the exit distance when the origin is
/// inside the box. Box faces count as inside, so a ray running along a
/// face or edge still hits.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if dir.is_nan() {
            return None;
        }
        // Parallel to this slab: no constraint if the origin lies within it
        if dir == 0.0 {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
    }

    // Box behind the ray, or slabs do not overlap
    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin > 0.0 { tmin } else { tmax })
}

/// Möller-Trumbore ray-triangle intersection
///
/// Single-sided tests reject triangles whose front face (counter-clockwise
/// winding) points away from the ray.
///
/// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
pub fn ray_triangle(ray: &Ray, triangle: &Triangle, double_sided: bool) -> Option<f32> {
    let edge1 = triangle.v1 - triangle.v0;
    let edge2 = triangle.v2 - triangle.v0;

    let p = ray.direction.cross(&edge2);
    let det = edge1.dot(&p);

    // Parallel, or back-facing on a single-sided triangle
    if det < EPSILON && (!double_sided || det > -EPSILON) {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - triangle.v0;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < 0.0 || u + v > 1.0 || v.is_nan() {
        return None;
    }

    let t = edge2.dot(&q) * inv_det;
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}
