//! Intersection tests between primitives
//!
//! Every function is pure and total: degenerate input (zero-length segment,
//! zero radius, no relative motion) has a defined answer instead of NaN
//! propagation or a panic.

use super::primitives::{Aabb, Capsule, LineSegment, Plane, Sphere, GEOMETRY_EPSILON};
use crate::foundation::math::Vec3;

/// Where a segment enters a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Parametric position along the segment, in [0, 1]
    pub t: f32,
    /// Outward normal of the face that was entered
    pub normal: Vec3,
}

/// Sphere vs sphere overlap
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let radii = a.radius + b.radius;
    (a.center - b.center).magnitude_squared() <= radii * radii
}

/// AABB vs AABB overlap (touching faces count)
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    !(a.max.x < b.min.x || a.max.y < b.min.y || a.max.z < b.min.z
        || b.max.x < a.min.x || b.max.y < a.min.y || b.max.z < a.min.z)
}

/// Capsule vs capsule overlap
pub fn capsule_capsule(a: &Capsule, b: &Capsule) -> bool {
    let dist_sq = LineSegment::min_dist_sq_between(&a.segment, &b.segment);
    let radii = a.radius + b.radius;
    dist_sq <= radii * radii
}

/// Sphere vs AABB overlap
pub fn sphere_aabb(sphere: &Sphere, aabb: &Aabb) -> bool {
    aabb.min_dist_sq(&sphere.center) <= sphere.radius * sphere.radius
}

/// First point where the segment touches the sphere
///
/// Returns the smallest `t` in [0, 1]; a segment starting inside the sphere
/// reports where it leaves. A zero-length segment hits at `t = 0` exactly
/// when its point lies inside the sphere.
pub fn segment_sphere(segment: &LineSegment, sphere: &Sphere) -> Option<f32> {
    let x = segment.start - sphere.center;
    let y = segment.direction();
    let a = y.magnitude_squared();
    let c = x.magnitude_squared() - sphere.radius * sphere.radius;

    if a <= GEOMETRY_EPSILON {
        return (c <= 0.0).then_some(0.0);
    }

    let b = 2.0 * x.dot(&y);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let t_min = (-b - root) / (2.0 * a);
    let t_max = (-b + root) / (2.0 * a);
    if (0.0..=1.0).contains(&t_min) {
        Some(t_min)
    } else if (0.0..=1.0).contains(&t_max) {
        Some(t_max)
    } else {
        None
    }
}

/// Where the segment crosses the plane
///
/// A segment parallel to the plane hits at `t = 0` only if it lies in it.
pub fn segment_plane(segment: &LineSegment, plane: &Plane) -> Option<f32> {
    let denom = segment.direction().dot(&plane.normal);
    let start_dist = plane.signed_dist(&segment.start);

    if denom.abs() <= GEOMETRY_EPSILON {
        return (start_dist.abs() <= GEOMETRY_EPSILON).then_some(0.0);
    }

    let t = -start_dist / denom;
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Slab test of a segment against an AABB
///
/// Tracks the entry `t` per axis together with the axis and sign that
/// produced it, so the hit carries the outward normal of the entered face.
/// A segment that starts inside the box hits at `t = 0` with the normal of
/// the face nearest its start point.
pub fn segment_aabb(segment: &LineSegment, aabb: &Aabb) -> Option<SegmentHit> {
    let start = segment.start;
    let dir = segment.direction();

    if aabb.contains(&start) {
        return Some(SegmentHit { t: 0.0, normal: nearest_face_normal(aabb, &start) });
    }

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::zeros();

    for axis in 0..3 {
        let (lo, hi, s, d) = (aabb.min[axis], aabb.max[axis], start[axis], dir[axis]);

        if d.abs() <= GEOMETRY_EPSILON {
            // Parallel to this slab: must already be between its planes
            if s < lo || s > hi {
                return None;
            }
            continue;
        }

        // Moving +axis enters through the min face, -axis through the max face
        let (near, far, sign) = if d > 0.0 {
            ((lo - s) / d, (hi - s) / d, -1.0)
        } else {
            ((hi - s) / d, (lo - s) / d, 1.0)
        };

        if near > t_enter {
            t_enter = near;
            enter_normal = Vec3::zeros();
            enter_normal[axis] = sign;
        }
        t_exit = t_exit.min(far);

        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 || t_enter > 1.0 {
        return None;
    }

    Some(SegmentHit { t: t_enter, normal: enter_normal })
}

fn nearest_face_normal(aabb: &Aabb, point: &Vec3) -> Vec3 {
    let mut best = f32::INFINITY;
    let mut normal = Vec3::zeros();
    for axis in 0..3 {
        let to_min = point[axis] - aabb.min[axis];
        let to_max = aabb.max[axis] - point[axis];
        if to_min < best {
            best = to_min;
            normal = Vec3::zeros();
            normal[axis] = -1.0;
        }
        if to_max < best {
            best = to_max;
            normal = Vec3::zeros();
            normal[axis] = 1.0;
        }
    }
    normal
}

/// Continuous sphere vs sphere test over one timestep
///
/// `p0`/`p1` are the first sphere at the start/end of the step, `q0`/`q1`
/// the second. Radii are taken from the start spheres. Returns the earliest
/// `t` in [0, 1] at which the surfaces touch. Spheres already touching at
/// the start report `t = 0`.
pub fn swept_sphere(p0: &Sphere, p1: &Sphere, q0: &Sphere, q1: &Sphere) -> Option<f32> {
    let x = p0.center - q0.center;
    let y = (p1.center - p0.center) - (q1.center - q0.center);
    let radii = p0.radius + q0.radius;

    let c = x.magnitude_squared() - radii * radii;
    if c <= 0.0 {
        return Some(0.0);
    }

    let a = y.magnitude_squared();
    if a <= GEOMETRY_EPSILON {
        // No relative motion and not touching now
        return None;
    }

    let b = 2.0 * x.dot(&y);
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (0.0..=1.0).contains(&t).then_some(t)
}
