//! Primitive collision shapes
//!
//! Immutable value types consumed by the intersection functions in
//! [`super::intersect`]. None of them own anything beyond their own numbers.

use crate::foundation::math::{Quat, Vec2, Vec3};

/// Tolerance below which a length or denominator is treated as zero
pub const GEOMETRY_EPSILON: f32 = 1e-6;

/// A finite line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point (t = 0)
    pub start: Vec3,
    /// End point (t = 1)
    pub end: Vec3,
}

impl LineSegment {
    /// Creates a new segment
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Point along the segment where 0 <= t <= 1
    pub fn point_on_segment(&self, t: f32) -> Vec3 {
        self.start + (self.end - self.start) * t
    }

    /// Segment direction (not normalized)
    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }

    /// Squared length of the segment
    pub fn length_sq(&self) -> f32 {
        (self.end - self.start).magnitude_squared()
    }

    /// Minimum distance squared between `point` and this segment
    pub fn min_dist_sq(&self, point: &Vec3) -> f32 {
        let ab = self.end - self.start;
        let ac = point - self.start;
        let ab_len_sq = ab.magnitude_squared();
        if ab_len_sq <= GEOMETRY_EPSILON {
            return ac.magnitude_squared();
        }

        let t = (ac.dot(&ab) / ab_len_sq).clamp(0.0, 1.0);
        (point - (self.start + ab * t)).magnitude_squared()
    }

    /// Minimum distance squared between two segments
    ///
    /// Clamped closest-point computation; degenerate (point) segments are
    /// handled by falling back to point/segment distance.
    pub fn min_dist_sq_between(a: &LineSegment, b: &LineSegment) -> f32 {
        let d1 = a.end - a.start;
        let d2 = b.end - b.start;
        let r = a.start - b.start;
        let len1 = d1.magnitude_squared();
        let len2 = d2.magnitude_squared();

        if len1 <= GEOMETRY_EPSILON && len2 <= GEOMETRY_EPSILON {
            return r.magnitude_squared();
        }
        if len1 <= GEOMETRY_EPSILON {
            return b.min_dist_sq(&a.start);
        }
        if len2 <= GEOMETRY_EPSILON {
            return a.min_dist_sq(&b.start);
        }

        let c = d1.dot(&r);
        let f = d2.dot(&r);
        let e = d1.dot(&d2);
        let denom = len1 * len2 - e * e;

        // Parallel segments: pick any s and let t follow
        let mut s = if denom > GEOMETRY_EPSILON {
            ((e * f - c * len2) / denom).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut t = (e * s + f) / len2;
        if t < 0.0 {
            t = 0.0;
            s = (-c / len1).clamp(0.0, 1.0);
        } else if t > 1.0 {
            t = 1.0;
            s = ((e - c) / len1).clamp(0.0, 1.0);
        }

        let closest_a = a.start + d1 * s;
        let closest_b = b.start + d2 * t;
        (closest_a - closest_b).magnitude_squared()
    }
}

/// A plane `normal · p + d = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    /// Signed offset
    pub d: f32,
}

impl Plane {
    /// Creates a plane from a normal and offset
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Plane through three points, normal by the right-hand rule (a, b, c)
    ///
    /// Collinear or repeated points span no plane and give `None`.
    pub fn from_points(a: &Vec3, b: &Vec3, c: &Vec3) -> Option<Self> {
        let normal = (b - a).cross(&(c - a)).try_normalize(GEOMETRY_EPSILON)?;
        Some(Self { normal, d: -a.dot(&normal) })
    }

    /// Signed distance from `point` to the plane (positive on the normal side)
    pub fn signed_dist(&self, point: &Vec3) -> f32 {
        point.dot(&self.normal) + self.d
    }
}

/// A sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Point containment (surface counts as inside)
    pub fn contains(&self, point: &Vec3) -> bool {
        (self.center - point).magnitude_squared() <= self.radius * self.radius
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from its corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any call to [`Aabb::update_min_max`] replaces
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Grow the box to account for `point` (used when fitting a model)
    pub fn update_min_max(&mut self, point: &Vec3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Rotate the box by `q` and re-fit it around the rotated corners
    pub fn rotate(&mut self, q: &Quat) {
        let corners = self.corners();
        let first = q * corners[0];
        self.min = first;
        self.max = first;
        for corner in &corners[1..] {
            self.update_min_max(&(q * corner));
        }
    }

    /// The eight corners
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Point containment (faces count as inside)
    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Squared distance from `point` to the box, zero inside
    pub fn min_dist_sq(&self, point: &Vec3) -> f32 {
        let dx = (self.min.x - point.x).max(0.0).max(point.x - self.max.x);
        let dy = (self.min.y - point.y).max(0.0).max(point.y - self.max.y);
        let dz = (self.min.z - point.z).max(0.0).max(point.z - self.max.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Box center
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Oriented bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    /// Center point
    pub center: Vec3,
    /// Orientation
    pub rotation: Quat,
    /// Half-size along each local axis
    pub extents: Vec3,
}

/// A capsule: a swept sphere along a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Core segment
    pub segment: LineSegment,
    /// Radius around the segment
    pub radius: f32,
}

impl Capsule {
    /// Creates a capsule between two points
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self {
            segment: LineSegment::new(start, end),
            radius,
        }
    }

    /// Point along the core segment where 0 <= t <= 1
    pub fn point_on_segment(&self, t: f32) -> Vec3 {
        self.segment.point_on_segment(t)
    }

    /// Point containment (surface counts as inside)
    pub fn contains(&self, point: &Vec3) -> bool {
        self.segment.min_dist_sq(point) <= self.radius * self.radius
    }
}

/// A convex polygon in 2D with clockwise vertex order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexPolygon {
    /// Vertices in clockwise order
    pub vertices: Vec<Vec2>,
}

impl ConvexPolygon {
    /// Creates a polygon from clockwise vertices
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Point containment for a clockwise polygon (edges count as inside).
    ///
    /// Polygons with fewer than three vertices contain nothing.
    pub fn contains(&self, point: &Vec2) -> bool {
        let count = self.vertices.len();
        if count < 3 {
            return false;
        }

        (0..count).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % count];
            let edge = b - a;
            let to_point = point - a;
            // Clockwise: the interior lies to the right of every edge
            edge.x * to_point.y - edge.y * to_point.x <= GEOMETRY_EPSILON
        })
    }
}
