//! Geometry primitives and intersection tests
//!
//! Pure value types with no dependencies on the actor model. Collision
//! queries in [`super::phys_world`] are built on these.

pub mod intersect;
pub mod primitives;

pub use intersect::{
    aabb_aabb, capsule_capsule, segment_aabb, segment_plane, segment_sphere, sphere_aabb,
    sphere_sphere, swept_sphere, SegmentHit,
};
pub use primitives::{Aabb, Capsule, ConvexPolygon, LineSegment, Obb, Plane, Sphere};
