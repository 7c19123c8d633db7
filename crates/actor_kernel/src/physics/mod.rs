//! Physics module for collision queries
//!
//! Provides geometry primitives, intersection predicates and the box
//! registry that gameplay components cast segments against.

pub mod collision;
pub mod phys_world;

pub use phys_world::{BoxId, CollidableBox, CollisionInfo, PhysWorld};
