//! Actor/component scene model
//!
//! Actors own a [`Transform`] and an ordered list of components. The
//! [`World`] owns every actor, runs the per-frame input/update cycle and
//! defers creation and destruction so the active set is never mutated while
//! it is being iterated.

pub mod actor;
pub mod component;
pub mod components;
pub mod context;
pub mod transform;
pub mod world;

#[cfg(test)]
mod tests;

pub use actor::{Actor, ActorId, ActorState, Capabilities};
pub use component::{Component, ComponentId, DEFAULT_UPDATE_ORDER};
pub use context::ActorContext;
pub use transform::Transform;
pub use world::World;
