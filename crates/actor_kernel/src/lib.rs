//! # Actor Kernel
//!
//! A small real-time 3D simulation kernel: world objects ("actors") composed
//! from reusable behaviors ("components"), updated once per frame, plus a
//! box collision world answering segment casts for gameplay queries.
//!
//! ## Features
//!
//! - **Deferred lifecycle**: actors created mid-frame wait for the next
//!   frame, dead actors are reaped after iteration
//! - **Ordered dispatch**: components run by update order, ties in
//!   attachment order
//! - **Eager transforms**: world matrices are never stale after a setter
//! - **Collision queries**: closest-hit segment casts, swept spheres and
//!   the usual primitive overlap tests
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_kernel::prelude::*;
//!
//! let mut world = World::default();
//! let mover = world.add_actor(Actor::new("mover"));
//! world.add_component(mover, MoveComponent::new().with_forward_speed(300.0));
//!
//! world.update(0.1);
//! assert!((world.transform(mover).position().x - 30.0).abs() < 1e-3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod audio;
pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;

/// Common imports for kernel users
pub mod prelude {
    pub use crate::audio::{AudioBackend, AudioSystem, NullAudioBackend, SoundEvent};
    pub use crate::config::{Config, ConfigError, KernelConfig};
    pub use crate::foundation::math::{Mat4, Quat, Vec2, Vec3};
    pub use crate::foundation::time::FrameClock;
    pub use crate::input::{ButtonState, InputState, InputSystem, KeyCode, RawInput};
    pub use crate::physics::collision::{Aabb, LineSegment, Plane, Sphere};
    pub use crate::physics::{CollisionInfo, PhysWorld};
    pub use crate::render::RenderCollector;
    pub use crate::scene::components::{
        AudioComponent, BallMove, BoxComponent, FollowCamera, FpsCamera, InputComponent,
        LifetimeComponent, MeshComponent, MoveComponent, OrbitCamera, Spline, SplineCamera,
        TargetComponent,
    };
    pub use crate::scene::{
        Actor, ActorContext, ActorId, ActorState, Capabilities, Component, ComponentId, Transform,
        World,
    };
}
