//! Actor
//!
//! A world object: a transform, a lifecycle state, capability tags and an
//! ordered list of owned components. Actors are built detached and become
//! part of the simulation through [`super::World::add_actor`].

use bitflags::bitflags;
use slotmap::new_key_type;

use super::component::{insert_sorted, ComponentSlot};
use super::transform::Transform;
use crate::foundation::math::{Quat, Vec3};

new_key_type! {
    /// Handle to an actor owned by a [`super::World`]
    pub struct ActorId;
}

/// Lifecycle state of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActorState {
    /// Receives input and updates
    #[default]
    Active,
    /// Exists but receives no input or updates
    Paused,
    /// Waiting to be reaped; terminal
    Dead,
}

bitflags! {
    /// Tags other actors can query instead of inspecting concrete types
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// Can be hit for score
        const TARGET = 1 << 0;
        /// Controlled by the player
        const PLAYER = 1 << 1;
        /// Level geometry that never moves
        const STATIC_GEOMETRY = 1 << 2;
        /// Short-lived moving projectile
        const PROJECTILE = 1 << 3;
    }
}

/// A world object owning a transform and its components
pub struct Actor {
    pub(crate) transform: Transform,
    state: ActorState,
    capabilities: Capabilities,
    name: String,
    pub(crate) components: Vec<ComponentSlot>,
    // Set while the world has taken `components` out to run them
    pub(crate) dispatching: bool,
}

impl Default for Actor {
    fn default() -> Self {
        Self::new("actor")
    }
}

impl Actor {
    /// Create a detached actor at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            transform: Transform::default(),
            state: ActorState::Active,
            capabilities: Capabilities::empty(),
            name: name.into(),
            components: Vec::new(),
            dispatching: false,
        }
    }

    /// Builder pattern: set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.set_position(position);
        self
    }

    /// Builder pattern: set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.set_rotation(rotation);
        self
    }

    /// Builder pattern: set uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.set_scale(scale);
        self
    }

    /// Builder pattern: set capability tags
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Builder pattern: set initial state
    pub fn with_state(mut self, state: ActorState) -> Self {
        self.set_state(state);
        self
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Lifecycle state
    pub fn state(&self) -> ActorState {
        self.state
    }

    /// Change the lifecycle state
    ///
    /// # Panics
    ///
    /// Panics when leaving [`ActorState::Dead`]; dead actors are never
    /// resurrected.
    pub fn set_state(&mut self, state: ActorState) {
        assert!(
            self.state != ActorState::Dead || state == ActorState::Dead,
            "Actor '{}' is dead and cannot become {:?}",
            self.name,
            state
        );
        self.state = state;
    }

    /// Capability flags
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether every flag in `capabilities` is set
    pub fn has_capabilities(&self, capabilities: Capabilities) -> bool {
        self.capabilities.contains(capabilities)
    }

    pub(crate) fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub(crate) fn insert_slot(&mut self, slot: ComponentSlot) {
        insert_sorted(&mut self.components, slot);
    }
}
