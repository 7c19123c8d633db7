//! Component-side view of the owning actor and the world

use super::actor::{Actor, ActorId, ActorState, Capabilities};
use super::component::{Component, ComponentId};
use super::transform::Transform;
use super::world::World;
use crate::audio::AudioSystem;
use crate::foundation::math::{Mat4, Quat, Vec3};
use crate::physics::PhysWorld;
use crate::render::RenderCollector;

/// Handed to every component hook
///
/// Holds the owner's handle and mutable access to the world. Transform
/// setters go through the world so that sibling components are notified.
pub struct ActorContext<'w> {
    world: &'w mut World,
    owner: ActorId,
}

impl<'w> ActorContext<'w> {
    pub(crate) fn new(world: &'w mut World, owner: ActorId) -> Self {
        Self { world, owner }
    }

    /// Handle of the actor this context speaks for
    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Read access to the whole world
    pub fn world(&self) -> &World {
        &*self.world
    }

    /// Write access to the whole world
    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }

    /// The owner's transform
    pub fn transform(&self) -> &Transform {
        self.world.transform(self.owner)
    }

    /// The owner's position
    pub fn position(&self) -> Vec3 {
        self.transform().position()
    }

    /// The owner's rotation
    pub fn rotation(&self) -> Quat {
        self.transform().rotation()
    }

    /// The owner's scale
    pub fn scale(&self) -> f32 {
        self.transform().scale()
    }

    /// The owner's forward axis
    pub fn forward(&self) -> Vec3 {
        self.transform().forward()
    }

    /// The owner's right axis
    pub fn right(&self) -> Vec3 {
        self.transform().right()
    }

    /// Move the owner
    pub fn set_position(&mut self, position: Vec3) {
        self.world.set_position(self.owner, position);
    }

    /// Rotate the owner
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.world.set_rotation(self.owner, rotation);
    }

    /// Rescale the owner
    pub fn set_scale(&mut self, scale: f32) {
        self.world.set_scale(self.owner, scale);
    }

    /// Turn the owner to face `forward`
    pub fn rotate_to_new_forward(&mut self, forward: &Vec3) {
        self.world.rotate_to_new_forward(self.owner, forward);
    }

    /// The owner's lifecycle state
    pub fn state(&self) -> ActorState {
        self.world.state(self.owner).unwrap_or(ActorState::Dead)
    }

    /// Change the owner's lifecycle state
    pub fn set_state(&mut self, state: ActorState) {
        self.world.set_state(self.owner, state);
    }

    /// Ask for the owner to be destroyed at the end of the update
    pub fn mark_dead(&mut self) {
        self.world.mark_dead(self.owner);
    }

    /// The owner's capability flags
    pub fn capabilities(&self) -> Capabilities {
        self.world
            .actor(self.owner)
            .map(Actor::capabilities)
            .unwrap_or_default()
    }

    /// Grant capability flags to the owner
    pub fn add_capabilities(&mut self, capabilities: Capabilities) {
        self.world.add_capabilities(self.owner, capabilities);
    }

    /// Revoke capability flags from the owner
    pub fn remove_capabilities(&mut self, capabilities: Capabilities) {
        self.world.remove_capabilities(self.owner, capabilities);
    }

    /// Create a new actor; it receives no calls until the next frame
    pub fn spawn(&mut self, actor: Actor) -> ActorId {
        self.world.add_actor(actor)
    }

    /// Attach a component to any actor, including the owner
    pub fn add_component<C: Component>(&mut self, actor: ActorId, component: C) -> ComponentId {
        self.world.add_component(actor, component)
    }

    /// Collision world, for casts
    pub fn phys(&self) -> &PhysWorld {
        self.world.phys()
    }

    /// Collision world, for box registration
    pub fn phys_mut(&mut self) -> &mut PhysWorld {
        self.world.phys_mut()
    }

    /// Render collector
    pub fn render_mut(&mut self) -> &mut RenderCollector {
        self.world.render_mut()
    }

    /// Audio system
    pub fn audio_mut(&mut self) -> &mut AudioSystem {
        self.world.audio_mut()
    }

    /// Publish a camera view to the renderer and the audio listener
    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.world.set_view_matrix(view);
    }
}
