//! World registry
//!
//! Owns every actor and drives the per-frame cycle: input dispatch, update
//! dispatch, flush of actors created during the frame, and reap of actors
//! marked dead.
//!
//! Mutation of the actor sets while they are iterated is avoided by
//! staging rather than locking:
//! - actors added while components run go to a pending list and join the
//!   active set after the update pass, so they get no calls that frame;
//! - dead actors are only marked during the pass and destroyed in a separate
//!   reap step once iteration is over.
//!
//! While one actor's components run they are moved out of the actor, which
//! lets each hook borrow the world mutably through its [`ActorContext`].

use slotmap::SlotMap;

use super::actor::{Actor, ActorId, ActorState, Capabilities};
use super::component::{Component, ComponentId, ComponentSlot};
use super::context::ActorContext;
use super::transform::Transform;
use crate::audio::AudioSystem;
use crate::foundation::math::{Mat4, Quat, Vec3};
use crate::input::InputState;
use crate::physics::PhysWorld;
use crate::render::RenderCollector;

/// Registry of actors plus the shared collaborators their components use
pub struct World {
    actors: SlotMap<ActorId, Actor>,
    active: Vec<ActorId>,
    pending: Vec<ActorId>,
    updating: bool,
    next_component_id: u64,
    phys: PhysWorld,
    render: RenderCollector,
    audio: AudioSystem,
}

impl Default for World {
    fn default() -> Self {
        Self::new(AudioSystem::default())
    }
}

impl World {
    /// Create an empty world around an audio system
    pub fn new(audio: AudioSystem) -> Self {
        Self {
            actors: SlotMap::with_key(),
            active: Vec::new(),
            pending: Vec::new(),
            updating: false,
            next_component_id: 0,
            phys: PhysWorld::new(),
            render: RenderCollector::new(),
            audio,
        }
    }

    // ---------------------------------------------------------------------
    // Actor lifecycle
    // ---------------------------------------------------------------------

    /// Take ownership of `actor` and return its handle
    ///
    /// While components are running the actor is staged and joins the
    /// active set after this frame's update pass.
    pub fn add_actor(&mut self, mut actor: Actor) -> ActorId {
        actor.transform.compute_world_transform();
        actor.transform.take_changed();
        let name = actor.name().to_string();
        let id = self.actors.insert(actor);

        if self.updating {
            self.pending.push(id);
            log::debug!("Actor '{}' ({:?}) pending until end of frame", name, id);
        } else {
            self.active.push(id);
            log::debug!("Actor '{}' ({:?}) added", name, id);
        }
        id
    }

    /// Detach every component back to front and free the actor
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown (for example destroyed twice), if called
    /// while components are being dispatched (use [`World::mark_dead`]), or
    /// if the actor's own components are currently running.
    pub fn destroy_actor(&mut self, id: ActorId) {
        assert!(
            !self.updating,
            "destroy_actor called during dispatch; mark the actor dead instead"
        );
        let actor = self.actor_ref(id);
        assert!(
            !actor.dispatching,
            "destroy_actor called on '{}' while its components are running",
            actor.name()
        );

        while let Some(mut slot) = self.actors.get_mut(id).and_then(|a| a.components.pop()) {
            slot.component.on_detach(&mut ActorContext::new(self, id));
        }

        self.remove_from_sets(id);
        if let Some(actor) = self.actors.remove(id) {
            log::debug!("Actor '{}' ({:?}) destroyed", actor.name(), id);
        }
    }

    /// Swap-remove `id` from whichever set holds it
    fn remove_from_sets(&mut self, id: ActorId) {
        if let Some(index) = self.pending.iter().position(|&p| p == id) {
            self.pending.swap_remove(index);
        }
        if let Some(index) = self.active.iter().position(|&a| a == id) {
            self.active.swap_remove(index);
        }
    }

    /// Request destruction at the end of the current (or next) update
    pub fn mark_dead(&mut self, id: ActorId) {
        self.set_state(id, ActorState::Dead);
    }

    /// Change an actor's lifecycle state
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown or the actor is already dead and `state`
    /// is not [`ActorState::Dead`].
    pub fn set_state(&mut self, id: ActorId, state: ActorState) {
        let actor = self.actor_mut(id);
        if actor.state() != state {
            log::trace!("Actor '{}' ({:?}) -> {:?}", actor.name(), id, state);
        }
        actor.set_state(state);
    }

    /// Destroy every actor
    ///
    /// # Panics
    ///
    /// Panics if called during dispatch.
    pub fn clear(&mut self) {
        let ids: Vec<ActorId> = self.actors.keys().collect();
        for id in ids {
            self.destroy_actor(id);
        }
        log::debug!("World cleared");
    }

    // ---------------------------------------------------------------------
    // Frame cycle
    // ---------------------------------------------------------------------

    /// Hand the input snapshot to every active actor's components
    pub fn process_input(&mut self, input: &InputState) {
        self.dispatch(|component, ctx| component.process_input(ctx, input));
    }

    /// Update every active actor, then flush pending actors and reap dead ones
    pub fn update(&mut self, delta_time: f32) {
        self.dispatch(|component, ctx| component.update(ctx, delta_time));
        self.flush_pending();
        self.reap_dead();
        self.audio.update(delta_time);
    }

    /// One full frame: input then update
    pub fn tick(&mut self, input: &InputState, delta_time: f32) {
        self.process_input(input);
        self.update(delta_time);
    }

    fn dispatch<F>(&mut self, mut call: F)
    where
        F: FnMut(&mut Box<dyn Component>, &mut ActorContext<'_>),
    {
        assert!(!self.updating, "World dispatch is not re-entrant");
        self.updating = true;

        // Actors added during the pass go to `pending`, and destruction is
        // refused while `updating`, so `active` does not change length here.
        for i in 0..self.active.len() {
            let id = self.active[i];
            if self.state(id) != Some(ActorState::Active) {
                continue;
            }

            self.with_slots(id, |world, slots| {
                for index in 0..slots.len() {
                    // A component may pause or kill its own actor mid-pass
                    if world.state(id) != Some(ActorState::Active) {
                        break;
                    }
                    call(&mut slots[index].component, &mut ActorContext::new(world, id));
                    world.notify_slots(id, slots);
                }
            });
        }

        self.updating = false;
    }

    fn flush_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for id in pending {
            let Some(actor) = self.actors.get_mut(id) else {
                continue;
            };
            actor.transform.compute_world_transform();
            self.notify_transform_changed(id);
            self.active.push(id);
        }
    }

    fn reap_dead(&mut self) {
        let dead: Vec<ActorId> = self
            .active
            .iter()
            .copied()
            .filter(|&id| self.state(id) == Some(ActorState::Dead))
            .collect();

        if !dead.is_empty() {
            log::trace!("Reaping {} dead actors", dead.len());
        }
        for id in dead {
            self.destroy_actor(id);
        }
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    /// Attach `component` to `actor` and return its id
    ///
    /// `on_attach` runs before the component joins the ordered list.
    ///
    /// # Panics
    ///
    /// Panics if `actor` is unknown.
    pub fn add_component<C: Component>(&mut self, actor: ActorId, component: C) -> ComponentId {
        self.attach(actor, Box::new(component))
    }

    /// Attach an already boxed component
    ///
    /// # Panics
    ///
    /// Panics if `actor` is unknown.
    pub fn attach(&mut self, actor: ActorId, mut component: Box<dyn Component>) -> ComponentId {
        assert!(self.contains(actor), "add_component: actor {actor:?} does not exist");
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;

        component.on_attach(&mut ActorContext::new(self, actor));
        let order = component.update_order();
        self.actor_mut(actor).insert_slot(ComponentSlot { id, order, component });
        self.notify_transform_changed(actor);
        id
    }

    /// Detach and drop a component
    ///
    /// # Panics
    ///
    /// Panics if the component is not attached to `actor`, or if `actor`'s
    /// components are currently running.
    pub fn remove_component(&mut self, actor: ActorId, component: ComponentId) {
        let owner = self.actor_mut(actor);
        let Some(index) = owner.components.iter().position(|slot| slot.id == component) else {
            panic!(
                "remove_component: {:?} is not attached to '{}'",
                component,
                owner.name()
            );
        };
        let mut slot = owner.components.remove(index);
        slot.component.on_detach(&mut ActorContext::new(self, actor));
    }

    /// Typed access to an attached component
    pub fn component<T: Component>(&self, actor: ActorId, component: ComponentId) -> Option<&T> {
        self.actors
            .get(actor)?
            .components
            .iter()
            .find(|slot| slot.id == component)?
            .component
            .downcast_ref()
    }

    /// Typed mutable access to an attached component
    pub fn component_mut<T: Component>(&mut self, actor: ActorId, component: ComponentId) -> Option<&mut T> {
        self.actors
            .get_mut(actor)?
            .components
            .iter_mut()
            .find(|slot| slot.id == component)?
            .component
            .downcast_mut()
    }

    /// First component of type `T` on `actor`
    pub fn find_component<T: Component>(&self, actor: ActorId) -> Option<&T> {
        self.actors
            .get(actor)?
            .components
            .iter()
            .find_map(|slot| slot.component.downcast_ref())
    }

    /// Run `f` with a component and a context for its owner
    ///
    /// Returns `None` if the component is missing, is not a `T`, or its
    /// owner's components are currently running.
    pub fn with_component_mut<T, R, F>(&mut self, actor: ActorId, component: ComponentId, f: F) -> Option<R>
    where
        T: Component,
        F: FnOnce(&mut T, &mut ActorContext<'_>) -> R,
    {
        self.with_slots(actor, |world, slots| {
            let slot = slots.iter_mut().find(|slot| slot.id == component)?;
            let typed = slot.component.downcast_mut::<T>()?;
            let result = f(typed, &mut ActorContext::new(world, actor));
            world.notify_slots(actor, slots);
            Some(result)
        })
        .flatten()
    }

    // ---------------------------------------------------------------------
    // Transforms
    // ---------------------------------------------------------------------

    /// Move an actor and notify its components
    pub fn set_position(&mut self, id: ActorId, position: Vec3) {
        self.actor_mut(id).transform.set_position(position);
        self.notify_transform_changed(id);
    }

    /// Rotate an actor and notify its components
    pub fn set_rotation(&mut self, id: ActorId, rotation: Quat) {
        self.actor_mut(id).transform.set_rotation(rotation);
        self.notify_transform_changed(id);
    }

    /// Scale an actor and notify its components
    ///
    /// # Panics
    ///
    /// Panics if `scale` is negative.
    pub fn set_scale(&mut self, id: ActorId, scale: f32) {
        self.actor_mut(id).transform.set_scale(scale);
        self.notify_transform_changed(id);
    }

    /// Turn an actor to face `forward` and notify its components
    pub fn rotate_to_new_forward(&mut self, id: ActorId, forward: &Vec3) {
        self.actor_mut(id).transform.rotate_to_new_forward(forward);
        self.notify_transform_changed(id);
    }

    /// Recompute an actor's world matrix and notify its components
    pub fn compute_world_transform(&mut self, id: ActorId) {
        self.actor_mut(id).transform.compute_world_transform();
        self.notify_transform_changed(id);
    }

    // Components of a dispatching actor are notified by the dispatcher.
    fn notify_transform_changed(&mut self, id: ActorId) {
        self.with_slots(id, |world, slots| world.notify_slots(id, slots));
    }

    fn notify_slots(&mut self, id: ActorId, slots: &mut [ComponentSlot]) {
        let changed = self
            .actors
            .get_mut(id)
            .is_some_and(|actor| actor.transform.take_changed());
        if !changed {
            return;
        }
        for slot in slots.iter_mut() {
            slot.component.on_world_transform_changed(&mut ActorContext::new(self, id));
        }

        // Components attached while `slots` is out sit on the actor itself
        let Some(actor) = self.actors.get_mut(id) else {
            return;
        };
        if actor.components.is_empty() {
            return;
        }
        let mut attached = std::mem::take(&mut actor.components);
        for slot in &mut attached {
            slot.component.on_world_transform_changed(&mut ActorContext::new(self, id));
        }
        if let Some(actor) = self.actors.get_mut(id) {
            let newer = std::mem::replace(&mut actor.components, attached);
            for slot in newer {
                actor.insert_slot(slot);
            }
        }
    }

    /// Move an actor's components out, run `f`, and put them back
    ///
    /// Components attached while `f` runs are merged back in update order.
    /// Returns `None` if the actor is unknown or already dispatching.
    fn with_slots<R, F>(&mut self, id: ActorId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Self, &mut Vec<ComponentSlot>) -> R,
    {
        let actor = self.actors.get_mut(id)?;
        if actor.dispatching {
            return None;
        }
        actor.dispatching = true;
        let mut slots = std::mem::take(&mut actor.components);

        let result = f(self, &mut slots);

        if let Some(actor) = self.actors.get_mut(id) {
            actor.dispatching = false;
            let attached = std::mem::replace(&mut actor.components, slots);
            for slot in attached {
                actor.insert_slot(slot);
            }
        }
        Some(result)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Look up an actor, pending ones included
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Whether `id` refers to a live (not yet destroyed) actor
    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(id)
    }

    /// Lifecycle state, `None` once the actor is destroyed
    pub fn state(&self, id: ActorId) -> Option<ActorState> {
        self.actors.get(id).map(Actor::state)
    }

    /// An actor's transform
    ///
    /// # Panics
    ///
    /// Panics if `id` is unknown.
    pub fn transform(&self, id: ActorId) -> &Transform {
        &self.actor_ref(id).transform
    }

    /// Whether `id` exists and carries every flag in `capabilities`
    pub fn has_capabilities(&self, id: ActorId, capabilities: Capabilities) -> bool {
        self.actors
            .get(id)
            .is_some_and(|actor| actor.has_capabilities(capabilities))
    }

    /// Grant capability flags
    pub fn add_capabilities(&mut self, id: ActorId, capabilities: Capabilities) {
        self.actor_mut(id).capabilities_mut().insert(capabilities);
    }

    /// Revoke capability flags
    pub fn remove_capabilities(&mut self, id: ActorId, capabilities: Capabilities) {
        self.actor_mut(id).capabilities_mut().remove(capabilities);
    }

    /// Actors eligible for input and update
    pub fn active_actors(&self) -> &[ActorId] {
        &self.active
    }

    /// Actors created this frame, waiting for the end-of-update flush
    pub fn pending_actors(&self) -> &[ActorId] {
        &self.pending
    }

    /// Total number of actors, pending included
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// True while components are being dispatched
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    // ---------------------------------------------------------------------
    // Collaborators
    // ---------------------------------------------------------------------

    /// Collision world
    pub fn phys(&self) -> &PhysWorld {
        &self.phys
    }

    /// Mutable collision world
    pub fn phys_mut(&mut self) -> &mut PhysWorld {
        &mut self.phys
    }

    /// Render collector
    pub fn render(&self) -> &RenderCollector {
        &self.render
    }

    /// Mutable render collector
    pub fn render_mut(&mut self) -> &mut RenderCollector {
        &mut self.render
    }

    /// Audio system
    pub fn audio(&self) -> &AudioSystem {
        &self.audio
    }

    /// Mutable audio system
    pub fn audio_mut(&mut self) -> &mut AudioSystem {
        &mut self.audio
    }

    /// Publish a camera view to the renderer and the audio listener
    pub fn set_view_matrix(&mut self, view: Mat4) {
        self.audio.set_listener(&view);
        self.render.set_view_matrix(view);
    }

    fn actor_ref(&self, id: ActorId) -> &Actor {
        match self.actors.get(id) {
            Some(actor) => actor,
            None => panic!("Actor {id:?} does not exist"),
        }
    }

    fn actor_mut(&mut self, id: ActorId) -> &mut Actor {
        match self.actors.get_mut(id) {
            Some(actor) => actor,
            None => panic!("Actor {id:?} does not exist"),
        }
    }
}

impl Drop for World {
    fn drop(&mut self) {
        if !self.updating && !std::thread::panicking() {
            self.clear();
        }
    }
}
