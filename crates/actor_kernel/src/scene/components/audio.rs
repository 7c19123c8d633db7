//! Audio component
//!
//! Plays events on behalf of its owner. Positional (3D) events follow the
//! owner's position and facing; finished events are dropped each update.

use crate::audio::SoundEvent;
use crate::scene::{ActorContext, Component};

/// Update order of audio; runs after movement and cameras have settled
pub const AUDIO_UPDATE_ORDER: i32 = 200;

/// Sound source attached to an actor
#[derive(Debug, Clone, Default)]
pub struct AudioComponent {
    events_2d: Vec<SoundEvent>,
    events_3d: Vec<SoundEvent>,
}

impl AudioComponent {
    /// An emitter with no events
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an event; positional events are placed at the owner
    pub fn play_event(&mut self, ctx: &mut ActorContext<'_>, name: &str) -> SoundEvent {
        let position = ctx.position();
        let forward = ctx.forward();
        let audio = ctx.audio_mut();
        let event = audio.play_event(name);
        if event == SoundEvent::INVALID {
            return event;
        }

        if audio.is_3d(event) {
            audio.set_3d_attributes(event, position, forward);
            self.events_3d.push(event);
        } else {
            self.events_2d.push(event);
        }
        event
    }

    /// Stop every event this component started
    pub fn stop_all_events(&mut self, ctx: &mut ActorContext<'_>) {
        let audio = ctx.audio_mut();
        for event in self.events_2d.drain(..).chain(self.events_3d.drain(..)) {
            audio.stop(event, true);
        }
    }

    /// Events still tracked as (2D, 3D)
    pub fn event_counts(&self) -> (usize, usize) {
        (self.events_2d.len(), self.events_3d.len())
    }
}

impl Component for AudioComponent {
    fn update_order(&self) -> i32 {
        AUDIO_UPDATE_ORDER
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, _delta_time: f32) {
        let audio = ctx.audio_mut();
        self.events_2d.retain(|&event| audio.is_valid(event));
        self.events_3d.retain(|&event| audio.is_valid(event));
    }

    fn on_world_transform_changed(&mut self, ctx: &mut ActorContext<'_>) {
        let position = ctx.position();
        let forward = ctx.forward();
        let audio = ctx.audio_mut();
        for &event in &self.events_3d {
            audio.set_3d_attributes(event, position, forward);
        }
    }

    fn on_detach(&mut self, ctx: &mut ActorContext<'_>) {
        self.stop_all_events(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::testing::RecordingBackend;
    use crate::audio::AudioSystem;
    use crate::foundation::math::Vec3;
    use crate::scene::{Actor, World};
    use approx::assert_relative_eq;

    #[test]
    fn test_3d_events_follow_owner() {
        let (backend, log) = RecordingBackend::new(&["music"], &["engine"]);
        let mut world = World::new(AudioSystem::new(Box::new(backend)));
        let id = world.add_actor(Actor::new("car"));
        let cid = world.add_component(id, AudioComponent::new());

        let engine = world
            .with_component_mut::<AudioComponent, _, _>(id, cid, |audio, ctx| {
                audio.play_event(ctx, "music");
                audio.play_event(ctx, "engine")
            })
            .unwrap();
        assert_eq!(world.component::<AudioComponent>(id, cid).unwrap().event_counts(), (1, 1));

        world.set_position(id, Vec3::new(5.0, 0.0, 0.0));
        let (handle, position, _) = *log.borrow().attributes.last().unwrap();
        assert_eq!(handle, engine.id());
        assert_relative_eq!(position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_finished_events_pruned_and_detach_stops() {
        let (backend, log) = RecordingBackend::new(&["music", "jingle"], &[]);
        let mut world = World::new(AudioSystem::new(Box::new(backend)));
        let id = world.add_actor(Actor::new("radio"));
        let cid = world.add_component(id, AudioComponent::new());

        let jingle = world
            .with_component_mut::<AudioComponent, _, _>(id, cid, |audio, ctx| {
                audio.play_event(ctx, "music");
                audio.play_event(ctx, "jingle")
            })
            .unwrap();

        log.borrow_mut().playing.remove(&jingle.id());
        world.update(0.016);
        assert_eq!(world.component::<AudioComponent>(id, cid).unwrap().event_counts(), (1, 0));

        world.destroy_actor(id);
        assert_eq!(log.borrow().stopped.len(), 1);
        assert!(log.borrow().playing.is_empty());
    }
}
