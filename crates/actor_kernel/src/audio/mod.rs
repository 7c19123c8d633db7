//! Audio collaborator
//!
//! The kernel does not play sound. It hands out [`SoundEvent`] handles,
//! forwards positional updates and the listener placement to an
//! [`AudioBackend`], and forgets handles once the backend stops them.

pub mod backend;

use std::collections::HashMap;

use thiserror::Error;

pub use backend::{AudioBackend, NullAudioBackend};

use crate::foundation::math::{Mat4, Vec3};

/// Audio errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// The backend knows no event by this name
    #[error("Unknown audio event: {0}")]
    UnknownEvent(String),

    /// The backend failed to start playback
    #[error("Audio backend error: {0}")]
    Backend(String),
}

/// Handle to one playing event instance
///
/// Handles are plain ids; a handle whose instance has finished is simply
/// invalid. Id 0 is never allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SoundEvent {
    id: u32,
}

impl SoundEvent {
    /// A handle that refers to nothing
    pub const INVALID: Self = Self { id: 0 };

    /// Raw id as seen by the backend
    pub fn id(self) -> u32 {
        self.id
    }
}

/// Owner of the sound handle counter and the active instances
pub struct AudioSystem {
    backend: Box<dyn AudioBackend>,
    next_id: u32,
    instances: HashMap<u32, String>,
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new(Box::new(NullAudioBackend))
    }
}

impl AudioSystem {
    /// Create an audio system over `backend`
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            next_id: 0,
            instances: HashMap::new(),
        }
    }

    /// Start the named event and return its handle
    ///
    /// Unknown events are logged and yield [`SoundEvent::INVALID`].
    pub fn play_event(&mut self, name: &str) -> SoundEvent {
        self.next_id = self.next_id.wrapping_add(1).max(1);
        let id = self.next_id;

        match self.backend.start(id, name) {
            Ok(()) => {
                self.instances.insert(id, name.to_string());
                log::debug!("Playing audio event '{}' as {}", name, id);
                SoundEvent { id }
            }
            Err(err) => {
                log::warn!("Failed to play audio event: {}", err);
                SoundEvent::INVALID
            }
        }
    }

    /// Whether the instance behind `event` is still playing
    pub fn is_valid(&self, event: SoundEvent) -> bool {
        self.instances.contains_key(&event.id) && self.backend.is_playing(event.id)
    }

    /// Whether the instance behind `event` is positional
    pub fn is_3d(&self, event: SoundEvent) -> bool {
        self.instances
            .get(&event.id)
            .is_some_and(|name| self.backend.is_3d(name))
    }

    /// Stop an instance
    pub fn stop(&mut self, event: SoundEvent, allow_fade_out: bool) {
        if self.instances.remove(&event.id).is_some() {
            self.backend.stop(event.id, allow_fade_out);
        }
    }

    /// Move a positional instance
    pub fn set_3d_attributes(&mut self, event: SoundEvent, position: Vec3, forward: Vec3) {
        if self.instances.contains_key(&event.id) {
            self.backend.set_3d_attributes(event.id, position, forward);
        }
    }

    /// Place the listener at the camera described by `view`
    ///
    /// The view matrix is inverted to recover the camera's world position and
    /// axes. A singular matrix leaves the listener where it was.
    pub fn set_listener(&mut self, view: &Mat4) {
        let Some(camera) = view.try_inverse() else {
            log::warn!("Ignoring singular view matrix for audio listener");
            return;
        };
        let position = camera.column(3).xyz();
        let up = camera.column(1).xyz();
        let forward = -camera.column(2).xyz();
        self.backend.set_listener(position, forward, up);
    }

    /// Number of instances not yet pruned
    pub fn active_count(&self) -> usize {
        self.instances.len()
    }

    /// Let the backend advance and forget instances it has finished
    pub fn update(&mut self, delta_time: f32) {
        self.backend.update(delta_time);
        let backend = &self.backend;
        self.instances.retain(|id, _| backend.is_playing(*id));
    }
}
