//! Audio backend implementations
//!
//! Platform-independent seam between the kernel's sound handles and whatever
//! actually plays audio. The kernel ships only the silent backend.

use super::AudioError;
use crate::foundation::math::Vec3;

/// Audio backend trait for platform abstraction
///
/// Instances are addressed by the integer handle the [`super::AudioSystem`]
/// allocates, so the backend never hands out ids of its own.
pub trait AudioBackend {
    /// Start a new instance of the named event under `handle`
    fn start(&mut self, handle: u32, name: &str) -> Result<(), AudioError>;

    /// Stop an instance
    fn stop(&mut self, handle: u32, allow_fade_out: bool);

    /// Check if an instance is still playing
    fn is_playing(&self, handle: u32) -> bool;

    /// Whether the named event is positional
    fn is_3d(&self, name: &str) -> bool;

    /// Move a positional instance
    fn set_3d_attributes(&mut self, handle: u32, position: Vec3, forward: Vec3);

    /// Place the listener
    fn set_listener(&mut self, position: Vec3, forward: Vec3, up: Vec3);

    /// Update the backend (cleanup finished sounds, etc.)
    fn update(&mut self, delta_time: f32);
}

/// Backend that accepts every event and plays nothing
///
/// Instances are never reported as playing, so handles become invalid as
/// soon as they are pruned.
#[derive(Debug, Default)]
pub struct NullAudioBackend;

impl AudioBackend for NullAudioBackend {
    fn start(&mut self, _handle: u32, _name: &str) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self, _handle: u32, _allow_fade_out: bool) {}

    fn is_playing(&self, _handle: u32) -> bool {
        false
    }

    fn is_3d(&self, _name: &str) -> bool {
        false
    }

    fn set_3d_attributes(&mut self, _handle: u32, _position: Vec3, _forward: Vec3) {}

    fn set_listener(&mut self, _position: Vec3, _forward: Vec3, _up: Vec3) {}

    fn update(&mut self, _delta_time: f32) {}
}
