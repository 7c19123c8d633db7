//! Lifetime component
//!
//! Marks its owner dead once a fixed span of simulated time has passed.

use crate::scene::{ActorContext, Component};

/// Lifetime component for actors that should despawn after a duration
#[derive(Debug, Clone, Copy)]
pub struct LifetimeComponent {
    /// Seconds lived so far
    pub age: f32,
    /// How long the actor should live (in seconds, `<= 0` is infinite)
    pub duration: f32,
}

impl LifetimeComponent {
    /// Create a new lifetime component
    pub fn new(duration: f32) -> Self {
        Self { age: 0.0, duration }
    }

    /// Check if this actor's lifetime has expired
    pub fn is_expired(&self) -> bool {
        if self.duration <= 0.0 {
            false // Infinite lifetime
        } else {
            self.age >= self.duration
        }
    }

    /// Get remaining lifetime in seconds
    pub fn remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            f32::INFINITY
        } else {
            (self.duration - self.age).max(0.0)
        }
    }
}

impl Component for LifetimeComponent {
    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        self.age += delta_time;
        if self.is_expired() {
            log::trace!("Lifetime of {:?} expired after {:.2}s", ctx.owner(), self.age);
            ctx.mark_dead();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Actor, World};

    #[test]
    fn test_lifetime_not_expired() {
        let lifetime = LifetimeComponent { age: 2.0, duration: 5.0 };
        assert!(!lifetime.is_expired());
    }

    #[test]
    fn test_infinite_lifetime() {
        let lifetime = LifetimeComponent { age: 1000.0, duration: 0.0 };
        assert!(!lifetime.is_expired());
        assert_eq!(lifetime.remaining(), f32::INFINITY);
    }

    #[test]
    fn test_remaining_time() {
        let lifetime = LifetimeComponent { age: 3.0, duration: 10.0 };
        assert_eq!(lifetime.remaining(), 7.0);
    }

    #[test]
    fn test_actor_reaped_when_expired() {
        let mut world = World::default();
        let id = world.add_actor(Actor::new("spark"));
        world.add_component(id, LifetimeComponent::new(1.0));

        world.update(0.5);
        assert!(world.contains(id));
        world.update(0.6);
        assert!(!world.contains(id));
    }
}
