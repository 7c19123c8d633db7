//! Projectile movement with bounce
//!
//! Each update casts a short segment along the owner's forward axis. A hit
//! reflects the heading about the surface normal before the move is applied,
//! so the projectile bounces instead of passing through thin geometry.

use super::movement::{MoveComponent, MOVE_UPDATE_ORDER};
use crate::foundation::math::utils::reflect;
use crate::physics::collision::LineSegment;
use crate::scene::{ActorContext, ActorId, Capabilities, Component};

/// Length of the look-ahead segment
pub const SEGMENT_LENGTH: f32 = 30.0;

/// Bouncing projectile movement
#[derive(Debug, Clone, Default)]
pub struct BallMove {
    movement: MoveComponent,
    player: Option<ActorId>,
    hit_sound: Option<String>,
    targets_hit: u32,
}

impl BallMove {
    /// Move forward at `speed` units per second
    pub fn new(speed: f32) -> Self {
        Self {
            movement: MoveComponent::new().with_forward_speed(speed),
            ..Self::default()
        }
    }

    /// Builder pattern: never collide with `player` (the shooter)
    pub fn with_player(mut self, player: ActorId) -> Self {
        self.player = Some(player);
        self
    }

    /// Builder pattern: audio event played when a target is hit
    pub fn with_hit_sound(mut self, event: impl Into<String>) -> Self {
        self.hit_sound = Some(event.into());
        self
    }

    /// Number of target hits so far
    pub fn targets_hit(&self) -> u32 {
        self.targets_hit
    }
}

impl Component for BallMove {
    fn update_order(&self) -> i32 {
        MOVE_UPDATE_ORDER
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        let start = ctx.position();
        let dir = ctx.forward();
        let segment = LineSegment::new(start, start + dir * SEGMENT_LENGTH);

        let owner = ctx.owner();
        let player = self.player;
        let hit = ctx
            .phys()
            .segment_cast_filtered(&segment, |actor| actor != owner && Some(actor) != player);

        if let Some(info) = hit {
            let bounced = reflect(&dir, &info.normal);
            ctx.rotate_to_new_forward(&bounced);

            if ctx.world().has_capabilities(info.actor, Capabilities::TARGET) {
                self.targets_hit += 1;
                log::debug!("Projectile {:?} hit target {:?}", owner, info.actor);
                if let Some(event) = &self.hit_sound {
                    ctx.audio_mut().play_event(event);
                }
            }
        }

        self.movement.step(ctx, delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::testing::RecordingBackend;
    use crate::audio::AudioSystem;
    use crate::foundation::math::Vec3;
    use crate::physics::collision::Aabb;
    use crate::scene::components::{BoxComponent, TargetComponent};
    use crate::scene::{Actor, World};
    use approx::assert_relative_eq;

    fn wall(world: &mut World, x: f32) -> ActorId {
        let id = world.add_actor(Actor::new("wall").with_position(Vec3::new(x, 0.0, 0.0)));
        world.add_component(id, BoxComponent::new(Aabb::new(Vec3::new(-1.0, -50.0, -50.0), Vec3::new(1.0, 50.0, 50.0))));
        id
    }

    #[test]
    fn test_bounces_off_wall() {
        let mut world = World::default();
        wall(&mut world, 20.0);
        let ball = world.add_actor(Actor::new("ball"));
        world.add_component(ball, BallMove::new(100.0));

        world.update(0.1);

        let transform = world.transform(ball);
        assert_relative_eq!(transform.forward(), -Vec3::x(), epsilon = 1e-5);
        assert_relative_eq!(transform.position(), Vec3::new(-10.0, 0.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_ignores_shooter() {
        let mut world = World::default();
        let shooter = wall(&mut world, 10.0);
        let ball = world.add_actor(Actor::new("ball"));
        world.add_component(ball, BallMove::new(100.0).with_player(shooter));

        world.update(0.1);
        assert_relative_eq!(world.transform(ball).forward(), Vec3::x(), epsilon = 1e-6);
    }

    #[test]
    fn test_counts_target_hits_and_plays_sound() {
        let (backend, log) = RecordingBackend::new(&["ding"], &[]);
        let mut world = World::new(AudioSystem::new(Box::new(backend)));
        let target = wall(&mut world, 20.0);
        world.add_component(target, TargetComponent);
        let plain = wall(&mut world, -20.0);

        let ball = world.add_actor(Actor::new("ball"));
        let cid = world.add_component(ball, BallMove::new(100.0).with_hit_sound("ding"));

        world.update(0.1);
        assert_eq!(world.component::<BallMove>(ball, cid).unwrap().targets_hit(), 1);
        assert_eq!(log.borrow().started, vec!["ding".to_string()]);

        // Heading back toward the untagged wall: bounce, but no score
        world.set_position(ball, Vec3::new(-5.0, 0.0, 0.0));
        world.update(0.1);
        assert_eq!(world.component::<BallMove>(ball, cid).unwrap().targets_hit(), 1);
        assert!(world.contains(plain));
    }
}
