//! The target range scene and its scripted session

use std::collections::HashMap;

use actor_kernel::foundation::math::utils::axis_angle;
use actor_kernel::foundation::math::{constants, Vec3};
use actor_kernel::input::InputState;
use actor_kernel::physics::collision::Aabb;
use actor_kernel::scene::components::{
    AudioComponent, BallMove, BoxComponent, FpsCamera, InputComponent, LifetimeComponent,
    MeshComponent, TargetComponent,
};
use actor_kernel::scene::{Actor, ActorId, Capabilities, ComponentId, World};

use crate::level::{Level, TargetDesc};

/// Plane mesh bounds before the tile scale is applied
const PLANE_HALF_EXTENT: f32 = 12.5;
const PLANE_HALF_THICKNESS: f32 = 0.5;
const PLANE_SCALE: f32 = 10.0;

const TARGET_HALF_DEPTH: f32 = 25.0;
const TARGET_HALF_WIDTH: f32 = 62.5;

const MESH_SHADER: &str = "phong";

fn plane_box() -> Aabb {
    Aabb::new(
        Vec3::new(-PLANE_HALF_EXTENT, -PLANE_HALF_EXTENT, -PLANE_HALF_THICKNESS),
        Vec3::new(PLANE_HALF_EXTENT, PLANE_HALF_EXTENT, PLANE_HALF_THICKNESS),
    )
}

fn target_box() -> Aabb {
    Aabb::new(
        Vec3::new(-TARGET_HALF_DEPTH, -TARGET_HALF_WIDTH, -TARGET_HALF_WIDTH),
        Vec3::new(TARGET_HALF_DEPTH, TARGET_HALF_WIDTH, TARGET_HALF_WIDTH),
    )
}

/// Range scene plus the bookkeeping for the session summary
pub struct TargetRange {
    world: World,
    level: Level,
    player: ActorId,
    player_audio: ComponentId,
    balls: Vec<ActorId>,
    hits: HashMap<ActorId, u32>,
    shots_fired: u32,
}

impl TargetRange {
    /// Build the static geometry, targets and player described by `level`
    pub fn new(mut world: World, level: Level) -> Self {
        spawn_floor(&mut world, &level);
        if let Some(walls) = &level.walls {
            spawn_walls(&mut world, &level, walls.distance, walls.height);
        }
        for target in &level.targets {
            spawn_target(&mut world, target);
        }

        let player = world.add_actor(
            Actor::new("player")
                .with_position(level.player_position())
                .with_capabilities(Capabilities::PLAYER),
        );
        world.add_component(
            player,
            InputComponent::new(level.player.max_forward_speed, level.player.max_angular_speed),
        );
        world.add_component(player, FpsCamera::new());
        let player_audio = world.add_component(player, AudioComponent::new());

        log::info!(
            "Range built: {} actors, {} collision boxes, {} targets",
            world.actor_count(),
            world.phys().len(),
            level.targets.len()
        );

        Self {
            world,
            level,
            player,
            player_audio,
            balls: Vec::new(),
            hits: HashMap::new(),
            shots_fired: 0,
        }
    }

    /// Run one scripted frame
    pub fn step(&mut self, frame: u32, input: &InputState, delta_time: f32) {
        self.world.tick(input, delta_time);
        self.tally_hits();

        if self.level.fires_on(frame) {
            self.fire();
        }
    }

    /// Fire a ball along the player's heading
    pub fn fire(&mut self) -> ActorId {
        let origin = self.world.transform(self.player).position();
        let heading = self.world.transform(self.player).forward();
        let ball_desc = &self.level.ball;

        let ball = self.world.add_actor(
            Actor::new("ball")
                .with_position(origin)
                .with_capabilities(Capabilities::PROJECTILE),
        );
        self.world.rotate_to_new_forward(ball, &heading);

        let mut movement = BallMove::new(ball_desc.speed).with_player(self.player);
        if let Some(sound) = &self.level.hit_sound {
            movement = movement.with_hit_sound(sound.clone());
        }
        self.world.add_component(ball, movement);
        self.world.add_component(ball, MeshComponent::new(MESH_SHADER, ball_desc.radius));
        self.world.add_component(ball, AudioComponent::new());
        self.world.add_component(ball, LifetimeComponent::new(ball_desc.lifetime));

        if let Some(sound) = self.level.shot_sound.clone() {
            self.world
                .with_component_mut::<AudioComponent, _, _>(self.player, self.player_audio, |audio, ctx| {
                    audio.play_event(ctx, &sound)
                });
        }

        self.shots_fired += 1;
        self.balls.push(ball);
        log::info!("Shot {} fired from {:?} heading {:?}", self.shots_fired, origin, heading);
        ball
    }

    fn tally_hits(&mut self) {
        let world = &self.world;
        for &ball in &self.balls {
            if let Some(movement) = world.find_component::<BallMove>(ball) {
                let previous = self.hits.insert(ball, movement.targets_hit()).unwrap_or(0);
                if movement.targets_hit() > previous {
                    log::info!("Ball {:?} hit a target", ball);
                }
            }
        }
        self.balls.retain(|&ball| world.contains(ball));
    }

    /// Total target hits across every ball fired so far
    pub fn total_hits(&self) -> u32 {
        self.hits.values().sum()
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// Balls still in flight
    pub fn live_balls(&self) -> usize {
        self.balls.len()
    }

    pub fn player(&self) -> ActorId {
        self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn level(&self) -> &Level {
        &self.level
    }
}

fn spawn_plane(world: &mut World, name: &str, position: Vec3, rotation_axis: Vec3, angle: f32) {
    let id = world.add_actor(
        Actor::new(name)
            .with_position(position)
            .with_rotation(axis_angle(&rotation_axis, angle))
            .with_scale(PLANE_SCALE)
            .with_capabilities(Capabilities::STATIC_GEOMETRY),
    );
    world.add_component(id, MeshComponent::new(MESH_SHADER, PLANE_HALF_EXTENT * PLANE_SCALE));
    world.add_component(id, BoxComponent::new(plane_box()));
}

fn tile_offsets(level: &Level) -> impl Iterator<Item = f32> + '_ {
    (0..level.floor.count).map(|i| level.floor.start + i as f32 * level.floor.size)
}

fn spawn_floor(world: &mut World, level: &Level) {
    for x in tile_offsets(level) {
        for y in tile_offsets(level) {
            spawn_plane(world, "floor", Vec3::new(x, y, level.floor.height), Vec3::x(), 0.0);
        }
    }
}

fn spawn_walls(world: &mut World, level: &Level, distance: f32, height: f32) {
    for offset in tile_offsets(level) {
        // Side walls stand in the XZ plane, end walls in the YZ plane
        for side in [-distance, distance] {
            spawn_plane(world, "wall", Vec3::new(offset, side, height), Vec3::x(), constants::HALF_PI);
            spawn_plane(world, "wall", Vec3::new(side, offset, height), Vec3::y(), constants::HALF_PI);
        }
    }
}

fn spawn_target(world: &mut World, desc: &TargetDesc) -> ActorId {
    let id = world.add_actor(
        Actor::new("target")
            .with_position(Vec3::from(desc.position))
            .with_rotation(axis_angle(&Vec3::z(), desc.yaw)),
    );
    world.add_component(id, MeshComponent::new(MESH_SHADER, TARGET_HALF_WIDTH));
    world.add_component(id, BoxComponent::new(target_box()));
    world.add_component(id, TargetComponent);
    id
}
