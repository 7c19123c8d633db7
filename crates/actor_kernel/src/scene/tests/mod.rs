//! Frame lifecycle scenarios across the world, components and collision

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;

use crate::foundation::math::Vec3;
use crate::input::InputState;
use crate::physics::collision::{Aabb, LineSegment};
use crate::scene::components::{BoxComponent, MoveComponent};
use crate::scene::{Actor, ActorContext, ActorId, ActorState, Component, World};

type CallLog = Rc<RefCell<Vec<String>>>;

/// Records every input and update call under a label
struct Probe {
    label: &'static str,
    order: i32,
    log: CallLog,
}

impl Probe {
    fn new(label: &'static str, log: &CallLog) -> Self {
        Self::ordered(label, 100, log)
    }

    fn ordered(label: &'static str, order: i32, log: &CallLog) -> Self {
        Self { label, order, log: Rc::clone(log) }
    }
}

impl Component for Probe {
    fn update_order(&self) -> i32 {
        self.order
    }

    fn process_input(&mut self, _ctx: &mut ActorContext<'_>, _input: &InputState) {
        self.log.borrow_mut().push(format!("{}:input", self.label));
    }

    fn update(&mut self, _ctx: &mut ActorContext<'_>, _delta_time: f32) {
        self.log.borrow_mut().push(format!("{}:update", self.label));
    }
}

fn count(log: &CallLog, entry: &str) -> usize {
    log.borrow().iter().filter(|e| *e == entry).count()
}

/// Spawns one child carrying a probe on its first update
struct Spawner {
    log: CallLog,
    child: Rc<RefCell<Option<ActorId>>>,
}

impl Component for Spawner {
    fn update(&mut self, ctx: &mut ActorContext<'_>, _delta_time: f32) {
        if self.child.borrow().is_some() {
            return;
        }
        let child = ctx.spawn(Actor::new("child").with_position(Vec3::new(5.0, 0.0, 0.0)));
        ctx.add_component(child, Probe::new("child", &self.log));
        ctx.add_component(child, BoxComponent::new(Aabb::new(Vec3::repeat(-1.0), Vec3::repeat(1.0))));
        assert_eq!(ctx.world().pending_actors(), &[child]);
        *self.child.borrow_mut() = Some(child);
    }
}

/// Marks another actor dead on a chosen frame
struct Killer {
    target: ActorId,
    on_frame: u32,
    frame: u32,
}

impl Component for Killer {
    fn update(&mut self, ctx: &mut ActorContext<'_>, _delta_time: f32) {
        self.frame += 1;
        if self.frame == self.on_frame {
            ctx.world_mut().mark_dead(self.target);
        }
    }
}

/// Marks its own actor dead
struct SelfDestruct;

impl Component for SelfDestruct {
    fn update_order(&self) -> i32 {
        10
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, _delta_time: f32) {
        ctx.mark_dead();
    }
}

#[test]
fn test_actor_spawned_mid_frame_waits_a_frame() {
    let log = CallLog::default();
    let child = Rc::new(RefCell::new(None));

    let mut world = World::default();
    let parent = world.add_actor(Actor::new("parent"));
    world.add_component(parent, Spawner { log: Rc::clone(&log), child: Rc::clone(&child) });

    world.update(0.016);
    let child_id = child.borrow().unwrap();
    assert_eq!(count(&log, "child:update"), 0);
    assert!(world.active_actors().contains(&child_id));
    assert!(world.pending_actors().is_empty());

    // Flushed with a fresh world matrix and a registered box
    assert_relative_eq!(world.transform(child_id).world_transform()[(0, 3)], 5.0);
    let segment = LineSegment::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(world.phys().segment_cast(&segment).unwrap().actor, child_id);

    world.update(0.016);
    assert_eq!(count(&log, "child:update"), 1);
}

#[test]
fn test_actor_spawned_during_input_waits_for_next_frame() {
    struct InputSpawner {
        log: CallLog,
        spawned: bool,
    }

    impl Component for InputSpawner {
        fn process_input(&mut self, ctx: &mut ActorContext<'_>, _input: &InputState) {
            if !self.spawned {
                let child = ctx.spawn(Actor::new("child"));
                ctx.add_component(child, Probe::new("child", &self.log));
                self.spawned = true;
            }
        }
    }

    let log = CallLog::default();
    let mut world = World::default();
    let parent = world.add_actor(Actor::new("parent"));
    world.add_component(parent, InputSpawner { log: Rc::clone(&log), spawned: false });

    world.tick(&InputState::default(), 0.016);
    assert!(log.borrow().is_empty());

    world.tick(&InputState::default(), 0.016);
    assert_eq!(*log.borrow(), vec!["child:input".to_string(), "child:update".to_string()]);
}

#[test]
fn test_actor_killed_before_its_turn_keeps_call_count() {
    let log = CallLog::default();
    let mut world = World::default();

    let killer = world.add_actor(Actor::new("killer"));
    let victim = world.add_actor(Actor::new("victim"));
    world.add_component(victim, Probe::new("victim", &log));
    world.add_component(killer, Killer { target: victim, on_frame: 2, frame: 0 });

    world.update(0.016);
    assert_eq!(count(&log, "victim:update"), 1);

    world.update(0.016);
    assert_eq!(count(&log, "victim:update"), 1);
    assert!(!world.contains(victim));
    assert!(!world.active_actors().contains(&victim));

    world.update(0.016);
    assert_eq!(count(&log, "victim:update"), 1);
}

#[test]
fn test_actor_killed_after_its_turn_keeps_call_count() {
    let log = CallLog::default();
    let mut world = World::default();

    let victim = world.add_actor(Actor::new("victim"));
    world.add_component(victim, Probe::new("victim", &log));
    let killer = world.add_actor(Actor::new("killer"));
    world.add_component(killer, Killer { target: victim, on_frame: 1, frame: 0 });

    world.update(0.016);
    assert_eq!(count(&log, "victim:update"), 1);
    assert!(!world.contains(victim));
    assert_eq!(world.active_actors(), &[killer]);
}

#[test]
fn test_self_destruct_skips_later_components() {
    let log = CallLog::default();
    let mut world = World::default();
    let id = world.add_actor(Actor::new("fuse"));
    world.add_component(id, Probe::ordered("late", 200, &log));
    world.add_component(id, SelfDestruct);

    world.update(0.016);
    assert_eq!(count(&log, "late:update"), 0);
    assert!(!world.contains(id));
}

#[test]
fn test_update_order_ties_run_in_attachment_order() {
    let log = CallLog::default();
    let mut world = World::default();
    let id = world.add_actor(Actor::new("ordered"));
    for (label, order) in [("a", 100), ("b", 10), ("c", 100), ("d", 10), ("e", 200)] {
        world.add_component(id, Probe::ordered(label, order, &log));
    }

    world.update(0.016);
    let expected: Vec<String> = ["b", "d", "a", "c", "e"]
        .iter()
        .map(|label| format!("{label}:update"))
        .collect();
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn test_component_attached_mid_update_runs_next_frame_in_order() {
    struct Grafter {
        log: CallLog,
        done: bool,
    }

    impl Component for Grafter {
        fn update(&mut self, ctx: &mut ActorContext<'_>, _delta_time: f32) {
            if !self.done {
                let owner = ctx.owner();
                ctx.add_component(owner, Probe::ordered("early", 1, &self.log));
                self.done = true;
            }
        }
    }

    let log = CallLog::default();
    let mut world = World::default();
    let id = world.add_actor(Actor::new("host"));
    world.add_component(id, Grafter { log: Rc::clone(&log), done: false });
    world.add_component(id, Probe::ordered("late", 300, &log));

    world.update(0.016);
    assert_eq!(*log.borrow(), vec!["late:update".to_string()]);
    assert_eq!(world.actor(id).unwrap().component_count(), 3);

    log.borrow_mut().clear();
    world.update(0.016);
    assert_eq!(*log.borrow(), vec!["early:update".to_string(), "late:update".to_string()]);
}

#[test]
fn test_movement_refreshes_sibling_box_within_update() {
    let mut world = World::default();
    let id = world.add_actor(Actor::new("ship"));
    world.add_component(id, MoveComponent::new().with_forward_speed(300.0));
    world.add_component(id, BoxComponent::new(Aabb::new(Vec3::repeat(-1.0), Vec3::repeat(1.0))));

    world.update(0.1);

    let (_, entry) = world.phys().iter().next().unwrap();
    assert_relative_eq!(entry.world_box.center(), Vec3::new(30.0, 0.0, 0.0), epsilon = 1e-4);
}

#[test]
fn test_box_attached_mid_update_follows_later_movement() {
    struct BoxGrafter {
        done: bool,
    }

    impl Component for BoxGrafter {
        fn update_order(&self) -> i32 {
            1
        }

        fn update(&mut self, ctx: &mut ActorContext<'_>, _delta_time: f32) {
            if !self.done {
                let owner = ctx.owner();
                ctx.add_component(owner, BoxComponent::new(Aabb::new(Vec3::repeat(-1.0), Vec3::repeat(1.0))));
                self.done = true;
            }
        }
    }

    let mut world = World::default();
    let id = world.add_actor(Actor::new("ship"));
    world.add_component(id, BoxGrafter { done: false });
    world.add_component(id, MoveComponent::new().with_forward_speed(300.0));

    world.update(0.1);

    assert_relative_eq!(world.transform(id).position(), Vec3::new(30.0, 0.0, 0.0), epsilon = 1e-4);
    let (_, entry) = world.phys().iter().next().unwrap();
    assert_relative_eq!(entry.world_box.center(), Vec3::new(30.0, 0.0, 0.0), epsilon = 1e-4);

    let segment = LineSegment::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -10.0));
    assert!(world.phys().segment_cast(&segment).is_none());
}

#[test]
fn test_paused_actor_skips_dispatch_but_box_stays_fresh() {
    let log = CallLog::default();
    let mut world = World::default();
    let id = world.add_actor(Actor::new("statue"));
    world.add_component(id, Probe::new("statue", &log));
    world.add_component(id, BoxComponent::new(Aabb::new(Vec3::repeat(-1.0), Vec3::repeat(1.0))));
    world.set_state(id, ActorState::Paused);

    world.tick(&InputState::default(), 0.016);
    assert!(log.borrow().is_empty());

    world.set_position(id, Vec3::new(50.0, 0.0, 0.0));
    let segment = LineSegment::new(Vec3::zeros(), Vec3::new(100.0, 0.0, 0.0));
    let info = world.phys().segment_cast(&segment).unwrap();
    assert_eq!(info.actor, id);
    assert_relative_eq!(info.t, 0.49, epsilon = 1e-6);

    world.set_state(id, ActorState::Active);
    world.update(0.016);
    assert_eq!(count(&log, "statue:update"), 1);
}

#[test]
fn test_clear_detaches_everything() {
    let mut world = World::default();
    for x in [0.0, 10.0, 20.0] {
        let id = world.add_actor(Actor::new("crate").with_position(Vec3::new(x, 0.0, 0.0)));
        world.add_component(id, BoxComponent::new(Aabb::new(Vec3::repeat(-1.0), Vec3::repeat(1.0))));
    }
    assert_eq!(world.phys().len(), 3);

    world.clear();
    assert_eq!(world.actor_count(), 0);
    assert!(world.active_actors().is_empty());
    assert!(world.phys().is_empty());
}

#[test]
#[should_panic(expected = "does not exist")]
fn test_double_destroy_panics() {
    let mut world = World::default();
    let id = world.add_actor(Actor::new("once"));
    world.destroy_actor(id);
    world.destroy_actor(id);
}

#[test]
#[should_panic(expected = "during dispatch")]
fn test_destroy_during_update_panics() {
    struct Vandal(ActorId);

    impl Component for Vandal {
        fn update(&mut self, ctx: &mut ActorContext<'_>, _delta_time: f32) {
            ctx.world_mut().destroy_actor(self.0);
        }
    }

    let mut world = World::default();
    let victim = world.add_actor(Actor::new("victim"));
    let vandal = world.add_actor(Actor::new("vandal"));
    world.add_component(vandal, Vandal(victim));
    world.update(0.016);
}

#[test]
#[should_panic(expected = "is not attached")]
fn test_remove_missing_component_panics() {
    let log = CallLog::default();
    let mut world = World::default();
    let id = world.add_actor(Actor::new("host"));
    let cid = world.add_component(id, Probe::new("probe", &log));
    world.remove_component(id, cid);
    world.remove_component(id, cid);
}

#[test]
#[should_panic(expected = "is dead")]
fn test_dead_actor_cannot_be_revived() {
    let mut world = World::default();
    let id = world.add_actor(Actor::new("ghost"));
    world.mark_dead(id);
    world.set_state(id, ActorState::Active);
}
