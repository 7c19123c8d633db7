//! Movement components
//!
//! [`MoveComponent`] turns forward, strafe and angular speeds into changes of
//! the owner's transform. [`InputComponent`] wraps one and derives the speeds
//! from the keyboard.

use crate::foundation::math::utils::{axis_angle, concatenate, near_zero, unit_up};
use crate::input::{InputState, KeyCode};
use crate::scene::{ActorContext, Component};

/// Update order of movement; cameras run after it
pub const MOVE_UPDATE_ORDER: i32 = 10;

/// Moves the owner along its forward and right axes and turns it about Z
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveComponent {
    /// Units per second along forward
    pub forward_speed: f32,
    /// Units per second along right
    pub strafe_speed: f32,
    /// Radians per second about world up
    pub angular_speed: f32,
}

impl MoveComponent {
    /// Create a stationary mover
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set forward speed
    pub fn with_forward_speed(mut self, speed: f32) -> Self {
        self.forward_speed = speed;
        self
    }

    /// Builder pattern: set angular speed
    pub fn with_angular_speed(mut self, speed: f32) -> Self {
        self.angular_speed = speed;
        self
    }

    /// Apply one step of motion to the context's owner
    ///
    /// Rotation is applied first so translation uses the new axes.
    pub fn step(&self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        if !near_zero(self.angular_speed) {
            let increment = axis_angle(&unit_up(), self.angular_speed * delta_time);
            let rotation = concatenate(&ctx.rotation(), &increment);
            ctx.set_rotation(rotation);
        }

        if !near_zero(self.forward_speed) || !near_zero(self.strafe_speed) {
            let mut position = ctx.position();
            position += ctx.forward() * self.forward_speed * delta_time;
            position += ctx.right() * self.strafe_speed * delta_time;
            ctx.set_position(position);
        }
    }
}

impl Component for MoveComponent {
    fn update_order(&self) -> i32 {
        MOVE_UPDATE_ORDER
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        self.step(ctx, delta_time);
    }
}

/// Keys driving an [`InputComponent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Full forward speed
    pub forward: KeyCode,
    /// Full reverse speed
    pub back: KeyCode,
    /// Turn clockwise seen from above
    pub clockwise: KeyCode,
    /// Turn counter-clockwise seen from above
    pub counter_clockwise: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::W,
            back: KeyCode::S,
            clockwise: KeyCode::D,
            counter_clockwise: KeyCode::A,
        }
    }
}

/// Keyboard-driven movement
#[derive(Debug, Clone, Default)]
pub struct InputComponent {
    movement: MoveComponent,
    bindings: KeyBindings,
    max_forward_speed: f32,
    max_angular_speed: f32,
}

impl InputComponent {
    /// Keyboard movement with the default WASD bindings
    pub fn new(max_forward_speed: f32, max_angular_speed: f32) -> Self {
        Self {
            movement: MoveComponent::new(),
            bindings: KeyBindings::default(),
            max_forward_speed,
            max_angular_speed,
        }
    }

    /// Builder pattern: replace the key bindings
    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Speeds derived from the last input snapshot
    pub fn movement(&self) -> &MoveComponent {
        &self.movement
    }
}

impl Component for InputComponent {
    fn update_order(&self) -> i32 {
        MOVE_UPDATE_ORDER
    }

    fn process_input(&mut self, _ctx: &mut ActorContext<'_>, input: &InputState) {
        let keys = &input.keyboard;

        let mut forward = 0.0;
        if keys.key_value(self.bindings.forward) {
            forward += self.max_forward_speed;
        }
        if keys.key_value(self.bindings.back) {
            forward -= self.max_forward_speed;
        }
        self.movement.forward_speed = forward;

        let mut angular = 0.0;
        if keys.key_value(self.bindings.clockwise) {
            angular += self.max_angular_speed;
        }
        if keys.key_value(self.bindings.counter_clockwise) {
            angular -= self.max_angular_speed;
        }
        self.movement.angular_speed = angular;
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_time: f32) {
        self.movement.step(ctx, delta_time);
    }
}
