//! Input snapshot
//!
//! The kernel never polls devices. The frame driver hands the
//! [`InputSystem`] a [`RawInput`] each frame, and the system derives an
//! immutable [`InputState`] whose button queries report
//! None/Pressed/Released/Held by comparing the current and previous frame.

use std::collections::HashSet;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::config::InputConfig;
use crate::foundation::math::Vec2;

/// Per-frame state of a digital button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// Up this frame and last frame
    None,
    /// Went down this frame
    Pressed,
    /// Went up this frame
    Released,
    /// Down this frame and last frame
    Held,
}

impl ButtonState {
    /// Derive the state from the previous and current raw values
    pub fn from_values(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, false) => Self::None,
            (false, true) => Self::Pressed,
            (true, false) => Self::Released,
            (true, true) => Self::Held,
        }
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

bitflags! {
    /// Raw mouse button mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u32 {
        /// Left button down
        const LEFT = 1 << 0;
        /// Middle button down
        const MIDDLE = 1 << 1;
        /// Right button down
        const RIGHT = 1 << 2;
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
        }
    }
}

/// Game controller buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerButton {
    /// Bottom face button
    A,
    /// Right face button
    B,
    /// Left face button
    X,
    /// Top face button
    Y,
    /// Back / select
    Back,
    /// Start
    Start,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// D-pad up
    DPadUp,
    /// D-pad down
    DPadDown,
    /// D-pad left
    DPadLeft,
    /// D-pad right
    DPadRight,
}

/// Keyboard snapshot
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    current: HashSet<KeyCode>,
    previous: HashSet<KeyCode>,
}

impl KeyboardState {
    /// True while `key` is down
    pub fn key_value(&self, key: KeyCode) -> bool {
        self.current.contains(&key)
    }

    /// Transition of `key` since last frame
    pub fn key_state(&self, key: KeyCode) -> ButtonState {
        ButtonState::from_values(self.previous.contains(&key), self.current.contains(&key))
    }
}

/// Mouse snapshot
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    current: MouseButtons,
    previous: MouseButtons,
    position: Vec2,
    scroll_wheel: Vec2,
    relative: bool,
}

impl MouseState {
    /// True while `button` is down
    pub fn button_value(&self, button: MouseButton) -> bool {
        self.current.contains(button.into())
    }

    /// Transition of `button` since last frame
    pub fn button_state(&self, button: MouseButton) -> ButtonState {
        let mask = MouseButtons::from(button);
        ButtonState::from_values(self.previous.contains(mask), self.current.contains(mask))
    }

    /// Cursor position, or motion since last frame in relative mode
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Scroll accumulated this frame on both axes
    pub fn scroll_wheel(&self) -> Vec2 {
        self.scroll_wheel
    }

    /// Whether the mouse reports relative motion
    pub fn is_relative(&self) -> bool {
        self.relative
    }
}

/// Controller snapshot with filtered analog values
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    current: HashSet<ControllerButton>,
    previous: HashSet<ControllerButton>,
    left_stick: Vec2,
    right_stick: Vec2,
    left_trigger: f32,
    right_trigger: f32,
    connected: bool,
}

impl ControllerState {
    /// True while `button` is down
    pub fn button_value(&self, button: ControllerButton) -> bool {
        self.current.contains(&button)
    }

    /// Transition of `button` since last frame
    pub fn button_state(&self, button: ControllerButton) -> ButtonState {
        ButtonState::from_values(self.previous.contains(&button), self.current.contains(&button))
    }

    /// Left stick, each axis in [-1, 1]
    pub fn left_stick(&self) -> Vec2 {
        self.left_stick
    }

    /// Right stick, each axis in [-1, 1]
    pub fn right_stick(&self) -> Vec2 {
        self.right_stick
    }

    /// Left trigger in [0, 1]
    pub fn left_trigger(&self) -> f32 {
        self.left_trigger
    }

    /// Right trigger in [0, 1]
    pub fn right_trigger(&self) -> f32 {
        self.right_trigger
    }

    /// Whether a controller is attached
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Immutable per-frame input snapshot handed to components
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Keyboard
    pub keyboard: KeyboardState,
    /// Mouse
    pub mouse: MouseState,
    /// Controller
    pub controller: ControllerState,
}

/// Raw controller readings in device units
#[derive(Debug, Clone, Default)]
pub struct RawController {
    /// Buttons currently down
    pub buttons: Vec<ControllerButton>,
    /// Left stick axes
    pub left_stick: (i32, i32),
    /// Right stick axes
    pub right_stick: (i32, i32),
    /// Left trigger
    pub left_trigger: i32,
    /// Right trigger
    pub right_trigger: i32,
}

/// Raw device readings supplied by the frame driver
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    /// Keys currently down
    pub keys: Vec<KeyCode>,
    /// Mouse buttons currently down
    pub mouse_buttons: MouseButtons,
    /// Cursor position or relative motion
    pub mouse_position: Vec2,
    /// Whether the mouse is in relative mode
    pub relative_mouse: bool,
    /// Controller readings, `None` when disconnected
    pub controller: Option<RawController>,
}

/// Builds the [`InputState`] snapshot frame by frame
pub struct InputSystem {
    state: InputState,
    config: InputConfig,
}

impl InputSystem {
    /// Create an input system with the given analog filtering settings
    pub fn new(config: InputConfig) -> Self {
        Self {
            state: InputState::default(),
            config,
        }
    }

    /// Roll the current values into the previous frame before new readings arrive
    pub fn prepare_for_update(&mut self) {
        let state = &mut self.state;
        state.keyboard.previous = std::mem::take(&mut state.keyboard.current);
        state.mouse.previous = state.mouse.current;
        state.mouse.scroll_wheel = Vec2::zeros();
        state.controller.previous = std::mem::take(&mut state.controller.current);
    }

    /// Accumulate a scroll event received between frames
    pub fn add_scroll(&mut self, delta: Vec2) {
        self.state.mouse.scroll_wheel += delta;
    }

    /// Take this frame's raw readings
    pub fn update(&mut self, raw: &RawInput) {
        let state = &mut self.state;
        state.keyboard.current = raw.keys.iter().copied().collect();

        state.mouse.current = raw.mouse_buttons;
        state.mouse.position = raw.mouse_position;
        state.mouse.relative = raw.relative_mouse;

        let controller = &mut state.controller;
        match &raw.controller {
            Some(pad) => {
                controller.connected = true;
                controller.current = pad.buttons.iter().copied().collect();
                controller.left_trigger = filter_1d(pad.left_trigger, &self.config);
                controller.right_trigger = filter_1d(pad.right_trigger, &self.config);
                controller.left_stick = filter_2d(pad.left_stick.0, pad.left_stick.1, &self.config);
                controller.right_stick = filter_2d(pad.right_stick.0, pad.right_stick.1, &self.config);
            }
            None => {
                controller.connected = false;
                controller.current.clear();
                controller.left_trigger = 0.0;
                controller.right_trigger = 0.0;
                controller.left_stick = Vec2::zeros();
                controller.right_stick = Vec2::zeros();
            }
        }

        log::trace!("Input updated: {} keys down", state.keyboard.current.len());
    }

    /// The current snapshot
    pub fn state(&self) -> &InputState {
        &self.state
    }
}

/// Map a raw trigger value to [-1, 1] with a dead zone
pub fn filter_1d(input: i32, config: &InputConfig) -> f32 {
    let magnitude = input.unsigned_abs() as f32;
    let dead_zone = config.trigger_dead_zone as f32;
    let max = config.trigger_max as f32;

    if magnitude <= dead_zone {
        return 0.0;
    }

    let value = ((magnitude - dead_zone) / (max - dead_zone)).min(1.0);
    value.copysign(input as f32)
}

/// Map raw stick axes to a vector of length at most 1 with a radial dead zone
pub fn filter_2d(input_x: i32, input_y: i32, config: &InputConfig) -> Vec2 {
    let dir = Vec2::new(input_x as f32, input_y as f32);
    let length = dir.magnitude();

    if length < config.stick_dead_zone || length <= 0.0 {
        return Vec2::zeros();
    }

    let value = ((length - config.stick_dead_zone) / (config.stick_max - config.stick_dead_zone))
        .clamp(0.0, 1.0);
    dir * (value / length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_key_transitions() {
        let mut input = InputSystem::new(InputConfig::default());
        let frames: [&[KeyCode]; 4] = [&[KeyCode::W], &[KeyCode::W], &[], &[]];
        let expected = [ButtonState::Pressed, ButtonState::Held, ButtonState::Released, ButtonState::None];

        for (keys, state) in frames.iter().zip(expected) {
            input.prepare_for_update();
            input.update(&RawInput { keys: keys.to_vec(), ..RawInput::default() });
            assert_eq!(input.state().keyboard.key_state(KeyCode::W), state);
        }
    }

    #[test]
    fn test_mouse_buttons_and_scroll() {
        let mut input = InputSystem::new(InputConfig::default());

        input.prepare_for_update();
        input.add_scroll(Vec2::new(0.0, 2.0));
        input.update(&RawInput { mouse_buttons: MouseButtons::LEFT, ..RawInput::default() });
        let mouse = &input.state().mouse;
        assert_eq!(mouse.button_state(MouseButton::Left), ButtonState::Pressed);
        assert!(!mouse.button_value(MouseButton::Right));
        assert_relative_eq!(mouse.scroll_wheel(), Vec2::new(0.0, 2.0));

        input.prepare_for_update();
        input.update(&RawInput { mouse_buttons: MouseButtons::RIGHT, ..RawInput::default() });
        let mouse = &input.state().mouse;
        assert_eq!(mouse.button_state(MouseButton::Left), ButtonState::Released);
        assert_eq!(mouse.button_state(MouseButton::Right), ButtonState::Pressed);
        assert_relative_eq!(mouse.scroll_wheel(), Vec2::zeros());
    }

    #[test]
    fn test_trigger_filter() {
        let config = InputConfig::default();
        assert_eq!(filter_1d(200, &config), 0.0);
        assert_eq!(filter_1d(30000, &config), 1.0);
        assert_eq!(filter_1d(32767, &config), 1.0);
        assert_relative_eq!(filter_1d(-15125, &config), -0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_stick_filter() {
        let config = InputConfig::default();
        assert_relative_eq!(filter_2d(4000, 4000, &config), Vec2::zeros());

        let full = filter_2d(0, 32000, &config);
        assert_relative_eq!(full, Vec2::new(0.0, 1.0), epsilon = 1e-6);

        let half = filter_2d(19000, 0, &config);
        assert_relative_eq!(half, Vec2::new(0.5, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_centred_stick_without_dead_zone() {
        let config = InputConfig { stick_dead_zone: 0.0, ..InputConfig::default() };
        assert_eq!(filter_2d(0, 0, &config), Vec2::zeros());

        let small = filter_2d(300, 0, &config);
        assert_relative_eq!(small, Vec2::new(0.01, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_disconnected_controller_reads_zero() {
        let mut input = InputSystem::new(InputConfig::default());
        input.prepare_for_update();
        input.update(&RawInput {
            controller: Some(RawController {
                buttons: vec![ControllerButton::A],
                right_trigger: 30000,
                ..RawController::default()
            }),
            ..RawInput::default()
        });
        let pad = &input.state().controller;
        assert!(pad.is_connected());
        assert_eq!(pad.button_state(ControllerButton::A), ButtonState::Pressed);
        assert_eq!(pad.right_trigger(), 1.0);

        input.prepare_for_update();
        input.update(&RawInput::default());
        let pad = &input.state().controller;
        assert!(!pad.is_connected());
        assert_eq!(pad.button_state(ControllerButton::A), ButtonState::Released);
        assert_eq!(pad.right_trigger(), 0.0);
    }
}
