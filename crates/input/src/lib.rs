//! Input handling: keyboard, pointer look, touch drag, virtual joystick and
//! discrete player actions.

use glam::Vec2;
use std::collections::{HashSet, VecDeque};

/// Discrete player actions delivered to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Pick up the evidence in front of the player.
    Grab,
    /// Fire the pistol.
    Shoot,
    /// Holster or draw the pistol.
    TogglePistol,
    /// Open or close the suspect dossier.
    ToggleDossier,
}

/// Key bindings for the discrete actions.
fn action_for_key(key: KeyCode) -> Option<ActionKind> {
    match key {
        KeyCode::KeyG => Some(ActionKind::Grab),
        KeyCode::KeyP => Some(ActionKind::TogglePistol),
        KeyCode::KeyE => Some(ActionKind::ToggleDossier),
        _ => None,
    }
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,

    /// Pointer movement delta for this frame, in pixels.
    mouse_delta: Vec2,
    /// Pointer movement gathered since the last frame.
    accumulated_mouse: Vec2,
    /// Touch-drag delta for this frame, in pixels.
    touch_delta: Vec2,
    /// Touch drag gathered since the last frame.
    accumulated_touch: Vec2,

    /// Virtual joystick, each axis in [-1, 1]. +Y points down the screen.
    stick: Vec2,

    /// Whether the cursor is captured/locked.
    cursor_locked: bool,

    /// Actions waiting for the simulation, oldest first.
    actions: VecDeque<ActionKind>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_delta = std::mem::take(&mut self.accumulated_mouse);
        self.touch_delta = std::mem::take(&mut self.accumulated_touch);
    }

    /// Process a keyboard event. Bound keys queue their action on the initial press.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                    if let Some(action) = action_for_key(key) {
                        self.actions.push_back(action);
                    }
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process a mouse button event. A left click fires only while the cursor is captured.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.mouse_held.insert(button) {
                    self.mouse_pressed.insert(button);
                    if button == MouseButton::Left && self.cursor_locked {
                        self.actions.push_back(ActionKind::Shoot);
                    }
                }
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process raw pointer motion. Ignored unless the cursor is captured.
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.cursor_locked {
            self.accumulated_mouse.x += delta.0 as f32;
            self.accumulated_mouse.y += delta.1 as f32;
        }
    }

    /// Process a look drag from a touch screen.
    pub fn process_touch_drag(&mut self, delta: Vec2) {
        self.accumulated_touch += delta;
    }

    /// Set the virtual joystick vector; each axis is clamped to [-1, 1].
    pub fn set_stick(&mut self, stick: Vec2) {
        self.stick = stick.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    /// Queue an action from an on-screen button.
    pub fn push_action(&mut self, action: ActionKind) {
        self.actions.push_back(action);
    }

    /// Take every queued action, oldest first.
    pub fn drain_actions(&mut self) -> Vec<ActionKind> {
        self.actions.drain(..).collect()
    }

    /// Drop queued actions and per-frame motion, e.g. between levels.
    pub fn clear_pending(&mut self) {
        self.actions.clear();
        self.accumulated_mouse = Vec2::ZERO;
        self.accumulated_touch = Vec2::ZERO;
        self.mouse_delta = Vec2::ZERO;
        self.touch_delta = Vec2::ZERO;
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Pointer movement for this frame, in pixels.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Touch drag for this frame, in pixels.
    pub fn touch_delta(&self) -> Vec2 {
        self.touch_delta
    }

    pub fn stick(&self) -> Vec2 {
        self.stick
    }

    /// Check if the cursor is locked.
    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Set cursor lock state.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    /// Movement intent in camera space: x = strafe right, y = forward.
    ///
    /// Keyboard and joystick contributions are summed, then clamped to unit
    /// length: combined input is never faster than one axis, a partly
    /// pushed stick walks slower.
    pub fn movement_intent(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.is_key_held(KeyCode::KeyW) {
            movement.y += 1.0;
        }
        if self.is_key_held(KeyCode::KeyS) {
            movement.y -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyA) {
            movement.x -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) {
            movement.x += 1.0;
        }

        movement.x += self.stick.x;
        movement.y -= self.stick.y;

        movement.clamp_length_max(1.0)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;
