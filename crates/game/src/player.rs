//! Player controller: first-person walking and looking.

use engine_core::{Pose, Vec2, Vec3};
use input::InputState;
use physics::{probe_axes, BlockedAxes, ProbeShape, WallBounds};

/// Distance walked per tick at full intent.
pub const PLAYER_SPEED: f32 = 0.12;
/// The eye never leaves this height.
pub const EYE_HEIGHT: f32 = 1.7;
/// Radians of turn per pixel of mouse motion.
pub const MOUSE_LOOK_PER_PIXEL: f32 = 0.002;
/// Radians of turn per pixel of touch drag.
pub const TOUCH_LOOK_PER_PIXEL: f32 = 0.005;

/// What the controller consumes each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// x = strafe right, y = forward, length at most 1.
    pub intent: Vec2,
    /// Pointer motion in pixels.
    pub mouse_delta: Vec2,
    /// Touch drag in pixels.
    pub touch_delta: Vec2,
    /// Whether pointer look is captured.
    pub capture_active: bool,
}

impl PlayerInput {
    pub fn sample(input: &InputState) -> Self {
        Self {
            intent: input.movement_intent(),
            mouse_delta: input.mouse_delta(),
            touch_delta: input.touch_delta(),
            capture_active: input.is_cursor_locked(),
        }
    }

    /// Same movement with the look deltas already spent.
    pub fn without_look(self) -> Self {
        Self {
            mouse_delta: Vec2::ZERO,
            touch_delta: Vec2::ZERO,
            ..self
        }
    }
}

/// Player controller handling movement and camera.
#[derive(Debug, Clone)]
pub struct PlayerController {
    pub pose: Pose,
    pub move_speed: f32,
    /// Radians per pixel.
    pub mouse_sensitivity: f32,
    /// Radians per pixel.
    pub touch_sensitivity: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(Self::spawn_point())
    }
}

impl PlayerController {
    pub fn new(position: Vec3) -> Self {
        Self {
            pose: Pose::from_position(Vec3::new(position.x, EYE_HEIGHT, position.z)),
            move_speed: PLAYER_SPEED,
            mouse_sensitivity: MOUSE_LOOK_PER_PIXEL,
            touch_sensitivity: TOUCH_LOOK_PER_PIXEL,
        }
    }

    /// Scale the default look rates.
    pub fn with_sensitivity(mut self, mouse: f32, touch: f32) -> Self {
        self.mouse_sensitivity = MOUSE_LOOK_PER_PIXEL * mouse;
        self.touch_sensitivity = TOUCH_LOOK_PER_PIXEL * touch;
        self
    }

    /// Where every case starts: the middle of the hall.
    pub fn spawn_point() -> Vec3 {
        Vec3::new(0.0, EYE_HEIGHT, 0.0)
    }

    /// Put the player back at the spawn point, looking down -Z.
    pub fn reset(&mut self) {
        self.pose = Pose::from_position(Self::spawn_point());
    }

    /// One tick: walk, then look.
    pub fn update(&mut self, input: &PlayerInput, bounds: &WallBounds) -> BlockedAxes {
        let blocked = self.walk(input.intent, bounds);

        if input.capture_active {
            self.look(input.mouse_delta * self.mouse_sensitivity);
        }
        // Touch drag only arrives while a finger is down, so it is always live.
        self.look(input.touch_delta * self.touch_sensitivity);

        blocked
    }

    /// Move by `intent` (rotated by yaw) and slide along walls. Blocked axes stop.
    pub fn walk(&mut self, intent: Vec2, bounds: &WallBounds) -> BlockedAxes {
        let delta = self.pose.local_to_world(intent) * self.move_speed;
        let probe = probe_axes(self.pose.position, delta, &ProbeShape::PLAYER, bounds);
        self.pose.position = probe.position;
        self.pose.position.y = EYE_HEIGHT;
        probe.blocked
    }

    /// Turn by a look delta in radians: +x turns right, +y looks down.
    pub fn look(&mut self, delta: Vec2) {
        if delta != Vec2::ZERO {
            self.pose.apply_look(-delta.x, -delta.y);
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }
}
