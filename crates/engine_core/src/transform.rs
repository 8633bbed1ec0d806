//! First-person pose: a position plus yaw/pitch orientation.

use glam::{Quat, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Viewer pose. Yaw rotates about +Y (positive turns left), pitch about the
/// local X axis (positive looks up). At zero yaw and pitch the view faces -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl Pose {
    /// Create a pose at the given position looking down -Z.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Orientation as a quaternion (yaw applied after pitch).
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Unit view direction including pitch.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Forward direction projected onto the ground plane. Pitch is ignored.
    pub fn planar_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    /// Right direction on the ground plane.
    pub fn planar_right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    /// Rotate a camera-local intent (x = strafe right, y = forward) by yaw only.
    pub fn local_to_world(&self, intent: Vec2) -> Vec3 {
        self.planar_right() * intent.x + self.planar_forward() * intent.y
    }

    /// Apply a look delta in radians. Pitch stays within [-pi/2, pi/2].
    pub fn apply_look(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

/// Wrap an angle into (-pi, pi].
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn default_pose_faces_negative_z() {
        let pose = Pose::default();
        assert!(approx(pose.forward(), Vec3::NEG_Z));
        assert!(approx(pose.planar_right(), Vec3::X));
    }

    #[test]
    fn forward_matches_rotation_quaternion() {
        let pose = Pose {
            position: Vec3::ZERO,
            yaw: 0.7,
            pitch: -0.3,
        };
        assert!(approx(pose.forward(), pose.rotation() * Vec3::NEG_Z));
    }

    #[test]
    fn planar_movement_ignores_pitch() {
        let pose = Pose {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 1.2,
        };
        let world = pose.local_to_world(Vec2::new(0.0, 1.0));
        assert!(approx(world, Vec3::NEG_Z));
    }

    #[test]
    fn quarter_turn_left_faces_negative_x() {
        let pose = Pose {
            position: Vec3::ZERO,
            yaw: FRAC_PI_2,
            pitch: 0.0,
        };
        assert!(approx(pose.planar_forward(), Vec3::NEG_X));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut pose = Pose::default();
        pose.apply_look(0.0, 10.0);
        assert_eq!(pose.pitch, FRAC_PI_2);
        pose.apply_look(0.0, -20.0);
        assert_eq!(pose.pitch, -FRAC_PI_2);
    }

    #[test]
    fn wrap_angle_range() {
        use std::f32::consts::PI;
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-6);
        assert!((wrap_angle(2.0 * PI + 0.25) - 0.25).abs() < 1e-5);
    }
}
