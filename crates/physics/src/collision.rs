//! Per-axis box collision against static walls.
//!
//! A desired displacement is split into X, Y and Z probes, tested in that
//! order. Each probe moves only one axis from the position reached so far; a
//! probe that touches a wall rejects that axis entirely. Rejecting axes
//! independently is what lets an actor slide along a wall instead of stopping.

use crate::WallBounds;
use engine_core::{Aabb, Vec3};

/// Collision box carried by a moving actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeShape {
    pub half_extents: Vec3,
    /// Offset from the actor's position to the box center.
    pub center_offset: Vec3,
}

impl ProbeShape {
    /// 1 x 2 x 1 box centered on the eye point.
    pub const PLAYER: Self = Self {
        half_extents: Vec3::new(0.5, 1.0, 0.5),
        center_offset: Vec3::ZERO,
    };

    /// 0.6 x 2 x 0.6 box standing on the NPC's feet.
    pub const NPC: Self = Self {
        half_extents: Vec3::new(0.3, 1.0, 0.3),
        center_offset: Vec3::new(0.0, 1.0, 0.0),
    };

    pub fn new(half_extents: Vec3, center_offset: Vec3) -> Self {
        Self {
            half_extents,
            center_offset,
        }
    }

    /// The box this shape occupies with the actor at `position`.
    pub fn probe_at(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(position + self.center_offset, self.half_extents)
    }
}

/// Which axes of a displacement were rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockedAxes {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl BlockedAxes {
    fn set(&mut self, axis: usize) {
        match axis {
            0 => self.x = true,
            1 => self.y = true,
            _ => self.z = true,
        }
    }

    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }
}

/// Outcome of probing one displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisProbe {
    /// Position after applying every accepted axis.
    pub position: Vec3,
    pub blocked: BlockedAxes,
}

/// Probe each axis of `delta` against `bounds`.
///
/// Axes with a zero component are never blocked. Displacements longer than
/// the box along an axis are tested in box-sized sub-steps so a thin wall
/// cannot be skipped; any blocked sub-step rejects the whole axis.
pub fn probe_axes(position: Vec3, delta: Vec3, shape: &ProbeShape, bounds: &WallBounds) -> AxisProbe {
    let mut current = position;
    let mut blocked = BlockedAxes::default();

    for axis in 0..3 {
        let step = delta[axis];
        if step == 0.0 {
            continue;
        }

        let span = shape.half_extents[axis].abs() * 2.0;
        let substeps = if span > 0.0 {
            (step.abs() / span).ceil().max(1.0) as u32
        } else {
            1
        };

        let clear = (1..=substeps).all(|i| {
            let mut candidate = current;
            candidate[axis] += step * (i as f32 / substeps as f32);
            !bounds.overlaps_any(&shape.probe_at(candidate))
        });

        if clear {
            current[axis] += step;
        } else {
            blocked.set(axis);
        }
    }

    AxisProbe {
        position: current,
        blocked,
    }
}

/// Allowed position after moving by `delta`. Rejected axes simply stop.
pub fn resolve(position: Vec3, delta: Vec3, shape: &ProbeShape, bounds: &WallBounds) -> Vec3 {
    probe_axes(position, delta, shape, bounds).position
}
