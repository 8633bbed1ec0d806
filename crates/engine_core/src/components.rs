//! Common ECS components used across the simulation.

use glam::Vec3;
use hecs::Entity;

/// Velocity component for moving entities, in world units per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self { linear }
    }

    /// Planar velocity of the given speed heading `angle` radians from +X toward +Z.
    pub fn planar(angle: f32, speed: f32) -> Self {
        Self {
            linear: Vec3::new(angle.cos() * speed, 0.0, angle.sin() * speed),
        }
    }
}

/// World-space position component.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub Vec3);

/// Yaw about +Y that a body is facing, in radians. Zero faces +Z.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Facing {
    pub yaw: f32,
}

impl Facing {
    /// Heading of a planar vector, or `None` when it has no usable direction.
    pub fn heading_of(v: Vec3) -> Option<f32> {
        if v.x == 0.0 && v.z == 0.0 {
            None
        } else {
            Some(v.x.atan2(v.z))
        }
    }
}

/// Logical entity kinds that scene queries can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Clue,
    Npc,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Clue => "clue",
            EntityKind::Npc => "npc",
        }
    }
}

/// Immutable (type, id) tag carried by every queryable surface of a logical entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityTag {
    pub kind: EntityKind,
    pub entity: Entity,
}

impl EntityTag {
    pub fn clue(entity: Entity) -> Self {
        Self {
            kind: EntityKind::Clue,
            entity,
        }
    }

    pub fn npc(entity: Entity) -> Self {
        Self {
            kind: EntityKind::Npc,
            entity,
        }
    }
}
