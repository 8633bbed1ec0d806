//! Queryable scene surfaces and the tags that map them back to entities.

use std::collections::HashMap;

use engine_core::{EntityTag, Position, Vec3};
use hecs::World;
use physics::{ColliderShape, PhysicsWorld};
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::clue::Clue;

/// Every collider that belongs to a clue or a suspect, with its owner.
///
/// Walls and the floor are absent: a hit on them resolves to no tag.
#[derive(Debug, Default, Clone)]
pub struct SceneTags {
    tags: HashMap<ColliderHandle, EntityTag>,
}

impl SceneTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collider: ColliderHandle, tag: EntityTag) {
        self.tags.insert(collider, tag);
    }

    pub fn get(&self, collider: ColliderHandle) -> Option<EntityTag> {
        self.tags.get(&collider).copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Kinematic body that carries a suspect's colliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NpcBody(pub RigidBodyHandle);

/// Hit radius of an evidence item.
pub const CLUE_HIT_RADIUS: f32 = procgen::CLUE_RADIUS;

/// Suspect hit shapes relative to the feet: torso capsule, head, optional hat.
pub fn npc_hit_shapes(wears_hat: bool) -> Vec<(ColliderShape, Vec3)> {
    let mut shapes = vec![
        (
            ColliderShape::Capsule {
                half_height: 0.5,
                radius: 0.25,
            },
            Vec3::new(0.0, 0.9, 0.0),
        ),
        (ColliderShape::Ball { radius: 0.22 }, Vec3::new(0.0, 1.7, 0.0)),
    ];
    if wears_hat {
        shapes.push((
            ColliderShape::Cylinder {
                half_height: 0.125,
                radius: 0.25,
            },
            Vec3::new(0.0, 2.0, 0.0),
        ));
    }
    shapes
}

/// Teleport every suspect body to its live position. Takes effect on the next physics step.
pub fn sync_npc_bodies(world: &World, physics: &mut PhysicsWorld) {
    for (_, (position, body)) in world.query::<(&Position, &NpcBody)>().iter() {
        physics.set_kinematic_translation(body.0, position.0);
    }
}

/// Whether `collider` belongs to a clue that has already been found.
pub fn is_found_clue(world: &World, tags: &SceneTags, collider: ColliderHandle) -> bool {
    tags.get(collider)
        .and_then(|tag| world.get::<&Clue>(tag.entity).ok().map(|clue| clue.is_found()))
        .unwrap_or(false)
}
