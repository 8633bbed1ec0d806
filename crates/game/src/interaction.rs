//! Look-at, grab and shoot: what the view ray is pointing at, and what acting on it does.

use engine_core::{Entity, EntityKind, EntityTag, Pose};
use physics::RaycastHit;

use crate::clue::Clue;
use crate::level::Level;
use crate::scene;

/// How far the look-at highlight reaches.
pub const HOVER_RANGE: f32 = 10.0;
/// Evidence must be at most this far from the eye (to its surface).
pub const GRAB_RANGE: f32 = 4.0;
/// Pistol range.
pub const SHOOT_RANGE: f32 = 100.0;

/// Discrete actions the resolver handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Grab,
    Shoot,
}

/// Where the view ray stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayTarget {
    /// A clue or suspect.
    Tagged { tag: EntityTag, distance: f32 },
    /// Something solid that belongs to no clue or suspect.
    Surface { distance: f32 },
    /// Nothing within range.
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabOutcome {
    /// The clue flipped to found.
    Collected(Entity),
    /// Out of range, not a clue, or nothing there.
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The pistol was holstered. Nothing happened.
    NotArmed,
    /// The bullet hit this suspect.
    Suspect(Entity),
    /// The bullet hit a wall, the floor or evidence.
    Surface,
    /// The bullet hit nothing at all.
    Missed,
}

/// Result of [`resolve_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Grab(GrabOutcome),
    Shot(ShotOutcome),
}

/// Cast the view ray. Found clues are see-through.
pub fn cast(level: &Level, pose: &Pose, max_range: f32) -> RayTarget {
    let hit = level
        .physics
        .raycast_filtered(pose.position, pose.forward(), max_range, |collider| {
            scene::is_found_clue(&level.world, &level.tags, collider)
        });

    match hit {
        Some(RaycastHit {
            collider, distance, ..
        }) => match level.tags.get(collider) {
            Some(tag) if level.world.contains(tag.entity) => RayTarget::Tagged { tag, distance },
            _ => RayTarget::Surface { distance },
        },
        None => RayTarget::Nothing,
    }
}

/// The clue or suspect in view within `max_range`, if any.
pub fn classify(level: &Level, pose: &Pose, max_range: f32) -> Option<EntityTag> {
    match cast(level, pose, max_range) {
        RayTarget::Tagged { tag, .. } => Some(tag),
        _ => None,
    }
}

/// Pick up the unfound clue in view. The only writer of a clue's found flag.
pub fn grab(level: &mut Level, pose: &Pose) -> GrabOutcome {
    let RayTarget::Tagged { tag, .. } = cast(level, pose, GRAB_RANGE) else {
        return GrabOutcome::Nothing;
    };
    if tag.kind != EntityKind::Clue {
        return GrabOutcome::Nothing;
    }

    let Ok(mut clue) = level.world.get::<&mut Clue>(tag.entity) else {
        return GrabOutcome::Nothing;
    };
    if !clue.mark_found() {
        return GrabOutcome::Nothing;
    }
    log::info!("Collected {} ({})", clue.label, clue.category);
    GrabOutcome::Collected(tag.entity)
}

/// Fire along the view ray. Deciding what a hit means is up to the caller.
pub fn shoot(level: &Level, pose: &Pose, armed: bool) -> ShotOutcome {
    if !armed {
        return ShotOutcome::NotArmed;
    }
    match cast(level, pose, SHOOT_RANGE) {
        RayTarget::Tagged { tag, .. } if tag.kind == EntityKind::Npc => ShotOutcome::Suspect(tag.entity),
        RayTarget::Tagged { .. } | RayTarget::Surface { .. } => ShotOutcome::Surface,
        RayTarget::Nothing => ShotOutcome::Missed,
    }
}

pub fn resolve_action(action: Action, level: &mut Level, pose: &Pose, armed: bool) -> ActionResult {
    match action {
        Action::Grab => ActionResult::Grab(grab(level, pose)),
        Action::Shoot => ActionResult::Shot(shoot(level, pose, armed)),
    }
}
