//! Read-only snapshot of a case for the HUD and minimap.

use bytemuck::{Pod, Zeroable};
use engine_core::{Entity, Pose, Position, Vec3};

use crate::clue::Clue;
use crate::level::Level;
use crate::npc::Npc;

/// Minimap marker kinds.
pub const MARKER_PLAYER: u32 = 0;
pub const MARKER_SUSPECT: u32 = 1;
pub const MARKER_CLUE: u32 = 2;

/// Set on clue markers that have been collected.
pub const MARKER_FLAG_FOUND: u32 = 1;

const CLUE_MARKER_COLOR: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
const PLAYER_MARKER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Minimap marker as uploaded to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MarkerRaw {
    /// Ground-plane position (x, z).
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub kind: u32,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuspectMarker {
    pub entity: Entity,
    pub name: String,
    pub color: [f32; 3],
    /// Last published position, not the live one.
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClueMarker {
    pub entity: Entity,
    pub category: &'static str,
    pub found: bool,
    pub position: Vec3,
}

/// What displays may read between ticks. Never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayProjection {
    pub player: Pose,
    pub suspects: Vec<SuspectMarker>,
    pub clues: Vec<ClueMarker>,
}

impl DisplayProjection {
    pub fn capture(level: &Level, player: &Pose) -> Self {
        let mut suspects: Vec<SuspectMarker> = level
            .world
            .query::<&Npc>()
            .iter()
            .filter_map(|(entity, npc)| {
                Some(SuspectMarker {
                    entity,
                    name: npc.name.clone(),
                    color: npc.color.rgb(),
                    position: level.sightings.get(entity)?,
                })
            })
            .collect();
        suspects.sort_by(|a, b| a.name.cmp(&b.name));

        let mut clues: Vec<ClueMarker> = level
            .world
            .query::<(&Clue, &Position)>()
            .iter()
            .map(|(entity, (clue, position))| ClueMarker {
                entity,
                category: clue.category,
                found: clue.is_found(),
                position: position.0,
            })
            .collect();
        clues.sort_by_key(|c| c.category);

        Self {
            player: *player,
            suspects,
            clues,
        }
    }

    pub fn found_count(&self) -> usize {
        self.clues.iter().filter(|c| c.found).count()
    }

    /// Marker buffer: player first, then suspects, then clues.
    pub fn markers(&self) -> Vec<MarkerRaw> {
        let ground = |p: Vec3| [p.x, p.z];
        let mut markers = Vec::with_capacity(1 + self.suspects.len() + self.clues.len());

        markers.push(MarkerRaw {
            position: ground(self.player.position),
            color: PLAYER_MARKER_COLOR,
            kind: MARKER_PLAYER,
            flags: 0,
        });
        markers.extend(self.suspects.iter().map(|s| MarkerRaw {
            position: ground(s.position),
            color: [s.color[0], s.color[1], s.color[2], 1.0],
            kind: MARKER_SUSPECT,
            flags: 0,
        }));
        markers.extend(self.clues.iter().map(|c| MarkerRaw {
            position: ground(c.position),
            color: CLUE_MARKER_COLOR,
            kind: MARKER_CLUE,
            flags: if c.found { MARKER_FLAG_FOUND } else { 0 },
        }));
        markers
    }
}
