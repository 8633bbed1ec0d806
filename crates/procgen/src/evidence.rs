//! Evidence placement and the text that goes with it.

use engine_core::Aabb;
use glam::Vec3;
use rand::Rng;

use crate::floor_plan::FloorPlan;
use crate::roster::SuspectProfile;

/// Evidence categories, in the order clue texts are assigned to them.
pub const EVIDENCE_CATEGORIES: [&str; 5] = [
    "Fingerprint",
    "Bullet Casing",
    "DNA Sample",
    "Fabric Scrap",
    "Lost Badge",
];

/// Number of clues planted per level.
pub const CLUE_COUNT: usize = EVIDENCE_CATEGORIES.len();

/// Height evidence rests at.
pub const CLUE_HEIGHT: f32 = 0.3;

/// Radius of an evidence item, used for placement and hit shapes.
pub const CLUE_RADIUS: f32 = 0.3;

/// Where a piece of evidence sits; its text arrives later.
#[derive(Debug, Clone, PartialEq)]
pub struct ClueSlot {
    /// Stable label such as `clue-2-4`.
    pub label: String,
    pub category: &'static str,
    pub position: Vec3,
}

/// Place one slot per category, clear of walls.
pub fn place_clues(
    level: u32,
    plan: &FloorPlan,
    walls: &[Aabb],
    rng: &mut impl Rng,
) -> Vec<ClueSlot> {
    EVIDENCE_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, &category)| ClueSlot {
            label: format!("clue-{level}-{i}"),
            category,
            position: plan.scatter_point(rng, walls, CLUE_HEIGHT, |p| {
                Aabb::from_center_half_extents(p, Vec3::splat(CLUE_RADIUS))
            }),
        })
        .collect()
}

/// Text used for every category when no generated text is available.
pub fn fallback_clue_texts(profile: &SuspectProfile) -> Vec<String> {
    EVIDENCE_CATEGORIES
        .iter()
        .map(|_| format!("Evidence points towards the one who is {}.", profile.trait_tag))
        .collect()
}

/// Instructions handed to a clue writer for `profile`.
pub fn clue_prompt(profile: &SuspectProfile) -> String {
    format!(
        "Generate {count} short detective clue descriptions (max 12 words each) for a game.\n\
         The target suspect is \"{name}\".\n\
         The suspect's physical trait is \"{trait_tag}\".\n\
         The suspect's uniform color is \"{color}\".\n\
         Return only a JSON array of {count} strings. \
         Each string should subtly hint at one of these 3 identifiers.",
        count = CLUE_COUNT,
        name = profile.name,
        trait_tag = profile.trait_tag,
        color = profile.color,
    )
}
