//! Suspect roster: names, uniform colours, physical traits and the culprit.

use engine_core::Aabb;
use glam::Vec3;
use rand::Rng;

use crate::floor_plan::FloorPlan;

/// Uniform colour with a display name (for clue text) and a hex code (for rendering).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuspectColor {
    pub name: &'static str,
    pub hex: &'static str,
}

impl SuspectColor {
    /// Colour as linear-ish RGB components in [0, 1].
    pub fn rgb(&self) -> [f32; 3] {
        let digits = self.hex.trim_start_matches('#');
        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .map_or(0.0, |v| v as f32 / 255.0)
        };
        [channel(0), channel(2), channel(4)]
    }
}

/// Uniform palette, assigned by roster index.
pub const SUSPECT_COLORS: [SuspectColor; 10] = [
    SuspectColor { name: "red", hex: "#e74c3c" },
    SuspectColor { name: "green", hex: "#2ecc71" },
    SuspectColor { name: "blue", hex: "#3498db" },
    SuspectColor { name: "yellow", hex: "#f1c40f" },
    SuspectColor { name: "purple", hex: "#9b59b6" },
    SuspectColor { name: "teal", hex: "#1abc9c" },
    SuspectColor { name: "orange", hex: "#e67e22" },
    SuspectColor { name: "white", hex: "#ecf0f1" },
    SuspectColor { name: "navy", hex: "#34495e" },
    SuspectColor { name: "grey", hex: "#7f8c8d" },
];

/// Physical traits; each suspect gets one at random.
pub const SUSPECT_TRAITS: [&str; 10] = [
    "Limps",
    "Tall",
    "Short",
    "Wears Hat",
    "Gloves",
    "Gold Watch",
    "Nervous",
    "Heavy Boots",
    "Smoker",
    "Scarred",
];

/// Trait that adds a hat to the suspect's silhouette (and to its hit shape).
pub const HAT_TRAIT: &str = "Wears Hat";

/// Largest roster any level produces.
pub const MAX_SUSPECTS: usize = 12;

/// Suspects for a level: four plus one per level, capped.
pub fn suspect_count(level: u32) -> usize {
    (4 + level as usize).min(MAX_SUSPECTS)
}

/// One generated suspect before it is spawned into the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SuspectSpec {
    /// Stable label such as `npc-2-3`.
    pub label: String,
    /// Display name such as `Agent D`.
    pub name: String,
    pub color: SuspectColor,
    pub traits: Vec<String>,
    /// Feet position.
    pub position: Vec3,
    pub is_culprit: bool,
}

impl SuspectSpec {
    pub fn primary_trait(&self) -> &str {
        self.traits.first().map(String::as_str).unwrap_or("Unremarkable")
    }

    pub fn wears_hat(&self) -> bool {
        self.traits.iter().any(|t| t == HAT_TRAIT)
    }
}

/// What the clue writer is told about the culprit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspectProfile {
    pub name: String,
    pub trait_tag: String,
    pub color: String,
}

impl From<&SuspectSpec> for SuspectProfile {
    fn from(spec: &SuspectSpec) -> Self {
        Self {
            name: spec.name.clone(),
            trait_tag: spec.primary_trait().to_string(),
            color: spec.color.name.to_string(),
        }
    }
}

/// Display name for roster slot `index`: `Agent A`, `Agent B`, ...
pub fn agent_name(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    format!("Agent {letter}")
}

/// Generate the roster for `level` and mark exactly one culprit.
///
/// Returns the suspects and the culprit's index.
pub fn generate_roster(
    level: u32,
    plan: &FloorPlan,
    walls: &[Aabb],
    rng: &mut impl Rng,
) -> (Vec<SuspectSpec>, usize) {
    let count = suspect_count(level);
    let mut suspects: Vec<SuspectSpec> = (0..count)
        .map(|i| {
            let position = plan.scatter_point(rng, walls, 0.0, |feet| {
                Aabb::from_center_half_extents(feet + Vec3::Y, Vec3::new(0.3, 1.0, 0.3))
            });
            SuspectSpec {
                label: format!("npc-{level}-{i}"),
                name: agent_name(i),
                color: SUSPECT_COLORS[i % SUSPECT_COLORS.len()],
                traits: vec![SUSPECT_TRAITS[rng.gen_range(0..SUSPECT_TRAITS.len())].to_string()],
                position,
                is_culprit: false,
            }
        })
        .collect();

    let culprit = rng.gen_range(0..suspects.len());
    suspects[culprit].is_culprit = true;
    (suspects, culprit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn suspect_count_grows_then_caps() {
        assert_eq!(suspect_count(1), 5);
        assert_eq!(suspect_count(4), 8);
        assert_eq!(suspect_count(8), 12);
        assert_eq!(suspect_count(40), 12);
    }

    #[test]
    fn agent_names_cycle_through_alphabet() {
        assert_eq!(agent_name(0), "Agent A");
        assert_eq!(agent_name(3), "Agent D");
        assert_eq!(agent_name(26), "Agent A");
    }

    #[test]
    fn roster_has_exactly_one_culprit() {
        let plan = FloorPlan::mansion();
        let walls = plan.wall_boxes();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (suspects, culprit) = generate_roster(3, &plan, &walls, &mut rng);
            assert_eq!(suspects.len(), 7);
            assert_eq!(suspects.iter().filter(|s| s.is_culprit).count(), 1);
            assert!(suspects[culprit].is_culprit);
            assert_eq!(suspects[0].label, "npc-3-0");
            assert_eq!(suspects[1].color, SUSPECT_COLORS[1]);
        }
    }

    #[test]
    fn profile_uses_primary_trait_and_colour_name() {
        let spec = SuspectSpec {
            label: "npc-1-0".into(),
            name: "Agent A".into(),
            color: SUSPECT_COLORS[2],
            traits: vec!["Gloves".into()],
            position: Vec3::ZERO,
            is_culprit: true,
        };
        let profile = SuspectProfile::from(&spec);
        assert_eq!(profile.trait_tag, "Gloves");
        assert_eq!(profile.color, "blue");
        assert!(!spec.wears_hat());
    }

    #[test]
    fn hex_colours_parse() {
        let [r, g, b] = SUSPECT_COLORS[0].rgb();
        assert!((r - 0xe7 as f32 / 255.0).abs() < 1e-6);
        assert!((g - 0x4c as f32 / 255.0).abs() < 1e-6);
        assert!((b - 0x3c as f32 / 255.0).abs() < 1e-6);
    }
}
