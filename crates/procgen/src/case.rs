//! A whole level's generated content, before clue text is attached.

use engine_core::Aabb;
use rand::{rngs::StdRng, SeedableRng};

use crate::evidence::{self, ClueSlot};
use crate::floor_plan::FloorPlan;
use crate::roster::{self, SuspectProfile, SuspectSpec};

/// Large prime that spreads consecutive levels across the seed space.
const LEVEL_SEED_STRIDE: u64 = 104_729;

/// Everything needed to spawn a level except the clue descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBlueprint {
    pub level: u32,
    pub seed: u64,
    pub plan: FloorPlan,
    pub walls: Vec<Aabb>,
    pub suspects: Vec<SuspectSpec>,
    /// Index into `suspects`.
    pub culprit: usize,
    pub clue_slots: Vec<ClueSlot>,
}

impl CaseBlueprint {
    /// Generate level `level` from `seed`. Same inputs, same blueprint.
    pub fn generate(level: u32, seed: u64) -> Self {
        let level_seed = seed.wrapping_add(u64::from(level).wrapping_mul(LEVEL_SEED_STRIDE));
        let mut rng = StdRng::seed_from_u64(level_seed);

        let plan = FloorPlan::mansion();
        let walls = plan.wall_boxes();
        let (suspects, culprit) = roster::generate_roster(level, &plan, &walls, &mut rng);
        let clue_slots = evidence::place_clues(level, &plan, &walls, &mut rng);

        log::debug!(
            "Case {} (seed {}): {} suspects, culprit {}",
            level,
            seed,
            suspects.len(),
            suspects[culprit].label
        );

        Self {
            level,
            seed,
            plan,
            walls,
            suspects,
            culprit,
            clue_slots,
        }
    }

    pub fn culprit(&self) -> &SuspectSpec {
        &self.suspects[self.culprit]
    }

    pub fn culprit_profile(&self) -> SuspectProfile {
        SuspectProfile::from(self.culprit())
    }

    pub fn fallback_clue_texts(&self) -> Vec<String> {
        evidence::fallback_clue_texts(&self.culprit_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::CLUE_COUNT;

    #[test]
    fn same_seed_same_case() {
        assert_eq!(CaseBlueprint::generate(3, 42), CaseBlueprint::generate(3, 42));
    }

    #[test]
    fn levels_differ_under_one_seed() {
        let a = CaseBlueprint::generate(1, 42);
        let b = CaseBlueprint::generate(2, 42);
        assert_ne!(a.suspects.len(), b.suspects.len());
        assert_ne!(a.clue_slots[0].position, b.clue_slots[0].position);
    }

    #[test]
    fn blueprint_is_complete() {
        let case = CaseBlueprint::generate(1, 9);
        assert_eq!(case.suspects.len(), 5);
        assert_eq!(case.clue_slots.len(), CLUE_COUNT);
        assert!(case.culprit().is_culprit);
        assert_eq!(case.suspects.iter().filter(|s| s.is_culprit).count(), 1);
        assert_eq!(case.walls, case.plan.wall_boxes());
    }

    #[test]
    fn fallback_text_targets_the_culprit() {
        let case = CaseBlueprint::generate(5, 1234);
        let trait_tag = case.culprit().primary_trait().to_string();
        let texts = case.fallback_clue_texts();
        assert_eq!(texts.len(), CLUE_COUNT);
        assert!(texts.iter().all(|t| t.contains(&trait_tag)));
    }

    #[test]
    fn huge_seed_wraps() {
        let case = CaseBlueprint::generate(12, u64::MAX);
        assert_eq!(case.suspects.len(), 12);
    }
}
