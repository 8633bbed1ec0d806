//! One playable case: walls, suspects and evidence, created and dropped as a unit.

use engine_core::{Aabb, Entity, EntityTag, Position, Vec3, Velocity, World};
use physics::{ColliderShape, PhysicsWorld, WallBounds};
use procgen::{CaseBlueprint, ClueSlot, SuspectSpec};
use rand::Rng;

use crate::clue::Clue;
use crate::npc::{self, initial_facing, Npc, NpcSightings, WanderAgent};
use crate::scene::{self, npc_hit_shapes, NpcBody, SceneTags, CLUE_HIT_RADIUS};

/// Everything that exists only while a case is being played.
pub struct Level {
    pub number: u32,
    pub world: World,
    pub physics: PhysicsWorld,
    pub bounds: WallBounds,
    pub tags: SceneTags,
    pub sightings: NpcSightings,
    culprit: Option<Entity>,
}

impl Level {
    /// Empty level with solid `walls` and an optional ray-only floor.
    pub fn new(number: u32, walls: Vec<Aabb>, floor: Option<Aabb>) -> Self {
        let mut physics = PhysicsWorld::new();
        for wall in &walls {
            physics.add_fixed_box(wall);
        }
        if let Some(floor) = floor {
            physics.add_fixed_box(&floor);
        }

        Self {
            number,
            world: World::new(),
            physics,
            bounds: WallBounds::new(walls),
            tags: SceneTags::new(),
            sightings: NpcSightings::new(),
            culprit: None,
        }
    }

    /// Build a whole case from its blueprint. `clue_texts` pairs with the
    /// evidence slots in order; missing entries use the fallback text.
    pub fn spawn(blueprint: &CaseBlueprint, clue_texts: &[String], rng: &mut impl Rng) -> Self {
        let mut level = Self::new(
            blueprint.level,
            blueprint.walls.clone(),
            Some(blueprint.plan.floor_box()),
        );

        for spec in &blueprint.suspects {
            level.spawn_npc(spec, npc::random_velocity(rng));
        }

        let fallback = blueprint.fallback_clue_texts();
        for (i, slot) in blueprint.clue_slots.iter().enumerate() {
            let text = clue_texts
                .get(i)
                .or_else(|| fallback.get(i))
                .cloned()
                .unwrap_or_default();
            level.spawn_clue(slot, text);
        }

        level.refresh_queries();
        log::info!(
            "Case {} ready: {} suspects, {} clues, {} walls",
            level.number,
            blueprint.suspects.len(),
            blueprint.clue_slots.len(),
            level.bounds.len()
        );
        level
    }

    /// Add a suspect with its hit shapes. The culprit is remembered.
    pub fn spawn_npc(&mut self, spec: &SuspectSpec, velocity: Velocity) -> Entity {
        let body = self.physics.add_kinematic_body(spec.position);
        let entity = self.world.spawn((
            Npc::from(spec),
            Position(spec.position),
            velocity,
            initial_facing(&velocity),
            WanderAgent::default(),
            NpcBody(body),
        ));

        for (shape, offset) in npc_hit_shapes(spec.wears_hat()) {
            let collider = self.physics.add_collider(body, shape, offset);
            self.tags.insert(collider, EntityTag::npc(entity));
        }

        self.sightings.publish(entity, spec.position);
        if spec.is_culprit {
            self.culprit = Some(entity);
        }
        entity
    }

    /// Add an unfound piece of evidence.
    pub fn spawn_clue(&mut self, slot: &ClueSlot, description: String) -> Entity {
        let entity = self.world.spawn((
            Clue::new(slot.label.clone(), slot.category, description),
            Position(slot.position),
        ));
        let collider = self.physics.add_free_collider(
            ColliderShape::Ball {
                radius: CLUE_HIT_RADIUS,
            },
            slot.position,
        );
        self.tags.insert(collider, EntityTag::clue(entity));
        entity
    }

    /// Push live suspect positions into the query world.
    pub fn refresh_queries(&mut self) {
        scene::sync_npc_bodies(&self.world, &mut self.physics);
        self.physics.step();
    }

    /// Suspects walk one tick, then rays see where they now stand.
    pub fn advance_npcs(&mut self, rng: &mut impl Rng) {
        npc::update_npcs(&mut self.world, &self.bounds, &mut self.sightings, rng);
        self.refresh_queries();
    }

    pub fn culprit(&self) -> Option<Entity> {
        self.culprit
    }

    pub fn clue_count(&self) -> usize {
        self.world.query::<&Clue>().iter().count()
    }

    pub fn found_count(&self) -> usize {
        self.world
            .query::<&Clue>()
            .iter()
            .filter(|(_, clue)| clue.is_found())
            .count()
    }

    pub fn all_clues_found(&self) -> bool {
        self.found_count() == self.clue_count()
    }

    /// Live position of a suspect or clue.
    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.world.get::<&Position>(entity).ok().map(|p| p.0)
    }

    /// Short name for whatever `tag` points at.
    pub fn describe(&self, tag: EntityTag) -> Option<String> {
        if let Ok(npc) = self.world.get::<&Npc>(tag.entity) {
            return Some(npc.name.clone());
        }
        self.world
            .get::<&Clue>(tag.entity)
            .ok()
            .map(|clue| clue.category.to_string())
    }
}

impl Drop for Level {
    fn drop(&mut self) {
        log::debug!("Case {} torn down", self.number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn blueprint_spawns_everything() {
        let blueprint = CaseBlueprint::generate(2, 31);
        let mut rng = StdRng::seed_from_u64(31);
        let texts: Vec<String> = (0..5).map(|i| format!("generated {i}")).collect();
        let level = Level::spawn(&blueprint, &texts, &mut rng);

        assert_eq!(level.world.query::<&Npc>().iter().count(), 6);
        assert_eq!(level.clue_count(), 5);
        assert_eq!(level.found_count(), 0);
        assert!(!level.all_clues_found());
        assert_eq!(level.sightings.len(), 6);
        assert_eq!(level.bounds.len(), blueprint.walls.len());

        let culprit = level.culprit().unwrap();
        assert!(level.world.get::<&Npc>(culprit).unwrap().is_culprit);

        let descriptions: Vec<String> = level
            .world
            .query::<&Clue>()
            .iter()
            .map(|(_, c)| c.description.clone())
            .collect();
        assert!(descriptions.iter().all(|d| d.starts_with("generated")));
    }

    #[test]
    fn short_clue_list_is_topped_up_with_fallback() {
        let blueprint = CaseBlueprint::generate(1, 8);
        let mut rng = StdRng::seed_from_u64(8);
        let level = Level::spawn(&blueprint, &["only one".to_string()], &mut rng);
        let trait_tag = blueprint.culprit().primary_trait().to_string();

        let mut fallback_count = 0;
        for (_, clue) in level.world.query::<&Clue>().iter() {
            if clue.description.contains(&trait_tag) {
                fallback_count += 1;
            }
        }
        assert!(fallback_count >= 4);
    }

    #[test]
    fn every_hit_shape_is_tagged() {
        let blueprint = CaseBlueprint::generate(1, 3);
        let mut rng = StdRng::seed_from_u64(3);
        let level = Level::spawn(&blueprint, &[], &mut rng);
        let hats = blueprint.suspects.iter().filter(|s| s.wears_hat()).count();
        let expected = blueprint.suspects.len() * 2 + hats + blueprint.clue_slots.len();
        assert_eq!(level.tags.len(), expected);
        // Walls and floor are not tagged.
        assert_eq!(
            level.physics.collider_count(),
            expected + blueprint.walls.len() + 1
        );
    }

    #[test]
    fn suspects_move_and_bodies_follow() {
        let blueprint = CaseBlueprint::generate(1, 21);
        let mut rng = StdRng::seed_from_u64(21);
        let mut level = Level::spawn(&blueprint, &[], &mut rng);
        let culprit = level.culprit().unwrap();
        let start = level.position_of(culprit).unwrap();

        for _ in 0..30 {
            level.advance_npcs(&mut rng);
        }
        let now = level.position_of(culprit).unwrap();
        assert_ne!(start, now);

        let body = level.world.get::<&NpcBody>(culprit).unwrap().0;
        let body_pos = level.physics.body_translation(body).unwrap();
        assert!((body_pos - now).length() < 1e-4);
    }
}
