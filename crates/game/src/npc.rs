//! Suspects: wander behaviour, wall bounce and throttled position reports.

use std::collections::HashMap;
use std::f32::consts::TAU;

use engine_core::{wrap_angle, Entity, Facing, Position, Quat, Vec3, Velocity, World};
use physics::{probe_axes, BlockedAxes, ProbeShape, WallBounds};
use procgen::{SuspectColor, SuspectSpec};
use rand::Rng;

/// Walking speed per tick.
pub const NPC_SPEED: f32 = 0.035;
/// Chance per tick of picking a new heading.
pub const RESTEER_CHANCE: f64 = 0.004;
/// Largest heading change of one re-steer, either way.
pub const RESTEER_MAX_ANGLE: f32 = 0.75;
/// Fraction of the remaining turn covered each tick.
pub const FACING_SMOOTHING: f32 = 0.1;
/// Ticks between position reports.
pub const PUBLISH_INTERVAL: u32 = 20;

/// Below this squared speed the heading is undefined and facing holds.
const MIN_HEADING_SPEED_SQ: f32 = 1e-4;

/// Who a suspect is. Fixed for the life of a level.
#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    pub label: String,
    pub name: String,
    pub color: SuspectColor,
    pub traits: Vec<String>,
    pub is_culprit: bool,
}

impl From<&SuspectSpec> for Npc {
    fn from(spec: &SuspectSpec) -> Self {
        Self {
            label: spec.label.clone(),
            name: spec.name.clone(),
            color: spec.color,
            traits: spec.traits.clone(),
            is_culprit: spec.is_culprit,
        }
    }
}

/// Wander state owned by each suspect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WanderAgent {
    ticks_since_publish: u32,
}

impl WanderAgent {
    /// Count a tick; true when it is time to report the position.
    fn tick_publish(&mut self) -> bool {
        self.ticks_since_publish += 1;
        if self.ticks_since_publish >= PUBLISH_INTERVAL {
            self.ticks_since_publish = 0;
            true
        } else {
            false
        }
    }
}

/// Walking velocity in a uniformly random direction.
pub fn random_velocity(rng: &mut impl Rng) -> Velocity {
    Velocity::planar(rng.gen_range(0.0..TAU), NPC_SPEED)
}

/// Facing that looks along `velocity`, for spawning. Zero velocity faces +Z.
pub fn initial_facing(velocity: &Velocity) -> Facing {
    Facing {
        yaw: Facing::heading_of(velocity.linear).unwrap_or(0.0),
    }
}

/// Advance one suspect by one tick.
///
/// Blocked axes flip the matching velocity component, so the next tick heads
/// away from the wall.
pub fn wander_step(
    position: &mut Position,
    velocity: &mut Velocity,
    facing: &mut Facing,
    bounds: &WallBounds,
    rng: &mut impl Rng,
) -> BlockedAxes {
    if rng.gen_bool(RESTEER_CHANCE) {
        let angle = rng.gen_range(-RESTEER_MAX_ANGLE..RESTEER_MAX_ANGLE);
        velocity.linear = Quat::from_rotation_y(angle) * velocity.linear;
    }

    let planar = Vec3::new(velocity.linear.x, 0.0, velocity.linear.z);
    let probe = probe_axes(position.0, planar, &ProbeShape::NPC, bounds);
    position.0 = probe.position;
    if probe.blocked.x {
        velocity.linear.x = -velocity.linear.x;
    }
    if probe.blocked.z {
        velocity.linear.z = -velocity.linear.z;
    }

    face_travel(facing, velocity);
    probe.blocked
}

/// Ease `facing` toward the heading of `velocity` along the shorter arc.
pub fn face_travel(facing: &mut Facing, velocity: &Velocity) {
    if velocity.linear.length_squared() <= MIN_HEADING_SPEED_SQ {
        return;
    }
    if let Some(target) = Facing::heading_of(velocity.linear) {
        let turn = wrap_angle(target - facing.yaw);
        facing.yaw = wrap_angle(facing.yaw + turn * FACING_SMOOTHING);
    }
}

/// Last reported suspect positions. Read by displays; never live.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NpcSightings {
    positions: HashMap<Entity, Vec3>,
}

impl NpcSightings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position on the ground plane.
    pub fn publish(&mut self, entity: Entity, position: Vec3) {
        self.positions
            .insert(entity, Vec3::new(position.x, 0.0, position.z));
    }

    pub fn get(&self, entity: Entity) -> Option<Vec3> {
        self.positions.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Run every suspect's wander step and publish positions that are due.
pub fn update_npcs(
    world: &mut World,
    bounds: &WallBounds,
    sightings: &mut NpcSightings,
    rng: &mut impl Rng,
) {
    for (entity, (position, velocity, facing, agent)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Facing, &mut WanderAgent)>()
    {
        wander_step(position, velocity, facing, bounds, rng);
        if agent.tick_publish() {
            sightings.publish(entity, position.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Aabb;
    use rand::{rngs::StdRng, SeedableRng};

    /// Wall whose face is at x = 1.
    fn east_wall() -> WallBounds {
        WallBounds::new(vec![Aabb::new(
            Vec3::new(1.0, 0.0, -50.0),
            Vec3::new(2.0, 10.0, 50.0),
        )])
    }

    #[test]
    fn blocked_axis_bounces() {
        let bounds = east_wall();
        let mut rng = StdRng::seed_from_u64(1);
        let mut position = Position(Vec3::new(0.68, 0.0, 0.0));
        let mut velocity = Velocity::new(Vec3::new(NPC_SPEED, 0.0, 0.0));
        let mut facing = Facing::default();

        let blocked = wander_step(&mut position, &mut velocity, &mut facing, &bounds, &mut rng);
        assert!(blocked.x);
        assert_eq!(position.0.x, 0.68);
        assert!(velocity.linear.x < 0.0);

        // Next tick moves away from the wall.
        let blocked = wander_step(&mut position, &mut velocity, &mut facing, &bounds, &mut rng);
        assert!(!blocked.x);
        assert!(position.0.x < 0.68);
    }

    #[test]
    fn zero_velocity_never_turns() {
        let bounds = WallBounds::empty();
        let mut rng = StdRng::seed_from_u64(5);
        let mut position = Position(Vec3::new(3.0, 0.0, 3.0));
        let mut velocity = Velocity::default();
        let mut facing = Facing { yaw: 1.25 };

        for _ in 0..5_000 {
            let blocked = wander_step(&mut position, &mut velocity, &mut facing, &bounds, &mut rng);
            assert!(!blocked.any());
        }
        assert_eq!(facing.yaw, 1.25);
        assert_eq!(position.0, Vec3::new(3.0, 0.0, 3.0));
        assert_eq!(velocity.linear, Vec3::ZERO);
    }

    #[test]
    fn resteer_rate_and_angle_are_bounded() {
        let bounds = WallBounds::empty();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut position = Position(Vec3::ZERO);
        let mut velocity = Velocity::planar(0.3, NPC_SPEED);
        let mut facing = initial_facing(&velocity);

        let ticks = 100_000;
        let mut turns = 0;
        for _ in 0..ticks {
            let before = velocity.linear;
            wander_step(&mut position, &mut velocity, &mut facing, &bounds, &mut rng);
            if velocity.linear != before {
                turns += 1;
                let angle = wrap_angle(
                    Facing::heading_of(velocity.linear).unwrap() - Facing::heading_of(before).unwrap(),
                );
                assert!(angle.abs() <= RESTEER_MAX_ANGLE + 1e-3, "turned {angle} rad");
            }
            assert!((velocity.linear.length() - NPC_SPEED).abs() < 1e-4);
            assert!(velocity.linear.y.abs() < 1e-6);
        }
        // Expected 400 re-steers.
        assert!((250..=550).contains(&turns), "{turns} re-steers");
    }

    #[test]
    fn facing_eases_along_shortest_arc() {
        // Heading of (0, 0, -1) is pi; from -3.0 the short way is through -pi.
        let velocity = Velocity::new(Vec3::new(0.0, 0.0, -NPC_SPEED));
        let mut facing = Facing { yaw: -3.0 };

        face_travel(&mut facing, &velocity);
        assert!(facing.yaw < -3.0);

        for _ in 0..60 {
            face_travel(&mut facing, &velocity);
        }
        assert!(wrap_angle(std::f32::consts::PI - facing.yaw).abs() < 0.01);
    }

    #[test]
    fn facing_step_covers_a_tenth() {
        let velocity = Velocity::new(Vec3::new(NPC_SPEED, 0.0, 0.0));
        let mut facing = Facing { yaw: 0.0 };
        face_travel(&mut facing, &velocity);
        assert!((facing.yaw - std::f32::consts::FRAC_PI_2 * FACING_SMOOTHING).abs() < 1e-6);
    }

    #[test]
    fn spawn_facing_snaps_to_travel() {
        let velocity = Velocity::new(Vec3::new(0.0, 0.0, NPC_SPEED));
        assert_eq!(initial_facing(&velocity).yaw, 0.0);
        assert_eq!(initial_facing(&Velocity::default()).yaw, 0.0);
        let sideways = Velocity::new(Vec3::new(-NPC_SPEED, 0.0, 0.0));
        assert!((initial_facing(&sideways).yaw + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn mansion_never_lets_suspects_into_walls() {
        let plan = procgen::FloorPlan::mansion();
        let bounds = WallBounds::new(plan.wall_boxes());
        let mut rng = StdRng::seed_from_u64(77);
        let mut actors: Vec<_> = (0..8)
            .map(|_| {
                let spawn = plan.scatter_point(&mut rng, &plan.wall_boxes(), 0.0, |p| {
                    ProbeShape::NPC.probe_at(p)
                });
                let velocity = random_velocity(&mut rng);
                (Position(spawn), velocity, initial_facing(&velocity))
            })
            .collect();

        for _ in 0..3_000 {
            for (position, velocity, facing) in &mut actors {
                wander_step(position, velocity, facing, &bounds, &mut rng);
                assert!(!bounds.overlaps_any(&ProbeShape::NPC.probe_at(position.0)));
            }
        }
    }

    #[test]
    fn positions_publish_every_interval() {
        let mut world = World::new();
        let bounds = WallBounds::empty();
        let mut rng = StdRng::seed_from_u64(4);
        let mut sightings = NpcSightings::new();
        let spawn = Vec3::new(2.0, 0.0, 2.0);
        let velocity = Velocity::new(Vec3::new(NPC_SPEED, 0.0, 0.0));
        let entity = world.spawn((
            Position(spawn),
            velocity,
            initial_facing(&velocity),
            WanderAgent::default(),
        ));
        sightings.publish(entity, spawn);

        for _ in 0..PUBLISH_INTERVAL - 1 {
            update_npcs(&mut world, &bounds, &mut sightings, &mut rng);
        }
        assert_eq!(sightings.get(entity), Some(spawn));

        update_npcs(&mut world, &bounds, &mut sightings, &mut rng);
        let live = world.get::<&Position>(entity).unwrap().0;
        assert_ne!(live, spawn);
        assert_eq!(sightings.get(entity), Some(Vec3::new(live.x, 0.0, live.z)));
    }

    #[test]
    fn published_height_is_ground() {
        let mut sightings = NpcSightings::new();
        let mut world = World::new();
        let entity = world.spawn((Position(Vec3::ZERO),));
        sightings.publish(entity, Vec3::new(1.0, 4.0, -1.0));
        assert_eq!(sightings.get(entity), Some(Vec3::new(1.0, 0.0, -1.0)));
        assert_eq!(sightings.len(), 1);
    }
}
