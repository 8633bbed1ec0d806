//! Scene query world backed by Rapier3D.
//!
//! Nothing here is simulated dynamically: walls and the floor are fixed
//! colliders, NPCs are kinematic bodies teleported to their live position each
//! tick, clues are free-standing colliders. The world exists so interaction
//! rays can find the nearest surface.

use engine_core::{Aabb, Vec3};
use rapier3d::prelude::*;

/// Collision shapes used for queryable scene surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    /// Capsule aligned with +Y.
    Capsule { half_height: f32, radius: f32 },
    /// Cylinder aligned with +Y.
    Cylinder { half_height: f32, radius: f32 },
}

impl ColliderShape {
    fn builder(&self) -> ColliderBuilder {
        match *self {
            ColliderShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderShape::Capsule {
                half_height,
                radius,
            } => ColliderBuilder::capsule_y(half_height, radius),
            ColliderShape::Cylinder {
                half_height,
                radius,
            } => ColliderBuilder::cylinder(half_height, radius),
        }
    }
}

/// Query world containing every surface an interaction ray can hit.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create an empty world. Gravity is zero: nothing here falls.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, 0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Apply pending kinematic moves and refresh the query pipeline.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a fixed box collider covering `bounds`.
    pub fn add_fixed_box(&mut self, bounds: &Aabb) -> ColliderHandle {
        let center = bounds.center();
        let half = bounds.half_extents();
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z)
            .translation(vector![center.x, center.y, center.z])
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a collider with no parent body at a fixed world position.
    pub fn add_free_collider(&mut self, shape: ColliderShape, position: Vec3) -> ColliderHandle {
        let collider = shape
            .builder()
            .translation(vector![position.x, position.y, position.z])
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a kinematic body (for NPCs) that never sleeps.
    pub fn add_kinematic_body(&mut self, position: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![position.x, position.y, position.z])
            .can_sleep(false)
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Attach a collider to a body, offset from the body origin.
    pub fn add_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        shape: ColliderShape,
        offset: Vec3,
    ) -> ColliderHandle {
        let collider = shape
            .builder()
            .translation(vector![offset.x, offset.y, offset.z])
            .build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Queue a kinematic body's position for the next [`step`](Self::step).
    pub fn set_kinematic_translation(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_next_kinematic_translation(vector![position.x, position.y, position.z]);
        }
    }

    /// Current world position of a body.
    pub fn body_translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Number of colliders currently registered.
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }
}
