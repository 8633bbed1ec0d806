//! Collision and scene queries for Traitor.
//!
//! Movement collision is plain box-vs-box against a static [`WallBounds`] set.
//! Rapier3D is used only as a query structure for interaction raycasts.

pub mod bounds;
pub mod collision;
pub mod physics_world;
pub mod raycast;

pub use bounds::*;
pub use collision::*;
pub use physics_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
