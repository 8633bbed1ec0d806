//! Core engine types and utilities for Traitor.
//!
//! This crate provides the foundational types used across all simulation systems:
//! - Axis-aligned boxes and the first-person pose
//! - Fixed-step time management
//! - Common component types for the entity arena

pub mod aabb;
pub mod components;
pub mod time;
pub mod transform;

pub use aabb::*;
pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
