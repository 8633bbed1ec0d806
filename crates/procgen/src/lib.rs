//! Procedural case generation: mansion floor plan, suspects, culprit and evidence.

pub mod case;
pub mod evidence;
pub mod floor_plan;
pub mod roster;

pub use case::*;
pub use evidence::*;
pub use floor_plan::*;
pub use roster::*;
