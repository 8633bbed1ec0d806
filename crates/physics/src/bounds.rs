//! Static wall geometry used for movement collision.

use engine_core::Aabb;

/// Immutable set of solid boxes for one level.
///
/// Built once at level start and shared read-only by the player and every NPC.
#[derive(Debug, Clone, Default)]
pub struct WallBounds {
    boxes: Vec<Aabb>,
    /// Union of every box; lets probes far from all walls skip the scan.
    extent: Option<Aabb>,
}

impl WallBounds {
    pub fn new(boxes: Vec<Aabb>) -> Self {
        let extent = boxes.iter().copied().reduce(|acc, b| acc.union(&b));
        Self { boxes, extent }
    }

    /// A level with no walls. Every probe passes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when `probe` touches or overlaps any wall.
    pub fn overlaps_any(&self, probe: &Aabb) -> bool {
        match &self.extent {
            Some(extent) if extent.intersects(probe) => {
                self.boxes.iter().any(|wall| wall.intersects(probe))
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aabb> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn extent(&self) -> Option<Aabb> {
        self.extent
    }
}
