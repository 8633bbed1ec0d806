//! Mansion floor plan: outer walls plus four corner rooms.

use engine_core::Aabb;
use glam::{Vec2, Vec3};
use rand::Rng;

/// Half width of the square area suspects and evidence are scattered over.
pub const SCATTER_HALF_EXTENT: f32 = 20.0;

/// Which side of a room faces the central hall and carries the doorway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorSide {
    /// Wall at the room's minimum Z.
    North,
    /// Wall at the room's maximum Z.
    South,
}

/// A rectangular room, walled on all four sides except for one doorway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    /// Center on the ground plane (x, z).
    pub center: Vec2,
    /// Outer size (x, z).
    pub size: Vec2,
    pub door: DoorSide,
}

impl Room {
    /// Doorway faces whichever Z side is closer to the hall center.
    pub fn facing_hall(center: Vec2, size: Vec2) -> Self {
        let door = if center.y < 0.0 {
            DoorSide::South
        } else {
            DoorSide::North
        };
        Self { center, size, door }
    }
}

/// Fixed recipe for a level's solid geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorPlan {
    /// Distance from the origin to the inner face of each outer wall.
    pub half_size: f32,
    pub wall_height: f32,
    pub outer_thickness: f32,
    pub room_wall_thickness: f32,
    pub door_width: f32,
    pub rooms: Vec<Room>,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self::mansion()
    }
}

impl FloorPlan {
    /// The mansion: a 50 x 50 hall with four 10 x 10 rooms at (+-12, +-12).
    pub fn mansion() -> Self {
        let size = Vec2::splat(10.0);
        let rooms = [(-12.0, -12.0), (12.0, -12.0), (-12.0, 12.0), (12.0, 12.0)]
            .into_iter()
            .map(|(x, z)| Room::facing_hall(Vec2::new(x, z), size))
            .collect();
        Self {
            half_size: 25.0,
            wall_height: 10.0,
            outer_thickness: 1.0,
            room_wall_thickness: 0.5,
            door_width: 2.5,
            rooms,
        }
    }

    /// Every solid wall box: the four outer slabs first, then room walls.
    pub fn wall_boxes(&self) -> Vec<Aabb> {
        let a = self.half_size;
        let t = self.outer_thickness;
        let h = self.wall_height;

        let mut boxes = vec![
            Aabb::new(Vec3::new(-a - t, 0.0, -a - t), Vec3::new(a + t, h, -a)),
            Aabb::new(Vec3::new(-a - t, 0.0, a), Vec3::new(a + t, h, a + t)),
            Aabb::new(Vec3::new(-a - t, 0.0, -a), Vec3::new(-a, h, a)),
            Aabb::new(Vec3::new(a, 0.0, -a), Vec3::new(a + t, h, a)),
        ];

        for room in &self.rooms {
            boxes.extend(self.room_walls(room));
        }
        boxes
    }

    fn room_walls(&self, room: &Room) -> Vec<Aabb> {
        let w = self.room_wall_thickness;
        let h = self.wall_height;
        let min = room.center - room.size * 0.5;
        let max = room.center + room.size * 0.5;

        let north = (min.y, min.y + w);
        let south = (max.y - w, max.y);
        let (door_z, solid_z) = match room.door {
            DoorSide::North => (north, south),
            DoorSide::South => (south, north),
        };

        let mut walls = vec![
            // Solid Z wall.
            Aabb::new(Vec3::new(min.x, 0.0, solid_z.0), Vec3::new(max.x, h, solid_z.1)),
            // West and east walls.
            Aabb::new(Vec3::new(min.x, 0.0, min.y), Vec3::new(min.x + w, h, max.y)),
            Aabb::new(Vec3::new(max.x - w, 0.0, min.y), Vec3::new(max.x, h, max.y)),
        ];

        // Z wall split around the doorway.
        let gap = self.door_width * 0.5;
        let door_left = room.center.x - gap;
        let door_right = room.center.x + gap;
        if door_left > min.x {
            walls.push(Aabb::new(Vec3::new(min.x, 0.0, door_z.0), Vec3::new(door_left, h, door_z.1)));
        }
        if door_right < max.x {
            walls.push(Aabb::new(Vec3::new(door_right, 0.0, door_z.0), Vec3::new(max.x, h, door_z.1)));
        }
        walls
    }

    /// Thin slab under the walkable area. Blocks rays, never movement.
    pub fn floor_box(&self) -> Aabb {
        let a = self.half_size + self.outer_thickness;
        Aabb::new(Vec3::new(-a, -0.5, -a), Vec3::new(a, 0.0, a))
    }

    /// Sample a point on the scatter square whose `probe` box is clear of every wall.
    ///
    /// `probe` maps a candidate point to the box it would occupy. Gives up after
    /// a bounded number of tries and falls back to the hall center.
    pub fn scatter_point(
        &self,
        rng: &mut impl Rng,
        walls: &[Aabb],
        y: f32,
        probe: impl Fn(Vec3) -> Aabb,
    ) -> Vec3 {
        const MAX_ATTEMPTS: usize = 64;
        for _ in 0..MAX_ATTEMPTS {
            let candidate = Vec3::new(
                rng.gen_range(-SCATTER_HALF_EXTENT..SCATTER_HALF_EXTENT),
                y,
                rng.gen_range(-SCATTER_HALF_EXTENT..SCATTER_HALF_EXTENT),
            );
            let footprint = probe(candidate);
            if !walls.iter().any(|wall| wall.intersects(&footprint)) {
                return candidate;
            }
        }
        log::warn!("No clear scatter point after {} attempts, using hall center", MAX_ATTEMPTS);
        Vec3::new(0.0, y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn player_box(eye: Vec3) -> Aabb {
        Aabb::from_center_size(eye, Vec3::new(1.0, 2.0, 1.0))
    }

    #[test]
    fn mansion_has_outer_walls_and_split_room_walls() {
        let plan = FloorPlan::mansion();
        // 4 outer + 4 rooms x (1 solid Z + 2 sides + 2 door segments)
        assert_eq!(plan.wall_boxes().len(), 4 + 4 * 5);
    }

    #[test]
    fn hall_center_is_open() {
        let plan = FloorPlan::mansion();
        let walls = plan.wall_boxes();
        let probe = player_box(Vec3::new(0.0, 1.7, 0.0));
        assert!(!walls.iter().any(|w| w.intersects(&probe)));
    }

    #[test]
    fn doorway_admits_the_player() {
        let plan = FloorPlan::mansion();
        let walls = plan.wall_boxes();
        // Room at (-12, -12) opens toward +Z at z = -7.25.
        let probe = player_box(Vec3::new(-12.0, 1.7, -7.25));
        assert!(!walls.iter().any(|w| w.intersects(&probe)));
        // Beside the doorway is solid.
        let blocked = player_box(Vec3::new(-15.0, 1.7, -7.25));
        assert!(walls.iter().any(|w| w.intersects(&blocked)));
    }

    #[test]
    fn outer_walls_enclose_the_hall() {
        let plan = FloorPlan::mansion();
        let walls = plan.wall_boxes();
        for eye in [
            Vec3::new(24.8, 1.7, 0.0),
            Vec3::new(-24.8, 1.7, 0.0),
            Vec3::new(0.0, 1.7, 24.8),
            Vec3::new(0.0, 1.7, -24.8),
        ] {
            assert!(walls.iter().any(|w| w.intersects(&player_box(eye))));
        }
    }

    #[test]
    fn scatter_points_avoid_walls() {
        let plan = FloorPlan::mansion();
        let walls = plan.wall_boxes();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = plan.scatter_point(&mut rng, &walls, 0.3, |c| {
                Aabb::from_center_half_extents(c, Vec3::splat(0.3))
            });
            assert!(p.x.abs() <= SCATTER_HALF_EXTENT && p.z.abs() <= SCATTER_HALF_EXTENT);
            let footprint = Aabb::from_center_half_extents(p, Vec3::splat(0.3));
            assert!(!walls.iter().any(|w| w.intersects(&footprint)));
        }
    }

    #[test]
    fn floor_sits_below_walls() {
        let plan = FloorPlan::mansion();
        assert_eq!(plan.floor_box().max.y, 0.0);
        assert!(plan.floor_box().min.y < 0.0);
    }
}
