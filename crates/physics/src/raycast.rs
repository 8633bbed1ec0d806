//! Raycasting for interaction queries.

use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl RaycastHit {
    fn from_intersection(ray: &Ray, collider: ColliderHandle, hit: &RayIntersection) -> Self {
        let point = ray.point_at(hit.time_of_impact);
        Self {
            collider,
            distance: hit.time_of_impact,
            point: Vec3::new(point.x, point.y, point.z),
            normal: Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z),
        }
    }
}

/// Unit-direction ray, or `None` when the direction is degenerate.
fn make_ray(origin: Vec3, direction: Vec3) -> Option<Ray> {
    let Some(dir) = direction.try_normalize() else {
        log::debug!("Skipping raycast with degenerate direction {:?}", direction);
        return None;
    };
    Some(Ray::new(
        point![origin.x, origin.y, origin.z],
        vector![dir.x, dir.y, dir.z],
    ))
}

impl PhysicsWorld {
    /// Cast a ray and return the nearest hit within `max_distance`.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = make_ray(origin, direction)?;

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                QueryFilter::default(),
            )
            .map(|(collider, intersection)| {
                RaycastHit::from_intersection(&ray, collider, &intersection)
            })
    }

    /// Cast a ray and return every hit within `max_distance`, nearest first.
    pub fn raycast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RaycastHit> {
        let Some(ray) = make_ray(origin, direction) else {
            return Vec::new();
        };

        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            QueryFilter::default(),
            |collider, intersection: RayIntersection| {
                hits.push(RaycastHit::from_intersection(&ray, collider, &intersection));
                true
            },
        );

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Nearest hit whose collider is not skipped by `skip`.
    ///
    /// Skipped colliders are see-through: the ray continues past them.
    pub fn raycast_filtered(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mut skip: impl FnMut(ColliderHandle) -> bool,
    ) -> Option<RaycastHit> {
        self.raycast_all(origin, direction, max_distance)
            .into_iter()
            .find(|hit| !skip(hit.collider))
    }
}
