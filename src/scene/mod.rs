//! Physics queries the control schemes consume, and a `hecs` scene answering them.

pub mod prefabs;
pub mod test_scene;

use glam::{Mat4, Vec3};
use hecs::{Entity, World};

use crate::components::{
    BodyPart, Collider, GlobalTransform, Hazard, Layer, LayerMask, LocalTransform, Penetration,
    QueryFilter, RayHit, Trigger,
};
use crate::error::{Error, Result};
use crate::pose::{Aabb, Pose};
use crate::systems::{
    closest_point, penetration, propagate_subtree, ray_collider, sphere_overlaps,
    transform_propagation_system, Placed,
};

/// Handle to a collider in the physics capability.
pub type BodyRef = Entity;

/// Read-only collision queries the locomotion core consumes each step.
pub trait PhysicsQuery {
    /// Colliders touching a sphere.
    fn overlap_sphere(&self, point: Vec3, radius: f32, filter: QueryFilter) -> Vec<BodyRef>;

    /// Every collider hit along a ray within `max_distance`, nearest first.
    fn raycast_all(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Vec<RayHit>;

    /// How to move `a` out of `b`, if they interpenetrate.
    fn compute_penetration(&self, a: BodyRef, b: BodyRef) -> Option<Penetration>;

    /// Colliders currently in contact with `body`.
    fn touching(&self, body: BodyRef, filter: QueryFilter) -> Vec<BodyRef>;

    /// Point on `body` nearest to `point`.
    fn closest_point(&self, body: BodyRef, point: Vec3) -> Option<Vec3>;
}

/// A `hecs` world of colliders answering [`PhysicsQuery`].
pub struct PhysicsScene {
    pub world: World,
}

impl Default for PhysicsScene {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsScene {
    pub fn new() -> Self {
        Self {
            world: World::new(),
        }
    }

    fn placed(&self, entity: Entity) -> Option<(Placed, LayerMask, bool)> {
        let collider = *self.world.get::<&Collider>(entity).ok()?;
        let global = *self.world.get::<&GlobalTransform>(entity).ok()?;
        let layer = self
            .world
            .get::<&Layer>(entity)
            .map(|l| l.0)
            .unwrap_or(LayerMask::DEFAULT);
        let is_trigger = self.world.get::<&Trigger>(entity).is_ok();
        Some((
            Placed {
                collider,
                center: global.translation(),
                rotation: global.rotation(),
            },
            layer,
            is_trigger,
        ))
    }

    fn colliders(&self, filter: QueryFilter) -> Vec<(Entity, Placed)> {
        self.world
            .query::<(&Collider, &GlobalTransform, Option<&Layer>, Option<&Trigger>)>()
            .iter()
            .filter(|(_, (_, _, layer, trigger))| {
                let layer = layer.map(|l| l.0).unwrap_or(LayerMask::DEFAULT);
                filter.accepts(layer, trigger.is_some())
            })
            .map(|(entity, (collider, global, _, _))| {
                (
                    entity,
                    Placed {
                        collider: *collider,
                        center: global.translation(),
                        rotation: global.rotation(),
                    },
                )
            })
            .collect()
    }

    /// Recomputes every world transform. Call after building the scene.
    pub fn refresh(&mut self) {
        transform_propagation_system(&mut self.world);
    }

    /// Moves an agent root to `pose` and carries its parts along.
    pub fn place_root(&mut self, root: Entity, pose: &Pose) {
        if let Ok(mut local) = self.world.get::<&mut LocalTransform>(root) {
            local.position = pose.position;
            local.rotation = pose.rotation;
        }
        propagate_subtree(&mut self.world, root);
    }

    /// Agent root that owns `body`, if it is a body part.
    pub fn owner_of(&self, body: BodyRef) -> Option<Entity> {
        self.world.get::<&BodyPart>(body).ok().map(|p| p.0)
    }

    /// Combined world bounds of `parts`.
    pub fn bounds_of(&self, parts: &[Entity]) -> Result<Aabb> {
        let mut bounds: Option<Aabb> = None;
        for &part in parts {
            let (placed, _, _) = self.placed(part).ok_or(Error::UnknownBody(part))?;
            let Some((min, max)) = placed.aabb() else {
                continue;
            };
            let part_bounds = Aabb::from_min_max(min, max);
            bounds = Some(match bounds {
                Some(b) => b.union(&part_bounds),
                None => part_bounds,
            });
        }
        bounds.ok_or(Error::EmptyBody)
    }

    /// Moves every part onto `layer`.
    pub fn set_layer(&mut self, parts: &[Entity], layer: LayerMask) {
        for &part in parts {
            let _ = self.world.insert_one(part, Layer(layer));
        }
    }

    /// Hazard triggers in the scene.
    pub fn hazards(&self) -> Vec<Entity> {
        self.world
            .query::<(&Hazard, &Collider)>()
            .iter()
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn world_position(&self, entity: Entity) -> Option<Vec3> {
        self.world
            .get::<&GlobalTransform>(entity)
            .ok()
            .map(|g| g.translation())
    }

    pub fn despawn(&mut self, entity: Entity) {
        let _ = self.world.despawn(entity);
    }

    pub(crate) fn spawn_root(&mut self, pose: &Pose) -> Entity {
        self.world.spawn((
            LocalTransform {
                position: pose.position,
                rotation: pose.rotation,
            },
            GlobalTransform(Mat4::from_rotation_translation(pose.rotation, pose.position)),
        ))
    }
}

impl PhysicsQuery for PhysicsScene {
    fn overlap_sphere(&self, point: Vec3, radius: f32, filter: QueryFilter) -> Vec<BodyRef> {
        self.colliders(filter)
            .into_iter()
            .filter(|(_, placed)| sphere_overlaps(point, radius, placed))
            .map(|(entity, _)| entity)
            .collect()
    }

    fn raycast_all(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Vec<RayHit> {
        let Some(dir) = direction.try_normalize() else {
            return Vec::new();
        };
        let mut hits: Vec<RayHit> = self
            .colliders(filter)
            .into_iter()
            .filter_map(|(entity, placed)| {
                let t = ray_collider(origin, dir, &placed.collider, placed.center, placed.rotation)?;
                (t <= max_distance).then(|| RayHit {
                    body: entity,
                    distance: t,
                    point: origin + dir * t,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn compute_penetration(&self, a: BodyRef, b: BodyRef) -> Option<Penetration> {
        let (pa, _, _) = self.placed(a)?;
        let (pb, _, _) = self.placed(b)?;
        penetration(&pa, &pb)
    }

    fn touching(&self, body: BodyRef, filter: QueryFilter) -> Vec<BodyRef> {
        let Some((subject, _, _)) = self.placed(body) else {
            return Vec::new();
        };
        let owner = self.owner_of(body);
        self.colliders(filter)
            .into_iter()
            .filter(|(entity, _)| *entity != body)
            .filter(|(entity, _)| owner.is_none() || self.owner_of(*entity) != owner)
            .filter(|(_, placed)| penetration(&subject, placed).is_some())
            .map(|(entity, _)| entity)
            .collect()
    }

    fn closest_point(&self, body: BodyRef, point: Vec3) -> Option<Vec3> {
        let (placed, _, _) = self.placed(body)?;
        Some(closest_point(point, &placed))
    }
}
