use glam::Vec3;
use hecs::Entity;

use crate::error::{Error, Result};
use crate::pose::{Aabb, Pose};
use crate::scene::prefabs::spawn_brick;
use crate::scene::PhysicsScene;

/// A rigid group of bricks moved as one: the agent root, its collider
/// parts, and the pose the simulation owns for it.
#[derive(Debug, Clone)]
pub struct Body {
    pub root: Entity,
    pub parts: Vec<Entity>,
    pub pose: Pose,
    /// Centre of the bricks in the root's local frame; rotations turn about it.
    pub pivot_offset: Vec3,
    /// World bounds of the bricks when the body was assembled.
    pub bounds: Aabb,
}

impl Body {
    /// Spawns a root at `pose` with one box brick per `(offset, half_extents)`.
    pub fn assemble(scene: &mut PhysicsScene, layout: &[(Vec3, Vec3)], pose: Pose) -> Result<Self> {
        if layout.is_empty() {
            return Err(Error::EmptyBody);
        }
        let root = scene.spawn_root(&pose);
        let parts: Vec<Entity> = layout
            .iter()
            .map(|&(offset, half)| spawn_brick(&mut scene.world, root, offset, half))
            .collect();
        scene.place_root(root, &pose);

        let bounds = match scene.bounds_of(&parts) {
            Ok(bounds) => bounds,
            Err(err) => {
                for &part in &parts {
                    scene.despawn(part);
                }
                scene.despawn(root);
                return Err(err);
            }
        };

        Ok(Self {
            root,
            pivot_offset: pose.inverse_transform_vector(bounds.center - pose.position),
            parts,
            pose,
            bounds,
        })
    }

    pub fn world_pivot(&self) -> Vec3 {
        self.pose.position + self.pose.transform_vector(self.pivot_offset)
    }

    /// Writes the pose back to the scene so the parts follow.
    pub fn sync(&self, scene: &mut PhysicsScene) {
        scene.place_root(self.root, &self.pose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::prefabs::minifig_layout;
    use glam::Quat;

    #[test]
    fn assemble_measures_bounds_and_pivot() {
        let mut scene = PhysicsScene::new();
        let pose = Pose::new(Vec3::new(4.0, 0.0, 0.0));
        let body = Body::assemble(&mut scene, &minifig_layout(), pose).unwrap();
        assert_eq!(body.parts.len(), 3);
        assert!(body.bounds.min().abs_diff_eq(Vec3::new(3.4, 0.0, -0.3), 1e-5));
        assert!(body.bounds.max().abs_diff_eq(Vec3::new(4.6, 3.0, 0.3), 1e-5));
        assert!(body.pivot_offset.abs_diff_eq(Vec3::new(0.0, 1.5, 0.0), 1e-5));
        for &part in &body.parts {
            assert_eq!(scene.owner_of(part), Some(body.root));
        }
    }

    #[test]
    fn sync_carries_parts_along() {
        let mut scene = PhysicsScene::new();
        let mut body = Body::assemble(&mut scene, &minifig_layout(), Pose::default()).unwrap();
        body.pose = Pose::with_rotation(Vec3::new(0.0, 0.0, 5.0), Quat::from_rotation_y(1.0));
        body.sync(&mut scene);
        let legs = scene.world_position(body.parts[0]).unwrap();
        assert!(legs.abs_diff_eq(Vec3::new(0.0, 0.6, 5.0), 1e-5));
    }

    #[test]
    fn empty_layout_is_rejected() {
        let mut scene = PhysicsScene::new();
        let err = Body::assemble(&mut scene, &[], Pose::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyBody));
        assert_eq!(scene.world.len(), 0);
    }
}
