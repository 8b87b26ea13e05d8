use std::collections::VecDeque;

use glam::Mat4;
use hecs::{Entity, World};

use crate::components::{Children, GlobalTransform, LocalTransform, Parent};

/// Propagates LocalTransform down the hierarchy via BFS.
/// Roots (entities with LocalTransform but no Parent) compute GlobalTransform
/// from their own LocalTransform. Children inherit the parent's
/// GlobalTransform multiplied by their own LocalTransform, so body parts
/// follow their agent root.
pub fn transform_propagation_system(world: &mut World) {
    let roots: Vec<(Entity, Mat4)> = world
        .query::<&LocalTransform>()
        .without::<&Parent>()
        .iter()
        .map(|(entity, local)| (entity, local.matrix()))
        .collect();

    let mut queue: VecDeque<(Entity, Mat4)> = VecDeque::new();
    for (entity, global_mat) in roots {
        propagate_from(world, entity, global_mat, &mut queue);
    }
}

/// Propagates only the subtree under `root`, used after a single agent moves.
pub fn propagate_subtree(world: &mut World, root: Entity) {
    let Ok(global_mat) = world.get::<&LocalTransform>(root).map(|local| local.matrix()) else {
        return;
    };
    let mut queue = VecDeque::new();
    propagate_from(world, root, global_mat, &mut queue);
}

fn propagate_from(
    world: &mut World,
    root: Entity,
    root_global: Mat4,
    queue: &mut VecDeque<(Entity, Mat4)>,
) {
    queue.clear();
    queue.push_back((root, root_global));

    while let Some((entity, global)) = queue.pop_front() {
        if let Ok(mut gt) = world.get::<&mut GlobalTransform>(entity) {
            gt.0 = global;
        }

        if let Ok(children) = world.get::<&Children>(entity) {
            for &child in &children.0 {
                let child_global = match world.get::<&LocalTransform>(child) {
                    Ok(local) => global * local.matrix(),
                    Err(_) => global,
                };
                queue.push_back((child, child_global));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::add_child;
    use glam::{Quat, Vec3};

    #[test]
    fn children_follow_parent() {
        let mut world = World::new();
        let root = world.spawn((
            LocalTransform::new(Vec3::new(1.0, 0.0, 0.0)),
            GlobalTransform(Mat4::IDENTITY),
        ));
        let child = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 0.0, 2.0)),
            GlobalTransform(Mat4::IDENTITY),
        ));
        add_child(&mut world, root, child);

        transform_propagation_system(&mut world);
        let pos = world.get::<&GlobalTransform>(child).unwrap().translation();
        assert!(pos.abs_diff_eq(Vec3::new(1.0, 0.0, 2.0), 1e-5));

        world.get::<&mut LocalTransform>(root).unwrap().rotation =
            Quat::from_rotation_y(90f32.to_radians());
        propagate_subtree(&mut world, root);
        let pos = world.get::<&GlobalTransform>(child).unwrap().translation();
        assert!(pos.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
    }
}
