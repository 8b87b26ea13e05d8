use glam::{Mat4, Quat, Vec3};
use hecs::{Entity, World};

use crate::components::*;

/// Infinite floor at y = 0 on the environment layer.
pub fn spawn_ground(world: &mut World) -> Entity {
    world.spawn((
        LocalTransform::new(Vec3::ZERO),
        GlobalTransform(Mat4::IDENTITY),
        Collider::Plane {
            normal: Vec3::Y,
            offset: 0.0,
        },
        Layer(LayerMask::ENVIRONMENT),
    ))
}

/// Immovable axis-aligned box (ledges, walls, platforms).
pub fn spawn_static_box(world: &mut World, center: Vec3, half_extents: Vec3) -> Entity {
    spawn_rotated_box(world, center, Quat::IDENTITY, half_extents)
}

pub fn spawn_rotated_box(
    world: &mut World,
    center: Vec3,
    rotation: Quat,
    half_extents: Vec3,
) -> Entity {
    world.spawn((
        LocalTransform { position: center, rotation },
        GlobalTransform(Mat4::from_rotation_translation(rotation, center)),
        Collider::Box { half_extents },
        Layer(LayerMask::ENVIRONMENT),
    ))
}

/// Volume-only box; reported only to queries that include triggers.
pub fn spawn_trigger_box(world: &mut World, center: Vec3, half_extents: Vec3) -> Entity {
    world.spawn((
        LocalTransform::new(center),
        GlobalTransform(Mat4::from_translation(center)),
        Collider::Box { half_extents },
        Layer(LayerMask::DEFAULT),
        Trigger,
    ))
}

/// Trigger box that ends the game when the player enters it.
pub fn spawn_hazard(world: &mut World, center: Vec3, half_extents: Vec3) -> Entity {
    let hazard = spawn_trigger_box(world, center, half_extents);
    let _ = world.insert_one(hazard, Hazard);
    hazard
}

/// One brick of an agent's body, parented to the agent root at `offset`.
pub fn spawn_brick(world: &mut World, root: Entity, offset: Vec3, half_extents: Vec3) -> Entity {
    let brick = world.spawn((
        LocalTransform::new(offset),
        GlobalTransform(Mat4::IDENTITY),
        Collider::Box { half_extents },
        Layer(LayerMask::DEFAULT),
        BodyPart(root),
    ));
    add_child(world, root, brick);
    brick
}

/// Brick layout of a minifigure-sized character: legs, torso and head
/// stacked on the root, feet at the root's origin.
pub fn minifig_layout() -> Vec<(Vec3, Vec3)> {
    vec![
        (Vec3::new(0.0, 0.6, 0.0), Vec3::new(0.4, 0.6, 0.25)),
        (Vec3::new(0.0, 1.8, 0.0), Vec3::new(0.6, 0.6, 0.3)),
        (Vec3::new(0.0, 2.7, 0.0), Vec3::new(0.3, 0.3, 0.3)),
    ]
}

/// Flat, wide vehicle hull for hovercraft and aircraft.
pub fn vehicle_layout() -> Vec<(Vec3, Vec3)> {
    vec![
        (Vec3::new(0.0, 0.4, 0.0), Vec3::new(1.2, 0.4, 2.0)),
        (Vec3::new(0.0, 1.0, -0.4), Vec3::new(0.5, 0.2, 0.6)),
    ]
}
