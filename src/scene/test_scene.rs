use glam::Vec3;
use hecs::Entity;

use crate::config::{Config, ControlSettings, ControlType};
use crate::error::Result;
use crate::pose::Pose;
use crate::scene::prefabs::{
    minifig_layout, spawn_ground, spawn_hazard, spawn_static_box, vehicle_layout,
};
use crate::scene::PhysicsScene;
use crate::sim::{AgentId, Simulation};

/// The demo course and the handles a host needs from it.
pub struct Course {
    pub sim: Simulation,
    pub player: AgentId,
    pub turret: Entity,
}

/// Low step along the start lane, short enough to walk up.
pub const LEDGE_CENTER: Vec3 = Vec3::new(0.0, 0.15, 8.0);
pub const WALL_CENTER: Vec3 = Vec3::new(0.0, 2.0, 20.0);
pub const PIT_CENTER: Vec3 = Vec3::new(10.0, 0.5, 8.0);

fn build_scene() -> PhysicsScene {
    let mut scene = PhysicsScene::new();
    let world = &mut scene.world;

    spawn_ground(world);
    spawn_static_box(world, LEDGE_CENTER, Vec3::new(3.0, 0.15, 2.0));
    spawn_static_box(world, WALL_CENTER, Vec3::new(6.0, 2.0, 0.5));
    // Raised platform to jump onto.
    spawn_static_box(world, Vec3::new(-6.0, 0.75, 10.0), Vec3::new(2.0, 0.75, 2.0));
    spawn_hazard(world, PIT_CENTER, Vec3::new(2.0, 0.5, 2.0));

    scene
}

/// Lays out the demo course: ground, a ledge, a platform, a wall, a hazard
/// pit and a turret, with the player at the start using `control`.
pub fn load_test_scene(config: &Config, control: ControlSettings) -> Result<Course> {
    let mut sim = Simulation::new(build_scene(), config.clone());

    let (layout, start) = match control.control_type {
        ControlType::Character => (minifig_layout(), Vec3::ZERO),
        ControlType::Hovercraft => (vehicle_layout(), Vec3::new(0.0, 0.5, 0.0)),
        ControlType::Aircraft => (vehicle_layout(), Vec3::new(0.0, 6.0, 0.0)),
    };
    let player = sim.spawn_agent(&layout, Pose::new(start), control)?;

    let turret_layout = vec![
        (Vec3::new(0.0, 0.5, 0.0), Vec3::splat(0.5)),
        (Vec3::new(1.0, 0.5, 0.0), Vec3::new(0.5, 0.15, 0.15)),
    ];
    let turret_pose = Pose::new(Vec3::new(-4.0, 0.05, 4.0));
    let turret = sim.spawn_look_at(&turret_layout, turret_pose, config.look_at)?;

    Ok(Course {
        sim,
        player,
        turret,
    })
}
