//! Control schemes: the per-step locomotion of one agent.

pub mod aircraft;
pub mod character;
pub mod deform;
pub mod hovercraft;

pub use aircraft::Aircraft;
pub use character::{Character, JumpState};
pub use deform::{squash_stretch_scale, DeformAnimation, Deformation};
pub use hovercraft::Hovercraft;

use glam::Vec3;

use crate::camera::Camera;
use crate::config::{Config, ControlType};
use crate::engine::input::InputState;
use crate::pose::{Aabb, Pose};
use crate::scene::{BodyRef, PhysicsQuery};

/// Everything a scheme may read or move during one step.
pub struct StepCtx<'a> {
    pub pose: &'a mut Pose,
    /// Colliders belonging to the agent itself; never treated as obstacles.
    pub parts: &'a [BodyRef],
    pub input: &'a InputState,
    pub camera: &'a Camera,
    pub physics: &'a dyn PhysicsQuery,
    pub dt: f32,
}

impl StepCtx<'_> {
    /// World position of a pivot given in the agent's local frame.
    pub fn world_pivot(&self, pivot_offset: Vec3) -> Vec3 {
        self.pose.position + self.pose.transform_vector(pivot_offset)
    }

    pub fn is_own(&self, body: BodyRef) -> bool {
        self.parts.contains(&body)
    }
}

/// Geometry and steering options handed to a scheme once, at setup.
#[derive(Debug, Clone, Copy)]
pub struct SchemeSetup {
    /// World bounds of the agent's body at setup.
    pub bounds: Aabb,
    /// Local point rotations turn about.
    pub pivot_offset: Vec3,
    pub camera_aligned_rotation: bool,
    pub camera_relative_movement: bool,
}

/// The scheme bound to an agent for its whole lifetime.
#[derive(Debug, Clone)]
pub enum Control {
    Character(Character),
    Hovercraft(Hovercraft),
    Aircraft(Aircraft),
}

impl Control {
    /// Builds and sets up the scheme for `control_type`. `pose` is the
    /// agent's pose at setup; local templates are taken relative to it.
    pub fn new(
        control_type: ControlType,
        config: &Config,
        setup: &SchemeSetup,
        pose: &Pose,
    ) -> Self {
        match control_type {
            ControlType::Character => {
                Control::Character(Character::new(config.character, setup, pose))
            }
            ControlType::Hovercraft => {
                Control::Hovercraft(Hovercraft::new(config.hovercraft, setup))
            }
            ControlType::Aircraft => Control::Aircraft(Aircraft::new(config.aircraft, setup)),
        }
    }

    /// Whether the orchestrator may add vertical input (Fire1/Fire2).
    pub fn can_move_on_y(&self) -> bool {
        !matches!(self, Control::Character(_))
    }

    pub fn movement(&mut self, ctx: &mut StepCtx, velocity: Vec3) {
        match self {
            Control::Character(c) => c.movement(ctx, velocity),
            Control::Hovercraft(h) => h.movement(ctx, velocity),
            Control::Aircraft(a) => a.movement(ctx, velocity),
        }
    }

    pub fn rotation(&mut self, ctx: &mut StepCtx, speed: f32) {
        match self {
            Control::Character(c) => c.rotation(ctx, speed),
            Control::Hovercraft(h) => h.rotation(ctx, speed),
            Control::Aircraft(a) => a.rotation(ctx, speed),
        }
    }

    /// Reports a contact. `direction` moves the agent out of the obstacle.
    pub fn collision(&mut self, direction: Vec3) {
        match self {
            Control::Character(c) => c.collision(direction),
            Control::Hovercraft(h) => h.collision(direction),
            Control::Aircraft(a) => a.collision(direction),
        }
    }

    pub fn synchronized_update(&mut self, ctx: &mut StepCtx) {
        match self {
            Control::Character(c) => c.synchronized_update(ctx),
            Control::Hovercraft(h) => h.synchronized_update(ctx),
            Control::Aircraft(a) => a.synchronized_update(ctx),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Control::Character(c) => c.is_active,
            Control::Hovercraft(h) => h.is_active,
            Control::Aircraft(a) => a.is_active,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        match self {
            Control::Character(c) => c.is_active = active,
            Control::Hovercraft(h) => h.is_active = active,
            Control::Aircraft(a) => a.is_active = active,
        }
    }

    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Control::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_hovercraft(&self) -> Option<&Hovercraft> {
        match self {
            Control::Hovercraft(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_aircraft(&self) -> Option<&Aircraft> {
        match self {
            Control::Aircraft(a) => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::scene::PhysicsScene;

    /// Owns everything a `StepCtx` borrows, for driving a scheme by hand.
    pub struct Rig {
        pub pose: Pose,
        pub parts: Vec<BodyRef>,
        pub input: InputState,
        pub camera: Camera,
        pub scene: PhysicsScene,
        pub dt: f32,
    }

    impl Rig {
        pub fn new(scene: PhysicsScene, pose: Pose, dt: f32) -> Self {
            Self {
                pose,
                parts: Vec::new(),
                input: InputState::new(),
                camera: Camera {
                    pitch: 0.0,
                    ..Camera::new()
                },
                scene,
                dt,
            }
        }

        pub fn with<R>(&mut self, f: impl FnOnce(&mut StepCtx) -> R) -> R {
            let mut ctx = StepCtx {
                pose: &mut self.pose,
                parts: &self.parts,
                input: &self.input,
                camera: &self.camera,
                physics: &self.scene,
                dt: self.dt,
            };
            f(&mut ctx)
        }
    }

    /// Setup for a 1 x 2 x 1 body standing with its feet at `pose`.
    pub fn unit_setup(pose: &Pose) -> SchemeSetup {
        let bounds = Aabb {
            center: pose.position + Vec3::new(0.0, 1.0, 0.0),
            extents: Vec3::new(0.5, 1.0, 0.5),
        };
        SchemeSetup {
            bounds,
            pivot_offset: Vec3::new(0.0, 1.0, 0.0),
            camera_aligned_rotation: false,
            camera_relative_movement: true,
        }
    }
}
