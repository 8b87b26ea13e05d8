use glam::Vec3;
use serde::Serialize;
use tracing::debug;

use crate::components::QueryFilter;
use crate::config::{Config, ControlSettings, InputType};
use crate::control::{Control, SchemeSetup, StepCtx};
use crate::engine::input::{Axis, Button};
use crate::fsm::StateMachine;
use crate::math::approach;
use crate::pose::{Aabb, Pose};

/// Minimum opposition between a contact and the travel direction that
/// counts as running into something.
const OPPOSING_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    Moving,
    /// Movement is held for `bounce_duration` after running into something.
    Bouncing,
}

/// Drives one agent's control scheme from player input.
///
/// Each step: read the axes into a target direction, smooth the current
/// direction towards it, then either move and turn (while `Moving` and
/// clear of obstacles) or wait out a bounce, and finally run the scheme's
/// own synchronized update.
#[derive(Debug, Clone)]
pub struct ControlAction {
    settings: ControlSettings,
    control: Control,
    fsm: StateMachine<MoveState>,
    current_direction: Vec3,
    target_direction: Vec3,
    active: bool,
}

impl ControlAction {
    pub fn new(
        settings: ControlSettings,
        config: &Config,
        bounds: Aabb,
        pivot_offset: Vec3,
        pose: &Pose,
    ) -> Self {
        let setup = SchemeSetup {
            bounds,
            pivot_offset,
            camera_aligned_rotation: settings.input_type.camera_aligned_rotation(),
            camera_relative_movement: settings.input_type.camera_relative_movement(),
        };
        let control = Control::new(settings.control_type, config, &setup, pose);
        Self {
            settings,
            control,
            fsm: StateMachine::new(MoveState::Moving),
            current_direction: Vec3::ZERO,
            target_direction: Vec3::ZERO,
            active: true,
        }
    }

    pub fn step(&mut self, ctx: &mut StepCtx) {
        if !self.active {
            return;
        }
        self.fsm.tick(ctx.dt);
        self.control.set_active(true);

        self.target_direction = self.read_input(ctx);
        self.current_direction = if self.settings.use_acceleration {
            approach(
                self.current_direction,
                self.target_direction,
                self.settings.normalized_acceleration,
                ctx.dt,
            )
        } else {
            self.target_direction
        };

        match self.fsm.state {
            MoveState::Moving => {
                if self.is_colliding(ctx) {
                    debug!(direction = ?self.current_direction, "bouncing");
                    self.current_direction = Vec3::ZERO;
                    self.fsm.go(MoveState::Bouncing);
                } else {
                    let velocity = self.velocity(ctx.pose);
                    self.control.movement(ctx, velocity);
                    self.control.rotation(ctx, self.settings.rotation_speed as f32);
                }
            }
            MoveState::Bouncing => {
                if self.fsm.elapsed >= self.settings.bounce_duration {
                    self.fsm.go(MoveState::Moving);
                }
            }
        }

        self.control.synchronized_update(ctx);
    }

    /// Unit direction from the axes, plus half a unit up or down from the
    /// vertical buttons when the scheme can leave the ground plane.
    fn read_input(&self, ctx: &StepCtx) -> Vec3 {
        let (right, forward) = if self.settings.input_type.camera_relative_movement() {
            let mut right = ctx.camera.right();
            right.y = 0.0;
            let mut forward = ctx.camera.forward();
            forward.y = 0.0;
            (right.normalize_or_zero(), forward.normalize_or_zero())
        } else {
            (ctx.pose.right(), ctx.pose.forward())
        };

        // Tank steering turns with the horizontal axis instead of strafing.
        let mut target = if self.settings.input_type == InputType::Tank {
            Vec3::ZERO
        } else {
            right * ctx.input.axis(Axis::Horizontal)
        };
        target += forward * ctx.input.axis(Axis::Vertical);
        target = target.normalize_or_zero();

        if self.control.can_move_on_y() {
            if ctx.input.is_held(Button::Fire1) {
                target += Vec3::Y * 0.5;
            }
            if ctx.input.is_held(Button::Fire2) {
                target -= Vec3::Y * 0.5;
            }
        }
        target
    }

    fn velocity(&self, pose: &Pose) -> Vec3 {
        let speed = self.settings.world_speed();
        let mut velocity = self.current_direction * speed;
        if self.settings.always_moving_forward {
            velocity += pose.forward() * speed * 0.5;
        }
        velocity
    }

    /// Reports every penetrating contact to the scheme and returns true at
    /// the first one that pushes back against the travel direction.
    fn is_colliding(&mut self, ctx: &StepCtx) -> bool {
        for &part in ctx.parts {
            for other in ctx.physics.touching(part, QueryFilter::default()) {
                let Some(contact) = ctx.physics.compute_penetration(part, other) else {
                    continue;
                };
                self.control.collision(contact.direction);
                if contact.direction.dot(self.current_direction) < -OPPOSING_EPSILON {
                    return true;
                }
            }
        }
        false
    }

    /// Stops the action for good; the scheme is deactivated immediately.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.control.set_active(false);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> MoveState {
        self.fsm.state
    }

    pub fn current_direction(&self) -> Vec3 {
        self.current_direction
    }

    pub fn target_direction(&self) -> Vec3 {
        self.target_direction
    }

    pub fn control(&self) -> &Control {
        &self.control
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControlType;
    use crate::control::test_support::{unit_setup, Rig};
    use crate::engine::input::InputEvent;
    use crate::scene::prefabs::{spawn_brick, spawn_static_box};
    use crate::scene::PhysicsScene;

    fn action(control_type: ControlType, input_type: InputType) -> (ControlAction, Pose) {
        let pose = Pose::new(Vec3::new(0.0, 0.5, 0.0));
        let setup = unit_setup(&pose);
        let settings = ControlSettings {
            control_type,
            input_type,
            ..ControlSettings::default()
        };
        let action = ControlAction::new(
            settings,
            &Config::default(),
            setup.bounds,
            setup.pivot_offset,
            &pose,
        );
        (action, pose)
    }

    fn rig(pose: Pose, dt: f32) -> Rig {
        Rig::new(PhysicsScene::new(), pose, dt)
    }

    #[test]
    fn smoothed_direction_reaches_target_after_half_a_second() {
        let (mut action, pose) = action(ControlType::Hovercraft, InputType::Direct);
        let mut rig = rig(pose, 1.0 / 32.0);
        rig.input.apply(&[InputEvent::Axis(Axis::Vertical, 1.0)]);
        for step in 1..=16 {
            rig.with(|ctx| action.step(ctx));
            let reached = action.current_direction().abs_diff_eq(Vec3::Z, 1e-6);
            assert_eq!(reached, step == 16, "step {step}");
            if step < 16 {
                assert!(action.current_direction().length() < 1.0);
            }
        }
        assert!(action
            .current_direction()
            .abs_diff_eq(action.target_direction(), 1e-6));
    }

    #[test]
    fn without_acceleration_direction_is_immediate() {
        let (mut action, pose) = action(ControlType::Hovercraft, InputType::Direct);
        action.settings.use_acceleration = false;
        let mut rig = rig(pose, 1.0 / 60.0);
        rig.input.apply(&[InputEvent::Axis(Axis::Horizontal, 1.0)]);
        rig.with(|ctx| action.step(ctx));
        assert!(action.current_direction().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn tank_input_ignores_horizontal_for_movement() {
        let (action, pose) = action(ControlType::Hovercraft, InputType::Tank);
        let mut rig = rig(pose, 1.0 / 60.0);
        rig.input.apply(&[
            InputEvent::Axis(Axis::Horizontal, 1.0),
            InputEvent::Axis(Axis::Vertical, 1.0),
        ]);
        let target = rig.with(|ctx| action.read_input(ctx));
        assert!(target.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let (action, pose) = action(ControlType::Character, InputType::Direct);
        let mut rig = rig(pose, 1.0 / 60.0);
        rig.input.apply(&[
            InputEvent::Axis(Axis::Horizontal, 1.0),
            InputEvent::Axis(Axis::Vertical, 1.0),
        ]);
        let target = rig.with(|ctx| action.read_input(ctx));
        assert!((target.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fire_buttons_lift_only_flying_schemes() {
        let (hover, pose) = action(ControlType::Hovercraft, InputType::Direct);
        let (walker, _) = action(ControlType::Character, InputType::Direct);
        let mut rig = rig(pose, 1.0 / 60.0);
        rig.input.apply(&[InputEvent::ButtonDown(Button::Fire1)]);
        assert_eq!(rig.with(|ctx| hover.read_input(ctx)), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(rig.with(|ctx| walker.read_input(ctx)), Vec3::ZERO);
    }

    #[test]
    fn velocity_uses_lego_module_and_forward_drift() {
        let (mut action, pose) = action(ControlType::Hovercraft, InputType::Direct);
        action.current_direction = Vec3::X;
        assert!(action.velocity(&pose).abs_diff_eq(Vec3::new(16.0, 0.0, 0.0), 1e-4));
        action.settings.always_moving_forward = true;
        assert!(action.velocity(&pose).abs_diff_eq(Vec3::new(16.0, 0.0, 8.0), 1e-4));
    }

    /// A hovercraft driving +X whose single brick overlaps a wall.
    fn pressed_into_wall(dt: f32) -> (ControlAction, Rig) {
        let mut scene = PhysicsScene::new();
        spawn_static_box(&mut scene.world, Vec3::new(0.9, 1.0, 0.0), Vec3::new(0.5, 2.0, 2.0));
        let pose = Pose::new(Vec3::new(0.0, 0.5, 0.0));
        let root = scene.spawn_root(&pose);
        let brick = spawn_brick(&mut scene.world, root, Vec3::ZERO, Vec3::splat(0.5));
        scene.place_root(root, &pose);

        let (mut action, _) = action(ControlType::Hovercraft, InputType::Direct);
        action.settings.use_acceleration = false;
        let mut rig = Rig::new(scene, pose, dt);
        rig.parts.push(brick);
        rig.input.apply(&[InputEvent::Axis(Axis::Horizontal, 1.0)]);
        (action, rig)
    }

    #[test]
    fn opposing_contact_starts_a_bounce() {
        let (mut action, mut rig) = pressed_into_wall(1.0 / 32.0);
        rig.with(|ctx| action.step(ctx));
        assert_eq!(action.state(), MoveState::Bouncing);
        assert_eq!(action.current_direction(), Vec3::ZERO);
        // No movement on the colliding step.
        assert_eq!(rig.pose.position, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn bounce_holds_for_its_duration() {
        let (mut action, mut rig) = pressed_into_wall(1.0 / 32.0);
        rig.with(|ctx| action.step(ctx));
        assert_eq!(action.state(), MoveState::Bouncing);
        // 3 steps is 0.09375 s, still inside the 0.1 s hold.
        for _ in 0..3 {
            rig.with(|ctx| action.step(ctx));
            assert_eq!(action.state(), MoveState::Bouncing);
        }
        rig.with(|ctx| action.step(ctx));
        assert_eq!(action.state(), MoveState::Moving);
    }

    #[test]
    fn contacts_along_travel_do_not_bounce() {
        let (mut action, mut rig) = pressed_into_wall(1.0 / 32.0);
        rig.input.apply(&[InputEvent::Axis(Axis::Horizontal, -1.0)]);
        rig.with(|ctx| action.step(ctx));
        assert_eq!(action.state(), MoveState::Moving);
        assert!(rig.pose.position.x < 0.0);
    }

    #[test]
    fn deactivated_action_does_nothing() {
        let (mut action, pose) = action(ControlType::Hovercraft, InputType::Direct);
        action.deactivate();
        assert!(!action.control().is_active());
        let mut rig = rig(pose, 1.0 / 60.0);
        rig.input.apply(&[InputEvent::Axis(Axis::Vertical, 1.0)]);
        rig.with(|ctx| action.step(ctx));
        assert_eq!(rig.pose, pose);
    }
}
