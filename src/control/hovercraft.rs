use glam::Vec3;
use tracing::debug;

use super::{SchemeSetup, StepCtx};
use crate::config::HovercraftTuning;
use crate::engine::input::Axis;
use crate::math::{approach, flatten, reflect, signed_angle_deg};

/// Gliding locomotion that bounces off obstacles.
///
/// A contact mirrors the current movement velocity about the contact
/// normal into a separate collision velocity, which then decays to zero
/// at `collision_acceleration` and is applied on top of regular movement.
#[derive(Debug, Clone)]
pub struct Hovercraft {
    pub is_active: bool,
    tuning: HovercraftTuning,
    pivot_offset: Vec3,
    camera_aligned_rotation: bool,
    camera_relative_movement: bool,
    movement_velocity: Vec3,
    collision_velocity: Vec3,
}

impl Hovercraft {
    pub fn new(tuning: HovercraftTuning, setup: &SchemeSetup) -> Self {
        Self {
            is_active: false,
            tuning,
            pivot_offset: setup.pivot_offset,
            camera_aligned_rotation: setup.camera_aligned_rotation,
            camera_relative_movement: setup.camera_relative_movement,
            movement_velocity: Vec3::ZERO,
            collision_velocity: Vec3::ZERO,
        }
    }

    pub fn movement(&mut self, ctx: &mut StepCtx, velocity: Vec3) {
        self.movement_velocity = velocity;
        ctx.pose.position += velocity * ctx.dt;
    }

    pub fn rotation(&mut self, ctx: &mut StepCtx, speed: f32) {
        let angle = if self.camera_aligned_rotation {
            let facing = flatten(ctx.pose.forward()).normalize_or_zero();
            signed_angle_deg(facing, flatten(ctx.camera.forward()), Vec3::Y)
        } else if self.camera_relative_movement {
            let heading = flatten(self.movement_velocity).normalize_or_zero();
            signed_angle_deg(flatten(ctx.pose.forward()), heading, Vec3::Y)
        } else {
            ctx.input.axis(Axis::Horizontal) * speed
        };

        let mut speed = if angle < 0.0 { -speed } else { speed };
        if ctx.dt > 0.0 && speed.abs() > angle.abs() / ctx.dt {
            speed = angle / ctx.dt;
        }

        let pivot = ctx.world_pivot(self.pivot_offset);
        ctx.pose.rotate_around(pivot, Vec3::Y, speed * ctx.dt);
    }

    pub fn collision(&mut self, direction: Vec3) {
        if self.movement_velocity.length_squared() > 0.0 {
            self.collision_velocity = reflect(self.movement_velocity, direction);
            debug!(velocity = ?self.collision_velocity, "hovercraft bounce");
        }
    }

    pub fn synchronized_update(&mut self, ctx: &mut StepCtx) {
        if !self.is_active {
            return;
        }
        self.collision_velocity = approach(
            self.collision_velocity,
            Vec3::ZERO,
            self.tuning.collision_acceleration,
            ctx.dt,
        );
        ctx.pose.position += self.collision_velocity * ctx.dt;
    }

    pub fn movement_velocity(&self) -> Vec3 {
        self.movement_velocity
    }

    pub fn collision_velocity(&self) -> Vec3 {
        self.collision_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::test_support::{unit_setup, Rig};
    use crate::engine::input::InputEvent;
    use crate::pose::Pose;
    use crate::scene::PhysicsScene;

    fn rig(dt: f32, setup_fn: impl FnOnce(&mut crate::control::SchemeSetup)) -> (Rig, Hovercraft) {
        let pose = Pose::new(Vec3::new(0.0, 0.5, 0.0));
        let mut setup = unit_setup(&pose);
        setup_fn(&mut setup);
        let mut hover = Hovercraft::new(HovercraftTuning::default(), &setup);
        hover.is_active = true;
        (Rig::new(PhysicsScene::new(), pose, dt), hover)
    }

    #[test]
    fn wall_hit_reflects_then_decays_to_zero() {
        let (mut rig, mut hover) = rig(0.02, |_| {});
        rig.with(|ctx| hover.movement(ctx, Vec3::new(5.0, 0.0, 0.0)));
        hover.collision(Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(hover.collision_velocity(), Vec3::new(-5.0, 0.0, 0.0));

        let mut last = hover.collision_velocity().length();
        let mut steps = 0;
        while hover.collision_velocity() != Vec3::ZERO {
            rig.with(|ctx| hover.synchronized_update(ctx));
            let now = hover.collision_velocity().length();
            assert!(now <= last, "decay must not grow: {now} > {last}");
            assert!(hover.collision_velocity().x <= 0.0, "no overshoot past zero");
            last = now;
            steps += 1;
            assert!(steps <= 10, "5 / 25 = 0.2 s is 10 steps at 0.02");
        }
    }

    #[test]
    fn decay_moves_the_body_back() {
        let (mut rig, mut hover) = rig(0.02, |_| {});
        rig.with(|ctx| hover.movement(ctx, Vec3::new(5.0, 0.0, 0.0)));
        let after_move = rig.pose.position.x;
        hover.collision(Vec3::NEG_X);
        rig.with(|ctx| hover.synchronized_update(ctx));
        assert!(rig.pose.position.x < after_move);
    }

    #[test]
    fn standing_still_ignores_contacts() {
        let (_, mut hover) = rig(0.02, |_| {});
        hover.collision(Vec3::NEG_X);
        assert_eq!(hover.collision_velocity(), Vec3::ZERO);
    }

    #[test]
    fn velocity_mode_turns_towards_heading_without_overshoot() {
        let (mut rig, mut hover) = rig(1.0 / 60.0, |_| {});
        rig.with(|ctx| {
            hover.movement(ctx, Vec3::new(-3.0, 0.0, 0.0));
            hover.rotation(ctx, 10_000.0);
        });
        assert!(rig.pose.forward().abs_diff_eq(Vec3::NEG_X, 1e-4));
    }

    #[test]
    fn velocity_mode_limits_turn_rate() {
        let (mut rig, mut hover) = rig(0.1, |_| {});
        rig.with(|ctx| {
            hover.movement(ctx, Vec3::new(1.0, 0.0, 0.0));
            hover.rotation(ctx, 90.0);
        });
        let turned = crate::math::angle_deg(Vec3::Z, rig.pose.forward());
        assert!((turned - 9.0).abs() < 1e-3);
    }

    #[test]
    fn tank_mode_turns_by_axis() {
        let (mut rig, mut hover) = rig(0.5, |s| s.camera_relative_movement = false);
        rig.input.apply(&[InputEvent::Axis(Axis::Horizontal, -1.0)]);
        rig.with(|ctx| hover.rotation(ctx, 90.0));
        // angle = -90, so speed flips to -90 deg/s for half a second.
        let signed = signed_angle_deg(Vec3::Z, rig.pose.forward(), Vec3::Y);
        assert!((signed + 45.0).abs() < 1e-3);
    }

    #[test]
    fn strafe_mode_faces_camera() {
        let (mut rig, mut hover) = rig(1.0 / 60.0, |s| s.camera_aligned_rotation = true);
        rig.camera.yaw = 0.0; // looking down +X
        rig.with(|ctx| hover.rotation(ctx, 10_000.0));
        assert!(rig.pose.forward().abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn zero_dt_does_not_rotate() {
        let (mut rig, mut hover) = rig(0.0, |_| {});
        rig.with(|ctx| {
            hover.movement(ctx, Vec3::X);
            hover.rotation(ctx, 360.0);
        });
        assert_eq!(rig.pose.rotation, glam::Quat::IDENTITY);
    }
}
