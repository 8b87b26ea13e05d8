use glam::{Quat, Vec3};
use tracing::debug;

use crate::components::QueryFilter;
use crate::config::{LookAtSettings, LookRotation, LookTarget};
use crate::fsm::StateMachine;
use crate::math::{flatten, from_to_rotation, rotate_towards, signed_angle_deg};
use crate::pose::Pose;
use crate::scene::{BodyRef, PhysicsQuery};

/// How far above the player's feet a look-at model aims.
const PLAYER_AIM_HEIGHT: f32 = 2.0;
const OPPOSING_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookPhase {
    Looking,
    WaitingToLook,
}

/// What a look-at model reads and moves during one step.
pub struct LookCtx<'a> {
    pub pose: &'a mut Pose,
    pub pivot_offset: Vec3,
    pub parts: &'a [BodyRef],
    pub physics: &'a dyn PhysicsQuery,
    /// Root position of the player, if there is one.
    pub player: Option<Vec3>,
    pub dt: f32,
}

impl LookCtx<'_> {
    fn world_pivot(&self) -> Vec3 {
        self.pose.position + self.pose.transform_vector(self.pivot_offset)
    }
}

/// Turns a model so that its right side points at the player or a fixed
/// point, for `time` seconds at a time with `pause` seconds in between.
#[derive(Debug, Clone)]
pub struct LookAtAction {
    settings: LookAtSettings,
    fsm: StateMachine<LookPhase>,
    active: bool,
    /// Degrees turned on the last step, and about which world axis.
    rotation_angle: f32,
    rotation_axis: Vec3,
}

impl LookAtAction {
    pub fn new(settings: LookAtSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            fsm: StateMachine::new(LookPhase::Looking),
            active: true,
            rotation_angle: 0.0,
            rotation_axis: Vec3::Y,
        }
    }

    pub fn step(&mut self, ctx: &mut LookCtx) {
        if !self.active {
            return;
        }
        self.fsm.tick(ctx.dt);

        if self.fsm.state == LookPhase::Looking {
            let (angle, axis) = self.compute_rotation(ctx);
            self.rotation_angle = angle;
            self.rotation_axis = axis;

            if self.is_colliding(ctx) {
                debug!("look blocked");
                self.fsm.go(LookPhase::WaitingToLook);
            } else {
                let pivot = ctx.world_pivot();
                ctx.pose.rotate_around(pivot, axis, angle);
                if self.fsm.elapsed >= self.settings.time {
                    self.fsm.go(LookPhase::WaitingToLook);
                }
            }
        }

        if self.fsm.state == LookPhase::WaitingToLook && self.fsm.elapsed >= self.settings.pause {
            self.fsm.go(LookPhase::Looking);
            self.active = self.settings.repeat;
            debug!(repeat = self.active, "look finished");
        }
    }

    /// This step's rotation as (degrees, world axis), limited by the
    /// angular speed and by the time left in the current look.
    fn compute_rotation(&self, ctx: &LookCtx) -> (f32, Vec3) {
        let pivot = ctx.world_pivot();
        let fallback = pivot + ctx.pose.right();
        let target = match self.settings.target {
            LookTarget::Player => ctx.player.map(|p| p + Vec3::Y * PLAYER_AIM_HEIGHT),
            LookTarget::Point(point) => point,
        }
        .unwrap_or(fallback);

        let desired = target - pivot;
        let current = ctx.pose.right();
        let max_step = self.settings.speed * ctx.dt;
        let delta = match self.settings.rotate {
            LookRotation::Horizontally => horizontal_delta(current, desired, max_step),
            LookRotation::Vertically => vertical_delta(current, desired, max_step),
            LookRotation::Freely => {
                horizontal_delta(current, desired, max_step)
                    * vertical_delta(current, desired, max_step)
            }
        };

        let (axis, radians) = delta.to_axis_angle();
        let time_left = (self.settings.time - self.fsm.elapsed + ctx.dt).max(0.0);
        let angle = radians
            .to_degrees()
            .min(max_step)
            .min(self.settings.speed * time_left);
        (angle, axis)
    }

    /// True when a contact pushes back against the way this step's
    /// rotation would move the touching point.
    fn is_colliding(&self, ctx: &LookCtx) -> bool {
        let center = ctx.world_pivot();
        let turn = Quat::from_axis_angle(self.rotation_axis, self.rotation_angle.to_radians());
        for &part in ctx.parts {
            for other in ctx.physics.touching(part, QueryFilter::default()) {
                let Some(contact) = ctx.physics.compute_penetration(part, other) else {
                    continue;
                };
                let Some(point) = ctx
                    .physics
                    .closest_point(other, center)
                    .and_then(|p| ctx.physics.closest_point(part, p))
                else {
                    continue;
                };
                let velocity = turn * (point - center) + center - point;
                if contact.direction.dot(velocity) < -OPPOSING_EPSILON {
                    return true;
                }
            }
        }
        false
    }

    pub fn phase(&self) -> LookPhase {
        self.fsm.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn settings(&self) -> &LookAtSettings {
        &self.settings
    }
}

/// Rotation about world up that swings `current` towards `desired` in the
/// ground plane, by at most `max_degrees`.
fn horizontal_delta(current: Vec3, desired: Vec3, max_degrees: f32) -> Quat {
    let full = from_to_rotation(flatten(current), flatten(desired));
    rotate_towards(Quat::IDENTITY, full, max_degrees)
}

/// Rotation that tilts `current` up or down towards `desired`, ignoring
/// any horizontal difference between them.
fn vertical_delta(current: Vec3, desired: Vec3, max_degrees: f32) -> Quat {
    let heading_gap = signed_angle_deg(flatten(desired), flatten(current), Vec3::Y);
    let in_plane = Quat::from_rotation_y(heading_gap.to_radians()) * desired;
    let full = from_to_rotation(current, in_plane);
    rotate_towards(Quat::IDENTITY, full, max_degrees)
}
