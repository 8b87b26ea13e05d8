use glam::Vec3;

use super::{SchemeSetup, StepCtx};
use crate::config::AircraftTuning;
use crate::math::{flatten, move_towards, project_on_plane, signed_angle_deg};

/// Banked flight: the nose follows the direction of travel and the wings
/// level themselves out over time. Contacts are ignored.
#[derive(Debug, Clone)]
pub struct Aircraft {
    pub is_active: bool,
    tuning: AircraftTuning,
    pivot_offset: Vec3,
    camera_aligned_rotation: bool,
    current_velocity: Vec3,
    rotation_enabled: bool,
}

impl Aircraft {
    pub fn new(tuning: AircraftTuning, setup: &SchemeSetup) -> Self {
        Self {
            is_active: false,
            tuning,
            pivot_offset: setup.pivot_offset,
            camera_aligned_rotation: setup.camera_aligned_rotation,
            current_velocity: Vec3::ZERO,
            rotation_enabled: false,
        }
    }

    pub fn movement(&mut self, ctx: &mut StepCtx, velocity: Vec3) {
        self.current_velocity = velocity;
        ctx.pose.position += velocity * ctx.dt;
    }

    /// Pitches and yaws towards the heading, each turn capped at the
    /// remaining angle, then rolls back towards world up at a rate that
    /// does not depend on `speed`.
    pub fn rotation(&mut self, ctx: &mut StepCtx, speed: f32) {
        if !self.rotation_enabled || self.current_velocity.length_squared() == 0.0 {
            return;
        }
        let dt = ctx.dt;
        let forward = ctx.pose.forward();
        let right = ctx.pose.right();
        let up = ctx.pose.up();

        let heading = if self.camera_aligned_rotation {
            ctx.camera.forward()
        } else {
            self.current_velocity.normalize_or_zero()
        };

        // Pitch only sees the heading in the plane the nose sweeps through.
        let pitch = signed_angle_deg(forward, project_on_plane(heading, right), right);
        let yaw = signed_angle_deg(flatten(forward), flatten(heading), up);
        let leveled_up = move_towards(up, Vec3::Y, self.tuning.roll_recovery * dt);
        let roll = signed_angle_deg(up, leveled_up, forward);

        let pivot = ctx.world_pivot(self.pivot_offset);
        ctx.pose.rotate_around(pivot, right, capped(pitch, speed * dt));
        ctx.pose.rotate_around(pivot, up, capped(yaw, speed * dt));
        if self.tuning.roll_compensation {
            ctx.pose.rotate_around(pivot, forward, roll * dt);
        }
    }

    pub fn collision(&mut self, _direction: Vec3) {}

    pub fn synchronized_update(&mut self, _ctx: &mut StepCtx) {
        if self.is_active {
            self.rotation_enabled = true;
        }
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotation_enabled
    }
}

/// `angle * gain`, never past `angle` itself.
fn capped(angle: f32, gain: f32) -> f32 {
    let turn = angle * gain;
    if turn.abs() > angle.abs() {
        angle
    } else {
        turn
    }
}
