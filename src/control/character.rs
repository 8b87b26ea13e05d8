//! Walking locomotion: ground probes, step-up, jump and gravity.
//!
//! Five probe points sit `probe_height` above the body's feet: the four
//! bottom corners and the bottom centre. Each step they are carried along
//! with the pose and the corners are pushed ahead in the direction the
//! player is steering, so ledges are found before the body reaches them.
//! A probe that is already buried in something does not cast; the others
//! cast straight down for `probe_height + raycast_extension`.

use glam::Vec3;
use tracing::debug;

use super::deform::{DeformAnimation, Deformation};
use super::{SchemeSetup, StepCtx};
use crate::components::{LayerMask, QueryFilter};
use crate::config::CharacterTuning;
use crate::engine::input::{Axis, Button};
use crate::math::{flatten, signed_angle_deg};
use crate::pose::{Aabb, Pose};

const PROBE_COUNT: usize = 5;
/// Index of the bottom-centre probe; the others are corners.
const CENTER_PROBE: usize = PROBE_COUNT - 1;
const MIN_BUMP: f32 = 0.01;

fn ground_filter() -> QueryFilter {
    QueryFilter::solid(LayerMask::DEFAULT | LayerMask::ENVIRONMENT)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpState {
    pub in_jump: bool,
    pub velocity: Vec3,
    /// Seconds since the jump started.
    pub timer: f32,
    pub cooldown: f32,
}

#[derive(Debug, Clone)]
pub struct Character {
    pub is_active: bool,
    tuning: CharacterTuning,
    /// Launch speed: tuning jump speed plus the body's half height.
    jump_speed: f32,
    pivot_offset: Vec3,
    /// Bottom centre of the body in the local frame, the deformation anchor.
    deform_pivot: Vec3,
    camera_relative_rotation: bool,
    local_probes: [Vec3; PROBE_COUNT],
    world_probes: [Vec3; PROBE_COUNT],
    current_velocity: Vec3,
    jump: JumpState,
    in_air_timer: f32,
    on_ground: bool,
    prev_on_ground: bool,
    animation: DeformAnimation,
}

impl Character {
    pub fn new(tuning: CharacterTuning, setup: &SchemeSetup, pose: &Pose) -> Self {
        let bounds = setup.bounds;
        let local_probes = probe_template(&bounds, tuning.probe_height, pose);
        Self {
            is_active: false,
            tuning,
            jump_speed: tuning.jump_speed + bounds.extents.y,
            pivot_offset: setup.pivot_offset,
            deform_pivot: pose.inverse_transform_vector(bounds.bottom_center() - pose.position),
            camera_relative_rotation: setup.camera_aligned_rotation,
            world_probes: local_probes.map(|p| pose.transform_point(p)),
            local_probes,
            current_velocity: Vec3::ZERO,
            jump: JumpState {
                cooldown: tuning.jump_cooldown,
                ..JumpState::default()
            },
            in_air_timer: 0.0,
            on_ground: true,
            prev_on_ground: false,
            animation: DeformAnimation::new(tuning.animation_duration),
        }
    }

    pub fn movement(&mut self, ctx: &mut StepCtx, velocity: Vec3) {
        if !self.is_active {
            return;
        }
        self.current_velocity = velocity;
        ctx.pose.position += velocity * ctx.dt;
    }

    /// Turns about world up towards the camera or the direction of travel.
    pub fn rotation(&mut self, ctx: &mut StepCtx, speed: f32) {
        if !self.is_active {
            return;
        }
        let target = if self.camera_relative_rotation {
            flatten(ctx.camera.forward())
        } else {
            flatten(self.current_velocity.normalize_or_zero())
        };
        let forward = flatten(ctx.pose.forward());
        let angle = signed_angle_deg(forward, target, Vec3::Y);
        let mut turn = angle * speed * self.tuning.rotation_multiplier * ctx.dt;
        if turn.abs() > angle.abs() {
            turn = angle;
        }
        let pivot = ctx.world_pivot(self.pivot_offset);
        ctx.pose.rotate_around(pivot, Vec3::Y, turn);
    }

    pub fn collision(&mut self, direction: Vec3) {
        if direction.y >= self.tuning.floor_normal_y {
            self.in_air_timer = 0.0;
        } else if self.jump.in_jump {
            debug!(?direction, "jump cancelled by contact");
            self.jump.in_jump = false;
        }
    }

    pub fn synchronized_update(&mut self, ctx: &mut StepCtx) {
        if !self.is_active {
            return;
        }
        let dt = ctx.dt;

        self.place_probes(ctx);
        self.on_ground = self.ground_check(ctx);

        if self.on_ground && ctx.input.was_pressed(Button::Jump) && !self.jump.in_jump {
            self.start_jump(ctx);
        }

        if !self.on_ground {
            self.in_air_timer += dt;
            if self.in_air_timer >= self.tuning.in_air_threshold || self.jump.in_jump {
                self.in_air(ctx);
            }
        } else {
            if !self.prev_on_ground && self.in_air_timer >= self.tuning.landing_threshold {
                debug!(air_time = self.in_air_timer, "landed");
                self.animation.play();
            }
            self.in_air_timer = 0.0;
        }
        self.prev_on_ground = self.on_ground;

        self.animation.update(dt);

        self.jump.timer += dt;
        if self.jump.in_jump && self.jump.timer >= self.jump.cooldown {
            self.jump.in_jump = false;
        }
    }

    fn place_probes(&mut self, ctx: &StepCtx) {
        let lookahead = (ctx.pose.right() * ctx.input.axis(Axis::Horizontal)
            + ctx.pose.forward() * ctx.input.axis(Axis::Vertical))
            * self.tuning.lookahead;
        for (i, local) in self.local_probes.iter().enumerate() {
            let mut point = ctx.pose.transform_point(*local);
            if i != CENTER_PROBE {
                point += lookahead;
            }
            self.world_probes[i] = point;
        }
    }

    /// Casts the probes and applies the step-up. Returns whether any probe
    /// found ground below it.
    fn ground_check(&mut self, ctx: &mut StepCtx) -> bool {
        let filter = ground_filter();
        let reach = self.tuning.probe_height + self.tuning.raycast_extension;
        let mut nearest: Option<f32> = None;

        for &point in &self.world_probes {
            let buried = ctx
                .physics
                .overlap_sphere(point, self.tuning.probe_radius, filter)
                .into_iter()
                .any(|body| !ctx.is_own(body));
            if buried {
                continue;
            }
            let hit = ctx
                .physics
                .raycast_all(point, Vec3::NEG_Y, reach, filter)
                .into_iter()
                .filter(|hit| !ctx.is_own(hit.body))
                .map(|hit| hit.distance)
                .reduce(f32::min);
            if let Some(d) = hit {
                nearest = Some(nearest.map_or(d, |n: f32| n.min(d)));
            }
        }

        if let Some(distance) = nearest {
            if !self.jump.in_jump {
                self.bump(ctx, distance);
            }
        }

        nearest.is_some() && !self.is_rising()
    }

    fn is_rising(&self) -> bool {
        self.jump.in_jump && self.jump.velocity.y > 0.0
    }

    /// Lifts the body onto a step whose top is `distance` below the probes.
    fn bump(&mut self, ctx: &mut StepCtx, distance: f32) {
        let height = self.tuning.probe_height;
        let lift = height - distance;
        if lift > MIN_BUMP && lift < height {
            ctx.pose.position.y += lift;
            debug!(lift, "stepped up");
            if lift > height / 2.0 {
                self.animation.play();
            }
        }
    }

    fn start_jump(&mut self, ctx: &mut StepCtx) {
        debug!(speed = self.jump_speed, "jump");
        self.animation.play();
        self.jump.velocity = Vec3::new(0.0, self.jump_speed, 0.0);
        self.jump.timer = 0.0;
        self.jump.in_jump = true;
        // Leave the ground on the triggering step.
        self.in_air(ctx);
    }

    fn in_air(&mut self, ctx: &mut StepCtx) {
        let step = if self.jump.in_jump {
            if self.jump.velocity.y > self.tuning.gravity.y {
                self.jump.velocity += self.tuning.jump_momentum;
            }
            self.jump.velocity * ctx.dt
        } else {
            self.tuning.gravity * ctx.dt
        };
        ctx.pose.position += step;
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn jump(&self) -> &JumpState {
        &self.jump
    }

    pub fn launch_speed(&self) -> f32 {
        self.jump_speed
    }

    pub fn in_air_time(&self) -> f32 {
        self.in_air_timer
    }

    /// World-space probe points of the last update.
    pub fn probes(&self) -> &[Vec3; PROBE_COUNT] {
        &self.world_probes
    }

    pub fn animation(&self) -> &DeformAnimation {
        &self.animation
    }

    /// Current squash-stretch for a renderer, anchored at the feet.
    pub fn deformation(&self, pose: &Pose) -> Deformation {
        let pivot = pose.position + pose.transform_vector(self.deform_pivot);
        Deformation::new(self.animation.scale(), pivot)
    }
}

/// Probe points in the local frame of `pose`: the four bottom corners of
/// `bounds` and its bottom centre, raised by `height`.
fn probe_template(bounds: &Aabb, height: f32, pose: &Pose) -> [Vec3; PROBE_COUNT] {
    let min = bounds.min();
    let max = bounds.max();
    let raise = Vec3::new(0.0, height, 0.0);
    [
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(bounds.center.x, min.y, bounds.center.z),
    ]
    .map(|p| pose.inverse_transform_point(p + raise))
}
