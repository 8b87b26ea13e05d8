use std::f32::consts::PI;

use glam::{Mat4, Vec3};

use crate::fsm::StateMachine;

/// Peak squash-stretch amount at the middle of the animation.
const DEFORM_AMPLITUDE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeformPhase {
    NotAnimating,
    Animating,
}

/// Per-axis scale at normalized time `t` (0 at trigger, 1 at the end).
/// Neutral at both ends, widest and flattest at `t = 0.5`.
pub fn squash_stretch_scale(t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let s = (t * PI).sin().clamp(-1.0, 1.0) * DEFORM_AMPLITUDE;
    Vec3::new(1.0 + s, 1.0 - s, 1.0 + s)
}

/// Shape deformation for a renderer: scale about a ground-anchored pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deformation {
    pub scale: Vec3,
    pub pivot: Vec3,
    pub matrix: Mat4,
}

impl Deformation {
    pub fn new(scale: Vec3, pivot: Vec3) -> Self {
        let matrix = Mat4::from_translation(pivot)
            * Mat4::from_scale(scale)
            * Mat4::from_translation(-pivot);
        Self {
            scale,
            pivot,
            matrix,
        }
    }
}

/// The squash-stretch played on jumps, landings and large bumps.
#[derive(Debug, Clone)]
pub struct DeformAnimation {
    fsm: StateMachine<DeformPhase>,
    duration: f32,
    scale: Vec3,
}

impl DeformAnimation {
    pub fn new(duration: f32) -> Self {
        Self {
            fsm: StateMachine::new(DeformPhase::NotAnimating),
            duration,
            scale: Vec3::ONE,
        }
    }

    /// Starts the animation from the beginning, even if it is playing.
    pub fn play(&mut self) {
        self.fsm.force_go(DeformPhase::Animating);
        self.scale = Vec3::ONE;
    }

    pub fn update(&mut self, dt: f32) {
        if self.fsm.state == DeformPhase::NotAnimating {
            return;
        }
        self.fsm.tick(dt);
        self.scale = squash_stretch_scale(self.fsm.elapsed / self.duration);
        if self.fsm.elapsed >= self.duration {
            self.scale = Vec3::ONE;
            self.fsm.go(DeformPhase::NotAnimating);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.fsm.state == DeformPhase::Animating
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Seconds since the animation was last triggered.
    pub fn elapsed(&self) -> f32 {
        self.fsm.elapsed
    }
}
