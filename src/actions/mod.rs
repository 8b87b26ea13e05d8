//! Behaviours that drive a body each fixed step: player control and
//! look-at turrets.

pub mod control_action;
pub mod look_at;

pub use control_action::{ControlAction, MoveState};
pub use look_at::{LookAtAction, LookCtx, LookPhase};
