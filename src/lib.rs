//! Fixed-step locomotion for brick-built characters, hovercraft and aircraft.

pub mod actions;
pub mod body;
pub mod camera;
pub mod components;
pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod events;
pub mod fsm;
pub mod math;
pub mod pose;
pub mod scene;
pub mod sim;
pub mod systems;
