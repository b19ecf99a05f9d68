//! Bevy plugins wrapping the simulation core

pub mod controls;
pub mod simulation;
pub mod visualization;
