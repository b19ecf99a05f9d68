//! Window-independent simulation core
//!
//! Nothing here needs a running Bevy app; the plugins only drive
//! [`simulation::SimulationContext`] and read what it produces.

pub mod dynamics;
pub mod integrators;
pub mod math;
pub mod parameters;
pub mod simulation;
pub mod trace;
