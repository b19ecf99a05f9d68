//! Centralized message definitions
//!
//! Input sources (keyboard, buttons) never touch the simulation directly.
//! They emit [`SimulationCommand`]s, which the simulation plugin drains once
//! per frame before integrating.

use crate::physics::math::Scalar;
use crate::physics::parameters::Parameter;
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SimulationCommand {
    /// Set a parameter to an absolute value, clamped to its bounds
    SetParameter(Parameter, Scalar),
    /// Add a signed delta to a parameter, clamped to its bounds
    AdjustParameter(Parameter, Scalar),
    Reset,
    TogglePause,
    ToggleTrace,
    Quit,
}
