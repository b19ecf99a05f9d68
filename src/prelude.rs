//! Double pendulum prelude module
//!
//! Re-exports the types most systems need so plugin modules can start with a
//! single `use crate::prelude::*;`.

// External crate re-exports
pub use bevy::prelude::*;

// Internal re-exports - Config
pub use crate::config::SimulationConfig;

// Internal re-exports - States
pub use crate::states::AppState;

// Internal re-exports - Messages
pub use crate::messages::SimulationCommand;

// Internal re-exports - Physics
pub use crate::physics::math::{Scalar, Vector};
pub use crate::physics::simulation::{Frame, SimulationContext};
