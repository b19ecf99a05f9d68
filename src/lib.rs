//! Double pendulum library
//!
//! The simulation core lives in [`physics`] and does not need a running app.
//! The Bevy plugins in [`plugins`] drive it once per frame, draw it and turn
//! user input into [`messages::SimulationCommand`]s.

pub mod cli;
pub mod config;
pub mod messages;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod states;

// Test utilities are public for integration tests
pub mod test_utils;
