//! Simulation plugin - Self-contained plugin pattern
//!
//! Owns the [`SimulationContext`] resource and drives it once per rendered
//! frame. Commands from any input source are drained in
//! [`SimulationSet::Commands`], before the integration step, so parameters
//! stay fixed for the whole step.

use crate::physics::parameters::PendulumParameters;
use crate::prelude::*;

mod actions;
mod physics;

use actions::{apply_simulation_commands, handle_quit_command, handle_toggle_pause_command};
use physics::advance_simulation;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Commands,
    Physics,
    Render,
}

/// The frame produced by the most recent integration step
#[derive(Resource, Default, Debug, Clone, Deref, DerefMut)]
pub struct LatestFrame(pub Option<Frame>);

#[derive(Default)]
pub struct SimulationPlugin {
    config: Option<SimulationConfig>,
    initial_parameters: Option<PendulumParameters>,
}

impl SimulationPlugin {
    /// Plugin reading `config.toml` from the user configuration directory
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
            initial_parameters: None,
        }
    }

    /// Start from these parameters instead of the configured defaults
    pub fn with_initial_parameters(mut self, parameters: PendulumParameters) -> Self {
        self.initial_parameters = Some(parameters);
        self
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match config.to_toml() {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let mut context = SimulationContext::from_config(&config);
        if let Some(parameters) = self.initial_parameters {
            context = context.with_parameters(parameters);
        }

        app.init_state::<AppState>();
        if config.physics.start_paused {
            app.insert_resource(NextState::Pending(AppState::Paused));
        }

        app.insert_resource(config);
        app.insert_resource(context);
        app.init_resource::<LatestFrame>();
        app.add_event::<SimulationCommand>();

        app.configure_sets(
            Update,
            (
                SimulationSet::Input,
                SimulationSet::Commands,
                SimulationSet::Physics,
                SimulationSet::Render,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                apply_simulation_commands,
                handle_toggle_pause_command,
                handle_quit_command,
            )
                .in_set(SimulationSet::Commands),
        );
        app.add_systems(
            Update,
            advance_simulation
                .in_set(SimulationSet::Physics)
                .run_if(in_state(AppState::Running)),
        );
    }
}
