//! Command line interface for the double pendulum

use bevy::app::App;
use bevy::log::{Level, LogPlugin};
use bevy::utils::default;
use clap::Parser;
use thiserror::Error;

use crate::config::{ConfigError, SimulationConfig};
use crate::physics::integrators::SolverStatus;
use crate::physics::math::Scalar;
use crate::physics::parameters::{Parameter, PendulumParameters};
use crate::physics::simulation::SimulationContext;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load configuration: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("invalid value for --{flag}: {value}")]
    InvalidOverride { flag: &'static str, value: Scalar },
}

/// Double pendulum - chaotic motion of two coupled rods
#[derive(Parser, Debug, Default)]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about,
    long_about = None
)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Initial length of the upper rod
    #[arg(long, value_name = "LENGTH")]
    pub length1: Option<Scalar>,

    /// Initial length of the lower rod
    #[arg(long, value_name = "LENGTH")]
    pub length2: Option<Scalar>,

    /// Initial mass of the upper bob
    #[arg(long, value_name = "MASS")]
    pub mass1: Option<Scalar>,

    /// Initial mass of the lower bob
    #[arg(long, value_name = "MASS")]
    pub mass2: Option<Scalar>,

    /// Simulated time per frame (overrides config file)
    #[arg(long, value_name = "SECONDS")]
    pub time_step: Option<Scalar>,

    /// Start paused
    #[arg(short = 'p', long)]
    pub paused: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Run this many frames without a window, print the final state and exit
    #[arg(long, value_name = "COUNT")]
    pub frames: Option<usize>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    fn parameter_overrides(&self) -> [(Parameter, &'static str, Option<Scalar>); 4] {
        [
            (Parameter::Length1, "length1", self.length1),
            (Parameter::Length2, "length2", self.length2),
            (Parameter::Mass1, "mass1", self.mass1),
            (Parameter::Mass2, "mass2", self.mass2),
        ]
    }
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = if let Some(config_path) = &args.config {
        println!("Loading configuration from: {config_path}");
        SimulationConfig::load(config_path)?
    } else {
        SimulationConfig::load_from_user_config()
    };

    if let Some(time_step) = args.time_step {
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(CliError::InvalidOverride {
                flag: "time-step",
                value: time_step,
            });
        }
        println!("Overriding time step to: {time_step}");
        config.physics.time_step = time_step;
    }

    if args.paused {
        config.physics.start_paused = true;
    }

    Ok(config)
}

/// Starting parameters: configured defaults with any per-rod overrides,
/// clamped to the configured bounds
pub fn initial_parameters(
    args: &Args,
    config: &SimulationConfig,
) -> Result<PendulumParameters, CliError> {
    let mut parameters = config.parameters.defaults();

    for (parameter, flag, value) in args.parameter_overrides() {
        let Some(value) = value else {
            continue;
        };
        if !value.is_finite() {
            return Err(CliError::InvalidOverride { flag, value });
        }
        parameters.set(parameter, value);
    }

    Ok(parameters.clamped(&config.parameters.bounds()))
}

/// Log plugin at DEBUG with `--verbose`, INFO otherwise
pub fn log_plugin(args: &Args) -> LogPlugin {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    LogPlugin {
        level,
        ..default()
    }
}

/// Install the global log subscriber without opening a window, so solver
/// warnings reach stderr in headless runs
pub fn install_headless_logging(args: &Args) {
    App::new().add_plugins(log_plugin(args));
}

/// Advance `frames` frames without rendering and describe where the
/// pendulum ended up
pub fn run_headless(
    config: &SimulationConfig,
    parameters: PendulumParameters,
    frames: usize,
) -> String {
    let mut context = SimulationContext::from_config(config).with_parameters(parameters);
    let mut incomplete_steps = 0;

    for _ in 0..frames {
        let frame = context.advance_frame();
        if frame.status != SolverStatus::Completed {
            incomplete_steps += 1;
        }
    }

    let state = context.state();
    let bobs = context.bob_positions();
    format!(
        "frames: {frames}\n\
         time: {}\n\
         angles: {} {}\n\
         angular velocities: {} {}\n\
         bob 1: {} {}\n\
         bob 2: {} {}\n\
         energy: {}\n\
         trace points: {}\n\
         incomplete steps: {incomplete_steps}\n\
         finite: {}\n",
        context.time(),
        state.angle1,
        state.angle2,
        state.angular_velocity1,
        state.angular_velocity2,
        bobs.bob1.x,
        bobs.bob1.y,
        bobs.bob2.x,
        bobs.bob2.y,
        context.energy(),
        context.trace().len(),
        state.is_finite(),
    )
}
