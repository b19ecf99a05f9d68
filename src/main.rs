use bevy::prelude::*;
use clap::Parser;
use double_pendulum::cli::{self, Args, CliError};
use double_pendulum::plugins::controls::ControlsPlugin;
use double_pendulum::plugins::simulation::SimulationPlugin;
use double_pendulum::plugins::visualization::VisualizationPlugin;

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    if args.frames.is_some() {
        cli::install_headless_logging(&args);
    }

    let config = cli::load_and_apply_config(&args)?;
    let parameters = cli::initial_parameters(&args, &config)?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if let Some(frames) = args.frames {
        print!("{}", cli::run_headless(&config, parameters, frames));
        return Ok(());
    }

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Double Pendulum".to_string(),
                        ..default()
                    }),
                    ..default()
                })
                .set(cli::log_plugin(&args)),
        )
        .add_plugins((
            SimulationPlugin::with_config(config).with_initial_parameters(parameters),
            ControlsPlugin,
            VisualizationPlugin,
        ))
        .run();

    Ok(())
}
