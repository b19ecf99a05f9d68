//! Action handlers for simulation commands

use crate::prelude::*;

pub fn apply_simulation_commands(
    mut commands_reader: EventReader<SimulationCommand>,
    mut context: ResMut<SimulationContext>,
) {
    for command in commands_reader.read() {
        if !matches!(
            command,
            SimulationCommand::SetParameter(..)
                | SimulationCommand::AdjustParameter(..)
                | SimulationCommand::Reset
        ) {
            continue;
        }
        context.apply(command);
    }
}

pub fn handle_toggle_pause_command(
    mut commands_reader: EventReader<SimulationCommand>,
    current_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let current = *current_state.get();
    let mut target = current;

    for command in commands_reader.read() {
        if matches!(command, SimulationCommand::TogglePause) {
            target = match target {
                AppState::Running => AppState::Paused,
                AppState::Paused => AppState::Running,
            };
        }
    }

    if target == current {
        return;
    }

    next_state.set(target);
    match target {
        AppState::Paused => info!("Simulation paused"),
        AppState::Running => info!("Simulation resumed"),
    }
}

pub fn handle_quit_command(
    mut commands_reader: EventReader<SimulationCommand>,
    mut exit: EventWriter<AppExit>,
) {
    for command in commands_reader.read() {
        if matches!(command, SimulationCommand::Quit) {
            exit.write_default();
        }
    }
}
