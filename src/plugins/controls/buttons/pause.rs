//! Pause/resume button component

use crate::plugins::controls::ButtonWithLabel;
use crate::plugins::controls::builder::set_button_text;
use crate::prelude::*;

#[derive(Component, Default)]
pub struct PauseButton;

impl ButtonWithLabel for PauseButton {
    fn command() -> SimulationCommand {
        SimulationCommand::TogglePause
    }

    fn marker() -> Self {
        Self
    }

    fn base_text() -> &'static str {
        "Pause"
    }

    fn shortcut() -> &'static str {
        "Space"
    }
}

pub fn pause_button_text(state: AppState) -> &'static str {
    match state {
        AppState::Running => "Pause (Space)",
        AppState::Paused => "Resume (Space)",
    }
}

pub fn sync_pause_button_text(
    state: Res<State<AppState>>,
    buttons: Query<&Children, With<PauseButton>>,
    mut texts: Query<&mut Text>,
) {
    set_button_text(&buttons, &mut texts, pause_button_text(*state.get()));
}
