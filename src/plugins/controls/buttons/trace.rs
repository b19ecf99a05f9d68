//! Trace visibility toggle button component

use crate::plugins::controls::ButtonWithLabel;
use crate::plugins::controls::builder::set_button_text;
use crate::plugins::visualization::TraceVisibility;
use crate::prelude::*;

#[derive(Component, Default)]
pub struct TraceToggleButton;

impl ButtonWithLabel for TraceToggleButton {
    fn command() -> SimulationCommand {
        SimulationCommand::ToggleTrace
    }

    fn marker() -> Self {
        Self
    }

    fn base_text() -> &'static str {
        "Hide Trace"
    }

    fn shortcut() -> &'static str {
        "T"
    }
}

pub fn sync_trace_button_text(
    visibility: Option<Res<TraceVisibility>>,
    buttons: Query<&Children, With<TraceToggleButton>>,
    mut texts: Query<&mut Text>,
) {
    let Some(visibility) = visibility else {
        return;
    };

    let text = if visibility.enabled {
        "Hide Trace (T)"
    } else {
        "Show Trace (T)"
    };
    set_button_text(&buttons, &mut texts, text);
}
