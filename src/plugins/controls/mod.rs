//! Controls plugin - Self-contained plugin pattern
//!
//! This plugin handles all user input (keyboard and UI buttons) and translates
//! it into SimulationCommand events. The simulation itself never reads input
//! devices.

use crate::config::ParametersConfig;
use crate::physics::parameters::Parameter;
use crate::plugins::simulation::SimulationSet;
use crate::prelude::*;
use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::window::SystemCursorIcon;
use bevy::winit::cursor::CursorIcon;

mod builder;
mod buttons;
mod constants;

pub use builder::ButtonWithLabel;
use builder::ControlsCommandsExt;
pub use buttons::*;
use constants::*;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SimulationCommand>();

        app.add_systems(Startup, setup_controls_ui);

        app.add_systems(
            Update,
            (
                keyboard_input_handler,
                button_interaction_handler::<ResetButton>,
                button_interaction_handler::<PauseButton>,
                button_interaction_handler::<TraceToggleButton>,
            )
                .in_set(SimulationSet::Input),
        );

        app.add_systems(
            Update,
            (
                pause::sync_pause_button_text,
                trace::sync_trace_button_text,
            )
                .in_set(SimulationSet::Render),
        );
    }
}

/// Command bound to a key, if any
///
/// Letter keys come in pairs: the upper row raises a parameter by its
/// configured step and the key below lowers it.
pub fn command_for_key(key: &Key, parameters: &ParametersConfig) -> Option<SimulationCommand> {
    let adjust = |parameter: Parameter, sign: Scalar| {
        Some(SimulationCommand::AdjustParameter(
            parameter,
            sign * parameters.step(parameter),
        ))
    };

    match key {
        Key::Character(c) => match c.to_lowercase().as_str() {
            "q" => adjust(Parameter::Length1, 1.0),
            "a" => adjust(Parameter::Length1, -1.0),
            "w" => adjust(Parameter::Length2, 1.0),
            "s" => adjust(Parameter::Length2, -1.0),
            "e" => adjust(Parameter::Mass1, 1.0),
            "d" => adjust(Parameter::Mass1, -1.0),
            "r" => adjust(Parameter::Mass2, 1.0),
            "f" => adjust(Parameter::Mass2, -1.0),
            "n" => Some(SimulationCommand::Reset),
            "t" => Some(SimulationCommand::ToggleTrace),
            _ => None,
        },
        Key::Space => Some(SimulationCommand::TogglePause),
        Key::Escape => Some(SimulationCommand::Quit),
        _ => None,
    }
}

fn keyboard_input_handler(
    mut keyboard_events: EventReader<KeyboardInput>,
    mut commands: EventWriter<SimulationCommand>,
    config: Res<SimulationConfig>,
) {
    for event in keyboard_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }

        if let Some(command) = command_for_key(&event.logical_key, &config.parameters) {
            commands.write(command);
        }
    }
}

#[allow(clippy::type_complexity)]
fn button_interaction_handler<T: ButtonWithLabel>(
    mut commands: Commands,
    window: Option<Single<Entity, With<Window>>>,
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<T>),
    >,
    mut command_writer: EventWriter<SimulationCommand>,
) {
    for (interaction, mut color) in &mut interaction_query {
        let cursor = match *interaction {
            Interaction::Pressed => {
                *color = BackgroundColor(BUTTON_COLOR_PRESSED);
                command_writer.write(T::command());
                SystemCursorIcon::Pointer
            }
            Interaction::Hovered => {
                *color = BackgroundColor(BUTTON_COLOR_HOVERED);
                SystemCursorIcon::Pointer
            }
            Interaction::None => {
                *color = BackgroundColor(BUTTON_COLOR_NORMAL);
                SystemCursorIcon::Default
            }
        };

        if let Some(window) = &window {
            commands
                .entity(**window)
                .insert(CursorIcon::System(cursor));
        }
    }
}

#[derive(Component)]
pub struct UIRoot;

fn setup_controls_ui(mut commands: Commands, config: Res<SimulationConfig>) {
    if !config.ui.show_controls {
        return;
    }

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(config.ui.button_margin),
                left: Val::Px(config.ui.button_margin),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                row_gap: Val::Px(config.ui.button_gap),
                ..default()
            },
            UIRoot,
        ))
        .with_children(|parent| {
            parent.spawn_control_button::<ResetButton>(&config.ui);
            parent.spawn_control_button::<PauseButton>(&config.ui);
            parent.spawn_control_button::<TraceToggleButton>(&config.ui);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::simulation::SimulationPlugin;
    use crate::test_utils::{create_test_app, key_press};

    #[test]
    fn test_key_bindings() {
        let parameters = ParametersConfig::default();
        let key = |c: &str| Key::Character(c.into());

        assert_eq!(
            command_for_key(&key("q"), &parameters),
            Some(SimulationCommand::AdjustParameter(Parameter::Length1, 10.0))
        );
        assert_eq!(
            command_for_key(&key("S"), &parameters),
            Some(SimulationCommand::AdjustParameter(Parameter::Length2, -10.0))
        );
        assert_eq!(
            command_for_key(&key("e"), &parameters),
            Some(SimulationCommand::AdjustParameter(Parameter::Mass1, 1.0))
        );
        assert_eq!(
            command_for_key(&key("f"), &parameters),
            Some(SimulationCommand::AdjustParameter(Parameter::Mass2, -1.0))
        );
        assert_eq!(
            command_for_key(&key("n"), &parameters),
            Some(SimulationCommand::Reset)
        );
        assert_eq!(
            command_for_key(&key("t"), &parameters),
            Some(SimulationCommand::ToggleTrace)
        );
        assert_eq!(
            command_for_key(&Key::Space, &parameters),
            Some(SimulationCommand::TogglePause)
        );
        assert_eq!(
            command_for_key(&Key::Escape, &parameters),
            Some(SimulationCommand::Quit)
        );
        assert_eq!(command_for_key(&key("x"), &parameters), None);
        assert_eq!(command_for_key(&Key::Enter, &parameters), None);
    }

    #[test]
    fn test_key_steps_follow_config() {
        let mut parameters = ParametersConfig::default();
        parameters.length.step = 25.0;

        assert_eq!(
            command_for_key(&Key::Character("a".into()), &parameters),
            Some(SimulationCommand::AdjustParameter(Parameter::Length1, -25.0))
        );
    }

    #[test]
    fn test_keyboard_adjusts_simulation() {
        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(SimulationConfig::default()));
        app.add_plugins(ControlsPlugin);

        app.world_mut().send_event(key_press(KeyCode::KeyQ, "q"));
        app.world_mut().send_event(key_press(KeyCode::KeyR, "r"));
        app.update();

        let parameters = app.world().resource::<SimulationContext>().parameters();
        assert_eq!(parameters.length1, 160.0);
        assert_eq!(parameters.mass2, 11.0);
    }

    #[test]
    fn test_controls_hidden_by_config() {
        let mut config = SimulationConfig::default();
        config.ui.show_controls = false;

        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(config));
        app.add_plugins(ControlsPlugin);
        app.update();

        let mut roots = app.world_mut().query::<&UIRoot>();
        assert_eq!(roots.iter(app.world()).count(), 0);
    }

    #[test]
    fn test_buttons_spawned() {
        let mut app = create_test_app();
        app.add_plugins(SimulationPlugin::with_config(SimulationConfig::default()));
        app.add_plugins(ControlsPlugin);
        app.update();

        let world = app.world_mut();
        assert_eq!(world.query::<&ResetButton>().iter(world).count(), 1);
        assert_eq!(world.query::<&PauseButton>().iter(world).count(), 1);
        assert_eq!(world.query::<&TraceToggleButton>().iter(world).count(), 1);
    }
}
