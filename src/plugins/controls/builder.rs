//! Builder utilities for the control buttons

use crate::config::UiConfig;
use crate::plugins::controls::constants::*;
use crate::prelude::*;
use bevy::ecs::hierarchy::ChildSpawnerCommands;

pub trait ControlsCommandsExt {
    fn spawn_control_button<T: ButtonWithLabel>(&mut self, ui: &UiConfig) -> Entity;
}

impl ControlsCommandsExt for ChildSpawnerCommands<'_> {
    fn spawn_control_button<T: ButtonWithLabel>(&mut self, ui: &UiConfig) -> Entity {
        self.spawn((
            Button,
            Node {
                width: Val::Px(BUTTON_WIDTH_PX),
                height: Val::Auto,
                padding: UiRect::all(Val::Px(ui.button_padding)),
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BorderRadius::all(Val::Px(ui.button_border_radius)),
            BackgroundColor(BUTTON_COLOR_NORMAL),
            T::marker(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(T::label()),
                TextColor(BUTTON_TEXT_COLOR),
                TextFont {
                    font_size: BUTTON_FONT_SIZE_PX,
                    ..default()
                },
            ));
        })
        .id()
    }
}

pub trait ButtonWithLabel: Component + 'static {
    /// The command this button triggers
    fn command() -> SimulationCommand;

    /// The marker component instance
    fn marker() -> Self;

    /// The base text for the button (without shortcut)
    fn base_text() -> &'static str;

    /// The keyboard shortcut for this button
    fn shortcut() -> &'static str;

    /// The base text with shortcut appended
    fn label() -> String {
        format!("{} ({})", Self::base_text(), Self::shortcut())
    }
}

/// Replace the text of every button of type `T` when it differs
pub(super) fn set_button_text<T: ButtonWithLabel>(
    buttons: &Query<&Children, With<T>>,
    texts: &mut Query<&mut Text>,
    value: &str,
) {
    for children in buttons.iter() {
        for child in children {
            if let Ok(mut text) = texts.get_mut(*child) {
                if text.0 != value {
                    text.0 = value.to_string();
                }
                break;
            }
        }
    }
}
