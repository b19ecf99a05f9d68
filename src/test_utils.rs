//! Test utilities for plugin testing

use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};

use crate::prelude::*;

/// Creates a minimal test app with core Bevy plugins needed for testing
pub fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        bevy::asset::AssetPlugin::default(),
        bevy::input::InputPlugin,
        bevy::state::app::StatesPlugin,
    ));

    app.init_asset::<bevy::text::Font>();
    app.add_event::<SimulationCommand>();

    app
}

/// A pressed-key event as the window backend would deliver it
pub fn key_press(key_code: KeyCode, character: &str) -> KeyboardInput {
    KeyboardInput {
        key_code,
        logical_key: Key::Character(character.into()),
        state: ButtonState::Pressed,
        text: Some(character.into()),
        repeat: false,
        window: Entity::PLACEHOLDER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert!(app.world().contains_resource::<Time>());
        assert!(app.world().contains_resource::<ButtonInput<KeyCode>>());
        assert!(app
            .world()
            .contains_resource::<Events<SimulationCommand>>());
    }

    #[test]
    fn test_key_press() {
        let event = key_press(KeyCode::KeyQ, "q");
        assert_eq!(event.logical_key, Key::Character("q".into()));
        assert_eq!(event.state, ButtonState::Pressed);
    }
}
