//! Shared styling constants for controls UI

use bevy::prelude::Color;

pub const BUTTON_FONT_SIZE_PX: f32 = 14.0;
pub const BUTTON_WIDTH_PX: f32 = 150.0;

pub const BUTTON_COLOR_NORMAL: Color = Color::srgba(0.0, 0.0, 0.0, 0.55);
pub const BUTTON_COLOR_HOVERED: Color = Color::srgba(0.0, 0.0, 0.0, 0.7);
pub const BUTTON_COLOR_PRESSED: Color = Color::srgba(0.0, 0.0, 0.0, 0.85);
pub const BUTTON_TEXT_COLOR: Color = Color::WHITE;
