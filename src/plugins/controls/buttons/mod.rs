//! Control buttons, one module per button

pub mod pause;
pub mod reset;
pub mod trace;

pub use pause::PauseButton;
pub use reset::ResetButton;
pub use trace::TraceToggleButton;
