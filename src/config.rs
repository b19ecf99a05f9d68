//! Simulation configuration
//!
//! Values are layered: built-in defaults, then a TOML file, then environment
//! variables such as `DOUBLE_PENDULUM__PHYSICS__TIME_STEP=0.25`.

use crate::physics::math::Scalar;
use crate::physics::parameters::{Parameter, ParameterBounds, PendulumParameters, Range};
use crate::physics::trace::Trace;
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_PREFIX: &str = "DOUBLE_PENDULUM";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Largest accepted `trace.capacity`
pub const MAX_TRACE_CAPACITY: usize = 1_000_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub parameters: ParametersConfig,
    pub trace: TraceConfig,
    pub rendering: RenderingConfig,
    pub ui: UiConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Simulated time advanced per rendered frame
    pub time_step: Scalar,
    pub start_paused: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_step: 0.5,
            start_paused: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParameterConfig {
    pub min: Scalar,
    pub max: Scalar,
    pub default: Scalar,
    /// Increment applied by one key press
    pub step: Scalar,
}

impl ParameterConfig {
    pub fn range(&self) -> Range {
        Range::new(self.min, self.max)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    pub length: ParameterConfig,
    pub mass: ParameterConfig,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            length: ParameterConfig {
                min: 1.0,
                max: 300.0,
                default: 150.0,
                step: 10.0,
            },
            mass: ParameterConfig {
                min: 1.0,
                max: 20.0,
                default: 10.0,
                step: 1.0,
            },
        }
    }
}

impl ParametersConfig {
    pub fn get(&self, parameter: Parameter) -> &ParameterConfig {
        if parameter.is_length() {
            &self.length
        } else {
            &self.mass
        }
    }

    pub fn bounds(&self) -> ParameterBounds {
        ParameterBounds {
            length: self.length.range(),
            mass: self.mass.range(),
        }
    }

    pub fn defaults(&self) -> PendulumParameters {
        PendulumParameters {
            length1: self.length.default,
            length2: self.length.default,
            mass1: self.mass.default,
            mass2: self.mass.default,
        }
    }

    pub fn step(&self, parameter: Parameter) -> Scalar {
        self.get(parameter).step
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TraceConfig {
    pub enabled: bool,
    pub capacity: usize,
    pub initial_age: Scalar,
    pub decay_per_frame: Scalar,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: crate::physics::trace::DEFAULT_CAPACITY,
            initial_age: crate::physics::trace::DEFAULT_INITIAL_AGE,
            decay_per_frame: crate::physics::trace::DEFAULT_DECAY,
        }
    }
}

impl TraceConfig {
    pub fn build(&self) -> Trace {
        Trace::new(self.capacity, self.initial_age, self.decay_per_frame)
    }
}

/// Colors are sRGB components in `0.0..=1.0`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderingConfig {
    pub background_color: [f32; 3],
    pub rod_color: [f32; 3],
    pub bob_fill_color: [f32; 3],
    pub trace_color: [f32; 3],
    pub line_width: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [1.0, 1.0, 1.0],
            rod_color: [0.0, 0.0, 0.0],
            bob_fill_color: [127.0 / 255.0; 3],
            trace_color: [0.0, 0.0, 0.0],
            line_width: 2.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub font_size: f32,
    pub show_parameter_labels: bool,
    pub show_controls: bool,
    pub button_padding: f32,
    pub button_gap: f32,
    pub button_margin: f32,
    pub button_border_radius: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            show_parameter_labels: true,
            show_controls: true,
            button_padding: 5.0,
            button_gap: 10.0,
            button_margin: 10.0,
            button_border_radius: 5.0,
        }
    }
}

impl SimulationConfig {
    /// Load from `path`, which must exist, with environment overrides on top
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::layered(Some(path.as_ref()))
    }

    /// Load from `path`, falling back to defaults (plus environment) when the
    /// file is missing or unusable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = if path.exists() {
            Some(path)
        } else {
            info!("Config file {} not found. Using defaults.", path.display());
            None
        };

        match Self::layered(file) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config file {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Load `config.toml` from the platform configuration directory
    pub fn load_from_user_config() -> Self {
        match Self::user_config_path() {
            Some(path) => Self::load_or_default(path),
            None => {
                warn!("No configuration directory available. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "double-pendulum")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    fn layered(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(true),
            );
        }

        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let time_step = self.physics.time_step;
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.time_step must be positive, got {time_step}"
            )));
        }

        for (name, parameter) in [
            ("length", &self.parameters.length),
            ("mass", &self.parameters.mass),
        ] {
            let values = [parameter.min, parameter.max, parameter.default, parameter.step];
            if values.iter().any(|value| !value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "parameters.{name} contains a non-finite value"
                )));
            }
            if parameter.min <= 0.0 || parameter.min > parameter.max {
                return Err(ConfigError::Invalid(format!(
                    "parameters.{name} range [{}, {}] must be positive and ordered",
                    parameter.min, parameter.max
                )));
            }
            if !parameter.range().contains(parameter.default) {
                return Err(ConfigError::Invalid(format!(
                    "parameters.{name}.default {} lies outside [{}, {}]",
                    parameter.default, parameter.min, parameter.max
                )));
            }
            if parameter.step <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "parameters.{name}.step must be positive"
                )));
            }
        }

        let trace = &self.trace;
        if trace.capacity > MAX_TRACE_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "trace.capacity must be at most {MAX_TRACE_CAPACITY}, got {}",
                trace.capacity
            )));
        }
        if !(trace.initial_age >= 0.0 && trace.initial_age.is_finite()) {
            return Err(ConfigError::Invalid(
                "trace.initial_age must be a non-negative number".to_string(),
            ));
        }
        if !(trace.decay_per_frame >= 0.0 && trace.decay_per_frame.is_finite()) {
            return Err(ConfigError::Invalid(
                "trace.decay_per_frame must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "double-pendulum-{}-{}.toml",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.physics.time_step, 0.5);
        assert_eq!(config.trace.capacity, 2000);
        assert_eq!(config.parameters.defaults(), PendulumParameters::default());
        assert_eq!(config.parameters.bounds(), ParameterBounds::default());
    }

    #[test]
    fn test_parameter_steps() {
        let parameters = ParametersConfig::default();
        assert_eq!(parameters.step(Parameter::Length2), 10.0);
        assert_eq!(parameters.step(Parameter::Mass1), 1.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "[physics]\ntime_step = 0.25\n\n[trace]\ncapacity = 10\n")
            .expect("write config");

        let config = SimulationConfig::load(&path).expect("load config");
        std::fs::remove_file(&path).ok();

        assert_eq!(config.physics.time_step, 0.25);
        assert_eq!(config.trace.capacity, 10);
        assert_eq!(config.trace.initial_age, 150.0);
        assert_eq!(config.parameters, ParametersConfig::default());
        assert_eq!(config.ui.font_size, 20.0);
    }

    #[test]
    fn test_partial_parameter_table_keeps_other_fields() {
        let path = temp_path("partial-parameters");
        std::fs::write(&path, "[parameters.mass]\nmax = 15\n").expect("write config");

        let config = SimulationConfig::load(&path).expect("load config");
        std::fs::remove_file(&path).ok();

        assert_eq!(config.parameters.mass.max, 15.0);
        assert_eq!(config.parameters.mass.min, 1.0);
        assert_eq!(config.parameters.mass.default, 10.0);
        assert_eq!(config.parameters.mass.step, 1.0);
        assert_eq!(config.parameters.length, ParametersConfig::default().length);
    }

    #[test]
    fn test_huge_trace_capacity_is_rejected() {
        let path = temp_path("huge-trace");
        std::fs::write(&path, "[trace]\ncapacity = 1000000000000000\n").expect("write config");

        let result = SimulationConfig::load(&path);
        let fallback = SimulationConfig::load_or_default(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        assert_eq!(fallback.trace.capacity, 2000);

        let mut config = SimulationConfig::default();
        config.trace.capacity = MAX_TRACE_CAPACITY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let mut config = SimulationConfig::default();
        config.parameters.length.default = 120.0;
        config.rendering.line_width = 3.0;

        config.save(&path).expect("save config");
        let loaded = SimulationConfig::load(&path).expect("load config");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = SimulationConfig::load_or_default(temp_path("missing-does-not-exist"));
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let path = temp_path("invalid");
        std::fs::write(&path, "[physics]\ntime_step = -1.0\n").expect("write config");

        assert!(matches!(
            SimulationConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
        assert_eq!(
            SimulationConfig::load_or_default(&path),
            SimulationConfig::default()
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_validation_rejects_bad_ranges() {
        let mut config = SimulationConfig::default();
        config.parameters.length.min = 400.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.parameters.mass.default = 50.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.trace.decay_per_frame = -0.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.physics.time_step = Scalar::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_lists_every_section() {
        let toml = SimulationConfig::default().to_toml().expect("serialize");
        for section in ["[physics]", "[parameters.length]", "[parameters.mass]", "[trace]", "[rendering]", "[ui]"] {
            assert!(toml.contains(section), "missing {section}");
        }
    }
}
