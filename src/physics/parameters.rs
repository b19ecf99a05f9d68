//! Pendulum parameters and their bounds

use crate::physics::math::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four externally adjustable pendulum parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    Length1,
    Length2,
    Mass1,
    Mass2,
}

impl Parameter {
    pub const ALL: [Parameter; 4] = [
        Parameter::Length1,
        Parameter::Length2,
        Parameter::Mass1,
        Parameter::Mass2,
    ];

    /// Human-readable name used in labels and logs
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Length1 => "Length of Pendulum 1",
            Parameter::Length2 => "Length of Pendulum 2",
            Parameter::Mass1 => "Mass of Pendulum 1",
            Parameter::Mass2 => "Mass of Pendulum 2",
        }
    }

    pub fn is_length(self) -> bool {
        matches!(self, Parameter::Length1 | Parameter::Length2)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rod lengths and bob masses, read once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendulumParameters {
    pub length1: Scalar,
    pub length2: Scalar,
    pub mass1: Scalar,
    pub mass2: Scalar,
}

impl Default for PendulumParameters {
    fn default() -> Self {
        Self {
            length1: 150.0,
            length2: 150.0,
            mass1: 10.0,
            mass2: 10.0,
        }
    }
}

impl PendulumParameters {
    pub fn get(&self, parameter: Parameter) -> Scalar {
        match parameter {
            Parameter::Length1 => self.length1,
            Parameter::Length2 => self.length2,
            Parameter::Mass1 => self.mass1,
            Parameter::Mass2 => self.mass2,
        }
    }

    pub fn set(&mut self, parameter: Parameter, value: Scalar) {
        match parameter {
            Parameter::Length1 => self.length1 = value,
            Parameter::Length2 => self.length2 = value,
            Parameter::Mass1 => self.mass1 = value,
            Parameter::Mass2 => self.mass2 = value,
        }
    }

    /// Display string for one parameter, e.g. `Length of Pendulum 1: 150`
    pub fn label(&self, parameter: Parameter) -> String {
        format!("{}: {}", parameter.name(), self.get(parameter))
    }

    /// Copy with every value clamped into `bounds`
    pub fn clamped(&self, bounds: &ParameterBounds) -> Self {
        let mut clamped = *self;
        for parameter in Parameter::ALL {
            clamped.set(parameter, bounds.clamp(parameter, self.get(parameter)));
        }
        clamped
    }
}

/// Closed interval a parameter is allowed to take
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: Scalar,
    pub max: Scalar,
}

impl Range {
    pub const fn new(min: Scalar, max: Scalar) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: Scalar) -> Scalar {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: Scalar) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Allowed ranges for lengths and masses
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub length: Range,
    pub mass: Range,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            length: Range::new(1.0, 300.0),
            mass: Range::new(1.0, 20.0),
        }
    }
}

impl ParameterBounds {
    pub fn range(&self, parameter: Parameter) -> Range {
        if parameter.is_length() {
            self.length
        } else {
            self.mass
        }
    }

    pub fn clamp(&self, parameter: Parameter, value: Scalar) -> Scalar {
        self.range(parameter).clamp(value)
    }
}
