//! Simulation context: the single owner of pendulum state, clock, parameters
//! and trace

use crate::config::SimulationConfig;
use crate::messages::SimulationCommand;
use crate::physics::dynamics::{BobPositions, DoublePendulum, PendulumState, total_energy};
use crate::physics::integrators::{DormandPrince, Integration, SolverStatus};
use crate::physics::math::Scalar;
use crate::physics::parameters::{Parameter, ParameterBounds, PendulumParameters};
use crate::physics::trace::{Trace, TraceSegment};
use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use thiserror::Error;

pub const DEFAULT_TIME_STEP: Scalar = 0.5;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ParameterError {
    #[error("{parameter} must be finite, got {value}")]
    NotFinite { parameter: Parameter, value: Scalar },
}

/// Everything the renderer needs from one simulated frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub time: Scalar,
    pub state: PendulumState,
    pub bobs: BobPositions,
    /// Trace segments oldest first, with the age they had before this
    /// frame's decay
    pub segments: Vec<TraceSegment>,
    pub status: SolverStatus,
}

#[derive(Resource, Debug, Clone)]
pub struct SimulationContext {
    state: PendulumState,
    time: Scalar,
    time_step: Scalar,
    parameters: PendulumParameters,
    defaults: PendulumParameters,
    bounds: ParameterBounds,
    solver: DormandPrince,
    trace: Trace,
    non_finite_reported: bool,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(
            PendulumParameters::default(),
            ParameterBounds::default(),
            DEFAULT_TIME_STEP,
            Trace::default(),
        )
    }
}

impl SimulationContext {
    pub fn new(
        defaults: PendulumParameters,
        bounds: ParameterBounds,
        time_step: Scalar,
        trace: Trace,
    ) -> Self {
        let defaults = defaults.clamped(&bounds);
        Self {
            state: PendulumState::INITIAL,
            time: 0.0,
            time_step,
            parameters: defaults,
            defaults,
            bounds,
            solver: DormandPrince::default(),
            trace,
            non_finite_reported: false,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.parameters.defaults(),
            config.parameters.bounds(),
            config.physics.time_step,
            config.trace.build(),
        )
    }

    /// Start from `parameters` instead of the defaults; reset still restores
    /// the defaults
    pub fn with_parameters(mut self, parameters: PendulumParameters) -> Self {
        self.parameters = parameters.clamped(&self.bounds);
        self
    }

    pub fn with_state(mut self, state: PendulumState) -> Self {
        self.state = state;
        self
    }

    pub fn with_solver(mut self, solver: DormandPrince) -> Self {
        self.solver = solver;
        self
    }

    pub fn state(&self) -> PendulumState {
        self.state
    }

    pub fn time(&self) -> Scalar {
        self.time
    }

    pub fn time_step(&self) -> Scalar {
        self.time_step
    }

    pub fn parameters(&self) -> PendulumParameters {
        self.parameters
    }

    pub fn bounds(&self) -> &ParameterBounds {
        &self.bounds
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn bob_positions(&self) -> BobPositions {
        BobPositions::from_state(&self.state, &self.parameters)
    }

    pub fn energy(&self) -> Scalar {
        total_energy(&self.state, &self.parameters)
    }

    /// Set `parameter`, clamped to its bounds. Returns the value applied.
    pub fn set_parameter(
        &mut self,
        parameter: Parameter,
        value: Scalar,
    ) -> Result<Scalar, ParameterError> {
        if !value.is_finite() {
            return Err(ParameterError::NotFinite { parameter, value });
        }

        let applied = self.bounds.clamp(parameter, value);
        if applied != value {
            debug!("{parameter} clamped from {value} to {applied}");
        }
        self.parameters.set(parameter, applied);
        Ok(applied)
    }

    pub fn adjust_parameter(
        &mut self,
        parameter: Parameter,
        delta: Scalar,
    ) -> Result<Scalar, ParameterError> {
        self.set_parameter(parameter, self.parameters.get(parameter) + delta)
    }

    /// Apply the commands that concern the simulation itself; the rest are
    /// ignored
    pub fn apply(&mut self, command: &SimulationCommand) {
        let result = match *command {
            SimulationCommand::SetParameter(parameter, value) => {
                self.set_parameter(parameter, value)
            }
            SimulationCommand::AdjustParameter(parameter, delta) => {
                self.adjust_parameter(parameter, delta)
            }
            SimulationCommand::Reset => {
                self.reset();
                return;
            }
            _ => return,
        };

        if let Err(e) = result {
            warn!("Ignoring parameter change: {e}");
        }
    }

    /// Back to the initial state, `t = 0` and default parameters. The trace
    /// is kept.
    pub fn reset(&mut self) {
        self.state = PendulumState::INITIAL;
        self.time = 0.0;
        self.parameters = self.defaults;
        self.non_finite_reported = false;
        info!("Simulation reset");
    }

    /// Integrate one time step with the current parameters
    pub fn step(&mut self) -> Integration<4> {
        let system = DoublePendulum::new(self.parameters.clamped(&self.bounds));
        let t1 = self.time + self.time_step;

        let integration = self
            .solver
            .integrate(&system, self.time, t1, self.state.to_array());

        if !integration.is_complete() {
            warn!(
                "Integration from t={} stopped at t={} ({:?}, {} accepted, {} rejected)",
                self.time,
                integration.time,
                integration.status,
                integration.accepted_steps,
                integration.rejected_steps
            );
        }

        self.state = integration.state.into();
        self.time = t1;

        if !self.state.is_finite() && !self.non_finite_reported {
            warn!(
                "Pendulum state became non-finite at t={} with {:?}",
                self.time, self.parameters
            );
            self.non_finite_reported = true;
        }

        integration
    }

    /// Integrate, record the outer bob in the trace and run the trace's draw
    /// pass
    pub fn advance_frame(&mut self) -> Frame {
        let integration = self.step();
        let bobs = self.bob_positions();

        self.trace.push(bobs.bob2);
        let segments = self.trace.draw_pass();

        Frame {
            time: self.time,
            state: self.state,
            bobs,
            segments,
            status: integration.status,
        }
    }
}
