//! Equations of motion for the double pendulum
//!
//! Both angles are measured from the downward vertical and are left unwrapped.
//! Positions use screen orientation: `y` grows downward, so a bob hanging at
//! rest sits at `(0, l)`.

use crate::physics::integrators::OdeSystem;
use crate::physics::math::{Scalar, Vector};
use crate::physics::parameters::PendulumParameters;
use std::f64::consts::PI;

/// Gravitational acceleration in simulation units
pub const GRAVITY: Scalar = 0.9;

/// Angles and angular velocities of both rods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumState {
    pub angle1: Scalar,
    pub angle2: Scalar,
    pub angular_velocity1: Scalar,
    pub angular_velocity2: Scalar,
}

impl PendulumState {
    /// Starting configuration: rod 1 horizontal, rod 2 at π/3.8, both at rest
    pub const INITIAL: PendulumState = PendulumState {
        angle1: PI / 2.0,
        angle2: PI / 3.8,
        angular_velocity1: 0.0,
        angular_velocity2: 0.0,
    };

    pub const fn new(
        angle1: Scalar,
        angle2: Scalar,
        angular_velocity1: Scalar,
        angular_velocity2: Scalar,
    ) -> Self {
        Self {
            angle1,
            angle2,
            angular_velocity1,
            angular_velocity2,
        }
    }

    pub fn to_array(self) -> [Scalar; 4] {
        [
            self.angle1,
            self.angle2,
            self.angular_velocity1,
            self.angular_velocity2,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }
}

impl Default for PendulumState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl From<[Scalar; 4]> for PendulumState {
    fn from([angle1, angle2, angular_velocity1, angular_velocity2]: [Scalar; 4]) -> Self {
        Self::new(angle1, angle2, angular_velocity1, angular_velocity2)
    }
}

impl From<PendulumState> for [Scalar; 4] {
    fn from(state: PendulumState) -> Self {
        state.to_array()
    }
}

/// Time derivative `(a1', a2', w1', w2')` of the state vector.
///
/// `t` does not enter the equations; it is part of the signature so the
/// function fits the integrator's interface. No guard is applied to the
/// denominators: degenerate parameters produce non-finite output.
pub fn derivative(_t: Scalar, state: &[Scalar; 4], params: &PendulumParameters) -> [Scalar; 4] {
    let [a1, a2, w1, w2] = *state;
    let PendulumParameters {
        length1: l1,
        length2: l2,
        mass1: m1,
        mass2: m2,
    } = *params;
    let g = GRAVITY;
    let total_mass = m1 + m2;

    let delta = a2 - a1;
    let (sin_delta, cos_delta) = (libm::sin(delta), libm::cos(delta));
    let (sin_a1, sin_a2) = (libm::sin(a1), libm::sin(a2));

    let den1 = total_mass * l1 - m2 * l1 * cos_delta * cos_delta;
    let dw1 = (m2 * l1 * w1 * w1 * sin_delta * cos_delta
        + m2 * g * sin_a2 * cos_delta
        + m2 * l2 * w2 * w2 * sin_delta
        - total_mass * g * sin_a1)
        / den1;

    let den2 = (l2 / l1) * den1;
    let dw2 = (-m2 * l2 * w2 * w2 * sin_delta * cos_delta
        + total_mass * g * sin_a1 * cos_delta
        - total_mass * l1 * w1 * w1 * sin_delta
        - total_mass * g * sin_a2)
        / den2;

    [w1, w2, dw1, dw2]
}

/// The pendulum as an ODE system, carrying the parameter snapshot for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoublePendulum {
    pub parameters: PendulumParameters,
}

impl DoublePendulum {
    pub fn new(parameters: PendulumParameters) -> Self {
        Self { parameters }
    }
}

impl OdeSystem<4> for DoublePendulum {
    fn derivative(&self, t: Scalar, state: &[Scalar; 4]) -> [Scalar; 4] {
        derivative(t, state, &self.parameters)
    }
}

/// Cartesian positions of both bobs relative to the pivot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BobPositions {
    pub bob1: Vector,
    pub bob2: Vector,
}

impl BobPositions {
    pub fn from_state(state: &PendulumState, params: &PendulumParameters) -> Self {
        let bob1 = Vector::new(
            params.length1 * libm::sin(state.angle1),
            params.length1 * libm::cos(state.angle1),
        );
        let bob2 = bob1
            + Vector::new(
                params.length2 * libm::sin(state.angle2),
                params.length2 * libm::cos(state.angle2),
            );

        Self { bob1, bob2 }
    }
}

/// Kinetic plus potential energy, with the pivot as the potential zero.
///
/// Only used for diagnostics; the simulation never corrects energy drift.
pub fn total_energy(state: &PendulumState, params: &PendulumParameters) -> Scalar {
    let PendulumParameters {
        length1: l1,
        length2: l2,
        mass1: m1,
        mass2: m2,
    } = *params;
    let PendulumState {
        angle1: a1,
        angle2: a2,
        angular_velocity1: w1,
        angular_velocity2: w2,
    } = *state;

    let kinetic = 0.5 * (m1 + m2) * l1 * l1 * w1 * w1
        + 0.5 * m2 * l2 * l2 * w2 * w2
        + m2 * l1 * l2 * w1 * w2 * libm::cos(a1 - a2);
    // Screen y points down, so height is -y
    let potential =
        -(m1 + m2) * GRAVITY * l1 * libm::cos(a1) - m2 * GRAVITY * l2 * libm::cos(a2);

    kinetic + potential
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_rates_are_angular_velocities() {
        let state = [0.3, -1.2, 0.7, -0.25];
        let rates = derivative(0.0, &state, &PendulumParameters::default());

        assert_eq!(rates[0], state[2]);
        assert_eq!(rates[1], state[3]);
    }

    #[test]
    fn test_time_does_not_enter_equations() {
        let state = PendulumState::INITIAL.to_array();
        let params = PendulumParameters::default();

        assert_eq!(
            derivative(0.0, &state, &params),
            derivative(1234.5, &state, &params)
        );
    }

    #[test]
    fn test_hanging_at_rest_is_equilibrium() {
        let rates = derivative(0.0, &[0.0; 4], &PendulumParameters::default());
        assert_eq!(rates, [0.0; 4]);
    }

    #[test]
    fn test_gravity_restores_displaced_rod() {
        // Rod 1 pushed to the right, rod 2 hanging straight: rod 1 swings back
        let rates = derivative(0.0, &[0.2, 0.0, 0.0, 0.0], &PendulumParameters::default());
        assert!(rates[2] < 0.0);
        // Rod 2 is dragged along by the pivot it hangs from
        assert!(rates[3] > 0.0);
    }

    #[test]
    fn test_initial_state_derivative() {
        let rates = derivative(
            0.0,
            &PendulumState::INITIAL.to_array(),
            &PendulumParameters::default(),
        );

        assert_eq!(rates[0], 0.0);
        assert_eq!(rates[1], 0.0);
        assert!((rates[2] - -0.006).abs() < 1e-12);
        assert!(rates[3].abs() < 1e-12);
    }

    #[test]
    fn test_zero_length_is_not_guarded() {
        let params = PendulumParameters {
            length1: 0.0,
            ..PendulumParameters::default()
        };
        let rates = derivative(0.0, &PendulumState::INITIAL.to_array(), &params);

        assert!(!rates[2].is_finite() || !rates[3].is_finite());
    }

    #[test]
    fn test_bob_positions() {
        let params = PendulumParameters::default();
        let hanging = BobPositions::from_state(&PendulumState::new(0.0, 0.0, 0.0, 0.0), &params);
        assert_eq!(hanging.bob1, Vector::new(0.0, 150.0));
        assert_eq!(hanging.bob2, Vector::new(0.0, 300.0));

        let positions = BobPositions::from_state(&PendulumState::INITIAL, &params);
        assert!((positions.bob1.x - 150.0).abs() < 1e-12);
        assert!(positions.bob1.y.abs() < 1e-12);
        assert!(positions.bob2.x > positions.bob1.x);
        assert!(positions.bob2.y > 0.0);
    }

    #[test]
    fn test_state_array_conversion() {
        let state = PendulumState::new(1.0, 2.0, 3.0, 4.0);
        let array: [Scalar; 4] = state.into();
        assert_eq!(array, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(PendulumState::from(array), state);
    }

    #[test]
    fn test_energy_at_rest_is_potential_minimum() {
        let params = PendulumParameters::default();
        let resting = total_energy(&PendulumState::new(0.0, 0.0, 0.0, 0.0), &params);
        let raised = total_energy(&PendulumState::INITIAL, &params);

        assert!(resting < raised);
        assert!((resting - -(20.0 * GRAVITY * 150.0 + 10.0 * GRAVITY * 150.0)).abs() < 1e-9);
    }
}
