//! Dormand-Prince 5(4) adaptive Runge-Kutta integration
//!
//! A seven-stage explicit method: the fifth-order solution is propagated and
//! the embedded fourth-order solution provides the local error estimate used
//! to grow or shrink the step. The final stage is evaluated at the new point,
//! so it doubles as the first stage of the next step (FSAL).
//!
//! # Step control
//!
//! ```text
//! h₀      = (t1 - t0) / 10
//! err     = max|Σ eᵢ·kᵢ·h|
//! reject  : err > tol  →  h = 0.2·h·(tol/err)^¼
//! accept  :               h = min(0.8·h·(tol/err)^¼, 4·h)
//! ```
//!
//! The step that would overshoot `t1` is shortened to land on it exactly.
//! Integration runs in either direction; a negative interval takes negative
//! steps.
//!
//! # Non-finite values
//!
//! A NaN error estimate is not retried: the step is accepted so the poisoned
//! values propagate to the caller, who can detect them with
//! [`Integration::is_finite`]. An infinite estimate shrinks the step to zero
//! and ends the call with [`SolverStatus::StepSizeUnderflow`].
//!
//! # References
//! - Dormand, J. R., & Prince, P. J. (1980). "A family of embedded
//!   Runge-Kutta formulae". Journal of Computational and Applied
//!   Mathematics, 6(1), 19-26.
//! - Shampine, L. F. (1986). "Some practical Runge-Kutta formulas".
//!   Mathematics of Computation, 46(173), 135-150 (midpoint dense output).

use super::OdeSystem;
use crate::physics::math::{Scalar, linear_combination, max_norm};

/// Local error tolerance applied to the max-norm of the error estimate
pub const DEFAULT_TOLERANCE: Scalar = 1e-8;

/// Attempted steps (accepted and rejected) allowed per call
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

// Butcher tableau
const C: [Scalar; 5] = [1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];
const A2: Scalar = 1.0 / 5.0;
const A3: [Scalar; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [Scalar; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [Scalar; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [Scalar; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];

// Fifth-order weights (b₂ = 0, b₇ = 0)
const B: [Scalar; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];

// Difference between the fourth- and fifth-order weights
const E: [Scalar; 7] = [
    -71.0 / 57600.0,
    0.0,
    71.0 / 16695.0,
    -71.0 / 1920.0,
    17253.0 / 339200.0,
    -22.0 / 525.0,
    1.0 / 40.0,
];

// Weights for the solution estimate at the middle of the step
const BM: [Scalar; 7] = [
    0.5 * 6025192743.0 / 30085553152.0,
    0.0,
    0.5 * 51252292925.0 / 65400821598.0,
    0.5 * -2691868925.0 / 45128329728.0,
    0.5 * 187940372067.0 / 1594534317056.0,
    0.5 * -1776094331.0 / 19743644256.0,
    0.5 * 11237099.0 / 235043384.0,
];

/// How a call to the integrator ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Reached the requested end time
    Completed,
    /// A rejected step shrank below the resolution of the current time
    StepSizeUnderflow,
    /// Ran out of attempts before reaching the end time
    IterationLimitReached,
}

/// Outcome of integrating from `t0` towards `t1`
///
/// When the status is not [`SolverStatus::Completed`], `state` and `time`
/// describe the last accepted step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integration<const N: usize> {
    pub state: [Scalar; N],
    pub time: Scalar,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub status: SolverStatus,
}

impl<const N: usize> Integration<N> {
    pub fn is_complete(&self) -> bool {
        self.status == SolverStatus::Completed
    }

    pub fn is_finite(&self) -> bool {
        self.state.iter().all(|value| value.is_finite())
    }
}

/// Adaptive Dormand-Prince 5(4) solver
///
/// Holds only its settings; nothing carries over from one call to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DormandPrince {
    pub tolerance: Scalar,
    pub max_iterations: usize,
}

impl Default for DormandPrince {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// One accepted step, handed to the observer inside the stepping loop
struct AcceptedStep<const N: usize> {
    start_time: Scalar,
    start_state: [Scalar; N],
    start_slope: [Scalar; N],
    end_time: Scalar,
    end_state: [Scalar; N],
    end_slope: [Scalar; N],
    midpoint: [Scalar; N],
}

impl DormandPrince {
    pub fn new(tolerance: Scalar) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Advance `state` from `t0` to `t1`, returning only the end point
    pub fn integrate<const N: usize, S: OdeSystem<N>>(
        &self,
        system: &S,
        t0: Scalar,
        t1: Scalar,
        state: [Scalar; N],
    ) -> Integration<N> {
        self.run(system, t0, t1, state, |_| {})
    }

    /// Advance `state` from `t0` to `t1`, keeping every accepted step for
    /// dense output
    pub fn solve<const N: usize, S: OdeSystem<N>>(
        &self,
        system: &S,
        t0: Scalar,
        t1: Scalar,
        state: [Scalar; N],
    ) -> Trajectory<N> {
        let mut nodes = Vec::new();
        let mut midpoints = Vec::new();

        let integration = self.run(system, t0, t1, state, |step| {
            if nodes.is_empty() {
                nodes.push(Node {
                    time: step.start_time,
                    state: step.start_state,
                    slope: step.start_slope,
                });
            }
            nodes.push(Node {
                time: step.end_time,
                state: step.end_state,
                slope: step.end_slope,
            });
            midpoints.push(step.midpoint);
        });

        if nodes.is_empty() {
            nodes.push(Node {
                time: t0,
                state,
                slope: system.derivative(t0, &state),
            });
        }

        Trajectory {
            nodes,
            midpoints,
            integration,
        }
    }

    fn run<const N: usize, S: OdeSystem<N>>(
        &self,
        system: &S,
        t0: Scalar,
        t1: Scalar,
        state: [Scalar; N],
        mut on_accept: impl FnMut(&AcceptedStep<N>),
    ) -> Integration<N> {
        let mut integration = Integration {
            state,
            time: t0,
            accepted_steps: 0,
            rejected_steps: 0,
            status: SolverStatus::Completed,
        };

        if t1 == t0 {
            return integration;
        }

        let direction = (t1 - t0).signum();
        let remaining = |t: Scalar| (t1 - t) * direction;

        let mut t = t0;
        let mut y = state;
        let mut k1 = system.derivative(t, &y);
        let mut h = (t1 - t0) / 10.0;
        let mut iterations = 0;

        while remaining(t) > 0.0 {
            if iterations >= self.max_iterations {
                integration.status = SolverStatus::IterationLimitReached;
                break;
            }
            iterations += 1;

            if remaining(t + h) < 0.0 {
                h = t1 - t;
            }

            let k2 = system.derivative(t + C[0] * h, &linear_combination(&y, &[(&k1, A2 * h)]));
            let k3 = system.derivative(
                t + C[1] * h,
                &linear_combination(&y, &[(&k1, A3[0] * h), (&k2, A3[1] * h)]),
            );
            let k4 = system.derivative(
                t + C[2] * h,
                &linear_combination(&y, &[(&k1, A4[0] * h), (&k2, A4[1] * h), (&k3, A4[2] * h)]),
            );
            let k5 = system.derivative(
                t + C[3] * h,
                &linear_combination(
                    &y,
                    &[
                        (&k1, A5[0] * h),
                        (&k2, A5[1] * h),
                        (&k3, A5[2] * h),
                        (&k4, A5[3] * h),
                    ],
                ),
            );
            let k6 = system.derivative(
                t + C[4] * h,
                &linear_combination(
                    &y,
                    &[
                        (&k1, A6[0] * h),
                        (&k2, A6[1] * h),
                        (&k3, A6[2] * h),
                        (&k4, A6[3] * h),
                        (&k5, A6[4] * h),
                    ],
                ),
            );
            let y1 = linear_combination(
                &y,
                &[
                    (&k1, h * B[0]),
                    (&k3, h * B[2]),
                    (&k4, h * B[3]),
                    (&k5, h * B[4]),
                    (&k6, h * B[5]),
                ],
            );
            let k7 = system.derivative(t + h, &y1);

            let error = linear_combination(
                &[0.0; N],
                &[
                    (&k1, h * E[0]),
                    (&k3, h * E[2]),
                    (&k4, h * E[3]),
                    (&k5, h * E[4]),
                    (&k6, h * E[5]),
                    (&k7, h * E[6]),
                ],
            );
            let error_norm = max_norm(&error);

            if error_norm > self.tolerance {
                integration.rejected_steps += 1;
                h = 0.2 * h * libm::pow(self.tolerance / error_norm, 0.25);
                if t + h == t {
                    integration.status = SolverStatus::StepSizeUnderflow;
                    break;
                }
                continue;
            }

            let midpoint = linear_combination(
                &y,
                &[
                    (&k1, h * BM[0]),
                    (&k3, h * BM[2]),
                    (&k4, h * BM[3]),
                    (&k5, h * BM[4]),
                    (&k6, h * BM[5]),
                    (&k7, h * BM[6]),
                ],
            );

            on_accept(&AcceptedStep {
                start_time: t,
                start_state: y,
                start_slope: k1,
                end_time: t + h,
                end_state: y1,
                end_slope: k7,
                midpoint,
            });

            t += h;
            y = y1;
            k1 = k7;
            integration.accepted_steps += 1;
            integration.state = y;
            integration.time = t;

            // NaN and infinite scale factors both fall back to the 4x cap
            let proposed = 0.8 * h * libm::pow(self.tolerance / error_norm, 0.25);
            h = if direction > 0.0 {
                proposed.min(4.0 * h)
            } else {
                proposed.max(4.0 * h)
            };
        }

        integration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Node<const N: usize> {
    time: Scalar,
    state: [Scalar; N],
    slope: [Scalar; N],
}

/// Accepted steps of one solver call with continuous interpolation between
/// them
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<const N: usize> {
    nodes: Vec<Node<N>>,
    midpoints: Vec<[Scalar; N]>,
    integration: Integration<N>,
}

impl<const N: usize> Trajectory<N> {
    /// End point and step statistics, as [`DormandPrince::integrate`] reports
    pub fn integration(&self) -> &Integration<N> {
        &self.integration
    }

    /// Times of the accepted nodes, starting with `t0`
    pub fn times(&self) -> impl Iterator<Item = Scalar> + '_ {
        self.nodes.iter().map(|node| node.time)
    }

    /// States at the accepted nodes, starting with the initial state
    pub fn states(&self) -> impl Iterator<Item = &[Scalar; N]> + '_ {
        self.nodes.iter().map(|node| &node.state)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// State at time `t`.
    ///
    /// Inside a step this is a quartic Hermite interpolant through both end
    /// points, their slopes and the midpoint estimate. Times outside the
    /// solved interval extrapolate the nearest step.
    pub fn at(&self, t: Scalar) -> [Scalar; N] {
        if self.nodes.len() < 2 {
            return self.nodes[0].state;
        }

        let direction = (self.nodes[1].time - self.nodes[0].time).signum();
        let mut lo = 0;
        let mut hi = self.nodes.len() - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if (self.nodes[mid].time - t) * direction <= 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        self.interpolate(lo, t)
    }

    fn interpolate(&self, index: usize, t: Scalar) -> [Scalar; N] {
        let start = &self.nodes[index];
        let end = &self.nodes[index + 1];
        let midpoint = &self.midpoints[index];

        let (x0, x1) = (start.time, end.time);
        let xh = x0 + 0.5 * (x1 - x0);
        let sqr = |v: Scalar| v * v;

        let p_scale = 1.0 / (x0 - xh) + 2.0 / (x0 - x1);
        let q_scale = 1.0 / (x1 - xh) + 2.0 / (x1 - x0);
        let p: [Scalar; N] = std::array::from_fn(|i| start.slope[i] - start.state[i] * p_scale);
        let q: [Scalar; N] = std::array::from_fn(|i| end.slope[i] - end.state[i] * q_scale);

        let w = [
            sqr(t - x1) * (t - xh) / sqr(x0 - x1) / (x0 - xh),
            sqr(t - x0) * sqr(t - x1) / sqr(x0 - xh) / sqr(x1 - xh),
            sqr(t - x0) * (t - xh) / sqr(x1 - x0) / (x1 - xh),
            (t - x0) * sqr(t - x1) * (t - xh) / sqr(x0 - x1) / (x0 - xh),
            (t - x1) * sqr(t - x0) * (t - xh) / sqr(x0 - x1) / (x1 - xh),
        ];

        linear_combination(
            &[0.0; N],
            &[
                (&start.state, w[0]),
                (midpoint, w[1]),
                (&end.state, w[2]),
                (&p, w[3]),
                (&q, w[4]),
            ],
        )
    }
}
