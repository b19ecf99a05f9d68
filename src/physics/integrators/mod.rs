//! Numerical integration of ordinary differential equations

use crate::physics::math::Scalar;

pub mod dormand_prince;

pub use dormand_prince::{DormandPrince, Integration, SolverStatus, Trajectory};

/// A first-order system `y' = f(t, y)` with a fixed number of components
///
/// Implementors carry whatever parameters the right-hand side needs, so the
/// derivative stays a pure function of its arguments.
pub trait OdeSystem<const N: usize> {
    /// Evaluate `f(t, y)`
    fn derivative(&self, t: Scalar, state: &[Scalar; N]) -> [Scalar; N];
}
