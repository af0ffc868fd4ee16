//! Approximation quality gate
//!
//! A degree-`d` interpolant is trusted when the degree-`2d` interpolant of
//! the same function agrees with it: after subtracting the low block from
//! the high one, the remaining coefficient mass bounds the truncation error.

use crate::error::Result;
use crate::function::RealFunction;
use crate::subdivision::interval::Interval;
use crate::subdivision::transform::interval_approximate_nd;
use crate::tensor::Tensor;

/// Entries below this magnitude are treated as exact zeros in the residual
const RESIDUAL_ZERO_TOL: f64 = 1e-16;

/// Result of gating one function on one box
#[derive(Clone, Debug, PartialEq)]
pub enum GateOutcome {
    /// The degree-`d` approximation is not trustworthy on this box
    Insufficient,
    /// The degree-`d` approximation passed
    Accepted {
        /// Chebyshev coefficients, `d + 1` per axis
        coeffs: Tensor,
        /// Per-orthant sign-change flags from the degree-`2d` samples
        sign_change: Vec<bool>,
    },
}

impl GateOutcome {
    /// Whether the approximation passed
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateOutcome::Accepted { .. })
    }
}

/// Approximate `f` on `interval` at degree `deg` and certify it against
/// degree `2·deg`
///
/// Returns [`GateOutcome::Insufficient`] when the absolute residual mass
/// exceeds `tol`.
pub fn full_cheb_approximate(
    f: &dyn RealFunction,
    interval: &Interval,
    deg: usize,
    tol: f64,
) -> Result<GateOutcome> {
    let dim = interval.dim();
    let (coeffs, _) = interval_approximate_nd(f, interval, &vec![deg; dim], false)?;
    let (mut coeffs2, flags) = interval_approximate_nd(f, interval, &vec![2 * deg; dim], true)?;

    coeffs2.sub_assign_top(&coeffs)?;
    coeffs2.clean_zeros(RESIDUAL_ZERO_TOL);
    let residual = coeffs2.abs_sum();

    if residual > tol || residual.is_nan() {
        tracing::trace!(deg, residual, "approximation rejected");
        return Ok(GateOutcome::Insufficient);
    }

    Ok(GateOutcome::Accepted {
        coeffs,
        sign_change: flags.unwrap_or_else(|| vec![true; 1 << dim]),
    })
}
