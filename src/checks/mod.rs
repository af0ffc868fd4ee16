//! Interval elimination checks
//!
//! A check looks at the Chebyshev coefficients of one function on the
//! reference box `[-1, 1]^n` and answers "keep" unless it can prove the
//! function has no root there. All checks split the series into a low-degree
//! model `q` and a remainder. Since `|T_α| <= 1` on the reference box, the
//! remainder is bounded by the sum of its absolute coefficients `R`, so a box
//! is discarded when
//!
//! ```text
//! min q > R + tol    or    max q < -(R + tol)
//! ```
//!
//! where `tol` absorbs the approximation error of the coefficients.
//!
//! - [`ConstantTermCheck`] - `q` is the constant term
//! - [`LinearCheck`] - `q` is the affine part, evaluated on sub-boxes
//! - [`QuadraticCheck`] - `q` is the total-degree-2 part, minimized and
//!   maximized exactly over the box

mod constant;
mod linear;
mod quadratic;

pub use constant::ConstantTermCheck;
pub use linear::LinearCheck;
pub use quadratic::QuadraticCheck;

use crate::subdivision::Interval;
use crate::tensor::Tensor;

/// Box-level elimination test
pub trait IntervalCheck: Send + Sync {
    /// Name under which eliminated boxes are logged
    fn name(&self) -> &'static str;

    /// `false` if `coeffs` provably has no root in `[-1, 1]^n`
    fn check(&self, coeffs: &Tensor, tol: f64) -> bool;
}

/// Elimination test over the children of a pending split
pub trait SubintervalCheck: Send + Sync {
    /// Name under which eliminated children are logged
    fn name(&self) -> &'static str;

    /// One keep flag per child
    ///
    /// `intervals` are expressed in the `[-1, 1]^n` frame of `coeffs`.
    /// `sign_change[i]`, when present, marks child `i` as known to contain a
    /// sign change; such children are always kept.
    fn check(
        &self,
        coeffs: &Tensor,
        intervals: &[Interval],
        sign_change: &[bool],
        tol: f64,
    ) -> Vec<bool>;
}

/// Constant term, then quadratic range
pub fn default_interval_checks() -> Vec<Box<dyn IntervalCheck>> {
    vec![Box::new(ConstantTermCheck), Box::new(QuadraticCheck::default())]
}

/// Linear range, then quadratic range, per child
pub fn default_subinterval_checks() -> Vec<Box<dyn SubintervalCheck>> {
    vec![Box::new(LinearCheck), Box::new(QuadraticCheck::default())]
}

/// Sum of `|c_α|` over all terms with `|α| > max_degree`
pub(crate) fn remainder_bound(coeffs: &Tensor, max_degree: usize) -> f64 {
    coeffs
        .indices()
        .zip(coeffs.as_slice())
        .filter(|(idx, _)| idx.total() > max_degree)
        .map(|(_, c)| c.abs())
        .sum()
}

/// Whether a model with range `[lo, hi]` may vanish given remainder bound
/// `slack`
#[inline]
pub(crate) fn range_admits_root(lo: f64, hi: f64, slack: f64) -> bool {
    lo <= slack && hi >= -slack
}

/// Keep every child whose sign-change flag is set, test the rest
pub(crate) fn keep_flags<F>(intervals: &[Interval], sign_change: &[bool], mut test: F) -> Vec<bool>
where
    F: FnMut(&Interval) -> bool,
{
    intervals
        .iter()
        .enumerate()
        .map(|(i, interval)| sign_change.get(i).copied().unwrap_or(false) || test(interval))
        .collect()
}
