use super::{IntervalCheck, range_admits_root, remainder_bound};
use crate::tensor::Tensor;

/// Discards a box whose constant Chebyshev term outweighs all other terms
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstantTermCheck;

impl IntervalCheck for ConstantTermCheck {
    fn name(&self) -> &'static str {
        "constant_term_check"
    }

    fn check(&self, coeffs: &Tensor, tol: f64) -> bool {
        let Some(&c0) = coeffs.as_slice().first() else {
            return false;
        };
        let slack = remainder_bound(coeffs, 0) + tol;
        range_admits_root(c0, c0, slack)
    }
}
