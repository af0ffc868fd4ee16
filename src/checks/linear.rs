use super::{IntervalCheck, SubintervalCheck, keep_flags, range_admits_root, remainder_bound};
use crate::subdivision::Interval;
use crate::tensor::Tensor;

/// Bounds the affine part `c_0 + Σ c_{e_i} x_i` over each box
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearCheck;

impl LinearCheck {
    fn admits_root(coeffs: &Tensor, interval: &Interval, slack: f64) -> bool {
        let dim = coeffs.ndim();
        let mut spot = vec![0usize; dim];
        let c0 = coeffs.get_or_zero(&spot);
        let (mut lo, mut hi) = (c0, c0);
        for axis in 0..dim {
            spot[axis] = 1;
            let a = coeffs.get_or_zero(&spot);
            spot[axis] = 0;
            let (x, y) = (a * interval.lower()[axis], a * interval.upper()[axis]);
            lo += x.min(y);
            hi += x.max(y);
        }
        range_admits_root(lo, hi, slack)
    }
}

impl IntervalCheck for LinearCheck {
    fn name(&self) -> &'static str {
        "linear_check"
    }

    fn check(&self, coeffs: &Tensor, tol: f64) -> bool {
        let slack = remainder_bound(coeffs, 1) + tol;
        Self::admits_root(coeffs, &Interval::unit(coeffs.ndim()), slack)
    }
}

impl SubintervalCheck for LinearCheck {
    fn name(&self) -> &'static str {
        "linear_check"
    }

    fn check(
        &self,
        coeffs: &Tensor,
        intervals: &[Interval],
        sign_change: &[bool],
        tol: f64,
    ) -> Vec<bool> {
        let slack = remainder_bound(coeffs, 1) + tol;
        keep_flags(intervals, sign_change, |interval| {
            Self::admits_root(coeffs, interval, slack)
        })
    }
}
