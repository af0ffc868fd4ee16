use super::{IntervalCheck, SubintervalCheck, keep_flags, range_admits_root, remainder_bound};
use crate::algorithm::linalg::solve;
use crate::subdivision::Interval;
use crate::tensor::Tensor;

/// `c + b·x + xᵀ A x` in the power basis
#[derive(Clone, Debug, PartialEq)]
struct QuadraticModel {
    dim: usize,
    constant: f64,
    linear: Vec<f64>,
    // Symmetric, row-major [dim × dim]
    quad: Vec<f64>,
}

impl QuadraticModel {
    /// Power-basis form of the terms with `|α| <= 2`
    ///
    /// `T_2(x) = 2x² - 1`, and every other term of total degree at most 2 is
    /// already a monomial.
    fn from_chebyshev(coeffs: &Tensor) -> Self {
        let dim = coeffs.ndim();
        let mut model = Self {
            dim,
            constant: 0.0,
            linear: vec![0.0; dim],
            quad: vec![0.0; dim * dim],
        };
        for (idx, &c) in coeffs.indices().zip(coeffs.as_slice()) {
            if c == 0.0 || idx.total() > 2 {
                continue;
            }
            let nonzero: Vec<usize> = (0..dim).filter(|&a| idx[a] > 0).collect();
            match nonzero.as_slice() {
                [] => model.constant += c,
                [i] if idx[*i] == 1 => model.linear[*i] += c,
                [i] => {
                    model.quad[i * dim + i] += 2.0 * c;
                    model.constant -= c;
                }
                [i, j] => {
                    model.quad[i * dim + j] += c / 2.0;
                    model.quad[j * dim + i] += c / 2.0;
                }
                _ => {}
            }
        }
        model
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let n = self.dim;
        let mut value = self.constant;
        for i in 0..n {
            value += self.linear[i] * x[i];
            for j in 0..n {
                value += x[i] * self.quad[i * n + j] * x[j];
            }
        }
        value
    }

    /// Exact `(min, max)` over a box
    ///
    /// Extremes of a quadratic over a box sit at a stationary point of the
    /// restriction to some face. Every face is visited: each axis is pinned
    /// to its lower bound, pinned to its upper bound, or left free, and the
    /// free coordinates solve `2 A_FF x_F = -(b_F + 2 A_FP x_P)`.
    fn range(&self, interval: &Interval) -> (f64, f64) {
        let n = self.dim;
        let (lower, upper) = (interval.lower(), interval.upper());
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;

        let faces = 3usize.pow(n as u32);
        let mut x = vec![0.0; n];
        for code in 0..faces {
            let mut free = Vec::with_capacity(n);
            let mut rest = code;
            for axis in 0..n {
                match rest % 3 {
                    0 => x[axis] = lower[axis],
                    1 => x[axis] = upper[axis],
                    _ => free.push(axis),
                }
                rest /= 3;
            }

            if !free.is_empty() {
                let k = free.len();
                let mut system = vec![0.0; k * k];
                let mut rhs = vec![0.0; k];
                for (r, &i) in free.iter().enumerate() {
                    rhs[r] = -self.linear[i];
                    for axis in (0..n).filter(|a| !free.contains(a)) {
                        rhs[r] -= 2.0 * self.quad[i * n + axis] * x[axis];
                    }
                    for (s, &j) in free.iter().enumerate() {
                        system[r * k + s] = 2.0 * self.quad[i * n + j];
                    }
                }
                let Ok(stationary) = solve(&system, &rhs, k) else {
                    continue;
                };
                let inside = free
                    .iter()
                    .zip(&stationary)
                    .all(|(&axis, &v)| v >= lower[axis] && v <= upper[axis]);
                if !inside {
                    continue;
                }
                for (&axis, &v) in free.iter().zip(&stationary) {
                    x[axis] = v;
                }
            }

            let value = self.evaluate(&x);
            lo = lo.min(value);
            hi = hi.max(value);
        }
        (lo, hi)
    }
}

/// Bounds the total-degree-2 part of the series exactly over each box
///
/// The face enumeration costs `3^dim` small solves, so above `max_dim` the
/// check always keeps.
#[derive(Clone, Copy, Debug)]
pub struct QuadraticCheck {
    max_dim: usize,
}

impl Default for QuadraticCheck {
    fn default() -> Self {
        Self { max_dim: 6 }
    }
}

impl QuadraticCheck {
    /// Sets the largest dimension the check runs in.
    pub const fn with_max_dim(mut self, max_dim: usize) -> Self {
        self.max_dim = max_dim;
        self
    }

    fn admits_root(model: &QuadraticModel, interval: &Interval, slack: f64) -> bool {
        let (lo, hi) = model.range(interval);
        range_admits_root(lo, hi, slack)
    }
}

impl IntervalCheck for QuadraticCheck {
    fn name(&self) -> &'static str {
        "quadratic_check"
    }

    fn check(&self, coeffs: &Tensor, tol: f64) -> bool {
        let dim = coeffs.ndim();
        if dim > self.max_dim {
            return true;
        }
        let model = QuadraticModel::from_chebyshev(coeffs);
        let slack = remainder_bound(coeffs, 2) + tol;
        Self::admits_root(&model, &Interval::unit(dim), slack)
    }
}

impl SubintervalCheck for QuadraticCheck {
    fn name(&self) -> &'static str {
        "quadratic_check"
    }

    fn check(
        &self,
        coeffs: &Tensor,
        intervals: &[Interval],
        sign_change: &[bool],
        tol: f64,
    ) -> Vec<bool> {
        if coeffs.ndim() > self.max_dim {
            return vec![true; intervals.len()];
        }
        let model = QuadraticModel::from_chebyshev(coeffs);
        let slack = remainder_bound(coeffs, 2) + tol;
        keep_flags(intervals, sign_change, |interval| {
            Self::admits_root(&model, interval, slack)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(radius_sq: f64) -> Tensor {
        // x² + y² - r² = 0.5 T_2(x) + 0.5 T_2(y) + (1 - r²)
        let mut c = Tensor::zeros(&[3, 3]);
        c.set(&[0, 0], 1.0 - radius_sq).unwrap();
        c.set(&[2, 0], 0.5).unwrap();
        c.set(&[0, 2], 0.5).unwrap();
        c
    }

    #[test]
    fn test_model_conversion() {
        let model = QuadraticModel::from_chebyshev(&circle(0.25));
        assert!((model.evaluate(&[0.5, 0.0])).abs() < 1e-15);
        assert!((model.evaluate(&[0.3, 0.4])).abs() < 1e-15);

        // T_1(x) T_1(y) = xy
        let mut c = Tensor::zeros(&[2, 2]);
        c.set(&[1, 1], 2.0).unwrap();
        let model = QuadraticModel::from_chebyshev(&c);
        assert!((model.evaluate(&[0.5, -0.5]) + 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_range_of_bowl() {
        let model = QuadraticModel::from_chebyshev(&circle(0.25));
        let (lo, hi) = model.range(&Interval::unit(2));
        assert!((lo + 0.25).abs() < 1e-14);
        assert!((hi - 1.75).abs() < 1e-14);

        let corner = Interval::new(vec![0.5, 0.5], vec![1.0, 1.0]).unwrap();
        let (lo, hi) = model.range(&corner);
        assert!((lo - 0.25).abs() < 1e-14);
        assert!((hi - 1.75).abs() < 1e-14);
    }

    #[test]
    fn test_saddle_range_uses_boundary() {
        // xy on the unit square spans [-1, 1]
        let mut c = Tensor::zeros(&[2, 2]);
        c.set(&[1, 1], 1.0).unwrap();
        let (lo, hi) = QuadraticModel::from_chebyshev(&c).range(&Interval::unit(2));
        assert!((lo + 1.0).abs() < 1e-14);
        assert!((hi - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_box_check() {
        let check = QuadraticCheck::default();
        assert!(IntervalCheck::check(&check, &circle(0.25), 1e-6));
        // x² + y² + 0.5 never vanishes
        assert!(!IntervalCheck::check(&check, &circle(-0.5), 1e-6));
    }

    #[test]
    fn test_children_away_from_circle_discarded() {
        let check = QuadraticCheck::default();
        let children = vec![
            Interval::new(vec![-0.1, -0.1], vec![0.1, 0.1]).unwrap(),
            Interval::new(vec![0.4, -0.1], vec![0.6, 0.1]).unwrap(),
            Interval::new(vec![0.8, 0.8], vec![1.0, 1.0]).unwrap(),
        ];
        let keep = SubintervalCheck::check(&check, &circle(0.25), &children, &[], 1e-6);
        assert_eq!(keep, vec![false, true, false]);
    }

    #[test]
    fn test_high_dimension_always_kept() {
        let check = QuadraticCheck::default().with_max_dim(1);
        assert!(IntervalCheck::check(&check, &circle(-0.5), 0.0));
    }
}
