//! Functions the solver can sample
//!
//! The solver only ever needs function values on batches of points. Closures
//! work out of the box; polynomial types additionally provide fast grid
//! evaluation.

use crate::algorithm::polynomial::{MultiCheb, MultiPower};
use crate::tensor::Tensor;

/// A real-valued function of `dim` real variables
///
/// Implementations must be `Send + Sync` so sibling boxes can be solved in
/// parallel.
pub trait RealFunction: Send + Sync {
    /// Evaluate at a batch of points
    ///
    /// `points` is row-major `[count × dim]`; the result has `count` entries.
    fn evaluate(&self, points: &[f64], dim: usize) -> Vec<f64>;

    /// Evaluate on the tensor grid `axes[0] × ... × axes[dim-1]`
    ///
    /// Returns `None` when the function has no specialised grid path; the
    /// caller then flattens the grid and uses [`RealFunction::evaluate`].
    fn evaluate_grid(&self, _axes: &[Vec<f64>]) -> Option<Tensor> {
        None
    }
}

impl<F> RealFunction for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, points: &[f64], dim: usize) -> Vec<f64> {
        if dim == 0 {
            return Vec::new();
        }
        points.chunks_exact(dim).map(self).collect()
    }
}

impl RealFunction for MultiCheb {
    fn evaluate(&self, points: &[f64], dim: usize) -> Vec<f64> {
        if dim == 0 {
            return Vec::new();
        }
        points
            .chunks_exact(dim)
            .map(|p| self.evaluate_at(p).unwrap_or(f64::NAN))
            .collect()
    }

    fn evaluate_grid(&self, axes: &[Vec<f64>]) -> Option<Tensor> {
        self.evaluate_on_grid(axes).ok()
    }
}

impl RealFunction for MultiPower {
    fn evaluate(&self, points: &[f64], dim: usize) -> Vec<f64> {
        if dim == 0 {
            return Vec::new();
        }
        points
            .chunks_exact(dim)
            .map(|p| self.evaluate_at(p).unwrap_or(f64::NAN))
            .collect()
    }

    fn evaluate_grid(&self, axes: &[Vec<f64>]) -> Option<Tensor> {
        self.evaluate_on_grid(axes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_batch() {
        let f = |x: &[f64]| x[0] * x[1];
        let out = f.evaluate(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(out, vec![2.0, 12.0]);
        assert!(f.evaluate_grid(&[vec![0.0], vec![1.0]]).is_none());
    }

    #[test]
    fn test_polynomial_grid_path() {
        let p = MultiPower::new(Tensor::from_vec(vec![0.0, 1.0], &[2]).unwrap()).unwrap();
        let grid = p.evaluate_grid(&[vec![-1.0, 0.5]]).unwrap();
        assert_eq!(grid.as_slice(), &[-1.0, 0.5]);
        assert_eq!(p.evaluate(&[3.0], 1), vec![3.0]);
    }
}
