//! Multivariate polynomials over a dense coefficient tensor
//!
//! [`MultiCheb`] stores coefficients in the tensor-product Chebyshev basis,
//! [`MultiPower`] in the monomial basis. Both evaluate by contracting one
//! axis at a time against a Vandermonde-type matrix:
//!
//! ```text
//! p(X) = Σ_α c_α · B_α0(x_0) · ... · B_αn(x_n)
//!
//! for axis in 0..n:
//!     C[..., j, ...] = Σ_k V_axis[j][k] · C[..., k, ...]
//! ```
//!
//! so a grid of `m_0 × ... × m_n` points costs one pass per axis instead of
//! one full evaluation per point.

use super::chebyshev::chebvander;
use crate::error::{Error, Result};
use crate::tensor::{Shape, Tensor};

/// `x^0, ..., x^{n-1}`
pub fn powvander(x: f64, n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n);
    let mut acc = 1.0;
    for _ in 0..n {
        out.push(acc);
        acc *= x;
    }
    out
}

fn mode_product(data: &[f64], shape: &[usize], axis: usize, mat: &[f64], rows: usize) -> Vec<f64> {
    let n = shape[axis];
    let outer: usize = shape[..axis].iter().product();
    let inner: usize = shape[axis + 1..].iter().product();

    let mut out = vec![0.0; outer * rows * inner];
    for o in 0..outer {
        for j in 0..rows {
            for k in 0..n {
                let weight = mat[j * n + k];
                if weight == 0.0 {
                    continue;
                }
                let src = (o * n + k) * inner;
                let dst = (o * rows + j) * inner;
                for i in 0..inner {
                    out[dst + i] += weight * data[src + i];
                }
            }
        }
    }
    out
}

/// Contract every axis of `coeffs` against the basis values at `axes`
fn evaluate_grid_with(
    coeffs: &Tensor,
    axes: &[Vec<f64>],
    vander: fn(f64, usize) -> Vec<f64>,
) -> Result<Tensor> {
    if axes.len() != coeffs.ndim() {
        return Err(Error::ShapeMismatch {
            expected: vec![coeffs.ndim()],
            got: vec![axes.len()],
        });
    }

    let mut data = coeffs.as_slice().to_vec();
    let mut shape: Shape = coeffs.shape().into();
    for (axis, points) in axes.iter().enumerate() {
        let n = shape[axis];
        let mat: Vec<f64> = points.iter().flat_map(|&x| vander(x, n)).collect();
        data = mode_product(&data, &shape, axis, &mat, points.len());
        shape[axis] = points.len();
    }
    Tensor::from_vec(data, &shape)
}

fn total_degree(coeffs: &Tensor) -> usize {
    coeffs
        .indices()
        .zip(coeffs.as_slice())
        .filter(|(_, c)| **c != 0.0)
        .map(|(idx, _)| idx.total())
        .max()
        .unwrap_or(0)
}

fn validate_coeffs(coeffs: &Tensor) -> Result<()> {
    if coeffs.ndim() == 0 || coeffs.numel() == 0 {
        return Err(Error::InvalidArgument {
            arg: "coeffs",
            reason: format!("need at least one axis and one entry, got shape {:?}", coeffs.shape()),
        });
    }
    Ok(())
}

/// Polynomial in the tensor-product Chebyshev basis
#[derive(Clone, Debug, PartialEq)]
pub struct MultiCheb {
    coeffs: Tensor,
    degree: usize,
}

impl MultiCheb {
    /// Wrap a coefficient tensor
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a rank-0 or empty tensor.
    pub fn new(coeffs: Tensor) -> Result<Self> {
        validate_coeffs(&coeffs)?;
        let degree = total_degree(&coeffs);
        Ok(Self { coeffs, degree })
    }

    /// Coefficient tensor
    #[inline]
    pub fn coeffs(&self) -> &Tensor {
        &self.coeffs
    }

    /// Number of variables
    #[inline]
    pub fn dim(&self) -> usize {
        self.coeffs.ndim()
    }

    /// Total degree: the largest `|α|` among nonzero coefficients
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Coefficient of `T_α`, zero outside the stored block
    #[inline]
    pub fn coeff(&self, alpha: &[usize]) -> f64 {
        self.coeffs.get_or_zero(alpha)
    }

    /// Value at one point of `[-1, 1]^dim`
    pub fn evaluate_at(&self, point: &[f64]) -> Result<f64> {
        let axes: Vec<Vec<f64>> = point.iter().map(|&x| vec![x]).collect();
        let out = evaluate_grid_with(&self.coeffs, &axes, chebvander)?;
        Ok(out.as_slice()[0])
    }

    /// Values on the tensor grid `axes[0] × ... × axes[dim-1]`
    pub fn evaluate_on_grid(&self, axes: &[Vec<f64>]) -> Result<Tensor> {
        evaluate_grid_with(&self.coeffs, axes, chebvander)
    }
}

/// Polynomial in the monomial (power) basis
#[derive(Clone, Debug, PartialEq)]
pub struct MultiPower {
    coeffs: Tensor,
    degree: usize,
}

impl MultiPower {
    /// Wrap a coefficient tensor; entry `α` multiplies `x^α`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a rank-0 or empty tensor.
    pub fn new(coeffs: Tensor) -> Result<Self> {
        validate_coeffs(&coeffs)?;
        let degree = total_degree(&coeffs);
        Ok(Self { coeffs, degree })
    }

    /// Coefficient tensor
    #[inline]
    pub fn coeffs(&self) -> &Tensor {
        &self.coeffs
    }

    /// Number of variables
    #[inline]
    pub fn dim(&self) -> usize {
        self.coeffs.ndim()
    }

    /// Total degree: the largest `|α|` among nonzero coefficients
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Value at one point
    pub fn evaluate_at(&self, point: &[f64]) -> Result<f64> {
        let axes: Vec<Vec<f64>> = point.iter().map(|&x| vec![x]).collect();
        let out = evaluate_grid_with(&self.coeffs, &axes, powvander)?;
        Ok(out.as_slice()[0])
    }

    /// Values on the tensor grid `axes[0] × ... × axes[dim-1]`
    pub fn evaluate_on_grid(&self, axes: &[Vec<f64>]) -> Result<Tensor> {
        evaluate_grid_with(&self.coeffs, axes, powvander)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multicheb_degree_and_eval() {
        // T_2(x) + T_1(y) = 2x^2 - 1 + y
        let mut c = Tensor::zeros(&[3, 2]);
        c.set(&[2, 0], 1.0).unwrap();
        c.set(&[0, 1], 1.0).unwrap();
        let p = MultiCheb::new(c).unwrap();
        assert_eq!(p.degree(), 2);
        assert_eq!(p.dim(), 2);

        let v = p.evaluate_at(&[0.5, 0.25]).unwrap();
        assert!((v - (2.0 * 0.25 - 1.0 + 0.25)).abs() < 1e-14);
    }

    #[test]
    fn test_grid_matches_pointwise() {
        let c = Tensor::from_fn(&[3, 3], |idx| 1.0 / (1.0 + (idx[0] + 2 * idx[1]) as f64));
        let p = MultiCheb::new(c).unwrap();
        let xs = vec![-1.0, 0.2, 0.9];
        let ys = vec![-0.5, 0.7];
        let grid = p.evaluate_on_grid(&[xs.clone(), ys.clone()]).unwrap();
        assert_eq!(grid.shape(), &[3, 2]);
        for (i, &x) in xs.iter().enumerate() {
            for (j, &y) in ys.iter().enumerate() {
                let direct = p.evaluate_at(&[x, y]).unwrap();
                assert!((grid.get(&[i, j]).unwrap() - direct).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_multipower_eval() {
        // 1 + 2x + 3xy
        let c = Tensor::from_vec(vec![1.0, 0.0, 2.0, 3.0], &[2, 2]).unwrap();
        let p = MultiPower::new(c).unwrap();
        assert_eq!(p.degree(), 2);
        let v = p.evaluate_at(&[2.0, -1.0]).unwrap();
        assert!((v - (1.0 + 4.0 - 6.0)).abs() < 1e-14);
    }

    #[test]
    fn test_zero_polynomial_degree() {
        let p = MultiCheb::new(Tensor::zeros(&[2, 2])).unwrap();
        assert_eq!(p.degree(), 0);
        assert!(MultiCheb::new(Tensor::zeros(&[])).is_err());
    }
}
