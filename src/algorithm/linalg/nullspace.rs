//! Numerical null space via One-Sided Jacobi orthogonalization
//!
//! Algorithm:
//! 1. Scale A [m × n] so its largest entry is 1; B = A, V = I_n
//! 2. REPEAT (max 60 sweeps):
//!    FOR each pair (p, q) where p < q:
//!      - Gram elements a_pp, a_qq, a_pq = B[:,p]·B[:,q]
//!      - If |a_pq| > tol·sqrt(a_pp·a_qq): rotate columns p, q of B and V
//!    Stop after a sweep with no rotation (or at the sweep limit)
//! 3. B = A·V now has orthogonal columns; column j of V is a null vector
//!    when ||B[:,j]|| <= rank_tol · max_j ||B[:,j]||
//!
//! Columns of B that collapse to zero span exactly the right singular
//! vectors with vanishing singular value, so no transpose is needed when
//! m < n.

use super::identity_matrix;
use crate::error::{Error, Result};

const MAX_SWEEPS: usize = 60;

/// Jacobi rotation parameters (cosine and sine of rotation angle).
///
/// These parameters define a Givens rotation matrix:
/// ```text
/// J = [ c  -s ]
///     [ s   c ]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JacobiRotation {
    /// Cosine of rotation angle
    pub c: f64,
    /// Sine of rotation angle
    pub s: f64,
}

impl JacobiRotation {
    /// Rotation that zeroes the off-diagonal of the 2x2 Gram block
    ///
    /// ```text
    /// τ = (a_qq - a_pp) / (2 * a_pq)
    /// t = sign(τ) / (|τ| + sqrt(1 + τ²))
    /// c = 1 / sqrt(1 + t²)
    /// s = t * c
    /// ```
    #[inline]
    pub fn compute(a_pp: f64, a_qq: f64, a_pq: f64) -> Self {
        let tau_den = 2.0 * a_pq;
        if tau_den.abs() < 1e-300 {
            return Self { c: 1.0, s: 0.0 };
        }

        let tau = (a_qq - a_pp) / tau_den;
        let t = if tau >= 0.0 {
            1.0 / (tau + (1.0 + tau * tau).sqrt())
        } else {
            -1.0 / (-tau + (1.0 + tau * tau).sqrt())
        };

        let c = 1.0 / (1.0 + t * t).sqrt();
        Self { c, s: t * c }
    }

    /// Apply to columns `p`, `q` of a row-major [rows × cols] matrix
    ///
    /// Computes `[col_p', col_q'] = [col_p, col_q] @ [[c, s], [-s, c]]`.
    #[inline]
    pub fn apply_to_columns(&self, data: &mut [f64], rows: usize, cols: usize, p: usize, q: usize) {
        for i in 0..rows {
            let idx_p = i * cols + p;
            let idx_q = i * cols + q;
            let val_p = data[idx_p];
            let val_q = data[idx_q];
            data[idx_p] = self.c * val_p - self.s * val_q;
            data[idx_q] = self.s * val_p + self.c * val_q;
        }
    }
}

fn gram_elements(b: &[f64], rows: usize, cols: usize, p: usize, q: usize) -> (f64, f64, f64) {
    let (mut a_pp, mut a_qq, mut a_pq) = (0.0, 0.0, 0.0);
    for i in 0..rows {
        let bp = b[i * cols + p];
        let bq = b[i * cols + q];
        a_pp += bp * bp;
        a_qq += bq * bq;
        a_pq += bp * bq;
    }
    (a_pp, a_qq, a_pq)
}

/// Orthonormal basis of the numerical null space of `a` [rows × cols]
///
/// Returns the basis as a row-major [cols × k] matrix together with `k`.
/// A zero matrix has the whole space as its null space.
///
/// Like the SVD sweep it is modelled on, the iteration stops silently at
/// the sweep limit; the rank decision then uses whatever orthogonality was
/// reached.
///
/// # Errors
///
/// Returns `ShapeMismatch` if `a.len() != rows * cols`.
pub fn null_space(a: &[f64], rows: usize, cols: usize, rank_tol: f64) -> Result<(Vec<f64>, usize)> {
    if a.len() != rows * cols {
        return Err(Error::ShapeMismatch {
            expected: vec![rows, cols],
            got: vec![a.len()],
        });
    }

    let max_abs = a.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if max_abs == 0.0 {
        return Ok((identity_matrix(cols), cols));
    }

    let mut b: Vec<f64> = a.iter().map(|v| v / max_abs).collect();
    let mut v: Vec<f64> = identity_matrix(cols);
    let tol = (cols.max(rows) as f64) * f64::EPSILON;

    // Columns below this squared norm are already numerically zero
    let frob_sq: f64 = b.iter().map(|x| x * x).sum();
    let negligible = tol * tol * frob_sq;

    for _sweep in 0..MAX_SWEEPS {
        let mut rotated = false;

        for p in 0..cols {
            for q in (p + 1)..cols {
                let (a_pp, a_qq, a_pq) = gram_elements(&b, rows, cols, p, q);

                if a_pp.min(a_qq) <= negligible || a_pq.abs() <= tol * (a_pp * a_qq).sqrt() {
                    continue;
                }

                let rot = JacobiRotation::compute(a_pp, a_qq, a_pq);
                rot.apply_to_columns(&mut b, rows, cols, p, q);
                rot.apply_to_columns(&mut v, cols, cols, p, q);
                rotated = true;
            }
        }

        if !rotated {
            break;
        }
    }

    let norms: Vec<f64> = (0..cols)
        .map(|j| (0..rows).map(|i| b[i * cols + j].powi(2)).sum::<f64>().sqrt())
        .collect();
    let max_norm = norms.iter().fold(0.0f64, |m, &x| m.max(x));

    let null_cols: Vec<usize> = (0..cols)
        .filter(|&j| norms[j] <= rank_tol * max_norm)
        .collect();
    let k = null_cols.len();

    let mut basis = vec![0.0; cols * k];
    for (out_col, &j) in null_cols.iter().enumerate() {
        for i in 0..cols {
            basis[i * k + out_col] = v[i * cols + j];
        }
    }

    Ok((basis, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_orthogonal() {
        let rot = JacobiRotation::compute(2.0, 1.0, 0.5);
        assert!((rot.c * rot.c + rot.s * rot.s - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_null_space_of_rank_one() {
        // Rows are multiples of (1, 2, 3); null space has dimension 2
        let a = [1.0, 2.0, 3.0, 2.0, 4.0, 6.0];
        let (basis, k) = null_space(&a, 2, 3, 1e-10).unwrap();
        assert_eq!(k, 2);
        for col in 0..k {
            let dot: f64 = (0..3).map(|i| basis[i * k + col] * (i + 1) as f64).sum();
            assert!(dot.abs() < 1e-12);
        }
    }

    #[test]
    fn test_wide_matrix() {
        // x + y + z = 0 and x - y = 0 => null vector (1, 1, -2)
        let a = [1.0, 1.0, 1.0, 1.0, -1.0, 0.0];
        let (basis, k) = null_space(&a, 2, 3, 1e-10).unwrap();
        assert_eq!(k, 1);
        let ratio0 = basis[0] / basis[2];
        let ratio1 = basis[1] / basis[2];
        assert!((ratio0 + 0.5).abs() < 1e-12);
        assert!((ratio1 + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_full_rank() {
        let a = [1.0, 0.0, 0.0, 1.0];
        let (_, k) = null_space(&a, 2, 2, 1e-10).unwrap();
        assert_eq!(k, 0);
    }
}
