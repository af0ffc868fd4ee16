//! Univariate Chebyshev series: evaluation and root finding
//!
//! # Root finding
//!
//! For a series `p(x) = c₀T₀(x) + c₁T₁(x) + ... + cₙTₙ(x)` the roots are the
//! eigenvalues of the scaled colleague matrix (the Chebyshev analogue of
//! the companion matrix):
//!
//! ```text
//! C = [ 0    √½                      ]       scl = [1, √½, √½, ...]
//!     [ √½   0    ½                  ]
//!     [      ½    0    ½             ]       last column -=
//!     [           ...  ...  ...      ]         (c_k / cₙ) · (scl_k / scl_{n-1}) · ½
//!     [                ½    0        ]
//! ```
//!
//! [`roots_via_multiplication`] takes the eigenvalues of `C` directly.
//! [`roots_via_division`] takes the reciprocals of the eigenvalues of `C⁻¹`,
//! which behaves better for high-degree series whose roots cluster near the
//! origin.

use crate::algorithm::linalg::{eigvals, identity_matrix, lu_decompose};
use crate::dtype::Complex128;
use crate::error::{Error, Result};
use std::f64::consts::FRAC_1_SQRT_2;

/// Evaluate a Chebyshev series with the Clenshaw recurrence
///
/// Given coefficients `[c_0, c_1, ..., c_{n-1}]` computes
/// `sum(c_k * T_k(x))`. An empty series evaluates to 0.
pub fn chebval(x: f64, coeffs: &[f64]) -> f64 {
    let n = coeffs.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return coeffs[0];
    }

    let mut b_k1 = 0.0; // b_{k+1}
    let mut b_k2 = 0.0; // b_{k+2}
    let two_x = 2.0 * x;

    for &ck in coeffs[1..].iter().rev() {
        let b_k = two_x * b_k1 - b_k2 + ck;
        b_k2 = b_k1;
        b_k1 = b_k;
    }

    x * b_k1 - b_k2 + coeffs[0]
}

/// `T_0(x), ..., T_{n-1}(x)` by the three-term recurrence
pub fn chebvander(x: f64, n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return out;
    }
    out.push(1.0);
    if n == 1 {
        return out;
    }
    out.push(x);
    for k in 2..n {
        let next = 2.0 * x * out[k - 1] - out[k - 2];
        out.push(next);
    }
    out
}

/// Drop trailing exactly-zero coefficients
pub fn trim_trailing_zeros(coeffs: &[f64]) -> &[f64] {
    let end = coeffs
        .iter()
        .rposition(|&c| c != 0.0)
        .map_or(0, |i| i + 1);
    &coeffs[..end]
}

/// Scaled colleague matrix of a Chebyshev series of degree `n >= 2`
///
/// The leading coefficient must be nonzero.
pub fn colleague_matrix(coeffs: &[f64]) -> Result<Vec<f64>> {
    let n = coeffs.len().saturating_sub(1);
    if n < 2 {
        return Err(Error::InvalidArgument {
            arg: "coeffs",
            reason: format!("colleague matrix needs degree >= 2, got {n}"),
        });
    }
    let lead = coeffs[n];
    if lead == 0.0 || !lead.is_finite() {
        return Err(Error::InvalidArgument {
            arg: "coeffs",
            reason: format!("leading coefficient must be finite and nonzero, got {lead}"),
        });
    }

    let mut mat = vec![0.0; n * n];
    for i in 0..(n - 1) {
        let off = if i == 0 { FRAC_1_SQRT_2 } else { 0.5 };
        mat[i * n + (i + 1)] = off;
        mat[(i + 1) * n + i] = off;
    }

    let scl = |k: usize| if k == 0 { 1.0 } else { FRAC_1_SQRT_2 };
    let scl_last = scl(n - 1);
    for (k, &ck) in coeffs[..n].iter().enumerate() {
        mat[k * n + (n - 1)] -= (ck / lead) * (scl(k) / scl_last) * 0.5;
    }

    Ok(mat)
}

fn linear_root(coeffs: &[f64]) -> Vec<Complex128> {
    vec![Complex128::from(-coeffs[0] / coeffs[1])]
}

/// Reverse rows and columns; same spectrum, better QR deflation order
fn rotate_half_turn(mat: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            out[(n - 1 - i) * n + (n - 1 - j)] = mat[i * n + j];
        }
    }
    out
}

/// Complex roots of a Chebyshev series via its colleague matrix
///
/// Trailing zero coefficients must already be stripped; a series of degree
/// 0 has no roots.
///
/// # Errors
///
/// Returns `InvalidArgument` if the leading coefficient is zero, and
/// `NoConvergence` if the eigenvalue iteration fails.
pub fn roots_via_multiplication(coeffs: &[f64]) -> Result<Vec<Complex128>> {
    match coeffs.len() {
        0 | 1 => Ok(Vec::new()),
        2 => Ok(linear_root(coeffs)),
        len => {
            let n = len - 1;
            let mat = rotate_half_turn(&colleague_matrix(coeffs)?, n);
            eigvals(&mat, n)
        }
    }
}

/// Complex roots of a Chebyshev series via the inverse colleague matrix
///
/// Computes `1/μ` for every eigenvalue `μ` of `C⁻¹`. Trailing zeros are
/// stripped first.
///
/// # Errors
///
/// Returns `SingularMatrix` when `C` is singular (a root at the origin);
/// callers fall back to [`roots_via_multiplication`].
pub fn roots_via_division(coeffs: &[f64]) -> Result<Vec<Complex128>> {
    let coeffs = trim_trailing_zeros(coeffs);
    match coeffs.len() {
        0 | 1 => Ok(Vec::new()),
        2 => Ok(linear_root(coeffs)),
        len => {
            let n = len - 1;
            let mat = colleague_matrix(coeffs)?;
            let lu = lu_decompose(&mat, n)?;

            let identity = identity_matrix::<f64>(n);
            let inverse = lu.solve_matrix(&identity, n)?;

            let mut roots = Vec::with_capacity(n);
            for mu in eigvals(&inverse, n)? {
                if mu.magnitude() == 0.0 {
                    return Err(Error::SingularMatrix {
                        context: "roots_via_division",
                    });
                }
                roots.push(mu.recip());
            }
            Ok(roots)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_re(mut roots: Vec<Complex128>) -> Vec<f64> {
        roots.sort_by(|a, b| a.re.total_cmp(&b.re));
        roots.into_iter().map(|z| z.re).collect()
    }

    #[test]
    fn test_chebval_matches_vander() {
        let c = [0.5, -1.0, 0.25, 2.0];
        for x in [-1.0, -0.3, 0.0, 0.7, 1.0] {
            let direct: f64 = chebvander(x, 4).iter().zip(&c).map(|(t, c)| t * c).sum();
            assert!((chebval(x, &c) - direct).abs() < 1e-14);
        }
        // T_3(x) = 4x^3 - 3x
        assert!((chebval(0.5, &[0.0, 0.0, 0.0, 1.0]) - (-1.0)).abs() < 1e-14);
    }

    #[test]
    fn test_roots_of_t2() {
        // T_2 has roots ±1/√2
        let roots = roots_via_multiplication(&[0.0, 0.0, 1.0]).unwrap();
        let re = sorted_re(roots);
        assert!((re[0] + FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((re[1] - FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_roots_x_squared_minus_quarter() {
        // x^2 - 1/4 = T_2/2 + 1/2 - 1/4 = 0.25 T_0 + 0.5 T_2
        let roots = roots_via_multiplication(&[0.25, 0.0, 0.5]).unwrap();
        let re = sorted_re(roots);
        assert!((re[0] + 0.5).abs() < 1e-12);
        assert!((re[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_division_agrees_with_multiplication() {
        // Roots at 0.1, 0.4, -0.6 (power form expanded into Chebyshev)
        // (x-0.1)(x-0.4)(x+0.6) = x^3 + 0.1x^2 - 0.26x + 0.024
        // x^3 = (3T_1 + T_3)/4, x^2 = (T_0 + T_2)/2
        let c = [0.024 + 0.05, -0.26 + 0.75, 0.05, 0.25];
        let mult = sorted_re(roots_via_multiplication(&c).unwrap());
        let div = sorted_re(roots_via_division(&c).unwrap());
        for ((m, d), want) in mult.iter().zip(&div).zip([-0.6, 0.1, 0.4]) {
            assert!((m - want).abs() < 1e-10, "{m} vs {want}");
            assert!((d - want).abs() < 1e-10, "{d} vs {want}");
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(roots_via_multiplication(&[3.0]).unwrap().is_empty());
        let r = roots_via_multiplication(&[1.0, 2.0]).unwrap();
        assert_eq!(r, vec![Complex128::from(-0.5)]);
        assert_eq!(trim_trailing_zeros(&[1.0, 0.0, 0.0]), &[1.0]);
        assert!(roots_via_division(&[0.0, 0.0]).unwrap().is_empty());
    }

    #[test]
    fn test_division_root_at_origin() {
        // x^3 - x/4 has a root at 0, so the colleague matrix is singular
        match roots_via_division(&[0.0, 0.5, 0.0, 0.25]) {
            Ok(roots) => {
                let re = sorted_re(roots);
                for (got, want) in re.iter().zip([-0.5, 0.0, 0.5]) {
                    assert!((got - want).abs() < 1e-6);
                }
            }
            Err(e) => assert!(e.is_numerical()),
        }
    }
}
