//! Eigenvalues of general real matrices
//!
//! # Algorithm
//!
//! ```text
//! 1. Balance: diagonal similarity with powers of 2 so row and column
//!    norms are comparable (exact in floating point)
//! 2. Reduce to upper Hessenberg form with Householder reflections
//! 3. Francis double-shift QR on the Hessenberg matrix, deflating 1x1
//!    and 2x2 blocks from the bottom; exceptional shifts at iterations
//!    10 and 20, failure after 30 iterations on one eigenvalue
//! ```
//!
//! Eigenvectors are recovered one at a time by inverse iteration on the
//! original matrix with complex arithmetic.

use super::lu::lu_decompose;
use crate::dtype::Complex128;
use crate::error::{Error, Result};

const RADIX: f64 = 2.0;
const MAX_QR_ITERATIONS: usize = 30;

/// All eigenvalues of the real matrix `a` [n × n]
///
/// Complex eigenvalues come in conjugate pairs. The order is the deflation
/// order of the QR iteration and carries no meaning.
///
/// # Errors
///
/// Returns `NoConvergence` if an eigenvalue fails to deflate within 30
/// iterations, and `ShapeMismatch` for a non-square input.
pub fn eigvals(a: &[f64], n: usize) -> Result<Vec<Complex128>> {
    if a.len() != n * n {
        return Err(Error::ShapeMismatch {
            expected: vec![n, n],
            got: vec![a.len()],
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![Complex128::from(a[0])]);
    }

    let mut h = a.to_vec();
    balance(&mut h, n);
    hessenberg_reduction(&mut h, n);
    hqr(&mut h, n)
}

/// Balance `a` in place by a diagonal similarity transform
///
/// Scaling factors are powers of the floating-point radix, so eigenvalues
/// are unchanged to the last bit.
pub fn balance(a: &mut [f64], n: usize) {
    let sqrdx = RADIX * RADIX;
    let mut done = false;

    while !done {
        done = true;
        for i in 0..n {
            let mut r = 0.0;
            let mut c = 0.0;
            for j in 0..n {
                if j != i {
                    c += a[j * n + i].abs();
                    r += a[i * n + j].abs();
                }
            }
            if c == 0.0 || r == 0.0 {
                continue;
            }

            let s = c + r;
            let mut f = 1.0;
            let mut g = r / RADIX;
            while c < g {
                f *= RADIX;
                c *= sqrdx;
            }
            g = r * RADIX;
            while c > g {
                f /= RADIX;
                c /= sqrdx;
            }

            if (c + r) / f < 0.95 * s {
                done = false;
                let inv = 1.0 / f;
                for j in 0..n {
                    a[i * n + j] *= inv;
                }
                for j in 0..n {
                    a[j * n + i] *= f;
                }
            }
        }
    }
}

/// Reduce matrix to upper Hessenberg form using Householder reflections.
/// Modifies `h` in place; entries below the first subdiagonal end up zero.
pub fn hessenberg_reduction(h: &mut [f64], n: usize) {
    if n < 3 {
        return;
    }

    for k in 0..(n - 2) {
        // Householder vector for column k, rows k+1 to n-1
        let mut v: Vec<f64> = ((k + 1)..n).map(|i| h[i * n + k]).collect();
        let norm_sq: f64 = v.iter().map(|x| x * x).sum();

        if norm_sq <= f64::MIN_POSITIVE {
            continue;
        }

        let norm = norm_sq.sqrt();
        let x0 = v[0];
        let alpha = if x0 >= 0.0 { -norm } else { norm };
        v[0] = x0 - alpha;

        let v_norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        if v_norm <= f64::MIN_POSITIVE {
            continue;
        }
        for vi in &mut v {
            *vi /= v_norm;
        }

        // Left multiplication: H[k+1:n, :] -= 2 v (v^T H[k+1:n, :])
        for j in 0..n {
            let dot: f64 = v
                .iter()
                .enumerate()
                .map(|(i, vi)| vi * h[(k + 1 + i) * n + j])
                .sum();
            for (i, vi) in v.iter().enumerate() {
                h[(k + 1 + i) * n + j] -= 2.0 * vi * dot;
            }
        }

        // Right multiplication: H[:, k+1:n] -= 2 (H[:, k+1:n] v) v^T
        for i in 0..n {
            let dot: f64 = v
                .iter()
                .enumerate()
                .map(|(j, vj)| h[i * n + (k + 1 + j)] * vj)
                .sum();
            for (j, vj) in v.iter().enumerate() {
                h[i * n + (k + 1 + j)] -= 2.0 * dot * vj;
            }
        }

        h[(k + 1) * n + k] = alpha;
        for i in (k + 2)..n {
            h[i * n + k] = 0.0;
        }
    }
}

#[inline]
fn sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 { a.abs() } else { -a.abs() }
}

/// Francis double-shift QR on an upper Hessenberg matrix
///
/// Destroys `h`. Returns the eigenvalues in deflation order.
fn hqr(h: &mut [f64], n: usize) -> Result<Vec<Complex128>> {
    let eps = f64::EPSILON;
    let mut wri = vec![Complex128::ZERO; n];

    let mut anorm = 0.0;
    for i in 0..n {
        for j in i.saturating_sub(1)..n {
            anorm += h[i * n + j].abs();
        }
    }

    let at = |i: usize, j: usize| i * n + j;

    let mut nn = n as isize - 1;
    let mut t = 0.0;

    while nn >= 0 {
        let mut its = 0usize;
        loop {
            let top = nn as usize;
            let mut p: f64;
            let mut q: f64;
            let mut r: f64;

            // Look for a single small subdiagonal element
            let mut l = top;
            while l > 0 {
                let mut s = h[at(l - 1, l - 1)].abs() + h[at(l, l)].abs();
                if s == 0.0 {
                    s = anorm;
                }
                if h[at(l, l - 1)].abs() <= eps * s {
                    h[at(l, l - 1)] = 0.0;
                    break;
                }
                l -= 1;
            }

            let mut x = h[at(top, top)];
            if l == top {
                // One root found
                wri[top] = Complex128::from(x + t);
                nn -= 1;
                break;
            }

            let mut y = h[at(top - 1, top - 1)];
            let mut w = h[at(top, top - 1)] * h[at(top - 1, top)];
            if l == top - 1 {
                // Two roots found
                p = 0.5 * (y - x);
                q = p * p + w;
                let mut z = q.abs().sqrt();
                x += t;
                if q >= 0.0 {
                    z = p + sign(z, p);
                    wri[top - 1] = Complex128::from(x + z);
                    wri[top] = wri[top - 1];
                    if z != 0.0 {
                        wri[top] = Complex128::from(x - w / z);
                    }
                } else {
                    wri[top] = Complex128::new(x + p, -z);
                    wri[top - 1] = wri[top].conj();
                }
                nn -= 2;
                break;
            }

            if its == MAX_QR_ITERATIONS {
                return Err(Error::NoConvergence {
                    context: "hqr",
                    iterations: its,
                });
            }
            if its == 10 || its == 20 {
                // Exceptional shift
                t += x;
                for i in 0..=top {
                    h[at(i, i)] -= x;
                }
                let s = h[at(top, top - 1)].abs() + h[at(top - 1, top - 2)].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }
            its += 1;

            // Form shift and look for two consecutive small subdiagonals
            let mut m = top - 2;
            loop {
                let z = h[at(m, m)];
                let rr = x - z;
                let ss = y - z;
                p = (rr * ss - w) / h[at(m + 1, m)] + h[at(m, m + 1)];
                q = h[at(m + 1, m + 1)] - z - rr - ss;
                r = h[at(m + 2, m + 1)];
                let s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                let u = h[at(m, m - 1)].abs() * (q.abs() + r.abs());
                let v = p.abs() * (h[at(m - 1, m - 1)].abs() + z.abs() + h[at(m + 1, m + 1)].abs());
                if u <= eps * v {
                    break;
                }
                m -= 1;
            }

            for i in m..(top - 1) {
                h[at(i + 2, i)] = 0.0;
                if i != m {
                    h[at(i + 2, i - 1)] = 0.0;
                }
            }

            // Double QR step on rows l..=top and columns m..=top
            for k in m..top {
                if k != m {
                    p = h[at(k, k - 1)];
                    q = h[at(k + 1, k - 1)];
                    r = 0.0;
                    if k + 1 != top {
                        r = h[at(k + 2, k - 1)];
                    }
                    x = p.abs() + q.abs() + r.abs();
                    if x != 0.0 {
                        p /= x;
                        q /= x;
                        r /= x;
                    }
                }
                let s = sign((p * p + q * q + r * r).sqrt(), p);
                if s == 0.0 {
                    continue;
                }
                if k == m {
                    if l != m {
                        h[at(k, k - 1)] = -h[at(k, k - 1)];
                    }
                } else {
                    h[at(k, k - 1)] = -s * x;
                }
                p += s;
                x = p / s;
                y = q / s;
                let z = r / s;
                q /= p;
                r /= p;

                // Row modification
                for j in k..=top {
                    let mut pp = h[at(k, j)] + q * h[at(k + 1, j)];
                    if k + 1 != top {
                        pp += r * h[at(k + 2, j)];
                        h[at(k + 2, j)] -= pp * z;
                    }
                    h[at(k + 1, j)] -= pp * y;
                    h[at(k, j)] -= pp * x;
                }

                // Column modification
                let mmin = if top < k + 3 { top } else { k + 3 };
                for i in l..=mmin {
                    let mut pp = x * h[at(i, k)] + y * h[at(i, k + 1)];
                    if k + 1 != top {
                        pp += z * h[at(i, k + 2)];
                        h[at(i, k + 2)] -= pp * r;
                    }
                    h[at(i, k + 1)] -= pp * q;
                    h[at(i, k)] -= pp;
                }
            }
        }
    }

    Ok(wri)
}

/// Eigenvector of `a` [n × n] for a computed eigenvalue `lambda`
///
/// Runs a few steps of inverse iteration with `(A - (λ + δ) I)`, where the
/// small offset `δ` keeps the shifted matrix invertible. The result is
/// normalized to unit 2-norm.
///
/// # Errors
///
/// Returns `SingularMatrix` if every perturbed shift is still singular.
pub fn eigenvector_inverse_iteration(
    a: &[f64],
    n: usize,
    lambda: Complex128,
) -> Result<Vec<Complex128>> {
    let scale = a.iter().fold(1.0f64, |m, v| m.max(v.abs()));

    for offset in [1e-10, 1e-8, 1e-6] {
        let shift = lambda + Complex128::new(offset * scale, offset * scale);
        let mut shifted: Vec<Complex128> = a.iter().map(|&v| Complex128::from(v)).collect();
        for i in 0..n {
            shifted[i * n + i] -= shift;
        }

        let lu = match lu_decompose(&shifted, n) {
            Ok(lu) => lu,
            Err(e) if e.is_numerical() => continue,
            Err(e) => return Err(e),
        };

        let mut v: Vec<Complex128> = (0..n)
            .map(|i| Complex128::from(1.0 + 0.1 * i as f64 / n as f64))
            .collect();
        for _ in 0..3 {
            v = lu.solve_vec(&v)?;
            let norm = v.iter().map(|z| z.magnitude_squared()).sum::<f64>().sqrt();
            if !(norm.is_finite() && norm > 0.0) {
                break;
            }
            for z in v.iter_mut() {
                *z = z.scale(1.0 / norm);
            }
        }

        if v.iter().all(|z| z.is_finite()) {
            return Ok(v);
        }
    }

    Err(Error::SingularMatrix {
        context: "eigenvector_inverse_iteration",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_real(mut v: Vec<Complex128>) -> Vec<f64> {
        v.sort_by(|a, b| a.re.total_cmp(&b.re));
        v.into_iter().map(|z| z.re).collect()
    }

    #[test]
    fn test_eigvals_diagonal() {
        let a = [3.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 2.0];
        let ev = sorted_real(eigvals(&a, 3).unwrap());
        for (got, want) in ev.iter().zip([-1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_eigvals_rotation_is_complex() {
        let a = [0.0, -1.0, 1.0, 0.0];
        let ev = eigvals(&a, 2).unwrap();
        for z in &ev {
            assert!(z.re.abs() < 1e-12);
            assert!((z.im.abs() - 1.0).abs() < 1e-12);
        }
        assert!((ev[0].im + ev[1].im).abs() < 1e-12);
    }

    #[test]
    fn test_eigvals_companion() {
        // Companion of (x-1)(x-2)(x-3)(x-4) = x^4 - 10x^3 + 35x^2 - 50x + 24
        let a = [
            0.0, 0.0, 0.0, -24.0, //
            1.0, 0.0, 0.0, 50.0, //
            0.0, 1.0, 0.0, -35.0, //
            0.0, 0.0, 1.0, 10.0,
        ];
        let ev = eigvals(&a, 4).unwrap();
        assert!(ev.iter().all(|z| z.im.abs() < 1e-8));
        let ev = sorted_real(ev);
        for (got, want) in ev.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert!((got - want).abs() < 1e-8, "{got} vs {want}");
        }
    }

    #[test]
    fn test_hessenberg_structure() {
        let mut h: Vec<f64> = (0..25).map(|i| ((i * 7) % 11) as f64 - 5.0).collect();
        hessenberg_reduction(&mut h, 5);
        for i in 2..5 {
            for j in 0..(i - 1) {
                assert_eq!(h[i * 5 + j], 0.0);
            }
        }
    }

    #[test]
    fn test_inverse_iteration() {
        let a = [2.0, 1.0, 1.0, 2.0];
        let v = eigenvector_inverse_iteration(&a, 2, Complex128::from(3.0)).unwrap();
        // Eigenvector of 3 is (1, 1)/sqrt(2) up to phase
        let ratio = v[0] / v[1];
        assert!((ratio - Complex128::ONE).magnitude() < 1e-6);
    }
}
