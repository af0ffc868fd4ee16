//! Coefficient stabilization
//!
//! Before elimination, every approximation is shrunk to the smallest total
//! degree whose discarded top terms stay below the trim tolerance, and an
//! elimination axis is chosen whose corner coefficients keep the division
//! well conditioned.

use crate::algorithm::polynomial::{MultiCheb, mon_combos_limited};
use crate::error::Result;
use crate::tensor::{Shape, Tensor};

/// Remove negligible top-degree terms and pick a stable elimination axis
///
/// Each function starts at the total degree `Σ shape_i - dim` of its tensor.
/// A pass drops, for every function above degree 1, all terms of exactly its
/// current degree when the accumulated discarded mass plus theirs stays
/// below `trim_tol`, then narrows every axis to `[0, degree)`. After each
/// pass [`pick_stable_dim`] is consulted. The search gives up (`None`) once
/// a pass after the first changes nothing.
///
/// # Errors
///
/// Propagates tensor shape errors, which only occur for malformed input.
pub fn trim_coeffs(
    mut coeffs: Vec<Tensor>,
    trim_tol: f64,
    stability_tol: f64,
) -> Result<(Vec<MultiCheb>, Option<usize>)> {
    let mut degrees: Vec<usize> = coeffs
        .iter()
        .map(|c| c.shape().iter().sum::<usize>().saturating_sub(c.ndim()))
        .collect();
    let mut errors = vec![0.0f64; coeffs.len()];
    let mut first_pass = true;

    loop {
        let mut changed = false;
        for ((coeff, degree), error) in coeffs.iter_mut().zip(degrees.iter_mut()).zip(errors.iter_mut()) {
            if *degree <= 1 {
                continue;
            }
            let terms = mon_combos_limited(*degree, coeff.shape());
            if terms.is_empty() {
                continue;
            }
            let slice_error: f64 = terms.iter().map(|t| coeff.get_or_zero(t).abs()).sum();
            if *error + slice_error < trim_tol {
                *error += slice_error;
                for t in &terms {
                    coeff.set(t, 0.0)?;
                }
                let extents: Shape = coeff.shape().iter().map(|&s| s.min(*degree)).collect();
                *coeff = coeff.narrow_top(&extents)?;
                *degree -= 1;
                changed = true;
            }
        }

        if !changed && !first_pass {
            tracing::trace!(?degrees, "trimming stalled without a stable axis");
            return Ok((into_polys(coeffs)?, None));
        }
        if let Some(axis) = pick_stable_dim(&coeffs, stability_tol) {
            tracing::trace!(?degrees, axis, "stable elimination axis");
            return Ok((into_polys(coeffs)?, Some(axis)));
        }
        first_pass = false;
    }
}

fn into_polys(coeffs: Vec<Tensor>) -> Result<Vec<MultiCheb>> {
    coeffs.into_iter().map(MultiCheb::new).collect()
}

/// First axis along which elimination is numerically stable
///
/// For candidate axis `k`, each function contributes its constant term to
/// axis `k` and, for every other axis `j`, its coefficient at
/// `(shape_j - 1)·e_j`. The axis is accepted when functions can be assigned
/// one-to-one to axes with every assigned corner of magnitude at least
/// `tol`.
pub fn pick_stable_dim(coeffs: &[Tensor], tol: f64) -> Option<usize> {
    let dim = coeffs.first()?.ndim();
    if coeffs.len() != dim {
        return None;
    }

    (0..dim).find(|&k| {
        // usable[axis][func]
        let usable: Vec<Vec<bool>> = (0..dim)
            .map(|axis| {
                coeffs
                    .iter()
                    .map(|c| {
                        let mut spot = vec![0; dim];
                        if axis != k {
                            spot[axis] = c.shape()[axis] - 1;
                        }
                        c.get_or_zero(&spot).abs() >= tol
                    })
                    .collect()
            })
            .collect();
        let mut taken = vec![false; dim];
        assign(&usable, 0, &mut taken)
    })
}

/// Backtracking search for a perfect matching of axes to functions
fn assign(usable: &[Vec<bool>], axis: usize, taken: &mut [bool]) -> bool {
    if axis == usable.len() {
        return true;
    }
    for func in 0..taken.len() {
        if taken[func] || !usable[axis][func] {
            continue;
        }
        taken[func] = true;
        if assign(usable, axis + 1, taken) {
            return true;
        }
        taken[func] = false;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(shape: &[usize], entries: &[(&[usize], f64)]) -> Tensor {
        let mut t = Tensor::zeros(shape);
        for (idx, v) in entries {
            t.set(idx, *v).unwrap();
        }
        t
    }

    #[test]
    fn test_pick_stable_dim_needs_constant_terms() {
        // x^2 + y^2 - 1 and y: both Chebyshev constant terms are zero
        let f = tensor(&[3, 3], &[(&[0, 0], 0.0), (&[2, 0], 0.5), (&[0, 2], 0.5)]);
        let g = tensor(&[3, 3], &[(&[0, 1], 1.0)]);
        assert_eq!(pick_stable_dim(&[f, g], 1e-5), None);
    }

    #[test]
    fn test_pick_stable_dim_finds_assignment() {
        // f: constant 1, top x corner 0.5; g: constant 0, top y corner 2
        let f = tensor(&[3, 3], &[(&[0, 0], 1.0), (&[2, 0], 0.5)]);
        let g = tensor(&[3, 3], &[(&[0, 2], 2.0)]);
        // axis 0: constants on axis 0 (f ok), y corners on axis 1 (g ok)
        assert_eq!(pick_stable_dim(&[f.clone(), g.clone()], 1e-5), Some(0));
        // swapped function order still matches
        assert_eq!(pick_stable_dim(&[g, f], 1e-5), Some(0));
    }

    #[test]
    fn test_trim_drops_negligible_top_terms() {
        // 1 + x + y with tiny quadratic noise
        let c = tensor(
            &[3, 3],
            &[
                (&[0, 0], 1.0),
                (&[1, 0], 1.0),
                (&[0, 1], 1.0),
                (&[2, 2], 1e-9),
                (&[1, 1], 1e-9),
            ],
        );
        let d = tensor(&[3, 3], &[(&[0, 0], 1.0), (&[1, 0], 1.0), (&[0, 1], -1.0)]);
        let (polys, axis) = trim_coeffs(vec![c, d], 1e-5, 1e-5).unwrap();
        assert!(axis.is_some());
        for p in &polys {
            assert_eq!(p.degree(), 1);
            assert!(p.coeffs().shape().iter().all(|&s| s <= 2));
        }
    }

    #[test]
    fn test_trim_keeps_significant_terms() {
        let c = tensor(&[3, 3], &[(&[0, 0], 1.0), (&[2, 0], 0.5), (&[0, 2], 0.5)]);
        let d = tensor(&[3, 3], &[(&[0, 0], 1.0), (&[0, 1], 1.0), (&[2, 0], 0.5)]);
        let (polys, _) = trim_coeffs(vec![c, d], 1e-5, 1e-5).unwrap();
        assert_eq!(polys[0].degree(), 2);
        assert!((polys[0].coeff(&[2, 0]) - 0.5).abs() < 1e-15);
        assert!((polys[1].coeff(&[2, 0]) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_trim_gives_up_without_stable_axis() {
        let f = tensor(&[3, 3], &[(&[2, 0], 0.5), (&[0, 2], 0.5), (&[1, 1], 1.0)]);
        let g = tensor(&[3, 3], &[(&[0, 1], 1.0), (&[2, 2], 1.0)]);
        let (polys, axis) = trim_coeffs(vec![f, g], 1e-5, 1e-5).unwrap();
        assert_eq!(axis, None);
        assert_eq!(polys.len(), 2);
    }
}
