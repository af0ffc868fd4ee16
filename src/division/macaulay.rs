//! Macaulay null-space elimination
//!
//! For a square system `p_1 .. p_n` of Chebyshev polynomials with total
//! degrees `d_i`:
//!
//! ```text
//! D = Σ (d_i - 1) + 1
//! M = rows T_β · p_i for |β| <= D - d_i, columns T_α for |α| <= D
//! N = null space of M                     [cols × k]
//! ```
//!
//! Every finite root `z` gives a null vector `(T_α(z))_α`, so `N = V W` with
//! `V` the evaluation vectors and `W` invertible. Picking `k` rows `B` of
//! degree below `D` with `N_B` invertible, multiplication by a linear form
//! `g` acts on the null space as
//!
//! ```text
//! N_B⁻¹ (g·N)_B = W⁻¹ diag(g(z)) W
//! ```
//!
//! whose eigenvectors `w` give back `N w ∝ V e_r`; the root coordinates are
//! the ratios of the `T_{e_j}` and `T_0` entries. When no such `B` exists the
//! system has roots at infinity and the solver reports a singular matrix.

use std::collections::HashMap;

use super::EliminationSolver;
use crate::algorithm::linalg::{eigenvector_inverse_iteration, eigvals, lu_decompose, null_space};
use crate::algorithm::polynomial::{MultiCheb, monomials_up_to};
use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::tensor::Shape;

/// Base weight of the off-axis terms of the shift form
const SHIFT_WEIGHT: f64 = 0.0731;

/// Smallest `|T_0|` entry of a recovered evaluation vector
const MIN_DENOMINATOR: f64 = 1e-12;

/// Default [`EliminationSolver`]: Macaulay matrix null space plus an
/// eigenvalue problem for a linear shift
#[derive(Clone, Copy, Debug, Default)]
pub struct MacaulayDivision;

type ColumnIndex = HashMap<Shape, usize>;

fn column(index: &ColumnIndex, alpha: &Shape) -> Result<usize> {
    index.get(alpha).copied().ok_or_else(|| Error::ShapeMismatch {
        expected: vec![index.len()],
        got: alpha.to_vec(),
    })
}

/// `T_β · T_α` as a sum of Chebyshev terms
///
/// Per axis `T_b T_a = (T_{a+b} + T_{|a-b|}) / 2` when both are nonzero.
fn chebyshev_product(beta: &[usize], alpha: &[usize]) -> Vec<(Shape, f64)> {
    let mut terms = vec![(Shape::new(), 1.0)];
    for (&b, &a) in beta.iter().zip(alpha) {
        let factors = if a == 0 || b == 0 {
            vec![(a + b, 1.0)]
        } else {
            vec![(a + b, 0.5), (a.abs_diff(b), 0.5)]
        };
        let mut next = Vec::with_capacity(terms.len() * factors.len());
        for (prefix, weight) in &terms {
            for &(k, w) in &factors {
                let mut idx = prefix.clone();
                idx.push(k);
                next.push((idx, weight * w));
            }
        }
        terms = next;
    }
    terms
}

/// `x_axis · T_α` as a sum of Chebyshev terms
fn shift_terms(alpha: &Shape, axis: usize) -> Vec<(Shape, f64)> {
    let mut up = alpha.clone();
    up[axis] += 1;
    if alpha[axis] == 0 {
        return vec![(up, 1.0)];
    }
    let mut down = alpha.clone();
    down[axis] -= 1;
    vec![(up, 0.5), (down, 0.5)]
}

/// Coefficients of the shift form: 1 on `axis`, small distinct weights on
/// the other axes so roots sharing an `axis` coordinate stay separated
fn shift_weights(dim: usize, axis: usize) -> Vec<f64> {
    (0..dim)
        .map(|j| {
            if j == axis {
                1.0
            } else {
                SHIFT_WEIGHT * ((j + 2) as f64).sqrt()
            }
        })
        .collect()
}

/// Dense Macaulay matrix, row-major `[rows × index.len()]`
fn macaulay_matrix(polys: &[MultiCheb], degree: usize, index: &ColumnIndex) -> Result<(Vec<f64>, usize)> {
    let dim = polys[0].dim();
    let cols = index.len();
    let mut data = Vec::new();
    let mut rows = 0;

    for p in polys {
        let terms: Vec<(Shape, f64)> = p
            .coeffs()
            .indices()
            .zip(p.coeffs().as_slice())
            .filter(|(_, c)| **c != 0.0)
            .map(|(alpha, &c)| (alpha, c))
            .collect();

        for beta in monomials_up_to(dim, degree - p.degree()) {
            let mut row = vec![0.0; cols];
            for (alpha, c) in &terms {
                for (gamma, w) in chebyshev_product(&beta, alpha) {
                    row[column(index, &gamma)?] += c * w;
                }
            }
            data.extend_from_slice(&row);
            rows += 1;
        }
    }
    Ok((data, rows))
}

/// Greedy pivoted Gram-Schmidt over candidate rows of `null` [cols × k]
///
/// Returns `k` row indices whose rows are linearly independent.
fn select_basis(null: &[f64], k: usize, candidates: &[usize], tol: f64) -> Result<Vec<usize>> {
    let mut residual: Vec<Vec<f64>> = candidates
        .iter()
        .map(|&c| null[c * k..(c + 1) * k].to_vec())
        .collect();
    let mut used = vec![false; candidates.len()];
    let mut basis = Vec::with_capacity(k);
    let mut first_norm = 0.0;

    for step in 0..k {
        let best = (0..candidates.len())
            .filter(|&i| !used[i])
            .map(|i| (i, residual[i].iter().map(|v| v * v).sum::<f64>().sqrt()))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        let Some((pivot, norm)) = best else {
            return Err(Error::SingularMatrix {
                context: "macaulay basis",
            });
        };
        if step == 0 {
            first_norm = norm;
        }
        if norm <= tol * first_norm || norm == 0.0 {
            return Err(Error::SingularMatrix {
                context: "macaulay basis",
            });
        }

        used[pivot] = true;
        basis.push(candidates[pivot]);
        let q: Vec<f64> = residual[pivot].iter().map(|v| v / norm).collect();
        for (i, r) in residual.iter_mut().enumerate() {
            if used[i] {
                continue;
            }
            let dot: f64 = r.iter().zip(&q).map(|(a, b)| a * b).sum();
            for (v, qv) in r.iter_mut().zip(&q) {
                *v -= dot * qv;
            }
        }
    }
    Ok(basis)
}

impl EliminationSolver for MacaulayDivision {
    fn solve(&self, polys: &[MultiCheb], axis: usize, tol: f64) -> Result<Vec<Vec<Complex128>>> {
        let dim = polys.first().map_or(0, MultiCheb::dim);
        if dim == 0 || polys.len() != dim || polys.iter().any(|p| p.dim() != dim) {
            return Err(Error::FunctionCountMismatch {
                functions: polys.len(),
                dim,
            });
        }
        if axis >= dim {
            return Err(Error::InvalidArgument {
                arg: "axis",
                reason: format!("axis {axis} out of range for {dim} variables"),
            });
        }

        let origin = Shape::uniform(dim, 0);
        for p in polys {
            if p.degree() == 0 {
                if p.coeff(&origin) != 0.0 {
                    return Ok(Vec::new());
                }
                return Err(Error::SingularMatrix {
                    context: "macaulay: zero polynomial",
                });
            }
        }

        let degree = polys.iter().map(|p| p.degree() - 1).sum::<usize>() + 1;
        let columns = monomials_up_to(dim, degree);
        let index: ColumnIndex = columns.iter().cloned().enumerate().map(|(i, a)| (a, i)).collect();
        let cols = columns.len();

        let (matrix, rows) = macaulay_matrix(polys, degree, &index)?;
        let (null, k) = null_space(&matrix, rows, cols, tol)?;
        tracing::trace!(degree, rows, cols, nullity = k, "macaulay null space");
        if k == 0 {
            return Ok(Vec::new());
        }

        let candidates: Vec<usize> = (0..cols).filter(|&c| columns[c].total() < degree).collect();
        let basis = select_basis(&null, k, &candidates, tol)?;

        let weights = shift_weights(dim, axis);
        let mut n_basis = vec![0.0; k * k];
        let mut n_shift = vec![0.0; k * k];
        for (r, &c) in basis.iter().enumerate() {
            n_basis[r * k..(r + 1) * k].copy_from_slice(&null[c * k..(c + 1) * k]);
            for (j, &w) in weights.iter().enumerate() {
                for (target, weight) in shift_terms(&columns[c], j) {
                    let t = column(&index, &target)?;
                    for s in 0..k {
                        n_shift[r * k + s] += w * weight * null[t * k + s];
                    }
                }
            }
        }

        let multiplication = lu_decompose(&n_basis, k)?.solve_matrix(&n_shift, k)?;
        let eigenvalues = eigvals(&multiplication, k)?;

        let origin_col = column(&index, &origin)?;
        let unit_cols = (0..dim)
            .map(|j| {
                let mut e = origin.clone();
                e[j] = 1;
                column(&index, &e)
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut roots = Vec::with_capacity(k);
        for lambda in eigenvalues {
            let w = eigenvector_inverse_iteration(&multiplication, k, lambda)?;
            let entry = |row: usize| {
                w.iter()
                    .enumerate()
                    .fold(Complex128::ZERO, |acc, (s, ws)| acc + ws.scale(null[row * k + s]))
            };
            let denom = entry(origin_col);
            if denom.magnitude() < MIN_DENOMINATOR {
                continue;
            }
            roots.push(unit_cols.iter().map(|&c| entry(c) / denom).collect());
        }
        Ok(roots)
    }
}
