//! LU decomposition with partial pivoting (Doolittle algorithm)

use super::LinalgElement;
use crate::error::{Error, Result};

/// Packed LU factors of a square matrix
///
/// `lu` holds `L` strictly below the diagonal (unit diagonal implied) and `U`
/// on and above it. `pivots[i]` is the row swapped with row `i` at step `i`.
#[derive(Debug, Clone)]
pub struct LuDecomposition<T> {
    lu: Vec<T>,
    pivots: Vec<usize>,
    n: usize,
    num_swaps: usize,
}

/// Factor the square matrix `a` [n × n]
///
/// A pivot is treated as zero when its magnitude falls below
/// `n · ε · max|a_ij|`, so badly scaled but regular systems still factor.
///
/// # Errors
///
/// Returns `SingularMatrix` if the matrix is (numerically) singular, and
/// `ShapeMismatch` if `a.len() != n * n`.
pub fn lu_decompose<T: LinalgElement>(a: &[T], n: usize) -> Result<LuDecomposition<T>> {
    if a.len() != n * n {
        return Err(Error::ShapeMismatch {
            expected: vec![n, n],
            got: vec![a.len()],
        });
    }

    let mut lu: Vec<T> = a.to_vec();
    let mut pivots: Vec<usize> = vec![0; n];
    let mut num_swaps = 0usize;

    let scale = a.iter().fold(0.0f64, |m, v| m.max(v.abs_val()));
    let threshold = (n as f64) * T::epsilon_val() * scale;
    if n > 0 && scale == 0.0 {
        return Err(Error::SingularMatrix {
            context: "lu_decompose",
        });
    }

    for col in 0..n {
        // Find pivot: max absolute value in column col, rows col..n
        let mut pivot_row = col;
        let mut max_val = lu[col * n + col].abs_val();

        for row in (col + 1)..n {
            let val = lu[row * n + col].abs_val();
            if val > max_val {
                max_val = val;
                pivot_row = row;
            }
        }

        pivots[col] = pivot_row;

        if pivot_row != col {
            for j in 0..n {
                lu.swap(col * n + j, pivot_row * n + j);
            }
            num_swaps += 1;
        }

        let pivot = lu[col * n + col];
        let magnitude = pivot.abs_val();
        if magnitude <= threshold || magnitude.is_nan() {
            return Err(Error::SingularMatrix {
                context: "lu_decompose",
            });
        }

        // Compute multipliers (L column)
        for row in (col + 1)..n {
            lu[row * n + col] = lu[row * n + col] / pivot;
        }

        // Update trailing submatrix
        for row in (col + 1)..n {
            let multiplier = lu[row * n + col];
            for j in (col + 1)..n {
                let update = multiplier * lu[col * n + j];
                lu[row * n + j] = lu[row * n + j] - update;
            }
        }
    }

    Ok(LuDecomposition {
        lu,
        pivots,
        n,
        num_swaps,
    })
}

impl<T: LinalgElement> LuDecomposition<T> {
    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Number of row interchanges performed
    pub fn num_swaps(&self) -> usize {
        self.num_swaps
    }

    /// Solve `A x = b` for one right-hand side
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if `b.len() != n`.
    pub fn solve_vec(&self, b: &[T]) -> Result<Vec<T>> {
        let n = self.n;
        if b.len() != n {
            return Err(Error::ShapeMismatch {
                expected: vec![n],
                got: vec![b.len()],
            });
        }

        // Apply permutation to b
        let mut pb: Vec<T> = b.to_vec();
        for (i, &pivot_row) in self.pivots.iter().enumerate() {
            if pivot_row != i {
                pb.swap(i, pivot_row);
            }
        }

        // Forward substitution: Ly = Pb (L has unit diagonal)
        let mut y: Vec<T> = vec![T::zero(); n];
        for i in 0..n {
            let mut sum = T::zero();
            for j in 0..i {
                sum = sum + self.lu[i * n + j] * y[j];
            }
            y[i] = pb[i] - sum;
        }

        // Backward substitution: Ux = y
        let mut x: Vec<T> = vec![T::zero(); n];
        for i in (0..n).rev() {
            let mut s = T::zero();
            for j in (i + 1)..n {
                s = s + self.lu[i * n + j] * x[j];
            }
            x[i] = (y[i] - s) / self.lu[i * n + i];
        }

        Ok(x)
    }

    /// Solve `A X = B` where `B` is [n × ncols] row-major
    pub fn solve_matrix(&self, b: &[T], ncols: usize) -> Result<Vec<T>> {
        let n = self.n;
        if b.len() != n * ncols {
            return Err(Error::ShapeMismatch {
                expected: vec![n, ncols],
                got: vec![b.len()],
            });
        }

        let mut x = vec![T::zero(); n * ncols];
        let mut column = vec![T::zero(); n];
        for rhs in 0..ncols {
            for i in 0..n {
                column[i] = b[i * ncols + rhs];
            }
            let x_col = self.solve_vec(&column)?;
            for i in 0..n {
                x[i * ncols + rhs] = x_col[i];
            }
        }
        Ok(x)
    }
}

/// Solve `A x = b` for square `a` [n × n]
pub fn solve<T: LinalgElement>(a: &[T], b: &[T], n: usize) -> Result<Vec<T>> {
    lu_decompose(a, n)?.solve_vec(b)
}
