//! Elimination solvers for small polynomial systems
//!
//! Once a box is small enough that every function is well approximated by a
//! low-degree Chebyshev polynomial, the driver hands the square system to an
//! [`EliminationSolver`]. The solver returns every root it finds, real or
//! complex, inside or outside `[-1, 1]^n`; the driver filters them.

mod macaulay;

pub use macaulay::MacaulayDivision;

use crate::algorithm::polynomial::MultiCheb;
use crate::dtype::Complex128;
use crate::error::Result;

/// Solves a square system of Chebyshev polynomials
pub trait EliminationSolver: Send + Sync {
    /// Roots of `polys`, one coordinate vector per root
    ///
    /// `axis` is an elimination direction along which the system was found
    /// to be numerically stable. `tol` is the relative rank tolerance.
    ///
    /// # Errors
    ///
    /// Numerical failures (`SingularMatrix`, `NoConvergence`) tell the
    /// driver to subdivide instead.
    fn solve(&self, polys: &[MultiCheb], axis: usize, tol: f64) -> Result<Vec<Vec<Complex128>>>;
}
