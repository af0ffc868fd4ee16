//! # rootr
//!
//! **Common real roots of systems of multivariate functions in a box.**
//!
//! rootr approximates each function by a tensor Chebyshev series, checks
//! the approximation against one of twice the degree, and recursively
//! subdivides the search box until every piece is either provably root-free
//! or small enough to solve as a low-degree polynomial system.
//!
//! ## Features
//!
//! - **Any smooth function**: closures `Fn(&[f64]) -> f64` work directly;
//!   polynomial types add fast grid evaluation
//! - **Cheap pruning**: constant, linear and quadratic range checks discard
//!   root-free boxes before any solve
//! - **Stable elimination**: coefficient trimming, a stability-aware
//!   elimination axis, and a Macaulay null-space solver
//! - **Univariate path**: degree doubling with colleague-matrix root finding
//! - **Diagnostics**: every visited box is logged with what disposed of it
//!
//! ## Quick Start
//!
//! ```rust
//! use rootr::prelude::*;
//!
//! // x² + y² = 1 and y = 0 on [-1, 1]²
//! let f = |p: &[f64]| p[0] * p[0] + p[1] * p[1] - 1.0;
//! let g = |p: &[f64]| p[1];
//! let roots = solve(&[&f, &g], &[-1.0, -1.0], &[1.0, 1.0])?;
//! assert_eq!(roots.len(), 2);
//! # Ok::<(), rootr::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): solve sibling boxes and FFT lanes in parallel

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod algorithm;
pub mod checks;
pub mod division;
pub mod dtype;
pub mod error;
pub mod function;
pub mod subdivision;
pub mod tensor;

pub use error::{Error, Result};
pub use function::RealFunction;
pub use subdivision::{Solution, SolverConfig, SubdivisionSolver, solve, solve_1d};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::polynomial::{MultiCheb, MultiPower};
    pub use crate::checks::{IntervalCheck, SubintervalCheck};
    pub use crate::division::EliminationSolver;
    pub use crate::dtype::Complex128;
    pub use crate::error::{Error, Result};
    pub use crate::function::RealFunction;
    pub use crate::subdivision::{
        Disposition, Interval, IntervalLog, Solution, SolverConfig, SubdivisionSolver, solve, solve_1d,
    };
    pub use crate::tensor::Tensor;
}
