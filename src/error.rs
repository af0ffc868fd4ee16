//! Error types for rootr

use thiserror::Error;

/// Result type alias using rootr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rootr operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Lower and upper bound vectors have different lengths
    #[error("Dimension mismatch: lower bound has {lower} entries, upper bound has {upper}")]
    DimensionMismatch {
        /// Length of the lower bound vector
        lower: usize,
        /// Length of the upper bound vector
        upper: usize,
    },

    /// A bound pair is reversed or not finite
    #[error("Invalid interval on axis {axis}: [{lower}, {upper}]")]
    InvalidInterval {
        /// Offending axis
        axis: usize,
        /// Lower bound on that axis
        lower: f64,
        /// Upper bound on that axis
        upper: f64,
    },

    /// A multivariate system must have one function per dimension
    #[error("Expected {dim} functions for a {dim}-dimensional search box, got {functions}")]
    FunctionCountMismatch {
        /// Number of functions supplied
        functions: usize,
        /// Dimension of the search box
        dim: usize,
    },

    /// Shape mismatch in a tensor operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Why the argument is invalid
        reason: String,
    },

    /// A linear system was singular or too ill-conditioned to solve
    #[error("Singular matrix in {context}")]
    SingularMatrix {
        /// Operation that hit the singular matrix
        context: &'static str,
    },

    /// An iterative routine ran out of iterations
    #[error("{context}: no convergence after {iterations} iterations")]
    NoConvergence {
        /// Operation that failed to converge
        context: &'static str,
        /// Iterations performed
        iterations: usize,
    },
}

impl Error {
    /// Whether this error is a numerical failure the subdivision driver
    /// recovers from by splitting the box.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            Self::SingularMatrix { .. } | Self::NoConvergence { .. }
        )
    }
}
