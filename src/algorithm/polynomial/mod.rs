//! Polynomial algorithms
//!
//! - [`chebyshev`] - univariate Chebyshev series: Clenshaw evaluation and
//!   colleague-matrix root finding
//! - [`multicheb`] - multivariate polynomial wrappers over coefficient
//!   tensors in the Chebyshev and power bases
//! - [`monomials`] - exponent enumeration shared by trimming, the checks and
//!   the elimination solver

pub mod chebyshev;
pub mod monomials;
pub mod multicheb;

pub use chebyshev::{
    chebval, chebvander, colleague_matrix, roots_via_division, roots_via_multiplication,
    trim_trailing_zeros,
};
pub use monomials::{count_up_to, mon_combos_limited, monomials_of_degree, monomials_up_to};
pub use multicheb::{MultiCheb, MultiPower, powvander};
