//! Scalar types used by rootr
//!
//! Coefficients and sample values are plain `f64`; [`Complex128`] carries
//! FFT intermediates, eigenvalues and candidate roots before they are
//! filtered down to real points.

pub mod complex;

pub use complex::Complex128;
