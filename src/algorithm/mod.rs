//! Numerical building blocks
//!
//! - [`fft`] - Stockham radix-2 FFT with a direct DFT fallback, and the
//!   n-dimensional real transform used by the Chebyshev transform
//! - [`linalg`] - LU, eigenvalues, inverse iteration and null spaces for
//!   small dense matrices
//! - [`polynomial`] - Chebyshev series, colleague-matrix roots and the
//!   multivariate polynomial wrappers
//!
//! Everything here works on plain row-major slices and is independent of
//! the subdivision machinery that sits on top of it.

pub mod fft;
pub mod linalg;
pub mod polynomial;
