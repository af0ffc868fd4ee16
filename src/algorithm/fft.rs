//! Discrete Fourier transforms for Chebyshev coefficient extraction
//!
//! Two kernels share one calling convention:
//!
//! - [`stockham_fft_c128`] - radix-2 Stockham autosort FFT for power-of-two
//!   lengths (no bit-reversal pass, natural double buffering)
//! - [`dft_c128`] - direct O(N²) DFT for every other length
//!
//! [`fft_c128`] dispatches between them, and [`fftn_real`] applies the 1-D
//! transform along every axis of a real row-major block.
//!
//! # Algorithm: Stockham Radix-2 FFT
//!
//! ```text
//! For each stage s = 0..log2(N):
//!     half_m = 2^s
//!     m = 2^(s+1)
//!     For each group g = 0..(N/m):
//!         For each butterfly b = 0..half_m:
//!             twiddle = exp(sign * 2πi * b / m)
//!             even = src[g * half_m + b]
//!             odd = src[N/2 + g * half_m + b] * twiddle
//!             dst[g * m + b] = even + odd
//!             dst[g * m + b + half_m] = even - odd
//!     swap(src, dst)
//! ```
//!
//! Chebyshev grids mirrored to `2·deg` samples are power-of-two only when
//! `deg` is, so the multivariate degree table (5, 4, 3, 2 and their doubles)
//! regularly lands on the direct DFT path. Those lengths are small.

use crate::dtype::Complex128;
use std::f64::consts::PI;

/// Direction of an FFT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftDirection {
    /// Uses twiddle factor `e^(-2πi k / N)`
    Forward,
    /// Uses twiddle factor `e^(+2πi k / N)`
    Inverse,
}

impl FftDirection {
    #[inline]
    fn sign(self) -> f64 {
        match self {
            Self::Forward => -1.0,
            Self::Inverse => 1.0,
        }
    }
}

/// Stockham FFT for Complex128 data
///
/// # Arguments
///
/// * `input` - Input complex data slice of length N (must be power of 2)
/// * `output` - Output buffer, will be filled with the FFT result
/// * `direction` - Forward or inverse transform
/// * `normalize_factor` - Scale factor to apply to each output element
pub fn stockham_fft_c128(
    input: &[Complex128],
    output: &mut [Complex128],
    direction: FftDirection,
    normalize_factor: f64,
) {
    let n = input.len();
    debug_assert!(n > 0 && (n & (n - 1)) == 0, "N must be power of 2");
    debug_assert_eq!(input.len(), output.len());

    if n == 1 {
        output[0] = input[0].scale(normalize_factor);
        return;
    }

    let log_n = n.trailing_zeros() as usize;
    let sign = direction.sign();

    // Double buffering
    let mut buf_a: Vec<Complex128> = input.to_vec();
    let mut buf_b: Vec<Complex128> = vec![Complex128::ZERO; n];

    let mut src = &mut buf_a;
    let mut dst = &mut buf_b;

    for stage in 0..log_n {
        let m = 1 << (stage + 1);
        let half_m = 1 << stage;
        let groups = n / m;

        for g in 0..groups {
            for b in 0..half_m {
                let theta = sign * 2.0 * PI * (b as f64) / (m as f64);
                let twiddle = Complex128::from_polar(1.0, theta);

                let even = src[g * half_m + b];
                let odd = src[n / 2 + g * half_m + b] * twiddle;

                dst[g * m + b] = even + odd;
                dst[g * m + b + half_m] = even - odd;
            }
        }

        std::mem::swap(&mut src, &mut dst);
    }

    for (out, v) in output.iter_mut().zip(src.iter()) {
        *out = v.scale(normalize_factor);
    }
}

/// Direct DFT for Complex128 data of any length
///
/// `X[k] = Σ_j x[j] · exp(sign · 2πi · jk / N)`. The twiddle index is reduced
/// modulo N before the angle is formed so large products stay exact.
pub fn dft_c128(
    input: &[Complex128],
    output: &mut [Complex128],
    direction: FftDirection,
    normalize_factor: f64,
) {
    let n = input.len();
    debug_assert_eq!(input.len(), output.len());
    let sign = direction.sign();

    for (k, out) in output.iter_mut().enumerate() {
        let mut acc = Complex128::ZERO;
        for (j, &x) in input.iter().enumerate() {
            let theta = sign * 2.0 * PI * ((j * k) % n) as f64 / n as f64;
            acc += x * Complex128::from_polar(1.0, theta);
        }
        *out = acc.scale(normalize_factor);
    }
}

/// Transform of one contiguous lane, choosing the kernel by length
pub fn fft_c128(input: &[Complex128], direction: FftDirection) -> Vec<Complex128> {
    let n = input.len();
    let mut output = vec![Complex128::ZERO; n];
    if n == 0 {
        return output;
    }
    if n.is_power_of_two() {
        stockham_fft_c128(input, &mut output, direction, 1.0);
    } else {
        dft_c128(input, &mut output, direction, 1.0);
    }
    output
}

/// Transform `data` (row-major with `shape`) in place along one axis
pub fn fft_axis(data: &mut [Complex128], shape: &[usize], axis: usize, direction: FftDirection) {
    let n = shape[axis];
    if n <= 1 {
        return;
    }
    let inner: usize = shape[axis + 1..].iter().product();
    let outer: usize = shape[..axis].iter().product();
    let batch = outer * inner;

    // Gather lanes into a contiguous [batch x n] buffer
    let mut lanes = vec![Complex128::ZERO; batch * n];
    for o in 0..outer {
        for i in 0..inner {
            let lane = o * inner + i;
            for k in 0..n {
                lanes[lane * n + k] = data[(o * n + k) * inner + i];
            }
        }
    }

    let transformed = fft_lanes(&lanes, n, direction);

    for o in 0..outer {
        for i in 0..inner {
            let lane = o * inner + i;
            for k in 0..n {
                data[(o * n + k) * inner + i] = transformed[lane * n + k];
            }
        }
    }
}

#[cfg(feature = "rayon")]
fn fft_lanes(lanes: &[Complex128], n: usize, direction: FftDirection) -> Vec<Complex128> {
    use rayon::prelude::*;

    let mut out = vec![Complex128::ZERO; lanes.len()];
    out.par_chunks_mut(n)
        .zip(lanes.par_chunks(n))
        .for_each(|(dst, src)| dst.copy_from_slice(&fft_c128(src, direction)));
    out
}

#[cfg(not(feature = "rayon"))]
fn fft_lanes(lanes: &[Complex128], n: usize, direction: FftDirection) -> Vec<Complex128> {
    let mut out = Vec::with_capacity(lanes.len());
    for src in lanes.chunks(n) {
        out.extend(fft_c128(src, direction));
    }
    out
}

/// Forward n-dimensional FFT of a real row-major block
pub fn fftn_real(data: &[f64], shape: &[usize]) -> Vec<Complex128> {
    let mut buf: Vec<Complex128> = data.iter().map(|&v| Complex128::from(v)).collect();
    for axis in 0..shape.len() {
        fft_axis(&mut buf, shape, axis, FftDirection::Forward);
    }
    buf
}
