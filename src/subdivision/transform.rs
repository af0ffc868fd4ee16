//! Chebyshev interpolation on a box
//!
//! A function sampled at the Chebyshev extrema `cos(πk/d)` is turned into
//! Chebyshev coefficients by one FFT of its even periodic extension:
//!
//! ```text
//! values:    v_0 v_1 ... v_d
//! mirrored:  v_0 v_1 ... v_d v_{d-1} ... v_1        (length 2d)
//! coeffs:    Re(FFT(mirrored)) / d, entries 0 and d halved
//! ```
//!
//! The n-dimensional version mirrors every axis and runs the FFT axis by
//! axis.

use crate::algorithm::fft::{FftDirection, fft_c128, fftn_real};
use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::function::RealFunction;
use crate::subdivision::interval::Interval;
use crate::tensor::{Shape, Tensor};

/// Abscissa in `[-1, 1]` at which boxes are split
///
/// Equals `2·SPLIT_RATIO - 1`, the image of the split position in the
/// reference frame.
pub const SPLIT_ABSCISSA: f64 = 0.027860780181747646;

/// The `deg + 1` Chebyshev extrema `cos(πk/deg)`, descending from 1 to -1
pub fn chebyshev_extrema(deg: usize) -> Vec<f64> {
    (0..=deg)
        .map(|k| (std::f64::consts::PI * k as f64 / deg as f64).cos())
        .collect()
}

fn validate_degree(deg: usize) -> Result<()> {
    if deg == 0 {
        return Err(Error::InvalidArgument {
            arg: "degree",
            reason: "approximation degree must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Sample `f` on the tensor grid of the given per-axis extrema
fn sample_grid(f: &dyn RealFunction, axes: &[Vec<f64>]) -> Result<Tensor> {
    let shape: Shape = axes.iter().map(|a| a.len()).collect();

    if let Some(grid) = f.evaluate_grid(axes) {
        if grid.shape() == shape.as_slice() {
            return Ok(grid);
        }
        return Err(Error::ShapeMismatch {
            expected: shape.to_vec(),
            got: grid.shape().to_vec(),
        });
    }

    let dim = axes.len();
    let mut points = Vec::with_capacity(shape.elem_count() * dim);
    for idx in Tensor::zeros(&shape).indices() {
        points.extend(idx.iter().enumerate().map(|(axis, &k)| axes[axis][k]));
    }
    let values = f.evaluate(&points, dim);
    Tensor::from_vec(values, &shape)
}

/// Per-orthant sign-change flags of a sampled block
///
/// On every axis the extrema strictly above [`SPLIT_ABSCISSA`] form the
/// upper half (bit clear) and the rest the lower half (bit set). Orthants are
/// numbered in binary with axis 0 most significant. A flag is `false` only
/// when every sample in the orthant is `> 0`, or every sample is `< 0`.
pub fn sign_change_flags(values: &Tensor, extrema: &[Vec<f64>]) -> Vec<bool> {
    let dim = values.ndim();
    let split_points: Vec<usize> = extrema
        .iter()
        .map(|e| e.iter().filter(|&&x| x > SPLIT_ABSCISSA).count())
        .collect();

    let mut all_pos = vec![true; 1 << dim];
    let mut all_neg = vec![true; 1 << dim];
    for (idx, &v) in values.indices().zip(values.as_slice()) {
        let orthant = idx
            .iter()
            .zip(split_points.iter())
            .fold(0usize, |acc, (&k, &split)| (acc << 1) | usize::from(k >= split));
        all_pos[orthant] &= v > 0.0;
        all_neg[orthant] &= v < 0.0;
    }
    all_pos
        .into_iter()
        .zip(all_neg)
        .map(|(pos, neg)| !(pos || neg))
        .collect()
}

/// Chebyshev coefficients of `f` on `interval`
///
/// Interpolates at `cos(πk/degs[i])`, `k = 0..=degs[i]`, per axis. Returns
/// a tensor of shape `degs[i] + 1` per axis, plus the sign-change flags of
/// the samples when `with_flags` is set.
///
/// # Errors
///
/// - `InvalidArgument` if any degree is 0
/// - `ShapeMismatch` if `degs` does not match the box dimension or the
///   function returns the wrong number of values
pub fn interval_approximate_nd(
    f: &dyn RealFunction,
    interval: &Interval,
    degs: &[usize],
    with_flags: bool,
) -> Result<(Tensor, Option<Vec<bool>>)> {
    let dim = interval.dim();
    if degs.len() != dim {
        return Err(Error::ShapeMismatch {
            expected: vec![dim],
            got: vec![degs.len()],
        });
    }
    for &d in degs {
        validate_degree(d)?;
    }

    let extrema: Vec<Vec<f64>> = degs.iter().map(|&d| chebyshev_extrema(d)).collect();
    let axes: Vec<Vec<f64>> = extrema
        .iter()
        .enumerate()
        .map(|(axis, e)| e.iter().map(|&x| interval.transform_axis(axis, x)).collect())
        .collect();
    let values = sample_grid(f, &axes)?;

    let flags = with_flags.then(|| sign_change_flags(&values, &extrema));

    let periodic: Shape = degs.iter().map(|&d| 2 * d).collect();
    let mirrored = Tensor::from_fn(&periodic, |idx| {
        let src: Shape = idx
            .iter()
            .zip(degs)
            .map(|(&j, &d)| if j <= d { j } else { 2 * d - j })
            .collect();
        values.get_or_zero(&src)
    });

    let spectrum = fftn_real(mirrored.as_slice(), &periodic);
    let norm: f64 = degs.iter().map(|&d| d as f64).product();
    let full = Tensor::from_vec(spectrum.iter().map(|c| c.re / norm).collect(), &periodic)?;

    let block: Shape = degs.iter().map(|&d| d + 1).collect();
    let coeffs = Tensor::from_fn(&block, |idx| {
        let halving = idx
            .iter()
            .zip(degs)
            .filter(|&(&k, &d)| k == 0 || k == d)
            .count();
        full.get_or_zero(idx) / f64::from(1u32 << halving)
    });

    Ok((coeffs, flags))
}

/// Chebyshev coefficients of a univariate `f` on `[a, b]`
///
/// Samples the full period `cos(πk/deg)`, `k = 0..2deg`, so no mirroring is
/// needed. Returns `deg + 1` coefficients.
///
/// # Errors
///
/// - `InvalidArgument` if `deg` is 0
/// - `InvalidInterval` if `a > b` or either bound is not finite
pub fn interval_approximate_1d(f: &dyn RealFunction, a: f64, b: f64, deg: usize) -> Result<Vec<f64>> {
    validate_degree(deg)?;
    let interval = Interval::new(vec![a], vec![b])?;

    let points: Vec<f64> = (0..2 * deg)
        .map(|k| interval.transform_axis(0, (std::f64::consts::PI * k as f64 / deg as f64).cos()))
        .collect();
    let values = f.evaluate(&points, 1);
    if values.len() != points.len() {
        return Err(Error::ShapeMismatch {
            expected: vec![points.len()],
            got: vec![values.len()],
        });
    }

    let input: Vec<Complex128> = values.iter().map(|&v| Complex128::from(v / deg as f64)).collect();
    let spectrum = fft_c128(&input, FftDirection::Forward);

    let mut coeffs: Vec<f64> = spectrum[..=deg].iter().map(|c| c.re).collect();
    coeffs[0] /= 2.0;
    coeffs[deg] /= 2.0;
    Ok(coeffs)
}
