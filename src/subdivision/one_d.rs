//! Univariate driver
//!
//! Doubles the approximation degree until the upper half of the degree-2d
//! series is negligible, then solves the degree-d series directly. Past the
//! degree cap the interval is bisected.

use crate::algorithm::polynomial::{roots_via_division, roots_via_multiplication, trim_trailing_zeros};
use crate::dtype::Complex128;
use crate::error::Result;
use crate::function::RealFunction;
use crate::subdivision::config::SolverConfig;
use crate::subdivision::interval::Interval;
use crate::subdivision::log::{Disposition, IntervalLog};
use crate::subdivision::transform::interval_approximate_1d;

/// Real roots in `[-1, 1]`
pub fn good_zeros_1d(zeros: &[Complex128], imag_tol: f64) -> Vec<f64> {
    zeros
        .iter()
        .filter(|z| z.magnitude() <= 1.0 && z.im.abs() < imag_tol)
        .map(|z| z.re)
        .collect()
}

/// Roots of a Chebyshev series, choosing the root finder by degree
fn series_roots(coeffs: &[f64], config: &SolverConfig) -> Result<Vec<Complex128>> {
    let degree = coeffs.len().saturating_sub(1);
    if degree > config.division_degree_1d {
        match roots_via_division(coeffs) {
            Ok(roots) => return Ok(roots),
            Err(e) if e.is_numerical() => {
                tracing::trace!(error = %e, degree, "division root finder failed");
            }
            Err(e) => return Err(e),
        }
    }
    roots_via_multiplication(trim_trailing_zeros(coeffs))
}

/// Roots of `f` in `[a, b]`
///
/// Boxes solved directly are recorded as [`Disposition::BaseCase`].
///
/// # Errors
///
/// `InvalidInterval` for reversed or non-finite bounds; evaluation errors
/// are propagated. Numerical failures of the root finders bisect instead.
pub fn subdivision_solve_1d(
    f: &dyn RealFunction,
    a: f64,
    b: f64,
    config: &SolverConfig,
    depth: usize,
    log: &mut IntervalLog,
) -> Result<Vec<f64>> {
    let interval = Interval::new(vec![a], vec![b])?;
    if depth > config.max_depth {
        tracing::warn!(depth, a, b, "recursion depth limit reached, interval abandoned");
        log.record(Disposition::DepthLimit, interval);
        return Ok(Vec::new());
    }

    let mut degree = 2;
    let mut current = interval_approximate_1d(f, a, b, degree)?;
    while degree <= config.max_degree_1d {
        let doubled = interval_approximate_1d(f, a, b, 2 * degree)?;
        let tail: f64 = doubled[degree + 1..].iter().map(|c| c.abs()).sum();
        if tail < config.approx_tol_1d {
            match series_roots(&current, config) {
                Ok(zeros) => {
                    let roots: Vec<f64> = good_zeros_1d(&zeros, config.imag_tol_1d)
                        .into_iter()
                        .map(|x| interval.transform_axis(0, x))
                        .collect();
                    tracing::debug!(a, b, degree, found = roots.len(), "1-d base case");
                    log.record(Disposition::BaseCase, interval);
                    return Ok(roots);
                }
                Err(e) if e.is_numerical() => {
                    tracing::trace!(error = %e, degree, "root finder failed, bisecting");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        current = doubled;
        degree *= 2;
    }

    let half = (b - a) / 2.0;
    let mut roots = subdivision_solve_1d(f, a, b - half, config, depth + 1, log)?;
    roots.extend(subdivision_solve_1d(f, a + half, b, config, depth + 1, log)?);
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(f: &dyn RealFunction, a: f64, b: f64) -> (Vec<f64>, IntervalLog) {
        let mut log = IntervalLog::new();
        let mut roots = subdivision_solve_1d(f, a, b, &SolverConfig::default(), 0, &mut log).unwrap();
        roots.sort_by(f64::total_cmp);
        (roots, log)
    }

    #[test]
    fn test_quadratic() {
        let f = |x: &[f64]| x[0] * x[0] - 1.0;
        let (roots, log) = solve(&f, -2.0, 2.0);
        assert_eq!(roots.len(), 2);
        assert!((roots[0] + 1.0).abs() < 1e-10);
        assert!((roots[1] - 1.0).abs() < 1e-10);
        assert_eq!(log.count(&Disposition::BaseCase), 1);
    }

    #[test]
    fn test_oscillating_function_bisects() {
        // sin(50x) on [0.01, 1] has roots kπ/50 for k = 1..=15
        let f = |x: &[f64]| (50.0 * x[0]).sin();
        let (roots, _) = solve(&f, 0.01, 1.0);
        assert_eq!(roots.len(), 15);
        for (k, r) in roots.iter().enumerate() {
            let expected = (k + 1) as f64 * std::f64::consts::PI / 50.0;
            assert!((r - expected).abs() < 1e-6, "{r} vs {expected}");
        }
    }

    #[test]
    fn test_no_roots() {
        let f = |x: &[f64]| x[0].exp();
        let (roots, _) = solve(&f, -1.0, 1.0);
        assert!(roots.is_empty());
    }

    #[test]
    fn test_good_zeros_1d() {
        let zeros = [
            Complex128::new(0.5, 0.0),
            Complex128::new(1.5, 0.0),
            Complex128::new(0.1, 1e-3),
        ];
        assert_eq!(good_zeros_1d(&zeros, 1e-10), vec![0.5]);
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        let f = |x: &[f64]| x[0];
        let mut log = IntervalLog::new();
        assert!(subdivision_solve_1d(&f, 1.0, 0.0, &SolverConfig::default(), 0, &mut log).is_err());
    }
}
