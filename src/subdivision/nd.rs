//! Recursive solve driver for systems of two or more variables
//!
//! Each box goes through one pass of:
//!
//! ```text
//! approximate ──insufficient──> subdivide (all children)
//!      │
//!    checks ────failed────────> eliminated
//!      │
//!    trim ──all linear────────> linear solve ──singular──> subdivide (checked)
//!      │
//!      ├──no stable axis──────> subdivide (checked)
//!      │
//!    eliminate ──failed───────> subdivide (checked)
//!      │
//!    roots
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::algorithm::linalg::{identity_matrix, lu_decompose};
use crate::checks::{IntervalCheck, SubintervalCheck};
use crate::division::EliminationSolver;
use crate::dtype::Complex128;
use crate::error::{Error, Result};
use crate::function::RealFunction;
use crate::subdivision::approximate::{GateOutcome, full_cheb_approximate};
use crate::subdivision::config::SolverConfig;
use crate::subdivision::interval::Interval;
use crate::subdivision::log::{Disposition, IntervalLog};
use crate::subdivision::outcome::BoxOutcome;
use crate::subdivision::subintervals::{SubintervalFilter, get_subintervals};
use crate::subdivision::trim::trim_coeffs;
use crate::tensor::{Shape, Tensor};

/// Everything a recursive call needs, shared read-only by the call tree
pub struct NdDriver<'a> {
    /// The system, one function per axis
    pub funcs: &'a [&'a dyn RealFunction],
    /// Tolerances and limits
    pub config: &'a SolverConfig,
    /// Box-level battery
    pub interval_checks: &'a [Box<dyn IntervalCheck>],
    /// Battery run on children before a checked subdivision
    pub subinterval_checks: &'a [Box<dyn SubintervalCheck>],
    /// Solver for the stabilized system
    pub elimination: &'a dyn EliminationSolver,
    /// Approximation degree per axis
    pub degree: usize,
    visited: AtomicUsize,
}

/// Keep roots whose coordinates are all real and inside the slightly
/// widened reference box, as real parts
pub fn good_zeros_nd(zeros: &[Vec<Complex128>], imag_tol: f64, real_tol: f64) -> Vec<Vec<f64>> {
    zeros
        .iter()
        .filter(|z| {
            z.iter()
                .all(|c| c.im.abs() < imag_tol && c.magnitude() <= 1.0 + real_tol)
        })
        .map(|z| z.iter().map(|c| c.re).collect())
        .collect()
}

/// Local solution of the linear system and the per-axis slack its face
/// test is allowed
///
/// Trimming perturbs every function by at most the coefficient mass it
/// discarded, `E_j`, so the root of the trimmed system may move by up to
/// `Σ_j |A⁻¹_ij| E_j` along axis `i`. A root on a box face can therefore land
/// just outside `[-1, 1]`; the slack is twice that bound.
fn linear_root(a: &[f64], b: &[f64], discarded: &[f64], dim: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    let lu = lu_decompose(a, dim)?;
    let z = lu.solve_vec(b)?;
    let inverse = lu.solve_matrix(&identity_matrix::<f64>(dim), dim)?;
    let slack = (0..dim)
        .map(|i| {
            2.0 * (0..dim)
                .map(|j| inverse[i * dim + j].abs() * discarded[j])
                .sum::<f64>()
        })
        .collect();
    Ok((z, slack))
}

impl<'a> NdDriver<'a> {
    /// Driver over `funcs` at the approximation degree `config` picks for
    /// the system's dimension
    pub fn new(
        funcs: &'a [&'a dyn RealFunction],
        config: &'a SolverConfig,
        interval_checks: &'a [Box<dyn IntervalCheck>],
        subinterval_checks: &'a [Box<dyn SubintervalCheck>],
        elimination: &'a dyn EliminationSolver,
    ) -> Self {
        Self {
            funcs,
            config,
            interval_checks,
            subinterval_checks,
            elimination,
            degree: config.degree_for_dim(funcs.len()),
            visited: AtomicUsize::new(0),
        }
    }

    /// Overrides the approximation degree
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Boxes visited so far
    pub fn visited(&self) -> usize {
        self.visited.load(Ordering::Relaxed)
    }

    fn all_axes(&self, interval: &Interval) -> Vec<usize> {
        (0..interval.dim()).collect()
    }

    fn subdivide_checked(
        &self,
        interval: &Interval,
        coeffs: &[Tensor],
        sign_change: &[Vec<bool>],
        log: &mut IntervalLog,
    ) -> BoxOutcome {
        let filter = SubintervalFilter {
            coeffs,
            sign_change,
            checks: self.subinterval_checks,
            tol: self.config.approx_tol,
        };
        let children = get_subintervals(
            interval,
            &self.all_axes(interval),
            self.config.split_ratio,
            Some(&filter),
            log,
        );
        BoxOutcome::SubdivideInto(children)
    }

    /// Decide what happens to one box
    ///
    /// Eliminations and solved boxes are recorded in `log`; children pruned
    /// by subinterval checks are recorded too.
    ///
    /// # Errors
    ///
    /// Only errors that are not numerical failures, such as a function
    /// returning the wrong number of samples, are propagated.
    pub fn classify(&self, interval: &Interval, log: &mut IntervalLog) -> Result<BoxOutcome> {
        let config = self.config;
        let dim = interval.dim();

        let mut coeffs = Vec::with_capacity(self.funcs.len());
        let mut sign_change = Vec::with_capacity(self.funcs.len());
        for f in self.funcs {
            match full_cheb_approximate(*f, interval, self.degree, config.approx_tol)? {
                GateOutcome::Insufficient => {
                    let children = get_subintervals(
                        interval,
                        &self.all_axes(interval),
                        config.split_ratio,
                        None,
                        log,
                    );
                    return Ok(BoxOutcome::SubdivideInto(children));
                }
                GateOutcome::Accepted {
                    coeffs: c,
                    sign_change: flags,
                } => {
                    coeffs.push(c);
                    sign_change.push(flags);
                }
            }
        }

        for (c, flags) in coeffs.iter().zip(&sign_change) {
            if flags.iter().any(|&s| s) {
                continue;
            }
            for check in self.interval_checks {
                if !check.check(c, config.approx_tol) {
                    tracing::debug!(check = check.name(), ?interval, "box eliminated");
                    log.record(Disposition::IntervalCheck(check.name()), interval.clone());
                    return Ok(BoxOutcome::Eliminated);
                }
            }
        }

        let (polys, axis) = trim_coeffs(coeffs.clone(), config.trim_tol, config.stability_tol)?;

        if polys.iter().all(|p| p.degree() == 1) {
            let mut a = vec![0.0; dim * dim];
            let mut b = vec![0.0; dim];
            for (row, p) in polys.iter().enumerate() {
                let mut spot = Shape::uniform(dim, 0);
                b[row] = -p.coeff(&spot);
                for col in 0..dim {
                    spot[col] = 1;
                    a[row * dim + col] = p.coeff(&spot);
                    spot[col] = 0;
                }
            }
            let discarded: Vec<f64> = coeffs
                .iter()
                .zip(&polys)
                .map(|(c, p)| (c.abs_sum() - p.coeffs().abs_sum()).max(0.0))
                .collect();
            return match linear_root(&a, &b, &discarded, dim) {
                Ok((z, slack)) => {
                    log.record(Disposition::BaseCase, interval.clone());
                    if z.iter().zip(&slack).all(|(v, s)| v.abs() <= 1.0 + config.real_tol + s) {
                        let point = interval.transform(&z);
                        tracing::debug!(?point, "linear base case");
                        Ok(BoxOutcome::LinearSolution(point))
                    } else {
                        tracing::trace!(?z, ?slack, "linear solution outside box");
                        Ok(BoxOutcome::Eliminated)
                    }
                }
                Err(e) if e.is_numerical() => {
                    tracing::trace!(error = %e, "linear base case failed");
                    Ok(self.subdivide_checked(interval, &coeffs, &sign_change, log))
                }
                Err(e) => Err(e),
            };
        }

        let Some(axis) = axis else {
            return Ok(self.subdivide_checked(interval, &coeffs, &sign_change, log));
        };

        match self.elimination.solve(&polys, axis, config.solve_tol) {
            Ok(zeros) => {
                let roots: Vec<Vec<f64>> = good_zeros_nd(&zeros, config.imag_tol, config.real_tol)
                    .iter()
                    .map(|z| interval.transform(z))
                    .collect();
                tracing::debug!(axis, found = roots.len(), candidates = zeros.len(), "division solve");
                log.record(Disposition::Division, interval.clone());
                Ok(BoxOutcome::DivisionSolutions(roots))
            }
            Err(e) if e.is_numerical() => {
                tracing::trace!(error = %e, "division failed, subdividing");
                Ok(self.subdivide_checked(interval, &coeffs, &sign_change, log))
            }
            Err(e) => Err(e),
        }
    }

    /// Roots of the system in `interval` and the log of its call tree
    ///
    /// # Errors
    ///
    /// Propagates the non-numerical errors of [`NdDriver::classify`].
    pub fn solve_interval(&self, interval: &Interval, depth: usize) -> Result<(Vec<Vec<f64>>, IntervalLog)> {
        let mut log = IntervalLog::new();
        if self.visited.fetch_add(1, Ordering::Relaxed) >= self.config.max_boxes {
            tracing::warn!(max_boxes = self.config.max_boxes, ?interval, "box budget exhausted, box abandoned");
            log.record(Disposition::BoxLimit, interval.clone());
            return Ok((Vec::new(), log));
        }
        if depth > self.config.max_depth {
            tracing::warn!(depth, ?interval, "recursion depth limit reached, box abandoned");
            log.record(Disposition::DepthLimit, interval.clone());
            return Ok((Vec::new(), log));
        }

        match self.classify(interval, &mut log)? {
            BoxOutcome::Eliminated => Ok((Vec::new(), log)),
            BoxOutcome::LinearSolution(point) => Ok((vec![point], log)),
            BoxOutcome::DivisionSolutions(points) => Ok((points, log)),
            BoxOutcome::SubdivideInto(children) => {
                let mut roots = Vec::new();
                for (child_roots, child_log) in self.solve_children(&children, depth + 1)? {
                    roots.extend(child_roots);
                    log.merge(child_log);
                }
                Ok((roots, log))
            }
        }
    }

    #[cfg(feature = "rayon")]
    fn solve_children(
        &self,
        children: &[Interval],
        depth: usize,
    ) -> Result<Vec<(Vec<Vec<f64>>, IntervalLog)>> {
        use rayon::prelude::*;

        children
            .par_iter()
            .map(|child| self.solve_interval(child, depth))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn solve_children(
        &self,
        children: &[Interval],
        depth: usize,
    ) -> Result<Vec<(Vec<Vec<f64>>, IntervalLog)>> {
        children
            .iter()
            .map(|child| self.solve_interval(child, depth))
            .collect()
    }
}

/// Checks that the system is square before any evaluation
pub(crate) fn validate_system(functions: usize, dim: usize) -> Result<()> {
    if functions != dim {
        return Err(Error::FunctionCountMismatch { functions, dim });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{default_interval_checks, default_subinterval_checks};
    use crate::division::MacaulayDivision;

    fn run(funcs: &[&dyn RealFunction], interval: &Interval) -> (Vec<Vec<f64>>, IntervalLog) {
        let config = SolverConfig::default();
        let interval_checks = default_interval_checks();
        let subinterval_checks = default_subinterval_checks();
        let driver = NdDriver::new(funcs, &config, &interval_checks, &subinterval_checks, &MacaulayDivision);
        driver.solve_interval(interval, 0).unwrap()
    }

    #[test]
    fn test_good_zeros_filter() {
        let zeros = vec![
            vec![Complex128::new(0.5, 0.0), Complex128::new(-1.000001, 1e-7)],
            vec![Complex128::new(0.5, 1e-3), Complex128::new(0.0, 0.0)],
            vec![Complex128::new(1.1, 0.0), Complex128::new(0.0, 0.0)],
        ];
        let good = good_zeros_nd(&zeros, 1e-5, 1e-5);
        assert_eq!(good, vec![vec![0.5, -1.000001]]);
    }

    #[test]
    fn test_linear_shortcut() {
        let f = |p: &[f64]| p[0] - 0.25;
        let g = |p: &[f64]| p[0] + p[1];
        let (roots, log) = run(&[&f, &g], &Interval::unit(2));
        assert_eq!(roots.len(), 1);
        assert!((roots[0][0] - 0.25).abs() < 1e-12);
        assert!((roots[0][1] + 0.25).abs() < 1e-12);
        assert_eq!(log.count(&Disposition::BaseCase), 1);
        assert_eq!(log.total(), 1);
    }

    #[test]
    fn test_constant_function_eliminated_immediately() {
        let f = |_: &[f64]| 5.0;
        let g = |p: &[f64]| p[1];
        let (roots, log) = run(&[&f, &g], &Interval::unit(2));
        assert!(roots.is_empty());
        assert_eq!(log.count(&Disposition::IntervalCheck("constant_term_check")), 1);
        assert_eq!(log.total(), 1);
    }

    #[test]
    fn test_classify_requests_subdivision_for_rough_function() {
        let config = SolverConfig::default();
        let f = |p: &[f64]| (30.0 * p[0]).sin();
        let g = |p: &[f64]| p[1];
        let funcs: [&dyn RealFunction; 2] = [&f, &g];
        let driver = NdDriver::new(&funcs, &config, &[], &[], &MacaulayDivision).with_degree(5);
        let mut log = IntervalLog::new();
        let outcome = driver.classify(&Interval::unit(2), &mut log).unwrap();
        assert!(outcome.is_subdivision());
        assert!(outcome.roots().is_empty());
        match outcome {
            BoxOutcome::SubdivideInto(children) => assert_eq!(children.len(), 4),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_depth_limit() {
        let config = SolverConfig::default().with_max_depth(1);
        let f = |p: &[f64]| (40.0 * p[0]).sin();
        let g = |p: &[f64]| (40.0 * p[1]).cos();
        let funcs: [&dyn RealFunction; 2] = [&f, &g];
        let driver = NdDriver::new(&funcs, &config, &[], &[], &MacaulayDivision).with_degree(5);
        let (roots, log) = driver.solve_interval(&Interval::unit(2), 0).unwrap();
        assert!(roots.is_empty());
        // depth 0 and 1 subdivide, depth 2 hits the limit: 4 × 4 boxes
        assert_eq!(log.count(&Disposition::DepthLimit), 16);
    }

    #[test]
    fn test_singular_linear_system_subdivides() {
        let config = SolverConfig::default();
        let interval_checks = default_interval_checks();
        let subinterval_checks = default_subinterval_checks();
        let f = |p: &[f64]| p[0] - p[1];
        let twice = |p: &[f64]| 2.0 * (p[0] - p[1]);

        let same: [&dyn RealFunction; 2] = [&f, &f];
        let parallel: [&dyn RealFunction; 2] = [&f, &twice];
        for funcs in [&same, &parallel] {
            let driver = NdDriver::new(funcs, &config, &interval_checks, &subinterval_checks, &MacaulayDivision);
            let mut log = IntervalLog::new();
            let outcome = driver.classify(&Interval::unit(2), &mut log).unwrap();
            assert!(outcome.is_subdivision(), "got {outcome:?}");
            assert_eq!(log.count(&Disposition::BaseCase), 0);
        }
    }

    #[test]
    fn test_linear_root_on_box_face_kept() {
        // (-1, 0) sits on the left face; the trimmed circle puts the local
        // solution just past -1
        let config = SolverConfig::default();
        let interval_checks = default_interval_checks();
        let subinterval_checks = default_subinterval_checks();
        let f = |p: &[f64]| p[0] * p[0] + p[1] * p[1] - 1.0;
        let g = |p: &[f64]| p[1];
        let funcs: [&dyn RealFunction; 2] = [&f, &g];
        let driver = NdDriver::new(&funcs, &config, &interval_checks, &subinterval_checks, &MacaulayDivision);

        let interval = Interval::new(vec![-1.0, -2.78e-5], vec![-0.99499, 0.00376]).unwrap();
        let mut log = IntervalLog::new();
        match driver.classify(&interval, &mut log).unwrap() {
            BoxOutcome::LinearSolution(point) => {
                assert!((point[0] + 1.0).abs() < 1e-5, "x = {}", point[0]);
                assert!(point[1].abs() < 1e-5, "y = {}", point[1]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(log.count(&Disposition::BaseCase), 1);
    }

    #[test]
    fn test_linear_root_far_outside_eliminated() {
        let f = |p: &[f64]| p[0] + p[1] - 1.5;
        let g = |p: &[f64]| p[0] - p[1] - 1.5;
        let (roots, log) = run(&[&f, &g], &Interval::unit(2));
        assert!(roots.is_empty());
        assert_eq!(log.count(&Disposition::BaseCase), 1);
        assert_eq!(log.total(), 1);
    }

    #[test]
    fn test_linear_slack_follows_discarded_mass() {
        let a = [2.0, 0.0, 0.0, 0.5];
        let b = [1.0, 0.5];
        let (z, slack) = linear_root(&a, &b, &[1e-6, 1e-6], 2).unwrap();
        assert!((z[0] - 0.5).abs() < 1e-15);
        assert!((z[1] - 1.0).abs() < 1e-15);
        assert!((slack[0] - 1e-6).abs() < 1e-18);
        assert!((slack[1] - 4e-6).abs() < 1e-18);

        let (_, exact) = linear_root(&a, &b, &[0.0, 0.0], 2).unwrap();
        assert_eq!(exact, vec![0.0, 0.0]);
    }

    #[test]
    fn test_box_budget() {
        let config = SolverConfig::default().with_max_boxes(5);
        let f = |p: &[f64]| (40.0 * p[0]).sin();
        let g = |p: &[f64]| (40.0 * p[1]).cos();
        let funcs: [&dyn RealFunction; 2] = [&f, &g];
        let driver = NdDriver::new(&funcs, &config, &[], &[], &MacaulayDivision).with_degree(5);
        let (roots, log) = driver.solve_interval(&Interval::unit(2), 0).unwrap();
        assert!(roots.is_empty());
        assert!(log.count(&Disposition::BoxLimit) >= 1);
        assert_eq!(log.count(&Disposition::DepthLimit), 0);
        // every box past the budget is visited once and abandoned at once
        assert_eq!(log.count(&Disposition::BoxLimit), driver.visited() - 5);
    }

    #[test]
    fn test_validate_system() {
        assert!(validate_system(2, 2).is_ok());
        assert!(matches!(
            validate_system(1, 2),
            Err(Error::FunctionCountMismatch { functions: 1, dim: 2 })
        ));
    }
}
