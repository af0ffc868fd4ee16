//! Solver entry points

use crate::checks::{IntervalCheck, SubintervalCheck, default_interval_checks, default_subinterval_checks};
use crate::division::{EliminationSolver, MacaulayDivision};
use crate::error::Result;
use crate::function::RealFunction;
use crate::subdivision::config::SolverConfig;
use crate::subdivision::interval::Interval;
use crate::subdivision::log::IntervalLog;
use crate::subdivision::nd::{NdDriver, validate_system};
use crate::subdivision::one_d::subdivision_solve_1d;

/// Roots found by a solve, with the record of how every box was handled
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solution {
    /// Common roots, one coordinate vector each, in discovery order
    pub roots: Vec<Vec<f64>>,
    /// Disposition of every visited box
    pub log: IntervalLog,
}

/// Configurable subdivision solver
///
/// # Example
///
/// ```
/// use rootr::{SolverConfig, SubdivisionSolver};
///
/// let f = |p: &[f64]| p[0] * p[0] + p[1] * p[1] - 1.0;
/// let g = |p: &[f64]| p[0] - p[1];
/// let solution = SubdivisionSolver::new(SolverConfig::default())
///     .solve(&[&f, &g], &[-1.0, -1.0], &[1.0, 1.0])
///     .unwrap();
/// assert_eq!(solution.roots.len(), 2);
/// ```
pub struct SubdivisionSolver {
    config: SolverConfig,
    interval_checks: Vec<Box<dyn IntervalCheck>>,
    subinterval_checks: Vec<Box<dyn SubintervalCheck>>,
    elimination: Box<dyn EliminationSolver>,
}

impl Default for SubdivisionSolver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl SubdivisionSolver {
    /// Solver with the default check batteries and the Macaulay elimination
    /// solver
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            interval_checks: default_interval_checks(),
            subinterval_checks: default_subinterval_checks(),
            elimination: Box::new(MacaulayDivision),
        }
    }

    /// Replaces the box-level check battery.
    pub fn with_interval_checks(mut self, checks: Vec<Box<dyn IntervalCheck>>) -> Self {
        self.interval_checks = checks;
        self
    }

    /// Replaces the subinterval check battery.
    pub fn with_subinterval_checks(mut self, checks: Vec<Box<dyn SubintervalCheck>>) -> Self {
        self.subinterval_checks = checks;
        self
    }

    /// Replaces the elimination solver.
    pub fn with_elimination_solver(mut self, solver: Box<dyn EliminationSolver>) -> Self {
        self.elimination = solver;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Common roots of `funcs` in the box `[lower, upper]`
    ///
    /// A one-dimensional box with one function takes the univariate path.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` / `InvalidInterval` for malformed bounds,
    ///   reported before any function is evaluated
    /// - `FunctionCountMismatch` unless there is one function per axis
    pub fn solve(&self, funcs: &[&dyn RealFunction], lower: &[f64], upper: &[f64]) -> Result<Solution> {
        let interval = Interval::new(lower.to_vec(), upper.to_vec())?;
        let dim = interval.dim();
        validate_system(funcs.len(), dim)?;

        let mut solution = if dim == 1 {
            let mut log = IntervalLog::new();
            let roots = subdivision_solve_1d(funcs[0], lower[0], upper[0], &self.config, 0, &mut log)?;
            Solution {
                roots: roots.into_iter().map(|x| vec![x]).collect(),
                log,
            }
        } else {
            let driver = NdDriver::new(
                funcs,
                &self.config,
                &self.interval_checks,
                &self.subinterval_checks,
                self.elimination.as_ref(),
            );
            let (roots, log) = driver.solve_interval(&interval, 0)?;
            Solution { roots, log }
        };

        if let Some(tol) = self.config.dedup_tol {
            solution.roots = dedup_roots(solution.roots, tol);
        }
        tracing::debug!(dim, roots = solution.roots.len(), boxes = solution.log.total(), "solve finished");
        Ok(solution)
    }
}

/// Drop every root within `tol` (max-norm) of an earlier one
pub fn dedup_roots(roots: Vec<Vec<f64>>, tol: f64) -> Vec<Vec<f64>> {
    let mut kept: Vec<Vec<f64>> = Vec::with_capacity(roots.len());
    for root in roots {
        let duplicate = kept.iter().any(|k| {
            k.iter()
                .zip(&root)
                .all(|(a, b)| (a - b).abs() <= tol)
        });
        if !duplicate {
            kept.push(root);
        }
    }
    kept
}

/// Common roots of `funcs` in `[lower, upper]` with default settings
///
/// # Example
///
/// ```
/// let f = |p: &[f64]| p[0];
/// let g = |p: &[f64]| p[1];
/// let roots = rootr::solve(&[&f, &g], &[-1.0, -1.0], &[1.0, 1.0]).unwrap();
/// assert_eq!(roots.len(), 1);
/// ```
///
/// # Errors
///
/// See [`SubdivisionSolver::solve`].
pub fn solve(funcs: &[&dyn RealFunction], lower: &[f64], upper: &[f64]) -> Result<Vec<Vec<f64>>> {
    SubdivisionSolver::default()
        .solve(funcs, lower, upper)
        .map(|s| s.roots)
}

/// Roots of a univariate `f` in `[a, b]` with default settings
///
/// # Errors
///
/// `InvalidInterval` for reversed or non-finite bounds.
pub fn solve_1d(f: &dyn RealFunction, a: f64, b: f64) -> Result<Vec<f64>> {
    let mut log = IntervalLog::new();
    subdivision_solve_1d(f, a, b, &SolverConfig::default(), 0, &mut log)
}
