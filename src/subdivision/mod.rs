//! Adaptive Chebyshev subdivision
//!
//! The solver approximates every function on a box by a tensor Chebyshev
//! series, certifies the approximation against one of twice the degree,
//! and then either discards the box, solves the small polynomial system
//! directly, or splits the box and recurses.
//!
//! - [`transform`] - Chebyshev interpolation via the FFT
//! - [`approximate`] - degree `d` vs `2d` quality gate and sign-change flags
//! - [`trim`] - coefficient trimming and elimination axis selection
//! - [`subintervals`] - box splitting with optional child pruning
//! - [`nd`] / [`one_d`] - the recursive drivers
//! - [`log`] - per-box dispositions for diagnostics

pub mod approximate;
pub mod config;
pub mod interval;
pub mod log;
pub mod nd;
pub mod one_d;
pub mod outcome;
pub mod subintervals;
pub mod transform;
pub mod trim;

mod solver;

pub use approximate::{GateOutcome, full_cheb_approximate};
pub use config::{SPLIT_RATIO, SolverConfig};
pub use interval::Interval;
pub use log::{Disposition, IntervalLog, IntervalStats, StatsRow};
pub use outcome::BoxOutcome;
pub use solver::{Solution, SubdivisionSolver, dedup_roots, solve, solve_1d};
