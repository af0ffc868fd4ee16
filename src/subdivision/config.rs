//! Solver configuration

/// Fraction of a box's width at which it is split, measured from the lower
/// bound. Not 1/2, so repeated splits never land on the box center.
pub const SPLIT_RATIO: f64 = 0.5139303900908738;

/// Tolerances and limits shared by the whole call tree
///
/// Passed by reference into every recursive call; never mutated during a
/// solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Largest accepted residual mass between the degree-d and degree-2d
    /// approximations
    pub approx_tol: f64,
    /// Largest total coefficient mass trimming may discard per function
    pub trim_tol: f64,
    /// Smallest corner coefficient magnitude that makes an elimination axis
    /// stable
    pub stability_tol: f64,
    /// Tolerance handed to the elimination solver
    pub solve_tol: f64,
    /// Largest imaginary part of an accepted N-D root
    pub imag_tol: f64,
    /// Slack beyond `[-1, 1]` for accepted N-D roots
    pub real_tol: f64,
    /// Largest high-order coefficient mass accepted by the 1-D driver
    pub approx_tol_1d: f64,
    /// Degree cap of the 1-D doubling loop before bisecting
    pub max_degree_1d: usize,
    /// 1-D degrees above this use the division root finder
    pub division_degree_1d: usize,
    /// Largest imaginary part of an accepted 1-D root
    pub imag_tol_1d: f64,
    /// Split position as a fraction of the box width
    pub split_ratio: f64,
    /// Deepest recursion level before a box is abandoned
    ///
    /// Every N-d split yields `2^dim` children, so the depth alone does not
    /// bound the work of a degenerate system whose solution set is a curve;
    /// [`SolverConfig::max_boxes`] does.
    pub max_depth: usize,
    /// Most boxes an N-d solve visits; later boxes are abandoned with a
    /// warning and contribute no roots
    pub max_boxes: usize,
    /// Approximation degree; `None` picks it from the dimension
    pub degree: Option<usize>,
    /// Merge returned roots closer than this in max-norm
    pub dedup_tol: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            approx_tol: 1e-4,
            trim_tol: 1e-5,
            stability_tol: 1e-5,
            solve_tol: 1e-8,
            imag_tol: 1e-5,
            real_tol: 1e-5,
            approx_tol_1d: 1e-3,
            max_degree_1d: 128,
            division_degree_1d: 75,
            imag_tol_1d: 1e-10,
            split_ratio: SPLIT_RATIO,
            max_depth: 64,
            max_boxes: 200_000,
            degree: None,
            dedup_tol: None,
        }
    }
}

impl SolverConfig {
    /// Sets the approximation quality tolerance.
    pub const fn with_approx_tol(mut self, tol: f64) -> Self {
        self.approx_tol = tol;
        self
    }

    /// Sets the trim tolerance.
    pub const fn with_trim_tol(mut self, tol: f64) -> Self {
        self.trim_tol = tol;
        self
    }

    /// Sets the stability tolerance used to pick the elimination axis.
    pub const fn with_stability_tol(mut self, tol: f64) -> Self {
        self.stability_tol = tol;
        self
    }

    /// Sets the elimination solver tolerance.
    pub const fn with_solve_tol(mut self, tol: f64) -> Self {
        self.solve_tol = tol;
        self
    }

    /// Sets the real and imaginary filters for N-D roots.
    pub const fn with_root_filter(mut self, imag_tol: f64, real_tol: f64) -> Self {
        self.imag_tol = imag_tol;
        self.real_tol = real_tol;
        self
    }

    /// Sets the 1-D acceptance tolerance and degree cap.
    pub const fn with_1d_limits(mut self, approx_tol: f64, max_degree: usize) -> Self {
        self.approx_tol_1d = approx_tol;
        self.max_degree_1d = max_degree;
        self
    }

    /// Sets the split ratio.
    pub const fn with_split_ratio(mut self, ratio: f64) -> Self {
        self.split_ratio = ratio;
        self
    }

    /// Sets the recursion depth limit.
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the box budget of an N-d solve.
    pub const fn with_max_boxes(mut self, boxes: usize) -> Self {
        self.max_boxes = boxes;
        self
    }

    /// Fixes the approximation degree instead of using the dimension table.
    pub const fn with_degree(mut self, degree: usize) -> Self {
        self.degree = Some(degree);
        self
    }

    /// Enables top-level deduplication of roots.
    pub const fn with_dedup_tol(mut self, tol: f64) -> Self {
        self.dedup_tol = Some(tol);
        self
    }

    /// Approximation degree for an N-dimensional solve
    pub fn degree_for_dim(&self, dim: usize) -> usize {
        if let Some(degree) = self.degree {
            return degree;
        }
        match dim {
            0..=2 => 5,
            3 => 4,
            4 => 3,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.approx_tol, 1e-4);
        assert_eq!(config.trim_tol, 1e-5);
        assert_eq!(config.max_degree_1d, 128);
        assert_eq!(config.split_ratio, SPLIT_RATIO);
        assert!(config.dedup_tol.is_none());
    }

    #[test]
    fn test_degree_table() {
        let config = SolverConfig::default();
        assert_eq!(config.degree_for_dim(2), 5);
        assert_eq!(config.degree_for_dim(3), 4);
        assert_eq!(config.degree_for_dim(4), 3);
        assert_eq!(config.degree_for_dim(7), 2);
        assert_eq!(config.with_degree(8).degree_for_dim(2), 8);
    }

    #[test]
    fn test_builders_chain() {
        let config = SolverConfig::default()
            .with_approx_tol(1e-6)
            .with_max_depth(10)
            .with_max_boxes(500)
            .with_dedup_tol(1e-8);
        assert_eq!(config.approx_tol, 1e-6);
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.max_boxes, 500);
        assert_eq!(config.dedup_tol, Some(1e-8));
    }
}
