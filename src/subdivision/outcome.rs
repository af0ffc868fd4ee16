//! Per-box outcome of the N-dimensional driver

use crate::subdivision::interval::Interval;

/// What one box contributes to the solve
///
/// Produced by classifying a box, consumed by the recursion.
#[derive(Clone, Debug, PartialEq)]
pub enum BoxOutcome {
    /// Provably or numerically root-free
    Eliminated,
    /// The unique root of a linear system, in absolute coordinates
    LinearSolution(Vec<f64>),
    /// Real roots from the elimination solver, in absolute coordinates
    DivisionSolutions(Vec<Vec<f64>>),
    /// Recurse into these children and concatenate their roots
    SubdivideInto(Vec<Interval>),
}

impl BoxOutcome {
    /// Roots contributed directly by this box
    pub fn roots(&self) -> &[Vec<f64>] {
        match self {
            BoxOutcome::LinearSolution(point) => std::slice::from_ref(point),
            BoxOutcome::DivisionSolutions(points) => points,
            BoxOutcome::Eliminated | BoxOutcome::SubdivideInto(_) => &[],
        }
    }

    /// Whether the box still needs work
    pub fn is_subdivision(&self) -> bool {
        matches!(self, BoxOutcome::SubdivideInto(_))
    }
}
