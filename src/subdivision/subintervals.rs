//! Subdivision generator

use crate::checks::SubintervalCheck;
use crate::subdivision::interval::Interval;
use crate::subdivision::log::{Disposition, IntervalLog};
use crate::tensor::Tensor;

/// Inputs for pruning children before recursion
pub struct SubintervalFilter<'a> {
    /// Chebyshev coefficients of every function on the parent box
    pub coeffs: &'a [Tensor],
    /// Sign-change flags of every function, one per child
    pub sign_change: &'a [Vec<bool>],
    /// Checks applied in order
    pub checks: &'a [Box<dyn SubintervalCheck>],
    /// Slack handed to each check
    pub tol: f64,
}

/// Children of `interval` split along `axes`, optionally pruned
///
/// Without a filter every child is returned. With one, the same split is
/// applied to the reference box `[-1, 1]^n`, each check runs for each
/// function on the children still alive, and every child a check discards is
/// logged under that check's name (in absolute coordinates). Survivors are
/// returned in child order.
pub fn get_subintervals(
    interval: &Interval,
    axes: &[usize],
    ratio: f64,
    filter: Option<&SubintervalFilter<'_>>,
    log: &mut IntervalLog,
) -> Vec<Interval> {
    let children = interval.split(axes, ratio);
    let Some(filter) = filter else {
        return children;
    };

    let mut local = Interval::unit(interval.dim()).split(axes, ratio);
    let mut alive: Vec<usize> = (0..children.len()).collect();

    for check in filter.checks {
        for (coeffs, flags) in filter.coeffs.iter().zip(filter.sign_change) {
            if alive.is_empty() {
                return Vec::new();
            }
            let alive_flags: Vec<bool> = alive
                .iter()
                .map(|&i| flags.get(i).copied().unwrap_or(true))
                .collect();
            let keep = check.check(coeffs, &local, &alive_flags, filter.tol);

            let mut next_alive = Vec::with_capacity(alive.len());
            let mut next_local = Vec::with_capacity(local.len());
            for ((child, frame), kept) in alive.into_iter().zip(local).zip(keep) {
                if kept {
                    next_alive.push(child);
                    next_local.push(frame);
                } else {
                    tracing::trace!(check = check.name(), child, "child eliminated");
                    log.record(Disposition::SubintervalCheck(check.name()), children[child].clone());
                }
            }
            alive = next_alive;
            local = next_local;
        }
    }

    alive.into_iter().map(|i| children[i].clone()).collect()
}
