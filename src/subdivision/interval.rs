//! Axis-aligned search boxes

use crate::error::{Error, Result};

/// Closed axis-aligned box `[lower_0, upper_0] × ... × [lower_n, upper_n]`
///
/// Immutable once built; subdivision produces fresh values.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Interval {
    /// Build a box from its bounds
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if the bound vectors differ in length
    /// - `InvalidInterval` if a bound is not finite or `lower > upper`
    /// - `InvalidArgument` if the bounds are empty
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(Error::DimensionMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        if lower.is_empty() {
            return Err(Error::InvalidArgument {
                arg: "lower",
                reason: "a search box needs at least one axis".to_string(),
            });
        }
        for (axis, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(Error::InvalidInterval {
                    axis,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// The reference box `[-1, 1]^dim`
    pub fn unit(dim: usize) -> Self {
        Self {
            lower: vec![-1.0; dim],
            upper: vec![1.0; dim],
        }
    }

    /// Lower corner
    #[inline]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper corner
    #[inline]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Number of axes
    #[inline]
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Width along `axis`
    #[inline]
    pub fn width(&self, axis: usize) -> f64 {
        self.upper[axis] - self.lower[axis]
    }

    /// Map one coordinate from `[-1, 1]` to `[lower[axis], upper[axis]]`
    #[inline]
    pub fn transform_axis(&self, axis: usize, x: f64) -> f64 {
        let (a, b) = (self.lower[axis], self.upper[axis]);
        ((b - a) * x + (b + a)) / 2.0
    }

    /// Map a point of `[-1, 1]^dim` into this box
    pub fn transform(&self, point: &[f64]) -> Vec<f64> {
        point
            .iter()
            .enumerate()
            .map(|(axis, &x)| self.transform_axis(axis, x))
            .collect()
    }

    /// Map a box expressed in the `[-1, 1]^dim` frame of `self` to absolute
    /// coordinates
    pub fn transform_interval(&self, local: &Interval) -> Interval {
        Interval {
            lower: self.transform(&local.lower),
            upper: self.transform(&local.upper),
        }
    }

    /// Split along `axes` at `ratio` of the width
    ///
    /// Yields `2^axes.len()` children in binary counting order, the first
    /// listed axis most significant. A clear bit keeps the upper part
    /// `[a + ratio·w, b]`; a set bit keeps the lower part `[a, a + ratio·w]`.
    pub fn split(&self, axes: &[usize], ratio: f64) -> Vec<Interval> {
        let k = axes.len();
        (0..1usize << k)
            .map(|code| {
                let mut lower = self.lower.clone();
                let mut upper = self.upper.clone();
                for (pos, &axis) in axes.iter().enumerate() {
                    let cut = self.lower[axis] + ratio * self.width(axis);
                    if code >> (k - 1 - pos) & 1 == 0 {
                        lower[axis] = cut;
                    } else {
                        upper[axis] = cut;
                    }
                }
                Interval { lower, upper }
            })
            .collect()
    }

    /// Split along every axis
    pub fn split_all(&self, ratio: f64) -> Vec<Interval> {
        let axes: Vec<usize> = (0..self.dim()).collect();
        self.split(&axes, ratio)
    }

    /// Whether `point` lies in the box, widened by `slack` on every side
    pub fn contains(&self, point: &[f64], slack: f64) -> bool {
        point.len() == self.dim()
            && point
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(&x, (&lo, &hi))| x >= lo - slack && x <= hi + slack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subdivision::config::SPLIT_RATIO;

    #[test]
    fn test_validation() {
        assert!(matches!(
            Interval::new(vec![0.0, 0.0], vec![1.0]),
            Err(Error::DimensionMismatch { lower: 2, upper: 1 })
        ));
        assert!(matches!(
            Interval::new(vec![0.0, 2.0], vec![1.0, 1.0]),
            Err(Error::InvalidInterval { axis: 1, .. })
        ));
        assert!(Interval::new(vec![f64::NAN], vec![1.0]).is_err());
        assert!(Interval::new(vec![], vec![]).is_err());
        assert!(Interval::new(vec![1.0], vec![1.0]).is_ok());
    }

    #[test]
    fn test_transform_endpoints() {
        let b = Interval::new(vec![2.0, -4.0], vec![6.0, 0.0]).unwrap();
        assert_eq!(b.transform(&[-1.0, -1.0]), vec![2.0, -4.0]);
        assert_eq!(b.transform(&[1.0, 1.0]), vec![6.0, 0.0]);
        assert_eq!(b.transform(&[0.0, 0.5]), vec![4.0, -1.0]);
    }

    #[test]
    fn test_split_order() {
        let b = Interval::new(vec![0.0, 0.0], vec![1.0, 2.0]).unwrap();
        let children = b.split_all(SPLIT_RATIO);
        assert_eq!(children.len(), 4);

        let cx = SPLIT_RATIO;
        let cy = 2.0 * SPLIT_RATIO;
        // (upper, upper), (upper, lower), (lower, upper), (lower, lower)
        assert_eq!(children[0].lower(), &[cx, cy]);
        assert_eq!(children[0].upper(), &[1.0, 2.0]);
        assert_eq!(children[1].lower(), &[cx, 0.0]);
        assert_eq!(children[1].upper(), &[1.0, cy]);
        assert_eq!(children[2].lower(), &[0.0, cy]);
        assert_eq!(children[2].upper(), &[cx, 2.0]);
        assert_eq!(children[3].lower(), &[0.0, 0.0]);
        assert_eq!(children[3].upper(), &[cx, cy]);
    }

    #[test]
    fn test_split_covers_parent_volume() {
        let b = Interval::new(vec![-3.0, 1.0, 0.0], vec![2.0, 1.5, 7.0]).unwrap();
        let volume = |i: &Interval| (0..i.dim()).map(|a| i.width(a)).product::<f64>();
        let total: f64 = b.split_all(0.3).iter().map(volume).sum();
        assert!((total - volume(&b)).abs() < 1e-12);
    }

    #[test]
    fn test_split_subset_of_axes() {
        let b = Interval::unit(3);
        let children = b.split(&[2], 0.5);
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].lower(), &[-1.0, -1.0, 0.0]);
        assert_eq!(children[1].upper(), &[1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_transform_interval() {
        let parent = Interval::new(vec![0.0], vec![4.0]).unwrap();
        let local = Interval::new(vec![0.0], vec![1.0]).unwrap();
        let abs = parent.transform_interval(&local);
        assert_eq!(abs.lower(), &[2.0]);
        assert_eq!(abs.upper(), &[4.0]);
        assert!(abs.contains(&[3.0], 0.0));
        assert!(!abs.contains(&[1.9], 0.0));
    }
}
