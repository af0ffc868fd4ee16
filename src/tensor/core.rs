//! Core tensor type

use super::Layout;
use super::shape::Shape;
use crate::error::{Error, Result};
use std::fmt;

/// Dense n-dimensional array of `f64` in row-major order
///
/// `Tensor` is the storage for Chebyshev (or power basis) coefficient
/// tensors: entry `[i0, i1, ..., in]` is the coefficient of
/// `T_i0(x0) * T_i1(x1) * ... * T_in(xn)`. Index 0 along every axis is the
/// constant mode.
///
/// Tensors are owned values. Operations that change the shape, such as
/// [`Tensor::narrow_top`], copy into a new buffer instead of aliasing.
#[derive(Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f64>,
    layout: Layout,
}

impl Tensor {
    // ===== Constructors =====

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize]) -> Self {
        let layout = Layout::contiguous(shape);
        Self {
            data: vec![0.0; layout.elem_count()],
            layout,
        }
    }

    /// Create a tensor from a row-major data vector
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if `data.len()` differs from the element count
    /// of `shape`.
    pub fn from_vec(data: Vec<f64>, shape: &[usize]) -> Result<Self> {
        let layout = Layout::contiguous(shape);
        if data.len() != layout.elem_count() {
            return Err(Error::ShapeMismatch {
                expected: vec![layout.elem_count()],
                got: vec![data.len()],
            });
        }
        Ok(Self { data, layout })
    }

    /// Create a tensor whose entries are computed from their multi-index
    pub fn from_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> f64,
    {
        let mut out = Self::zeros(shape);
        for (slot, idx) in out.data.iter_mut().zip(MultiIndexIter::new(shape)) {
            *slot = f(&idx);
        }
        out
    }

    // ===== Accessors =====

    /// Get the layout
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Row-major data
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major data
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Entry at a multi-index, `None` when out of bounds
    #[inline]
    pub fn get(&self, indices: &[usize]) -> Option<f64> {
        self.layout.index(indices).map(|i| self.data[i])
    }

    /// Entry at a multi-index, treating out-of-bounds entries as zero
    ///
    /// Coefficient tensors are truncated series, so anything outside the
    /// stored block is an exact zero.
    #[inline]
    pub fn get_or_zero(&self, indices: &[usize]) -> f64 {
        self.get(indices).unwrap_or(0.0)
    }

    /// Set the entry at a multi-index
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the index is out of bounds.
    pub fn set(&mut self, indices: &[usize], value: f64) -> Result<()> {
        let i = self
            .layout
            .index(indices)
            .ok_or_else(|| Error::InvalidArgument {
                arg: "indices",
                reason: format!("{:?} out of bounds for shape {:?}", indices, self.shape()),
            })?;
        self.data[i] = value;
        Ok(())
    }

    /// Iterate multi-indices in storage order
    pub fn indices(&self) -> MultiIndexIter {
        MultiIndexIter::new(self.shape())
    }

    // ===== Block operations =====

    /// Copy of the leading block `[0, extents[i])` along every axis
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the rank differs or any extent exceeds the
    /// current shape.
    pub fn narrow_top(&self, extents: &[usize]) -> Result<Self> {
        if extents.len() != self.ndim() || extents.iter().zip(self.shape()).any(|(e, s)| e > s) {
            return Err(Error::ShapeMismatch {
                expected: self.shape().to_vec(),
                got: extents.to_vec(),
            });
        }
        Ok(Self::from_fn(extents, |idx| {
            // In bounds by the check above
            self.get_or_zero(idx)
        }))
    }

    /// Subtract `other` from the leading block of `self`
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if `other` does not fit inside `self`.
    pub fn sub_assign_top(&mut self, other: &Tensor) -> Result<()> {
        if other.ndim() != self.ndim() || other.shape().iter().zip(self.shape()).any(|(o, s)| o > s)
        {
            return Err(Error::ShapeMismatch {
                expected: self.shape().to_vec(),
                got: other.shape().to_vec(),
            });
        }
        for (idx, &value) in other.indices().zip(other.data.iter()) {
            if let Some(i) = self.layout.index(&idx) {
                self.data[i] -= value;
            }
        }
        Ok(())
    }

    // ===== Reductions =====

    /// Sum of absolute values of all entries
    pub fn abs_sum(&self) -> f64 {
        self.data.iter().map(|v| v.abs()).sum()
    }

    /// Zero every entry whose magnitude is below `tol`
    pub fn clean_zeros(&mut self, tol: f64) {
        for v in self.data.iter_mut() {
            if v.abs() < tol {
                *v = 0.0;
            }
        }
    }

    /// Apply `f` to every entry in place
    pub fn map_inplace<F: FnMut(f64) -> f64>(&mut self, mut f: F) {
        for v in self.data.iter_mut() {
            *v = f(*v);
        }
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("data", &self.data)
            .finish()
    }
}

/// Row-major iterator over all multi-indices of a shape
///
/// The last axis varies fastest. A zero extent on any axis yields nothing;
/// a rank-0 shape yields the single empty index.
#[derive(Clone, Debug)]
pub struct MultiIndexIter {
    shape: Shape,
    current: Option<Shape>,
}

impl MultiIndexIter {
    /// Iterate all indices of `shape`
    pub fn new(shape: &[usize]) -> Self {
        let current = if shape.contains(&0) {
            None
        } else {
            Some(Shape::uniform(shape.len(), 0))
        };
        Self {
            shape: shape.into(),
            current,
        }
    }
}

impl Iterator for MultiIndexIter {
    type Item = Shape;

    fn next(&mut self) -> Option<Shape> {
        let out = self.current.clone()?;

        // Advance like an odometer
        let mut next = out.clone();
        let mut axis = next.ndim();
        loop {
            if axis == 0 {
                self.current = None;
                break;
            }
            axis -= 1;
            next[axis] += 1;
            if next[axis] < self.shape[axis] {
                self.current = Some(next);
                break;
            }
            next[axis] = 0;
        }

        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_shape_check() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        assert_eq!(t.shape(), &[2, 3]);
        assert_eq!(t.get(&[1, 2]), Some(6.0));
        assert_eq!(t.get(&[2, 0]), None);
        assert_eq!(t.get_or_zero(&[5, 5]), 0.0);

        let err = Tensor::from_vec(vec![1.0, 2.0], &[2, 3]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_multi_index_order() {
        let idx: Vec<Vec<usize>> = MultiIndexIter::new(&[2, 2])
            .map(|s| s.to_vec())
            .collect();
        assert_eq!(idx, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);

        assert_eq!(MultiIndexIter::new(&[3, 0]).count(), 0);
        assert_eq!(MultiIndexIter::new(&[]).count(), 1);
    }

    #[test]
    fn test_narrow_top() {
        let t = Tensor::from_fn(&[3, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let n = t.narrow_top(&[2, 2]).unwrap();
        assert_eq!(n.as_slice(), &[0.0, 1.0, 3.0, 4.0]);
        assert!(t.narrow_top(&[4, 1]).is_err());
    }

    #[test]
    fn test_sub_assign_top_and_clean() {
        let mut big = Tensor::from_fn(&[3, 3], |_| 1.0);
        let small = Tensor::from_fn(&[2, 2], |_| 1.0);
        big.sub_assign_top(&small).unwrap();
        assert_eq!(big.abs_sum(), 5.0);

        big.map_inplace(|v| v * 1e-20);
        big.clean_zeros(1e-16);
        assert_eq!(big.abs_sum(), 0.0);
    }
}
