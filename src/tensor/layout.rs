//! Layout: shape and row-major strides of a dense coefficient tensor

use super::shape::{STACK_DIMS, Shape};
use smallvec::SmallVec;
use std::fmt;

/// Strides type: element offsets between consecutive elements along each axis
/// NOTE: Strides are in ELEMENTS, not bytes
pub type Strides = SmallVec<[usize; STACK_DIMS]>;

/// Layout describes the memory layout of a tensor
///
/// Coefficient tensors are always stored contiguously in row-major order, so
/// the layout is fully determined by the shape. The address of the element at
/// indices `[i0, i1, ..., in]` is `i0 * strides[0] + ... + in * strides[n]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
}

impl Layout {
    /// Create a contiguous (row-major/C-order) layout from a shape
    ///
    /// # Example
    /// ```
    /// use rootr::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.shape(), &[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        let shape: Shape = shape.into();
        let strides = Self::compute_contiguous_strides(&shape);
        Self { shape, strides }
    }

    fn compute_contiguous_strides(shape: &[usize]) -> Strides {
        let mut strides: Strides = SmallVec::from_elem(0, shape.len());
        let mut stride = 1usize;

        // Compute strides from last dimension to first
        for (slot, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
            *slot = stride;
            stride *= dim;
        }

        strides
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the strides
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Number of dimensions (rank)
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.elem_count()
    }

    /// Compute the linear index (element offset) for given indices
    ///
    /// Returns `None` if the rank differs or any index is out of bounds.
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() {
            return None;
        }

        let mut linear = 0usize;
        for ((&idx, &dim), &stride) in indices
            .iter()
            .zip(self.shape.iter())
            .zip(self.strides.iter())
        {
            if idx >= dim {
                return None;
            }
            linear += idx * stride;
        }

        Some(linear)
    }

    /// Inverse of [`Layout::index`]: multi-index of a linear offset
    pub fn unravel(&self, mut linear: usize) -> Shape {
        let mut out = Shape::uniform(self.ndim(), 0);
        for (axis, &stride) in self.strides.iter().enumerate() {
            out[axis] = linear / stride;
            linear %= stride;
        }
        out
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contiguous_layout() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        assert_eq!(layout.shape(), &[2, 3, 4]);
        assert_eq!(layout.strides(), &[12, 4, 1]);
        assert_eq!(layout.elem_count(), 24);
        assert_eq!(layout.ndim(), 3);
    }

    #[test]
    fn test_index_and_unravel() {
        let layout = Layout::contiguous(&[2, 3, 4]);
        assert_eq!(layout.index(&[0, 0, 0]), Some(0));
        assert_eq!(layout.index(&[1, 2, 3]), Some(23));
        assert_eq!(layout.index(&[2, 0, 0]), None);
        assert_eq!(layout.index(&[0, 0]), None);

        for linear in 0..24 {
            let idx = layout.unravel(linear);
            assert_eq!(layout.index(&idx), Some(linear));
        }
    }

    #[test]
    fn test_scalar_layout() {
        let layout = Layout::contiguous(&[]);
        assert_eq!(layout.elem_count(), 1);
        assert_eq!(layout.index(&[]), Some(0));
    }
}
