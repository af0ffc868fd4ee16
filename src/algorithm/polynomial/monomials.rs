//! Enumeration of exponent multi-indices

use crate::tensor::Shape;

/// All multi-indices `α` with `|α| = degree` and `α_i < shape[i]`
///
/// Ordered lexicographically with the first axis slowest, so the result is
/// deterministic. An empty shape yields nothing.
pub fn mon_combos_limited(degree: usize, shape: &[usize]) -> Vec<Shape> {
    let mut out = Vec::new();
    if shape.is_empty() {
        return out;
    }
    let mut current = Shape::uniform(shape.len(), 0);
    fill_limited(&mut current, 0, degree, shape, &mut out);
    out
}

fn fill_limited(
    current: &mut Shape,
    axis: usize,
    remaining: usize,
    shape: &[usize],
    out: &mut Vec<Shape>,
) {
    if axis + 1 == shape.len() {
        if remaining < shape[axis] {
            current[axis] = remaining;
            out.push(current.clone());
            current[axis] = 0;
        }
        return;
    }
    for i in 0..shape[axis].min(remaining + 1) {
        current[axis] = i;
        fill_limited(current, axis + 1, remaining - i, shape, out);
    }
    current[axis] = 0;
}

/// All multi-indices in `dim` variables with `|α| = degree`
pub fn monomials_of_degree(dim: usize, degree: usize) -> Vec<Shape> {
    mon_combos_limited(degree, &vec![degree + 1; dim])
}

/// All multi-indices in `dim` variables with `|α| <= max_degree`, graded
///
/// Degree 0 first, then degree 1, and so on.
pub fn monomials_up_to(dim: usize, max_degree: usize) -> Vec<Shape> {
    (0..=max_degree)
        .flat_map(|d| monomials_of_degree(dim, d))
        .collect()
}

/// Number of multi-indices in `dim` variables with `|α| <= degree`
///
/// Equals the binomial coefficient `C(degree + dim, dim)`.
pub fn count_up_to(dim: usize, degree: usize) -> usize {
    let mut acc = 1usize;
    for i in 1..=dim {
        acc = acc * (degree + i) / i;
    }
    acc
}
