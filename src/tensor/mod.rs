//! Tensor types and operations
//!
//! This module provides the dense coefficient [`Tensor`] used throughout the
//! solver, together with its [`Layout`] and [`Shape`] helpers.

mod core;
mod layout;
mod shape;

pub use core::{MultiIndexIter, Tensor};
pub use layout::{Layout, Strides};
pub use shape::Shape;
