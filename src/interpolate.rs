//! Scattered-data surrogate models. Noisy, irregular samples are first fit with a smoothing
//! radial basis function regressor, which is then resampled onto a tensor grid of knots. The
//! grid is what gets evaluated, through a C¹ tensor-product cubic Hermite interpolant, so the
//! fitted model is cheap to evaluate, differentiable, and serializable.

mod grid;
mod rbf;
mod unstructured;

pub use grid::TensorGrid;
pub use rbf::{RbfInterpolator, RbfSettings};
pub use unstructured::{Axis, UnstructuredModel};
