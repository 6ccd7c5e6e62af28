//! The data flowing through the network.
//!
//! Every tensor keeps the samples on its first axis. A *shape* in this crate is the
//! per-sample shape, that is, the tensor's shape without that leading axis.

use ndarray::{ArrayBase, ArrayD, ArrayViewD, ArrayViewMutD, Data, IxDyn};

/// An n-dimensional array of `f32`, the only type that flows between layers.
pub type Tensor = ArrayD<f32>;

/// A borrowed `Tensor`.
pub type TensorView<'a> = ArrayViewD<'a, f32>;

/// A mutably borrowed `Tensor`.
pub type TensorViewMut<'a> = ArrayViewMutD<'a, f32>;

/// The shape of a single sample.
pub type Shape = Vec<usize>;

/// Returns the per-sample shape of a batched tensor.
pub fn sample_shape<S: Data<Elem = f32>>(x: &ArrayBase<S, IxDyn>) -> &[usize] {
    x.shape().get(1..).unwrap_or_default()
}

/// Returns the amount of scalars in a single sample of the given shape.
pub fn volume(shape: &[usize]) -> usize {
    shape.iter().product()
}
