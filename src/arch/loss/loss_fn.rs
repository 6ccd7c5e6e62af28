use crate::tensor::{Tensor, TensorView};

/// A differentiable objective comparing predictions against targets.
///
/// Both methods expect `y_pred` and `y` to share a shape, callers check it beforehand.
pub trait LossFn {
    /// Returns the scalar loss.
    fn loss(&self, y_pred: TensorView, y: TensorView) -> f32;

    /// Returns the gradient of the loss with respect to `y_pred`, shaped like `y_pred`.
    fn grads(&self, y_pred: TensorView, y: TensorView) -> Tensor;
}

impl<L: LossFn + ?Sized> LossFn for Box<L> {
    fn loss(&self, y_pred: TensorView, y: TensorView) -> f32 {
        (**self).loss(y_pred, y)
    }

    fn grads(&self, y_pred: TensorView, y: TensorView) -> Tensor {
        (**self).grads(y_pred, y)
    }
}
