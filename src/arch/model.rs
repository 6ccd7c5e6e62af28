use crate::{
    Result,
    tensor::{Tensor, TensorView},
};

/// Something that can be trained by a `Trainer`: a computation with a forward pass
/// producing predictions and a backward pass consuming the loss gradient.
pub trait Model {
    /// Prepares the model for use. Must be called before `forward` and `backward`, and
    /// again after any structural change.
    fn initialize(&mut self) -> Result<()>;

    /// Computes the model's output for the batch `x`.
    ///
    /// # Errors
    /// Returns `MlErr` if the model isn't initialized or `x` has the wrong shape.
    fn forward(&mut self, x: TensorView) -> Result<Tensor>;

    /// Propagates the gradient of the loss with respect to the last `forward` output,
    /// updating every trainable parameter on the way.
    ///
    /// # Errors
    /// Returns `MlErr` if there's no pending `forward` or `grads` has the wrong shape.
    fn backward(&mut self, grads: Tensor) -> Result<()>;
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }

    fn forward(&mut self, x: TensorView) -> Result<Tensor> {
        (**self).forward(x)
    }

    fn backward(&mut self, grads: Tensor) -> Result<()> {
        (**self).backward(grads)
    }
}
