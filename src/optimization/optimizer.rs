use crate::{Result, tensor::{TensorView, TensorViewMut}};

/// Identifies one parameter tensor inside an optimizer, so that stateful update rules
/// can keep their accumulators apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub(crate) usize);

impl ParamId {
    /// Returns the raw index of this id.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Defines the strategy for updating model parameters based on calculated gradients.
pub trait Optimizer {
    /// Updates `params` in place taking a step according to `grad`.
    ///
    /// # Arguments
    /// * `id` - The identity of the parameter tensor being updated.
    /// * `params` - The parameters to update.
    /// * `grad` - The gradient of the loss with respect to `params`.
    ///
    /// # Returns
    /// An error if `params` and `grad` do not share the same shape.
    fn update_params(&mut self, id: ParamId, params: TensorViewMut, grad: TensorView) -> Result<()>;

    /// Drops whatever state is kept for `id`, its parameters no longer exist.
    fn forget(&mut self, _id: ParamId) {}
}

impl<O: Optimizer + ?Sized> Optimizer for Box<O> {
    fn update_params(&mut self, id: ParamId, params: TensorViewMut, grad: TensorView) -> Result<()> {
        (**self).update_params(id, params, grad)
    }

    fn forget(&mut self, id: ParamId) {
        (**self).forget(id)
    }
}

/// Fails with a `ShapeMismatch` unless both tensors share a shape.
pub(super) fn check_shapes(params: &TensorViewMut, grad: &TensorView) -> Result<()> {
    if params.shape() != grad.shape() {
        return Err(crate::MlErr::shape("gradient", grad.shape(), params.shape()));
    }

    Ok(())
}
