use crate::tensor::TensorView;

/// A scalar evaluation of predictions against targets. Unlike a `LossFn` it has no
/// gradient and is never trained on.
pub trait Metric {
    /// Returns the name this metric is registered with.
    fn name(&self) -> &'static str;

    fn measure(&self, y_pred: TensorView, y: TensorView) -> f32;
}

impl<M: Metric + ?Sized> Metric for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn measure(&self, y_pred: TensorView, y: TensorView) -> f32 {
        (**self).measure(y_pred, y)
    }
}
