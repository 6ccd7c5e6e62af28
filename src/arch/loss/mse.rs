use super::LossFn;
use crate::tensor::{Tensor, TensorView};

/// Mean squared error loss function.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mse;

impl Mse {
    /// Returns a new `Mse`.
    pub fn new() -> Self {
        Self
    }
}

impl LossFn for Mse {
    fn loss(&self, y_pred: TensorView, y: TensorView) -> f32 {
        (&y_pred - &y)
            .mapv(|x| x.powi(2))
            .mean()
            .unwrap_or_default()
    }

    fn grads(&self, y_pred: TensorView, y: TensorView) -> Tensor {
        (&y_pred - &y) * (2.0 / y_pred.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn loss_and_gradient() {
        let y_pred = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let y = array![[1.0, 0.0], [0.0, 4.0]].into_dyn();

        assert_eq!(Mse.loss(y_pred.view(), y.view()), 13.0 / 4.0);
        assert_eq!(
            Mse.grads(y_pred.view(), y.view()),
            array![[0.0, 1.0], [1.5, 0.0]].into_dyn()
        );
    }
}
