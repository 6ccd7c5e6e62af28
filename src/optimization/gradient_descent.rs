use super::{Optimizer, ParamId, optimizer::check_shapes};
use crate::{Result, tensor::{TensorView, TensorViewMut}};

/// Gradient descent optimization algorithm.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Creates a new `GradientDescent` optimizer.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `update_params`.
    ///
    /// # Returns
    /// A new `GradientDescent` instance.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    /// Makes a step in the opposite direction of the gradient, with a length of
    /// `learning_rate`.
    fn update_params(&mut self, _id: ParamId, mut params: TensorViewMut, grad: TensorView) -> Result<()> {
        check_shapes(&params, &grad)?;

        let lr = self.learning_rate;
        params.zip_mut_with(&grad, |p, &g| *p -= lr * g);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn, array};

    #[test]
    fn steps_against_the_gradient() {
        let mut optimizer = GradientDescent::new(0.5);
        let mut params = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let grad = array![[2.0, 0.0], [-2.0, 1.0]].into_dyn();

        optimizer
            .update_params(ParamId(0), params.view_mut(), grad.view())
            .unwrap();

        assert_eq!(params, array![[0.0, 2.0], [4.0, 3.5]].into_dyn());
    }

    #[test]
    fn mismatched_shapes_fail() {
        let mut optimizer = GradientDescent::new(0.5);
        let mut params = ArrayD::<f32>::zeros(IxDyn(&[2, 2]));
        let grad = ArrayD::<f32>::zeros(IxDyn(&[2]));

        let res = optimizer.update_params(ParamId(0), params.view_mut(), grad.view());
        assert!(res.is_err());
    }
}
