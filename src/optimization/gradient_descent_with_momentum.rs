use std::collections::HashMap;

use super::{Optimizer, ParamId, optimizer::check_shapes};
use crate::{
    Result,
    tensor::{Tensor, TensorView, TensorViewMut},
};

#[derive(Debug, Clone)]
pub struct GradientDescentWithMomentum {
    learning_rate: f32,
    momentum: f32,
    velocity: HashMap<ParamId, Tensor>,
}

impl GradientDescentWithMomentum {
    /// Creates a new `GradientDescentWithMomentum` optimizer.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    /// * `momentum` - Hyperparameter to the optimization algorithm.
    ///
    /// # Returns
    /// A new `GradientDescentWithMomentum` instance.
    pub fn new(learning_rate: f32, momentum: f32) -> Self {
        Self {
            learning_rate,
            momentum,
            velocity: HashMap::new(),
        }
    }
}

impl Optimizer for GradientDescentWithMomentum {
    fn update_params(&mut self, id: ParamId, mut params: TensorViewMut, grad: TensorView) -> Result<()> {
        check_shapes(&params, &grad)?;

        let lr = self.learning_rate;
        let mu = self.momentum;

        let velocity = self
            .velocity
            .entry(id)
            .or_insert_with(|| Tensor::zeros(grad.raw_dim()));

        velocity.zip_mut_with(&grad, |v, &g| *v = (mu * *v) + g);
        params.zip_mut_with(&*velocity, |p, &v| *p -= lr * v);

        Ok(())
    }

    fn forget(&mut self, id: ParamId) {
        self.velocity.remove(&id);
    }
}
