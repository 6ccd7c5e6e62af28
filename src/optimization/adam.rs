use std::collections::HashMap;

use super::{Optimizer, ParamId, optimizer::check_shapes};
use crate::{
    Result,
    tensor::{Tensor, TensorView, TensorViewMut},
};

/// First and second moment estimates of a single parameter tensor.
#[derive(Debug, Clone)]
struct Moments {
    beta1_t: f32,
    beta2_t: f32,
    v: Tensor,
    s: Tensor,
}

#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    moments: HashMap<ParamId, Moments>,
}

impl Adam {
    /// Creates a new `Adam` optimizer.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the amount of training per update.
    /// * `beta1`, `beta2`, `epsilon` - Hyperparameters to the optimization algorithm.
    ///
    /// # Returns
    /// A new `Adam` instance.
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            moments: HashMap::new(),
        }
    }
}

impl Optimizer for Adam {
    fn update_params(&mut self, id: ParamId, mut params: TensorViewMut, grad: TensorView) -> Result<()> {
        check_shapes(&params, &grad)?;

        let Self {
            learning_rate: lr,
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            ..
        } = *self;

        let moments = self.moments.entry(id).or_insert_with(|| Moments {
            beta1_t: 1.,
            beta2_t: 1.,
            v: Tensor::zeros(grad.raw_dim()),
            s: Tensor::zeros(grad.raw_dim()),
        });

        moments.beta1_t *= b1;
        moments.beta2_t *= b2;

        let bc1 = 1. - moments.beta1_t;
        let bc2 = 1. - moments.beta2_t;
        let step_size = lr * (bc2.sqrt() / bc1);

        moments.v.zip_mut_with(&grad, |v, &g| *v = b1 * *v + (1. - b1) * g);
        moments.s.zip_mut_with(&grad, |s, &g| *s = b2 * *s + (1. - b2) * g.powi(2));

        ndarray::Zip::from(&mut params)
            .and(&moments.v)
            .and(&moments.s)
            .for_each(|p, &v, &s| *p -= step_size * v / (s.sqrt() + eps));

        Ok(())
    }

    fn forget(&mut self, id: ParamId) {
        self.moments.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn first_step_has_learning_rate_length() {
        let mut optimizer = Adam::new(0.1, 0.9, 0.999, 1e-8);
        let mut params = array![1.0, 1.0].into_dyn();
        let grad = array![3.0, -0.5].into_dyn();

        optimizer.update_params(ParamId(0), params.view_mut(), grad.view()).unwrap();

        let params: Vec<f32> = params.iter().copied().collect();
        assert!((params[0] - 0.9).abs() < 1e-4);
        assert!((params[1] - 1.1).abs() < 1e-4);
    }

    #[test]
    fn forgotten_params_start_over() {
        let mut optimizer = Adam::new(0.1, 0.9, 0.999, 1e-8);
        let mut params = array![0.0].into_dyn();
        let grad = array![1.0].into_dyn();

        optimizer.update_params(ParamId(0), params.view_mut(), grad.view()).unwrap();
        optimizer.forget(ParamId(0));
        assert!(optimizer.moments.is_empty());

        let mut fresh = array![0.0].into_dyn();
        optimizer.update_params(ParamId(0), fresh.view_mut(), grad.view()).unwrap();
        assert_eq!(fresh, params);
    }
}
