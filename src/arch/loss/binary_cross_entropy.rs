use super::LossFn;
use crate::tensor::{Tensor, TensorView};

/// Binary cross entropy over probabilities in `(0, 1)`, averaged over every entry.
///
/// Predictions are clamped to `[eps, 1 - eps]` so that saturated outputs stay finite.
#[derive(Debug, Clone, Copy)]
pub struct BinaryCrossEntropy {
    eps: f32,
}

impl BinaryCrossEntropy {
    pub fn new(eps: f32) -> Self {
        Self { eps }
    }

    fn clamp(&self, p: f32) -> f32 {
        p.clamp(self.eps, 1. - self.eps)
    }
}

impl Default for BinaryCrossEntropy {
    fn default() -> Self {
        Self::new(1e-7)
    }
}

impl LossFn for BinaryCrossEntropy {
    fn loss(&self, y_pred: TensorView, y: TensorView) -> f32 {
        let mut total = 0.;
        ndarray::Zip::from(&y_pred).and(&y).for_each(|&p, &t| {
            let p = self.clamp(p);
            total -= t * p.ln() + (1. - t) * (1. - p).ln();
        });

        if y_pred.is_empty() {
            return 0.;
        }

        total / y_pred.len() as f32
    }

    fn grads(&self, y_pred: TensorView, y: TensorView) -> Tensor {
        let n = y_pred.len() as f32;

        ndarray::Zip::from(&y_pred)
            .and(&y)
            .map_collect(|&p, &t| {
                let p = self.clamp(p);
                (p - t) / (p * (1. - p)) / n
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn confident_right_answers_cost_little() {
        let bce = BinaryCrossEntropy::default();
        let y = array![[1.0], [0.0]].into_dyn();

        let good = bce.loss(array![[0.99], [0.01]].into_dyn().view(), y.view());
        let bad = bce.loss(array![[0.01], [0.99]].into_dyn().view(), y.view());

        assert!(good < 0.02);
        assert!(bad > 4.);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let bce = BinaryCrossEntropy::default();
        let y = array![[1.0]].into_dyn();
        let p = 0.3;
        let h = 1e-3;

        let up = bce.loss(array![[p + h]].into_dyn().view(), y.view());
        let down = bce.loss(array![[p - h]].into_dyn().view(), y.view());
        let numeric = (up - down) / (2. * h);
        let analytic = bce.grads(array![[p]].into_dyn().view(), y.view())[[0, 0]];

        assert!((numeric - analytic).abs() < 1e-2);
    }
}
