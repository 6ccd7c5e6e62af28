use super::Metric;
use crate::tensor::TensorView;

/// Mean absolute error.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mae;

impl Metric for Mae {
    fn name(&self) -> &'static str {
        "mae"
    }

    fn measure(&self, y_pred: TensorView, y: TensorView) -> f32 {
        (&y_pred - &y).mapv(f32::abs).mean().unwrap_or_default()
    }
}
