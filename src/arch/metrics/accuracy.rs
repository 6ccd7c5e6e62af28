use ndarray::Axis;

use super::Metric;
use crate::tensor::TensorView;

/// The fraction of samples whose predicted class matches the target.
///
/// Single-column outputs are read as binary probabilities cut at `threshold`, wider
/// outputs are compared by their argmax.
#[derive(Debug, Clone, Copy)]
pub struct Accuracy {
    threshold: f32,
}

impl Accuracy {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Default for Accuracy {
    fn default() -> Self {
        Self::new(0.5)
    }
}

fn argmax<'a>(row: impl IntoIterator<Item = &'a f32>) -> Option<usize> {
    row.into_iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

impl Metric for Accuracy {
    fn name(&self) -> &'static str {
        "accuracy"
    }

    fn measure(&self, y_pred: TensorView, y: TensorView) -> f32 {
        let n = y_pred.shape().first().copied().unwrap_or_default();
        if n == 0 || y_pred.len() != y.len() {
            return 0.;
        }

        let width = y_pred.len() / n;
        let (Ok(y_pred), Ok(y)) = (y_pred.to_shape((n, width)), y.to_shape((n, width))) else {
            return 0.;
        };

        let hits = y_pred
            .axis_iter(Axis(0))
            .zip(y.axis_iter(Axis(0)))
            .filter(|(p, t)| match width {
                1 => (p[0] >= self.threshold) == (t[0] >= self.threshold),
                _ => argmax(p) == argmax(t),
            })
            .count();

        hits as f32 / n as f32
    }
}
