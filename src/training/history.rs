use serde::{Deserialize, Serialize};

use crate::Result;

/// A snapshot of everything a `Trainer` recorded about its losses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LossHistory {
    pub train_step: usize,
    /// One loss per trained mini-batch.
    pub train_losses: Vec<f32>,
    pub eval_losses: Vec<f32>,
    /// The `train_step` each evaluation happened at, paired with `eval_losses`.
    pub eval_steps: Vec<usize>,
}

impl LossHistory {
    /// Summarizes the latest losses in a single line.
    pub fn title(&self) -> String {
        let train = self.train_losses.last().copied().unwrap_or(f32::NAN);

        match self.eval_losses.last() {
            Some(eval) => format!(
                "Train Loss: {train:.4} | Test Loss: {eval:.4} for step {}",
                self.train_step
            ),
            None => format!("Train Loss: {train:.4} for step {}", self.train_step),
        }
    }

    /// The `(step, loss)` points of the training curve, steps starting at zero.
    pub fn train_curve(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.train_losses.iter().copied().enumerate()
    }

    /// The `(step, loss)` points of the evaluation curve.
    pub fn eval_curve(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.eval_steps
            .iter()
            .copied()
            .zip(self.eval_losses.iter().copied())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
