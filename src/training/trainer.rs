use std::num::NonZeroUsize;

use log::{debug, info, trace, warn};
use rand::{SeedableRng, rngs::StdRng};

use super::{Batches, LossHistory, TrainerConfig};
use crate::{
    MlErr, Result,
    arch::{Model, loss::LossFn, metrics::Metric},
    specs::{LossFnSpec, MetricSpec},
    tensor::TensorView,
};

/// Trains a model with mini-batch stochastic optimization and keeps track of its losses.
///
/// `train_step` counts every call to `batch_train`, it never decreases nor resets.
/// Each evaluation records the step it happened at, so `eval_losses` and `eval_steps`
/// always have the same length.
pub struct Trainer<M: Model> {
    model: M,
    loss_fn: Box<dyn LossFn>,
    metrics: Vec<Box<dyn Metric>>,
    config: TrainerConfig,
    rng: StdRng,

    train_step: usize,
    train_losses: Vec<f32>,
    eval_losses: Vec<f32>,
    eval_steps: Vec<usize>,
}

impl<M: Model> Trainer<M> {
    /// Creates a new `Trainer`, initializing the model it is given.
    ///
    /// # Arguments
    /// * `model` - The model to train.
    /// * `loss_fn` - The objective minimized while training.
    /// * `metrics` - The metrics `eval` reports when given none.
    /// * `config` - The trainer's settings.
    ///
    /// # Returns
    /// An error if the model fails to initialize.
    pub fn new<L>(mut model: M, loss_fn: L, metrics: Vec<Box<dyn Metric>>, config: TrainerConfig) -> Result<Self>
    where
        L: LossFn + 'static,
    {
        model.initialize()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            model,
            loss_fn: Box::new(loss_fn),
            metrics,
            config,
            rng,
            train_step: 0,
            train_losses: Vec::new(),
            eval_losses: Vec::new(),
            eval_steps: Vec::new(),
        })
    }

    /// Creates a new `Trainer` looking up its loss and metrics by their registered names.
    ///
    /// # Returns
    /// A configuration error if any name is unknown, before the model is touched.
    pub fn with_names(model: M, loss_fn: &str, metrics: &[&str], config: TrainerConfig) -> Result<Self> {
        let loss_fn = loss_fn.parse::<LossFnSpec>()?.build();
        let metrics = metrics
            .iter()
            .map(|name| -> Result<Box<dyn Metric>> { Ok(name.parse::<MetricSpec>()?.build()) })
            .collect::<Result<_>>()?;

        Self::new(model, loss_fn, metrics, config)
    }

    /// Performs a single optimization step on one mini-batch.
    ///
    /// # Arguments
    /// * `x` - The batch inputs.
    /// * `y` - The batch targets, shaped like the model's output.
    ///
    /// # Returns
    /// The loss of the batch before the update.
    pub fn batch_train(&mut self, x: TensorView, y: TensorView) -> Result<f32> {
        self.train_step += 1;

        let y_pred = self.model.forward(x)?;
        if y_pred.shape() != y.shape() {
            return Err(MlErr::shape("targets", y.shape(), y_pred.shape()));
        }

        let loss = self.loss_fn.loss(y_pred.view(), y.view());
        self.train_losses.push(loss);

        let grads = self.loss_fn.grads(y_pred.view(), y);
        self.model.backward(grads)?;

        trace!(step = self.train_step; "batch loss {loss}");
        if self.reports(self.train_step) {
            info!("Loss: {loss:.4} for step {}", self.train_step);
        }

        Ok(loss)
    }

    /// Whether the progress line is logged after the given step: every `print_step_mod`
    /// steps starting with the first one, and only when verbose.
    fn reports(&self, step: usize) -> bool {
        self.config.verbose && step > 0 && (step - 1) % self.config.print_step_mod == 0
    }

    /// Shuffles the dataset and splits it into batches of `batch_size` samples, following
    /// the configured `BatchTail`.
    ///
    /// # Returns
    /// An error if `x` and `y` don't hold the same amount of samples.
    pub fn batches<'a>(
        &mut self,
        x: TensorView<'a>,
        y: TensorView<'a>,
        batch_size: NonZeroUsize,
    ) -> Result<Batches<'a>> {
        Batches::new(x, y, batch_size, self.config.batch_tail, &mut self.rng)
    }

    /// Trains the model for `epochs` full passes over the dataset, each in a new random
    /// order, with the configured batch size.
    pub fn train(&mut self, x: TensorView, y: TensorView, epochs: usize) -> Result<()> {
        let batch_size = self.config.batch_size;

        for epoch in 1..=epochs {
            let batches = self.batches(x.view(), y.view(), batch_size)?;
            let n = batches.len();

            if n == 0 {
                warn!(epoch = epoch; "no full batch of {batch_size} samples, epoch skipped");
                continue;
            }

            let mut total = 0.;
            for (batch_x, batch_y) in batches {
                total += self.batch_train(batch_x.view(), batch_y.view())?;
            }

            debug!(epoch = epoch; "mean loss {:.4} over {n} batches", total / n as f32);
        }

        Ok(())
    }

    /// Evaluates the model on a whole dataset without updating it.
    ///
    /// # Arguments
    /// * `x` - The inputs.
    /// * `y` - The targets.
    /// * `metrics` - The metrics to measure, the trainer's own when `None`.
    ///
    /// # Returns
    /// The loss and the result of every metric, in order.
    pub fn eval(
        &mut self,
        x: TensorView,
        y: TensorView,
        metrics: Option<&[Box<dyn Metric>]>,
    ) -> Result<(f32, Vec<f32>)> {
        let y_pred = self.model.forward(x)?;
        if y_pred.shape() != y.shape() {
            return Err(MlErr::shape("targets", y.shape(), y_pred.shape()));
        }

        let loss = self.loss_fn.loss(y_pred.view(), y.view());
        let metrics = metrics.unwrap_or(self.metrics.as_slice());
        let results = metrics
            .iter()
            .map(|metric| metric.measure(y_pred.view(), y.view()))
            .collect();

        self.eval_losses.push(loss);
        self.eval_steps.push(self.train_step);

        Ok((loss, results))
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the model. Structural changes require calling `initialize` on it again.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn train_step(&self) -> usize {
        self.train_step
    }

    pub fn train_losses(&self) -> &[f32] {
        &self.train_losses
    }

    pub fn eval_losses(&self) -> &[f32] {
        &self.eval_losses
    }

    pub fn eval_steps(&self) -> &[usize] {
        &self.eval_steps
    }

    pub fn history(&self) -> LossHistory {
        LossHistory {
            train_step: self.train_step,
            train_losses: self.train_losses.clone(),
            eval_losses: self.eval_losses.clone(),
            eval_steps: self.eval_steps.clone(),
        }
    }
}
