use log::debug;

use super::Trainer;
use crate::{
    Result,
    arch::NeuralNetwork,
    dataset::Dataset,
    initialization::shared_rng,
    optimization::SharedOptimizer,
    specs::{ModelSpec, TrainerSpec},
};

/// Builds `Trainer`s given a specification.
#[derive(Default)]
pub struct TrainerBuilder;

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds a new `Trainer` following a spec, along with the dataset it names.
    ///
    /// # Arguments
    /// * `spec` - The specification for the trainer.
    ///
    /// # Returns
    /// An error if the dataset can't be loaded or the model fails to initialize.
    pub fn build(&self, spec: &TrainerSpec) -> Result<(Trainer<NeuralNetwork>, Dataset)> {
        let dataset = Dataset::from_spec(&spec.dataset)?;
        debug!("loaded dataset of {} samples", dataset.len());

        let model = self.resolve_model(spec)?;
        let metrics = spec.metrics.iter().map(|metric| metric.build()).collect();
        let trainer = Trainer::new(model, spec.loss.build(), metrics, spec.trainer)?;

        Ok((trainer, dataset))
    }

    fn resolve_model(&self, spec: &TrainerSpec) -> Result<NeuralNetwork> {
        let param_gen = spec.initializer.build(shared_rng(spec.trainer.seed))?;
        let optimizer = SharedOptimizer::from_boxed(spec.optimizer.build());

        match &spec.model {
            ModelSpec::Sequential { layers } => {
                let layers = layers.iter().map(|layer| layer.build());
                Ok(NeuralNetwork::from_parts(layers, param_gen, optimizer))
            }
        }
    }
}
