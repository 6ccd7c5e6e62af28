use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{ModelSpec, ParamGenSpec, model::unknown};
use crate::{
    MlErr, Result,
    arch::{
        loss::{BinaryCrossEntropy, LossFn, Mse},
        metrics::{Accuracy, Mae, Metric},
    },
    optimization::{Adam, GradientDescent, GradientDescentWithMomentum, Optimizer},
    training::TrainerConfig,
};

/// The specification for the `Optimizer` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerSpec {
    Adam {
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    },
    GradientDescent {
        learning_rate: f32,
    },
    GradientDescentWithMomentum {
        learning_rate: f32,
        momentum: f32,
    },
}

impl OptimizerSpec {
    pub fn build(self) -> Box<dyn Optimizer> {
        match self {
            OptimizerSpec::Adam {
                learning_rate,
                beta1,
                beta2,
                epsilon,
            } => Box::new(Adam::new(learning_rate, beta1, beta2, epsilon)),
            OptimizerSpec::GradientDescent { learning_rate } => {
                Box::new(GradientDescent::new(learning_rate))
            }
            OptimizerSpec::GradientDescentWithMomentum {
                learning_rate,
                momentum,
            } => Box::new(GradientDescentWithMomentum::new(learning_rate, momentum)),
        }
    }
}

impl FromStr for OptimizerSpec {
    type Err = MlErr;

    fn from_str(name: &str) -> Result<Self> {
        let spec = match name {
            "sgd" | "gradient_descent" => OptimizerSpec::GradientDescent {
                learning_rate: 0.01,
            },
            "momentum" | "gradient_descent_with_momentum" => {
                OptimizerSpec::GradientDescentWithMomentum {
                    learning_rate: 0.01,
                    momentum: 0.9,
                }
            }
            "adam" => OptimizerSpec::Adam {
                learning_rate: 0.001,
                beta1: 0.9,
                beta2: 0.999,
                epsilon: 1e-8,
            },
            _ => return Err(unknown("optimizer", name)),
        };

        Ok(spec)
    }
}

/// The specification for the `LossFn` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFnSpec {
    Mse,
    BinaryCrossEntropy,
}

impl LossFnSpec {
    pub fn build(self) -> Box<dyn LossFn> {
        match self {
            LossFnSpec::Mse => Box::new(Mse::new()),
            LossFnSpec::BinaryCrossEntropy => Box::new(BinaryCrossEntropy::default()),
        }
    }
}

impl FromStr for LossFnSpec {
    type Err = MlErr;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "mse" | "mean_squared_error" => Ok(LossFnSpec::Mse),
            "binary_cross_entropy" | "bce" => Ok(LossFnSpec::BinaryCrossEntropy),
            _ => Err(unknown("loss", name)),
        }
    }
}

/// The specification for the `Metric` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSpec {
    Accuracy,
    Mae,
}

impl MetricSpec {
    pub fn build(self) -> Box<dyn Metric> {
        match self {
            MetricSpec::Accuracy => Box::new(Accuracy::default()),
            MetricSpec::Mae => Box::new(Mae),
        }
    }
}

impl FromStr for MetricSpec {
    type Err = MlErr;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "accuracy" => Ok(MetricSpec::Accuracy),
            "mae" | "mean_absolute_error" => Ok(MetricSpec::Mae),
            _ => Err(unknown("metric", name)),
        }
    }
}

/// The specification for the `Dataset`.
///
/// Samples are rows of `x_size` features followed by `y_size` targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSpec {
    Inline {
        data: Vec<f32>,
        x_size: usize,
        y_size: usize,
    },
    /// A text file of numbers separated by commas or whitespace.
    Local {
        path: PathBuf,
        x_size: usize,
        y_size: usize,
    },
}

/// The specification for a whole training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerSpec {
    pub model: ModelSpec,
    pub initializer: ParamGenSpec,
    pub optimizer: OptimizerSpec,
    pub loss: LossFnSpec,
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
    pub dataset: DatasetSpec,
    pub epochs: NonZeroUsize,
    #[serde(default)]
    pub trainer: TrainerConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_names() {
        assert!(matches!(
            "sgd".parse::<OptimizerSpec>().unwrap(),
            OptimizerSpec::GradientDescent { .. }
        ));
        assert_eq!("bce".parse::<LossFnSpec>().unwrap(), LossFnSpec::BinaryCrossEntropy);
        assert_eq!("accuracy".parse::<MetricSpec>().unwrap(), MetricSpec::Accuracy);
    }

    #[test]
    fn unknown_names_are_configuration_errors() {
        for err in [
            "rmsprop".parse::<OptimizerSpec>().unwrap_err(),
            "hinge".parse::<LossFnSpec>().unwrap_err(),
            "f1".parse::<MetricSpec>().unwrap_err(),
        ] {
            assert!(err.is_configuration(), "{err}");
        }
    }

    #[test]
    fn trainer_spec_from_json() {
        let json = r#"{
            "model": {"sequential": {"layers": [{"dense": {"units": 1, "input": 2}}]}},
            "initializer": "xavier",
            "optimizer": {"gradient_descent": {"learning_rate": 0.1}},
            "loss": "mse",
            "metrics": ["mae"],
            "dataset": {"inline": {"data": [0, 0, 0, 1, 1, 1], "x_size": 2, "y_size": 1}},
            "epochs": 3,
            "trainer": {"batch_size": 1, "verbose": false}
        }"#;

        let spec: TrainerSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.epochs.get(), 3);
        assert_eq!(spec.trainer.batch_size.get(), 1);
        assert_eq!(spec.trainer.print_step_mod.get(), 1000);
        assert_eq!(spec.metrics, [MetricSpec::Mae]);
    }
}
