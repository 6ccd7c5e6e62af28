use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    MlErr, Result,
    arch::{activations::ActFn, layers::Layer},
    initialization::{ConstParamGen, FanScaling, ParamGen, RandParamGen, ScaledParamGen, SharedRng},
};

/// The specification for the `ActFn` enum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Sigmoid { amp: f32 },
    Tanh,
    Relu,
    Identity,
}

impl ActFnSpec {
    pub fn build(self) -> ActFn {
        match self {
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
            ActFnSpec::Tanh => ActFn::Tanh,
            ActFnSpec::Relu => ActFn::Relu,
            ActFnSpec::Identity => ActFn::Identity,
        }
    }
}

impl FromStr for ActFnSpec {
    type Err = MlErr;

    fn from_str(name: &str) -> Result<Self> {
        let spec = match name {
            "sigmoid" => ActFnSpec::Sigmoid { amp: 1. },
            "tanh" => ActFnSpec::Tanh,
            "relu" => ActFnSpec::Relu,
            "identity" | "linear" => ActFnSpec::Identity,
            _ => return Err(unknown("activation", name)),
        };

        Ok(spec)
    }
}

/// The specification for the `Layer` enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        units: usize,
        #[serde(default)]
        input: Option<usize>,
    },
    Activation {
        act_fn: ActFnSpec,
        #[serde(default)]
        input_shape: Option<Vec<usize>>,
    },
    Flatten {
        #[serde(default)]
        input_shape: Option<Vec<usize>>,
    },
}

impl LayerSpec {
    pub fn build(&self) -> Layer {
        match self {
            LayerSpec::Dense { units, input } => match input {
                Some(input) => Layer::dense_from(*input, *units),
                None => Layer::dense(*units),
            },
            LayerSpec::Activation {
                act_fn,
                input_shape,
            } => with_shape(Layer::activation(act_fn.build()), input_shape),
            LayerSpec::Flatten { input_shape } => with_shape(Layer::flatten(), input_shape),
        }
    }
}

fn with_shape(layer: Layer, shape: &Option<Vec<usize>>) -> Layer {
    match shape {
        Some(shape) => layer.with_input_shape(shape.clone()),
        None => layer,
    }
}

/// The specification for the `Model` trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Sequential { layers: Vec<LayerSpec> },
}

/// The specification for the `ParamGen` trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamGenSpec {
    Const { value: f32 },
    Uniform { low: f32, high: f32 },
    Normal { mean: f32, std_dev: f32 },
    Xavier,
    XavierUniform,
    Kaiming,
    Lecun,
    LecunUniform,
}

impl ParamGenSpec {
    /// Builds the generator this spec describes.
    ///
    /// # Returns
    /// An error if the distribution parameters are invalid.
    pub fn build(self, rng: SharedRng) -> Result<Box<dyn ParamGen>> {
        let scaled = |scaling| -> Box<dyn ParamGen> { Box::new(ScaledParamGen::new(rng.clone(), scaling)) };

        let param_gen: Box<dyn ParamGen> = match self {
            ParamGenSpec::Const { value } => Box::new(ConstParamGen::new(value)),
            ParamGenSpec::Uniform { low, high } => {
                Box::new(RandParamGen::uniform(rng.clone(), low, high)?)
            }
            ParamGenSpec::Normal { mean, std_dev } => {
                Box::new(RandParamGen::normal(rng.clone(), mean, std_dev)?)
            }
            ParamGenSpec::Xavier => scaled(FanScaling::Xavier),
            ParamGenSpec::XavierUniform => scaled(FanScaling::XavierUniform),
            ParamGenSpec::Kaiming => scaled(FanScaling::Kaiming),
            ParamGenSpec::Lecun => scaled(FanScaling::Lecun),
            ParamGenSpec::LecunUniform => scaled(FanScaling::LecunUniform),
        };

        Ok(param_gen)
    }
}

impl FromStr for ParamGenSpec {
    type Err = MlErr;

    fn from_str(name: &str) -> Result<Self> {
        let spec = match name {
            "zeros" => ParamGenSpec::Const { value: 0. },
            "ones" => ParamGenSpec::Const { value: 1. },
            "random" => ParamGenSpec::Normal {
                mean: 0.,
                std_dev: 0.1,
            },
            "normal" => ParamGenSpec::Normal {
                mean: 0.,
                std_dev: 1.,
            },
            "uniform" => ParamGenSpec::Uniform {
                low: -0.1,
                high: 0.1,
            },
            "xavier" | "glorot" => ParamGenSpec::Xavier,
            "xavier_uniform" | "glorot_uniform" => ParamGenSpec::XavierUniform,
            "kaiming" | "he" => ParamGenSpec::Kaiming,
            "lecun" => ParamGenSpec::Lecun,
            "lecun_uniform" => ParamGenSpec::LecunUniform,
            _ => return Err(unknown("initializer", name)),
        };

        Ok(spec)
    }
}

pub(super) fn unknown(kind: &'static str, name: &str) -> MlErr {
    MlErr::UnknownComponent {
        kind,
        name: name.to_string(),
    }
}
