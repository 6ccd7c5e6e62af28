use super::{Activation, Dense, Flatten};
use crate::{
    Result,
    arch::activations::ActFn,
    initialization::ParamGen,
    optimization::SharedOptimizer,
    tensor::{Shape, Tensor, TensorView},
};

/// The layers a network can be composed of.
///
/// Every variant follows the same protocol: it's `initialize`d once with the output
/// shape of the layer before it, then `forward` caches whatever the next `backward`
/// needs, and `backward` consumes that cache, steps the layer's parameters through the
/// bound optimizer and returns the gradient for the preceding layer.
#[derive(Debug)]
pub enum Layer {
    Dense(Dense),
    Activation(Activation),
    Flatten(Flatten),
}
use Layer::*;

impl Layer {
    /// A fully connected layer with `units` outputs.
    pub fn dense(units: usize) -> Self {
        Dense(Dense::new(units))
    }

    /// A fully connected layer with a declared input size, for the front of a network.
    pub fn dense_from(input: usize, units: usize) -> Self {
        Dense(Dense::new(units).with_input_shape(vec![input]))
    }

    pub fn activation(act_fn: ActFn) -> Self {
        Activation(Activation::new(act_fn))
    }

    pub fn sigmoid(amp: f32) -> Self {
        Self::activation(ActFn::sigmoid(amp))
    }

    pub fn tanh() -> Self {
        Self::activation(ActFn::Tanh)
    }

    pub fn relu() -> Self {
        Self::activation(ActFn::Relu)
    }

    pub fn flatten() -> Self {
        Flatten(Flatten::new())
    }

    /// Declares the per-sample input shape, needed when this is the first layer.
    pub fn with_input_shape(self, shape: impl Into<Shape>) -> Self {
        let shape = shape.into();

        match self {
            Dense(l) => Dense(l.with_input_shape(shape)),
            Activation(l) => Activation(l.with_input_shape(shape)),
            Flatten(l) => Flatten(l.with_input_shape(shape)),
        }
    }

    pub fn initialize(
        &mut self,
        param_gen: &mut dyn ParamGen,
        optimizer: &SharedOptimizer,
        input_shape: Option<&[usize]>,
    ) -> Result<()> {
        match self {
            Dense(l) => l.initialize(param_gen, optimizer, input_shape),
            Activation(l) => l.initialize(input_shape),
            Flatten(l) => l.initialize(input_shape),
        }
    }

    pub fn forward(&mut self, x: TensorView) -> Result<Tensor> {
        match self {
            Dense(l) => l.forward(x),
            Activation(l) => l.forward(x),
            Flatten(l) => l.forward(x),
        }
    }

    pub fn backward(&mut self, d: Tensor) -> Result<Tensor> {
        match self {
            Dense(l) => l.backward(d),
            Activation(l) => l.backward(d),
            Flatten(l) => l.backward(d),
        }
    }

    /// Returns the per-sample output shape, or `None` before initialization.
    pub fn output_shape(&self) -> Option<&[usize]> {
        match self {
            Dense(l) => l.output_shape(),
            Activation(l) => l.output_shape(),
            Flatten(l) => l.output_shape(),
        }
    }

    /// Returns the amount of trainable scalars in this layer.
    pub fn size(&self) -> usize {
        match self {
            Dense(l) => l.size(),
            Activation(_) | Flatten(_) => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dense(_) => "dense",
            Activation(l) => l.act_fn().name(),
            Flatten(_) => "flatten",
        }
    }
}

impl From<Dense> for Layer {
    fn from(value: Dense) -> Self {
        Dense(value)
    }
}

impl From<Activation> for Layer {
    fn from(value: Activation) -> Self {
        Activation(value)
    }
}

impl From<Flatten> for Layer {
    fn from(value: Flatten) -> Self {
        Flatten(value)
    }
}
