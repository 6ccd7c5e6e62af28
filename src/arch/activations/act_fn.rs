use super::Sigmoid;

/// An element-wise activation function along with its derivative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActFn {
    Sigmoid(Sigmoid),
    Tanh,
    Relu,
    Identity,
}
use ActFn::*;

impl ActFn {
    pub fn sigmoid(amp: f32) -> Self {
        Sigmoid(Sigmoid::new(amp))
    }

    pub fn f(&self, x: f32) -> f32 {
        match self {
            Sigmoid(a) => a.f(x),
            Tanh => x.tanh(),
            Relu => x.max(0.),
            Identity => x,
        }
    }

    pub fn df(&self, x: f32) -> f32 {
        match self {
            Sigmoid(a) => a.df(x),
            Tanh => 1. - x.tanh().powi(2),
            Relu => (x > 0.) as u8 as f32,
            Identity => 1.,
        }
    }

    /// Returns the name this function is registered with.
    pub fn name(&self) -> &'static str {
        match self {
            Sigmoid(_) => "sigmoid",
            Tanh => "tanh",
            Relu => "relu",
            Identity => "identity",
        }
    }
}
