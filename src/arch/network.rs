use log::debug;

use super::{Model, layers::Layer};
use crate::{
    MlErr, Result,
    initialization::{ParamGen, SharedRng},
    optimization::{Optimizer, SharedOptimizer},
    specs::{OptimizerSpec, ParamGenSpec},
    tensor::{Tensor, TensorView},
};

/// A feed-forward network: information flows through its layers in insertion order on
/// `forward` and in exactly the reverse order on `backward`.
///
/// The network owns the parameter generator used when its layers are initialized and
/// the optimizer every layer binds for its updates.
pub struct NeuralNetwork {
    layers: Vec<Layer>,
    param_gen: Box<dyn ParamGen>,
    optimizer: SharedOptimizer,
    initialized: bool,
}

impl NeuralNetwork {
    /// Creates a new `NeuralNetwork` from ready components.
    ///
    /// # Arguments
    /// * `layers` - The layers the network is composed of, possibly none.
    /// * `param_gen` - The generator for the initial parameters.
    /// * `optimizer` - The update rule for every layer's parameters.
    ///
    /// # Returns
    /// A new, uninitialized, `NeuralNetwork` instance.
    pub fn new<I, P, O>(layers: I, param_gen: P, optimizer: O) -> Self
    where
        I: IntoIterator<Item = Layer>,
        P: ParamGen + 'static,
        O: Optimizer + 'static,
    {
        Self::from_parts(layers, Box::new(param_gen), SharedOptimizer::new(optimizer))
    }

    pub fn from_parts<I>(layers: I, param_gen: Box<dyn ParamGen>, optimizer: SharedOptimizer) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        Self {
            layers: layers.into_iter().collect(),
            param_gen,
            optimizer,
            initialized: false,
        }
    }

    /// Creates a new `NeuralNetwork` looking up its parameter generator and optimizer by
    /// their registered names, both with their default settings.
    ///
    /// # Arguments
    /// * `layers` - The layers the network is composed of, possibly none.
    /// * `param_gen` - The name of the parameter generator, e.g. `"xavier"`.
    /// * `optimizer` - The name of the optimizer, e.g. `"sgd"`.
    /// * `rng` - The random source for the parameter generator.
    ///
    /// # Returns
    /// A configuration error if any of the names is unknown.
    pub fn from_names<I>(layers: I, param_gen: &str, optimizer: &str, rng: SharedRng) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
    {
        let param_gen = param_gen.parse::<ParamGenSpec>()?.build(rng)?;
        let optimizer = optimizer.parse::<OptimizerSpec>()?.build();
        Ok(Self::from_parts(layers, param_gen, SharedOptimizer::from_boxed(optimizer)))
    }

    /// Appends a layer. The network must be initialized again before its next use.
    pub fn add(&mut self, layer: Layer) {
        self.layers.push(layer);
        self.initialized = false;
    }

    /// Removes the last layer. The network must be initialized again before its next use.
    pub fn pop(&mut self) -> Option<Layer> {
        self.initialized = false;
        self.layers.pop()
    }

    /// Returns the optimizer every layer binds on `initialize`.
    pub fn optimizer(&self) -> &SharedOptimizer {
        &self.optimizer
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the amount of trainable scalars across every layer.
    pub fn size(&self) -> usize {
        self.layers.iter().map(Layer::size).sum()
    }

    /// Returns the per-sample output shape of the whole network.
    pub fn output_shape(&self) -> Option<&[usize]> {
        self.layers.last().and_then(Layer::output_shape)
    }
}

impl Model for NeuralNetwork {
    /// Initializes every layer in insertion order, feeding each one the output shape of
    /// the one before it. The first layer gets no shape and relies on its declared one.
    fn initialize(&mut self) -> Result<()> {
        self.initialized = false;
        let mut input_shape: Option<Vec<usize>> = None;

        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer
                .initialize(self.param_gen.as_mut(), &self.optimizer, input_shape.as_deref())
                .map_err(|e| match e {
                    MlErr::MissingInputShape { .. } => MlErr::MissingInputShape { layer: i },
                    e => e,
                })?;

            let shape = layer.output_shape().ok_or(MlErr::NotInitialized)?;
            debug!(layer = i; "initialized {} layer, output shape {shape:?}", layer.name());
            input_shape = Some(shape.to_vec());
        }

        debug!(layers = self.layers.len(), params = self.size(); "initialized network");
        self.initialized = true;
        Ok(())
    }

    fn forward(&mut self, x: TensorView) -> Result<Tensor> {
        if !self.initialized {
            return Err(MlErr::NotInitialized);
        }

        let mut layers = self.layers.iter_mut();
        let Some(first) = layers.next() else {
            return Ok(x.to_owned());
        };

        let mut y = first.forward(x)?;
        for layer in layers {
            y = layer.forward(y.view())?;
        }

        Ok(y)
    }

    /// Runs the layers backwards. Each layer steps its own parameters as soon as its
    /// gradient is known, so an error half way leaves the later layers already updated.
    fn backward(&mut self, grads: Tensor) -> Result<()> {
        if !self.initialized {
            return Err(MlErr::NotInitialized);
        }

        let mut d = grads;
        for layer in self.layers.iter_mut().rev() {
            d = layer.backward(d)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{initialization::ConstParamGen, optimization::GradientDescent};
    use ndarray::array;

    fn network(layers: Vec<Layer>) -> NeuralNetwork {
        NeuralNetwork::new(layers, ConstParamGen::new(0.5), GradientDescent::new(0.1))
    }

    #[test]
    fn shapes_propagate_through_initialize() {
        let mut net = network(vec![
            Layer::dense_from(3, 4),
            Layer::sigmoid(1.),
            Layer::dense(2),
        ]);
        net.initialize().unwrap();

        assert_eq!(net.layers()[1].output_shape(), Some(&[4][..]));
        assert_eq!(net.output_shape(), Some(&[2][..]));
        assert_eq!(net.size(), (3 * 4 + 4) + (4 * 2 + 2));
    }

    #[test]
    fn first_layer_without_shape_fails() {
        let mut net = network(vec![Layer::dense(2)]);

        let err = net.initialize().unwrap_err();
        assert!(matches!(err, MlErr::MissingInputShape { layer: 0 }));
        assert!(err.is_configuration());
    }

    #[test]
    fn mutating_requires_a_new_initialize() {
        let mut net = network(vec![Layer::dense_from(2, 2)]);
        net.initialize().unwrap();

        net.add(Layer::relu());
        let x = array![[1.0, 1.0]].into_dyn();
        assert!(matches!(net.forward(x.view()), Err(MlErr::NotInitialized)));

        net.initialize().unwrap();
        assert!(net.forward(x.view()).is_ok());

        assert!(net.pop().is_some());
        assert!(!net.is_initialized());
    }

    #[test]
    fn empty_network_is_the_identity() {
        let mut net = network(vec![]);
        net.initialize().unwrap();

        let x = array![[1.0, 2.0]].into_dyn();
        assert_eq!(net.forward(x.view()).unwrap(), x);
        net.backward(x.clone()).unwrap();
    }

    #[test]
    fn unknown_names_fail_at_construction() {
        let rng = crate::initialization::shared_rng(Some(0));
        let res = NeuralNetwork::from_names(vec![], "xavier", "sgdd", rng);

        assert!(matches!(res, Err(MlErr::UnknownComponent { kind: "optimizer", .. })));
    }
}
