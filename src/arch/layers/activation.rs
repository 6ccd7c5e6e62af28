use super::resolve_input;
use crate::{
    MlErr, Result,
    arch::activations::ActFn,
    tensor::{Shape, Tensor, TensorView, sample_shape},
};

/// Applies an activation function element-wise. It keeps the shape of its input and
/// has no parameters.
#[derive(Debug, Clone)]
pub struct Activation {
    act_fn: ActFn,
    declared_input: Option<Shape>,
    shape: Option<Shape>,

    // Forward metadata
    z: Option<Tensor>,
}

impl Activation {
    pub fn new(act_fn: ActFn) -> Self {
        Self {
            act_fn,
            declared_input: None,
            shape: None,
            z: None,
        }
    }

    pub fn with_input_shape(mut self, shape: Shape) -> Self {
        self.declared_input = Some(shape);
        self
    }

    pub fn act_fn(&self) -> ActFn {
        self.act_fn
    }

    pub fn initialize(&mut self, input_shape: Option<&[usize]>) -> Result<()> {
        self.shape = Some(resolve_input(self.declared_input.as_deref(), input_shape)?);
        self.z = None;
        Ok(())
    }

    pub fn forward(&mut self, z: TensorView) -> Result<Tensor> {
        let shape = self.shape.as_deref().ok_or(MlErr::NotInitialized)?;
        if sample_shape(&z) != shape {
            return Err(MlErr::shape("activation input", sample_shape(&z), shape));
        }

        let act_fn = self.act_fn;
        let a = z.mapv(|z| act_fn.f(z));

        self.z = Some(z.to_owned());
        Ok(a)
    }

    pub fn backward(&mut self, mut d: Tensor) -> Result<Tensor> {
        if self.shape.is_none() {
            return Err(MlErr::NotInitialized);
        }

        let z = self
            .z
            .as_ref()
            .ok_or(MlErr::MissingForward { layer: "activation" })?;

        if d.shape() != z.shape() {
            return Err(MlErr::shape("activation gradient", d.shape(), z.shape()));
        }

        let z = self.z.take().ok_or(MlErr::MissingForward { layer: "activation" })?;

        let act_fn = self.act_fn;
        d.zip_mut_with(&z, |d, &z| *d *= act_fn.df(z));

        Ok(d)
    }

    pub fn output_shape(&self) -> Option<&[usize]> {
        self.shape.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn relu_masks_the_gradient() {
        let mut layer = Activation::new(ActFn::Relu);
        layer.initialize(Some(&[3])).unwrap();

        let a = layer.forward(array![[-1.0, 0.5, 2.0]].into_dyn().view()).unwrap();
        assert_eq!(a, array![[0.0, 0.5, 2.0]].into_dyn());

        let d = layer.backward(array![[4.0, 4.0, 4.0]].into_dyn()).unwrap();
        assert_eq!(d, array![[0.0, 4.0, 4.0]].into_dyn());
    }

    #[test]
    fn first_layer_needs_a_declared_shape() {
        let mut layer = Activation::new(ActFn::Tanh);
        assert!(matches!(
            layer.initialize(None),
            Err(MlErr::MissingInputShape { .. })
        ));

        let mut layer = Activation::new(ActFn::Tanh).with_input_shape(vec![2]);
        layer.initialize(None).unwrap();
        assert_eq!(layer.output_shape(), Some(&[2][..]));
    }

    #[test]
    fn mismatched_gradient_fails() {
        let mut layer = Activation::new(ActFn::Identity);
        layer.initialize(Some(&[2])).unwrap();
        layer.forward(array![[1.0, 2.0]].into_dyn().view()).unwrap();

        let err = layer.backward(array![[1.0, 2.0, 3.0]].into_dyn()).unwrap_err();
        assert!(matches!(err, MlErr::ShapeMismatch { .. }));

        // the pending forward is still there for a well shaped gradient
        let d = layer.backward(array![[1.0, 1.0]].into_dyn()).unwrap();
        assert_eq!(d, array![[1.0, 1.0]].into_dyn());
    }
}
