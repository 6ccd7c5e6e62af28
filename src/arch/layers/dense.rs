use ndarray::{Array1, Array2, ArrayView2, Axis, Ix2, linalg};

use super::resolve_input;
use crate::{
    MlErr, Result,
    initialization::ParamGen,
    optimization::{ParamId, SharedOptimizer},
    tensor::{Shape, Tensor, TensorView},
};

/// The trainable state of a `Dense` layer, present once it's initialized.
#[derive(Debug)]
struct DenseParams {
    weights: Array2<f32>,
    biases: Array1<f32>,
    weights_id: ParamId,
    biases_id: ParamId,
    optimizer: SharedOptimizer,
}

impl Drop for DenseParams {
    fn drop(&mut self) {
        self.optimizer.release(self.weights_id);
        self.optimizer.release(self.biases_id);
    }
}

/// A fully connected layer computing `x · W + b` over a batch of 1-d samples.
///
/// Weights are drawn from the network's parameter generator with shape
/// `(input, units)` while the biases start at zero.
#[derive(Debug)]
pub struct Dense {
    units: usize,
    declared_input: Option<Shape>,
    shape: Shape,
    params: Option<DenseParams>,

    // Forward metadata
    x: Option<Array2<f32>>,
}

impl Dense {
    /// Creates a new `Dense` layer with `units` outputs.
    ///
    /// The input size is taken from the preceding layer unless one is declared with
    /// `with_input_shape`.
    pub fn new(units: usize) -> Self {
        Self {
            units,
            declared_input: None,
            shape: vec![units],
            params: None,
            x: None,
        }
    }

    pub fn with_input_shape(mut self, shape: Shape) -> Self {
        self.declared_input = Some(shape);
        self
    }

    /// Allocates the weights and biases and binds `optimizer` for their updates.
    ///
    /// # Arguments
    /// * `param_gen` - The generator for the weights.
    /// * `optimizer` - The optimizer every later `backward` will step with.
    /// * `input_shape` - The output shape of the preceding layer, if there's one.
    ///
    /// # Returns
    /// An error if the input shape is unknown or not 1-d, or if the generator
    /// produced a tensor of the wrong shape.
    pub fn initialize(
        &mut self,
        param_gen: &mut dyn ParamGen,
        optimizer: &SharedOptimizer,
        input_shape: Option<&[usize]>,
    ) -> Result<()> {
        let input = resolve_input(self.declared_input.as_deref(), input_shape)?;
        self.params = None;

        let &[dim_in] = input.as_slice() else {
            let flat: usize = input.iter().product();
            return Err(MlErr::shape("dense input", &input, &[flat]));
        };

        let shape = [dim_in, self.units];
        let weights = param_gen.generate(&shape)?;
        if weights.shape() != shape {
            return Err(MlErr::shape("generated weights", weights.shape(), &shape));
        }

        let weights = weights
            .into_dimensionality::<Ix2>()
            .map_err(|_| MlErr::shape("generated weights", &[], &shape))?;

        self.params = Some(DenseParams {
            weights,
            biases: Array1::zeros(self.units),
            weights_id: optimizer.register(),
            biases_id: optimizer.register(),
            optimizer: optimizer.clone(),
        });
        self.x = None;

        Ok(())
    }

    pub fn forward(&mut self, x: TensorView) -> Result<Tensor> {
        let params = self.params.as_ref().ok_or(MlErr::NotInitialized)?;
        let w = &params.weights;
        let got = x.shape().to_vec();
        let expected = [got.first().copied().unwrap_or_default(), w.nrows()];

        let x = match x.into_dimensionality::<Ix2>() {
            Ok(x) if x.ncols() == w.nrows() => x,
            _ => return Err(MlErr::shape("dense input", &got, &expected)),
        };

        let mut z = Array2::<f32>::zeros((x.nrows(), self.units));
        linalg::general_mat_mul(1.0, &x, w, 0.0, &mut z);
        z += &params.biases;

        self.x = Some(x.to_owned());
        Ok(z.into_dyn())
    }

    /// Propagates `d`, the gradient with respect to this layer's output, updating the
    /// weights and biases on the way.
    ///
    /// The returned input gradient is computed with the weights as they were during
    /// the matching `forward`.
    pub fn backward(&mut self, d: Tensor) -> Result<Tensor> {
        let params = self.params.as_mut().ok_or(MlErr::NotInitialized)?;
        let rows = self
            .x
            .as_ref()
            .ok_or(MlErr::MissingForward { layer: "dense" })?
            .nrows();

        let got = d.shape().to_vec();
        let expected = [rows, self.units];
        let d = match d.into_dimensionality::<Ix2>() {
            Ok(d) if d.dim() == (expected[0], expected[1]) => d,
            _ => return Err(MlErr::shape("dense gradient", &got, &expected)),
        };

        let x = self.x.take().ok_or(MlErr::MissingForward { layer: "dense" })?;

        let mut dw = Array2::<f32>::zeros(params.weights.raw_dim());
        linalg::general_mat_mul(1.0, &x.t(), &d, 0.0, &mut dw);
        let db = d.sum_axis(Axis(0));

        let mut dx = Array2::<f32>::zeros((d.nrows(), params.weights.nrows()));
        linalg::general_mat_mul(1.0, &d, &params.weights.t(), 0.0, &mut dx);

        let DenseParams {
            weights,
            biases,
            weights_id,
            biases_id,
            optimizer,
        } = params;

        optimizer.step(*weights_id, weights.view_mut().into_dyn(), dw.view().into_dyn())?;
        optimizer.step(*biases_id, biases.view_mut().into_dyn(), db.view().into_dyn())?;

        Ok(dx.into_dyn())
    }

    pub fn output_shape(&self) -> Option<&[usize]> {
        self.params.as_ref().map(|_| self.shape.as_slice())
    }

    /// Returns the amount of scalar parameters this layer holds.
    pub fn size(&self) -> usize {
        self.params
            .as_ref()
            .map_or(0, |p| p.weights.len() + p.biases.len())
    }

    pub fn weights(&self) -> Option<ArrayView2<'_, f32>> {
        self.params.as_ref().map(|p| p.weights.view())
    }

    pub fn biases(&self) -> Option<ndarray::ArrayView1<'_, f32>> {
        self.params.as_ref().map(|p| p.biases.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{initialization::ConstParamGen, optimization::GradientDescent};
    use ndarray::array;

    fn initialized(dim_in: usize, units: usize, value: f32) -> Dense {
        let mut dense = Dense::new(units);
        let optimizer = SharedOptimizer::new(GradientDescent::new(0.1));
        dense
            .initialize(&mut ConstParamGen::new(value), &optimizer, Some(&[dim_in]))
            .unwrap();
        dense
    }

    #[test]
    fn forward_is_affine() {
        let mut dense = initialized(2, 3, 1.0);
        let x = array![[1.0, 2.0], [0.0, -1.0]].into_dyn();

        let y = dense.forward(x.view()).unwrap();
        assert_eq!(y, array![[3.0, 3.0, 3.0], [-1.0, -1.0, -1.0]].into_dyn());
    }

    #[test]
    fn wrong_input_width_fails() {
        let mut dense = initialized(2, 3, 1.0);
        let x = array![[1.0, 2.0, 3.0]].into_dyn();

        let err = dense.forward(x.view()).unwrap_err();
        assert!(matches!(err, MlErr::ShapeMismatch { .. }));
    }

    #[test]
    fn backward_without_forward_is_a_precondition_violation() {
        let mut dense = initialized(2, 1, 1.0);
        let err = dense.backward(array![[1.0]].into_dyn()).unwrap_err();

        assert!(err.is_precondition());
    }

    #[test]
    fn bad_gradient_keeps_the_forward_cache() {
        let mut dense = initialized(2, 1, 1.0);
        dense.forward(array![[1.0, 1.0]].into_dyn().view()).unwrap();

        let err = dense.backward(array![[1.0, 1.0]].into_dyn()).unwrap_err();
        assert!(matches!(err, MlErr::ShapeMismatch { what: "dense gradient", .. }));

        let dx = dense.backward(array![[2.0]].into_dyn()).unwrap();
        assert_eq!(dx.shape(), &[1, 2]);
    }

    #[test]
    fn initializing_again_releases_the_old_params() {
        let optimizer = SharedOptimizer::new(GradientDescent::new(0.1));
        let mut dense = Dense::new(3);

        for _ in 0..5 {
            dense
                .initialize(&mut ConstParamGen::new(1.0), &optimizer, Some(&[2]))
                .unwrap();
        }
        assert_eq!(optimizer.registered(), 2);

        drop(dense);
        assert_eq!(optimizer.registered(), 0);
    }

    #[test]
    fn forward_before_initialize_fails() {
        let mut dense = Dense::new(2);
        let err = dense.forward(array![[1.0]].into_dyn().view()).unwrap_err();

        assert!(matches!(err, MlErr::NotInitialized));
    }

    #[test]
    fn multidimensional_inputs_are_rejected_at_initialize() {
        let mut dense = Dense::new(2);
        let optimizer = SharedOptimizer::new(GradientDescent::new(0.1));
        let res = dense.initialize(&mut ConstParamGen::zeros(), &optimizer, Some(&[2, 2]));

        assert!(matches!(res, Err(MlErr::ShapeMismatch { .. })));
    }

    #[test]
    fn input_gradient_uses_the_weights_before_the_update() {
        let mut dense = initialized(2, 1, 1.0);
        let x = array![[1.0, 1.0]].into_dyn();

        dense.forward(x.view()).unwrap();
        let dx = dense.backward(array![[2.0]].into_dyn()).unwrap();

        assert_eq!(dx, array![[2.0, 2.0]].into_dyn());
        assert_eq!(dense.weights().unwrap(), array![[0.8], [0.8]]);
        assert_eq!(dense.biases().unwrap(), array![-0.2]);
    }
}
