use super::resolve_input;
use crate::{
    MlErr, Result,
    tensor::{Shape, Tensor, TensorView, sample_shape, volume},
};

/// Collapses every per-sample axis into one, so that `(n, a, b)` becomes `(n, a * b)`.
#[derive(Debug, Clone, Default)]
pub struct Flatten {
    declared_input: Option<Shape>,
    input: Option<Shape>,
    shape: Option<Shape>,

    // Forward metadata
    batch: Option<usize>,
}

impl Flatten {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_shape(mut self, shape: Shape) -> Self {
        self.declared_input = Some(shape);
        self
    }

    pub fn initialize(&mut self, input_shape: Option<&[usize]>) -> Result<()> {
        let input = resolve_input(self.declared_input.as_deref(), input_shape)?;

        self.shape = Some(vec![volume(&input)]);
        self.input = Some(input);
        self.batch = None;
        Ok(())
    }

    pub fn forward(&mut self, x: TensorView) -> Result<Tensor> {
        let input = self.input.as_deref().ok_or(MlErr::NotInitialized)?;
        if sample_shape(&x) != input {
            return Err(MlErr::shape("flatten input", sample_shape(&x), input));
        }

        let n = x.shape()[0];
        let flat = x
            .to_shape(vec![n, volume(input)])
            .map_err(|_| MlErr::shape("flatten input", x.shape(), input))?
            .into_owned();

        self.batch = Some(n);
        Ok(flat)
    }

    pub fn backward(&mut self, d: Tensor) -> Result<Tensor> {
        let input = self.input.as_deref().ok_or(MlErr::NotInitialized)?;
        let n = self.batch.ok_or(MlErr::MissingForward { layer: "flatten" })?;

        let expected = [n, volume(input)];
        if d.shape() != expected {
            return Err(MlErr::shape("flatten gradient", d.shape(), &expected));
        }
        self.batch = None;

        let mut shape = Vec::with_capacity(input.len() + 1);
        shape.push(n);
        shape.extend_from_slice(input);

        let d = d
            .to_shape(shape)
            .map_err(|_| MlErr::shape("flatten gradient", &expected, input))?
            .into_owned();

        Ok(d)
    }

    pub fn output_shape(&self) -> Option<&[usize]> {
        self.shape.as_deref()
    }
}
