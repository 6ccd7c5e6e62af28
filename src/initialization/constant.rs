use ndarray::IxDyn;

use super::ParamGen;
use crate::{Result, tensor::Tensor};

/// A parameter generator that always generates the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstParamGen {
    value: f32,
}

impl ConstParamGen {
    /// Creates a new `ConstParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `value` - The value to always generate.
    ///
    /// # Returns
    /// A new `ConstParamGen` instance.
    pub fn new(value: f32) -> Self {
        Self { value }
    }

    pub fn zeros() -> Self {
        Self::new(0.)
    }
}

impl ParamGen for ConstParamGen {
    fn generate(&mut self, shape: &[usize]) -> Result<Tensor> {
        Ok(Tensor::from_elem(IxDyn(shape), self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_the_whole_shape() {
        let mut param_gen = ConstParamGen::new(1.5);
        let sample = param_gen.generate(&[2, 3]).unwrap();

        assert_eq!(sample.shape(), &[2, 3]);
        assert!(sample.iter().all(|&v| v == 1.5));
    }

    #[test]
    fn empty_shape_is_a_scalar() {
        let mut param_gen = ConstParamGen::zeros();
        let sample = param_gen.generate(&[]).unwrap();

        assert_eq!(sample.len(), 1);
    }
}
