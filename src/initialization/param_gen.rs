use crate::{Result, tensor::Tensor};

/// A `ParamGen` generates values for the initial state of a layer's parameters.
pub trait ParamGen {
    /// Generates a tensor of exactly the given shape.
    ///
    /// # Arguments
    /// * `shape` - The full shape of the parameter tensor.
    ///
    /// # Returns
    /// The generated tensor, or an error if the generator can't produce values for
    /// such a shape.
    fn generate(&mut self, shape: &[usize]) -> Result<Tensor>;
}

impl<P: ParamGen + ?Sized> ParamGen for Box<P> {
    fn generate(&mut self, shape: &[usize]) -> Result<Tensor> {
        (**self).generate(shape)
    }
}

/// Returns the `(fan_in, fan_out)` pair of a parameter tensor.
///
/// The first axis is taken as the input axis and the rest as the output axes, a 1-d
/// tensor counts as having the same fan on both sides.
pub fn fans(shape: &[usize]) -> (usize, usize) {
    match shape {
        [] => (1, 1),
        [n] => (*n, *n),
        [fan_in, rest @ ..] => (*fan_in, rest.iter().product()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fans_of_common_shapes() {
        assert_eq!(fans(&[]), (1, 1));
        assert_eq!(fans(&[4]), (4, 4));
        assert_eq!(fans(&[3, 5]), (3, 5));
        assert_eq!(fans(&[3, 2, 2]), (3, 4));
    }
}
