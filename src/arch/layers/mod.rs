mod activation;
mod dense;
mod flatten;
mod layer;

pub use activation::Activation;
pub use dense::Dense;
pub use flatten::Flatten;
pub use layer::Layer;

use crate::{MlErr, Result, tensor::Shape};

/// Settles the input shape of a layer from what it declared and what its predecessor
/// outputs. Both must agree when present.
fn resolve_input(declared: Option<&[usize]>, given: Option<&[usize]>) -> Result<Shape> {
    match (declared, given) {
        (Some(declared), Some(given)) if declared != given => {
            Err(MlErr::shape("declared input", given, declared))
        }
        (_, Some(shape)) | (Some(shape), None) => Ok(shape.to_vec()),
        (None, None) => Err(MlErr::MissingInputShape { layer: 0 }),
    }
}
