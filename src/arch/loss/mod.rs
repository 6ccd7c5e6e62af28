mod binary_cross_entropy;
mod loss_fn;
mod mse;

pub use binary_cross_entropy::BinaryCrossEntropy;
pub use loss_fn::LossFn;
pub use mse::Mse;
