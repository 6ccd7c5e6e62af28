pub mod activations;
pub mod layers;
pub mod loss;
pub mod metrics;
mod model;
mod network;

pub use model::Model;
pub use network::NeuralNetwork;
