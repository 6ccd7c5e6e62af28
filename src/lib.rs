//! A small neural network training framework.
//!
//! A `NeuralNetwork` is an ordered stack of `Layer`s. Each layer computes its own
//! gradients by hand on `backward` and updates its parameters right away through the
//! optimizer it bound on `initialize`. A `Trainer` drives the whole thing over shuffled
//! mini-batches and keeps a history of the losses.

pub mod arch;
pub mod dataset;
pub mod error;
pub mod initialization;
pub mod optimization;
pub mod specs;
pub mod tensor;
pub mod training;

pub use error::{MlErr, Result};
