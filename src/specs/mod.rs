//! Serializable descriptions of every pluggable component.
//!
//! Each component spec can also be looked up by its registered name through `FromStr`,
//! e.g. `"adam".parse::<OptimizerSpec>()`, which fails with a configuration error for
//! names nobody registered.

mod model;
mod training;

pub use model::{ActFnSpec, LayerSpec, ModelSpec, ParamGenSpec};
pub use training::{DatasetSpec, LossFnSpec, MetricSpec, OptimizerSpec, TrainerSpec};
