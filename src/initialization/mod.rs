mod constant;
mod param_gen;
mod random;

pub use constant::ConstParamGen;
pub use param_gen::{ParamGen, fans};
pub use random::{FanScaling, RandParamGen, ScaledParamGen, SharedRng, shared_rng};
