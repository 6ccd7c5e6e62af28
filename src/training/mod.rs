mod batches;
mod builder;
mod config;
mod history;
mod trainer;

pub use batches::{BatchTail, Batches};
pub use builder::TrainerBuilder;
pub use config::TrainerConfig;
pub use history::LossHistory;
pub use trainer::Trainer;
