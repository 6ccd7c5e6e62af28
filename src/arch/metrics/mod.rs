mod accuracy;
mod mae;
mod metric;

pub use accuracy::Accuracy;
pub use mae::Mae;
pub use metric::Metric;
