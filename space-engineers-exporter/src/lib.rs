pub mod collector;
pub mod config;
pub mod exposition;
pub mod grouping;
pub mod logging;
pub mod schema;
pub mod snapshot;

pub use collector::Collector;
pub use schema::{MetricSchema, NAMESPACE};
pub use snapshot::MetricSnapshot;
