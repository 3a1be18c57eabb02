//! Pipeline services for delivery metrics.
//!
//! Each stage is a pure transformation; [`MetricsEngine`] chains them.

mod aggregator;
mod classifier;
mod engine;
mod normalizer;
mod stats;

pub use aggregator::{Aggregation, PeriodAggregator};
pub use classifier::{Classification, ClassifiedTask, DeliveryClassifier};
pub use engine::{
    MetricsEngine, MetricsEngineError, MetricsEngineResult, MetricsRunError, compute,
};
pub use normalizer::{NormalizedTasks, TaskNormalizer, parse_date};
