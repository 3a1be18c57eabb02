//! Domain model for delivery metrics.
//!
//! Raw export rows, normalised tasks, team configuration, and the computed
//! period records all live here. None of these types perform I/O.

mod config;
mod error;
mod ids;
mod mapping;
mod period;
mod profile;
mod report;
mod task;

pub use config::{CONFIG_VERSION, MetricHealth, MetricsConfig, TeamSize, Thresholds};
pub use error::MetricsDomainError;
pub use ids::{SprintLabel, SprintNumber, TaskId};
pub use mapping::{MonthLabel, SprintMonthMap};
pub use period::{PeriodKind, PeriodMetrics};
pub use profile::TeamProfile;
pub use report::{
    MetricMeans, MetricRatings, MetricsReport, MetricsSummary, ProcessingStats, SprintHighlight,
    Warning, WarningKind,
};
pub use task::{
    RawTask, Task, TaskData, TaskKind, WorkflowState, effective_points, parse_flag,
    strip_copy_markers,
};
