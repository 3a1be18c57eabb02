//! Engine output: period records, summary statistics, and warnings.

use super::{MetricHealth, PeriodMetrics, TeamProfile, TeamSize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a recoverable problem found while processing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The row could not be used at all and was skipped.
    MalformedRow,
    /// A points cell was not a non-negative number.
    InvalidPoints,
    /// A date cell could not be parsed.
    InvalidDate,
    /// A count cell was not a non-negative integer.
    InvalidCount,
    /// The sprint label has no sprint number.
    InvalidSprintLabel,
    /// The ready-for-production date precedes the start date.
    NegativeCycleTime,
    /// A sprint has no month in the mapping.
    UnmappedSprint,
}

/// A user-visible warning collected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Warning category.
    pub kind: WarningKind,
    /// Export row the warning refers to, starting at 1.
    pub row: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl Warning {
    /// Creates a warning tied to an export row.
    #[must_use]
    pub fn for_row(kind: WarningKind, row: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            row: Some(row),
            message: message.into(),
        }
    }

    /// Creates a warning not tied to a single row.
    #[must_use]
    pub fn general(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            row: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "row {row}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Counts describing what the pipeline did with the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Rows received from the input collaborator.
    pub rows_received: usize,
    /// Rows skipped as malformed.
    pub rows_skipped: usize,
    /// Tasks retained after normalisation.
    pub tasks_retained: usize,
    /// Tasks tagged as duplicate copies.
    pub copies_tagged: usize,
    /// Tasks flagged as carried over.
    pub carry_over_tasks: usize,
    /// Tasks in closed, well-labelled sprints.
    pub in_scope_tasks: usize,
    /// In-scope tasks excluded from every metric.
    pub ineligible_tasks: usize,
    /// In-scope tasks counted as delivered.
    pub delivered_tasks: usize,
    /// Distinct sprints analysed.
    pub completed_sprints: usize,
}

/// Per-metric means across sprint rows; absent values are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricMeans {
    /// Mean throughput.
    pub throughput: Option<f64>,
    /// Mean velocity.
    pub velocity: Option<f64>,
    /// Mean cycle time in days.
    pub cycle_time_days: Option<f64>,
    /// Mean predictability percentage.
    pub predictability_pct: Option<f64>,
    /// Mean efficiency.
    pub efficiency: Option<f64>,
    /// Mean rework percentage.
    pub rework_pct: Option<f64>,
}

/// Threshold ratings of the summary means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRatings {
    /// Cycle time rating.
    pub cycle_time_days: Option<MetricHealth>,
    /// Predictability rating.
    pub predictability_pct: Option<MetricHealth>,
    /// Efficiency rating.
    pub efficiency: Option<MetricHealth>,
    /// Rework rating.
    pub rework_pct: Option<MetricHealth>,
}

/// A sprint singled out by the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintHighlight {
    /// Canonical sprint label.
    pub period_id: String,
    /// Sprint velocity.
    pub velocity: f64,
    /// Sprint throughput.
    pub throughput: u32,
}

impl From<&PeriodMetrics> for SprintHighlight {
    fn from(metrics: &PeriodMetrics) -> Self {
        Self {
            period_id: metrics.period_id.clone(),
            velocity: metrics.velocity,
            throughput: metrics.throughput,
        }
    }
}

/// Summary statistics over all sprint rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Number of sprint rows.
    pub total_sprints: usize,
    /// Sum of sprint throughput.
    pub total_delivered: u32,
    /// Team size used for efficiency.
    pub team_size: TeamSize,
    /// Profile used for classification.
    pub profile: TeamProfile,
    /// Per-metric means.
    pub means: MetricMeans,
    /// Ratings of the means.
    pub ratings: MetricRatings,
    /// Highest-velocity sprint; ties go to the earliest sprint.
    pub best_sprint: SprintHighlight,
    /// Lowest-velocity sprint; ties go to the earliest sprint.
    pub worst_sprint: SprintHighlight,
}

/// Complete result of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Fingerprint of the configuration that produced the report.
    pub config_fingerprint: String,
    /// Sprint rows ordered by sprint number.
    pub sprint_metrics: Vec<PeriodMetrics>,
    /// Month rows in mapping order.
    pub month_metrics: Vec<PeriodMetrics>,
    /// Summary statistics.
    pub summary: MetricsSummary,
    /// Processing counts.
    pub stats: ProcessingStats,
    /// Recoverable problems, in the order they were found.
    pub warnings: Vec<Warning>,
}
