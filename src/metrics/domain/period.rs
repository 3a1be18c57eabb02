//! Computed per-period metric records.

use super::{MonthLabel, SprintNumber};
use serde::{Deserialize, Serialize};

/// Granularity of a metrics period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// One unified sprint.
    Sprint,
    /// One calendar month built from mapped sprints.
    Month,
}

/// Metrics for a single sprint or month.
///
/// Records are created once per engine run and never updated. `None` means
/// a metric could not be computed for the period; zero means it was
/// computed and is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    /// Canonical sprint label (`Sprint 7`) or month label.
    pub period_id: String,
    /// Sprint or month.
    pub kind: PeriodKind,
    /// Sprint number for sprint rows.
    pub sprint_number: Option<SprintNumber>,
    /// Month a sprint row is reported under, if mapped.
    pub month: Option<MonthLabel>,
    /// Delivered task count.
    pub throughput: u32,
    /// Effective points of delivered tasks.
    pub velocity: f64,
    /// Mean days from start to ready-for-production over delivered tasks.
    pub cycle_time_days: Option<f64>,
    /// Median of the same cycle-time samples.
    pub cycle_time_median_days: Option<f64>,
    /// Number of delivered tasks with both cycle-time dates.
    pub cycle_time_samples: u32,
    /// Delivered points over eligible points, as a percentage.
    ///
    /// Never clamped to 100.
    pub predictability_pct: Option<f64>,
    /// Velocity per team member.
    pub efficiency: f64,
    /// Delivered defect points over delivered points, as a percentage.
    pub rework_pct: f64,
    /// Eligible task count.
    pub task_count: u32,
    /// Effective points of delivered tasks.
    pub delivered_points: f64,
    /// Effective points of eligible tasks.
    pub eligible_points: f64,
    /// Effective points of delivered defect tasks.
    pub defect_points: f64,
    /// Raw sprint labels merged into a sprint row, or the sprints
    /// contributing to a month row.
    pub source_labels: Vec<String>,
    /// Sprints aggregated into the row; always 1 for sprint rows.
    pub sprint_count: u32,
    /// Month rows only: throughput per contributing sprint.
    pub throughput_avg: Option<f64>,
    /// Month rows only: velocity per contributing sprint.
    pub velocity_avg: Option<f64>,
}

impl PeriodMetrics {
    /// Creates an all-zero record for a period.
    #[must_use]
    pub fn empty(period_id: impl Into<String>, kind: PeriodKind) -> Self {
        Self {
            period_id: period_id.into(),
            kind,
            sprint_number: None,
            month: None,
            throughput: 0,
            velocity: 0.0,
            cycle_time_days: None,
            cycle_time_median_days: None,
            cycle_time_samples: 0,
            predictability_pct: None,
            efficiency: 0.0,
            rework_pct: 0.0,
            task_count: 0,
            delivered_points: 0.0,
            eligible_points: 0.0,
            defect_points: 0.0,
            source_labels: Vec::new(),
            sprint_count: 0,
            throughput_avg: None,
            velocity_avg: None,
        }
    }
}
