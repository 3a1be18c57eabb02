//! Facade running the full pipeline: normalise, classify, aggregate,
//! summarise.

use super::aggregator::PeriodAggregator;
use super::classifier::{ClassifiedTask, DeliveryClassifier};
use super::normalizer::TaskNormalizer;
use super::stats::mean;
use crate::metrics::domain::{
    MetricMeans, MetricRatings, MetricsConfig, MetricsDomainError, MetricsReport, MetricsSummary,
    PeriodMetrics, ProcessingStats, RawTask, SprintHighlight, SprintMonthMap, TeamProfile,
    TeamSize, Thresholds,
};
use crate::metrics::ports::{TaskSource, TaskSourceError};
use thiserror::Error;
use tracing::info;

/// Errors that stop a metrics run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricsEngineError {
    /// No task sits in a completed sprint with a valid sprint label.
    #[error(
        "no valid periods: at least one task must belong to a completed sprint with a 'Sprint <number>' label"
    )]
    NoValidPeriods,

    /// The configuration was rejected before computation started.
    #[error(transparent)]
    Config(#[from] MetricsDomainError),
}

/// Result type for engine operations.
pub type MetricsEngineResult<T> = Result<T, MetricsEngineError>;

/// Errors from a run that also loads its input.
#[derive(Debug, Error)]
pub enum MetricsRunError {
    /// The input collaborator failed.
    #[error(transparent)]
    Source(#[from] TaskSourceError),
    /// The computation failed.
    #[error(transparent)]
    Engine(#[from] MetricsEngineError),
}

/// Metrics pipeline bound to one configuration.
///
/// Each call to [`MetricsEngine::compute`] recomputes from scratch; the
/// engine holds no state between runs.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Creates an engine after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsEngineError::Config`] when the configuration version
    /// is unsupported.
    pub fn new(config: MetricsConfig) -> MetricsEngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Computes sprint metrics, month metrics, and a summary.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsEngineError::NoValidPeriods`] when no task belongs to
    /// a completed, well-labelled sprint. No partial output is produced.
    pub fn compute(&self, rows: &[RawTask]) -> MetricsEngineResult<MetricsReport> {
        let normalized = TaskNormalizer::new().normalize(rows);
        let classifier = DeliveryClassifier::new(self.config.profile());
        let classified = classifier.classify_all(&normalized.tasks);

        let aggregation =
            PeriodAggregator::new(self.config.team_size(), self.config.sprint_month_map())
                .aggregate(&classified);
        if aggregation.sprints.is_empty() {
            return Err(MetricsEngineError::NoValidPeriods);
        }

        let summary = self
            .summarize(&aggregation.sprints)
            .ok_or(MetricsEngineError::NoValidPeriods)?;
        let stats = ProcessingStats {
            rows_received: normalized.rows_received,
            rows_skipped: normalized.rows_skipped,
            tasks_retained: normalized.tasks.len(),
            copies_tagged: normalized.copies_tagged(),
            carry_over_tasks: normalized
                .tasks
                .iter()
                .filter(|task| task.carry_over())
                .count(),
            completed_sprints: aggregation.sprints.len(),
            ..scope_counts(&classified)
        };

        let mut warnings = normalized.warnings;
        warnings.extend(aggregation.warnings);
        info!(
            profile = %self.config.profile(),
            sprints = aggregation.sprints.len(),
            months = aggregation.months.len(),
            warnings = warnings.len(),
            "computed delivery metrics"
        );

        Ok(MetricsReport {
            config_fingerprint: self.config.fingerprint(),
            sprint_metrics: aggregation.sprints,
            month_metrics: aggregation.months,
            summary,
            stats,
            warnings,
        })
    }

    /// Loads rows from a source and computes metrics over them.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsRunError::Source`] when loading fails and
    /// [`MetricsRunError::Engine`] when computation fails.
    pub fn run(&self, source: &impl TaskSource) -> Result<MetricsReport, MetricsRunError> {
        let rows = source.load()?;
        Ok(self.compute(&rows)?)
    }

    fn summarize(&self, sprints: &[PeriodMetrics]) -> Option<MetricsSummary> {
        let (best, worst) = velocity_extremes(sprints)?;
        let means = MetricMeans {
            throughput: mean(
                &sprints
                    .iter()
                    .map(|row| f64::from(row.throughput))
                    .collect::<Vec<_>>(),
            ),
            velocity: mean(&sprints.iter().map(|row| row.velocity).collect::<Vec<_>>()),
            cycle_time_days: mean(
                &sprints
                    .iter()
                    .filter_map(|row| row.cycle_time_days)
                    .collect::<Vec<_>>(),
            ),
            predictability_pct: mean(
                &sprints
                    .iter()
                    .filter_map(|row| row.predictability_pct)
                    .collect::<Vec<_>>(),
            ),
            efficiency: mean(&sprints.iter().map(|row| row.efficiency).collect::<Vec<_>>()),
            rework_pct: mean(&sprints.iter().map(|row| row.rework_pct).collect::<Vec<_>>()),
        };

        Some(MetricsSummary {
            total_sprints: sprints.len(),
            total_delivered: sprints.iter().map(|row| row.throughput).sum(),
            team_size: self.config.team_size(),
            profile: self.config.profile(),
            ratings: rate(&means, self.config.thresholds()),
            means,
            best_sprint: SprintHighlight::from(best),
            worst_sprint: SprintHighlight::from(worst),
        })
    }
}

/// Computes metrics for one run in a single call.
///
/// `team_size` is validated here, so a non-positive value is rejected before
/// any computation starts.
///
/// # Errors
///
/// Returns [`MetricsEngineError::Config`] for an invalid team size and
/// [`MetricsEngineError::NoValidPeriods`] when no sprint can be analysed.
///
/// # Examples
///
/// ```
/// use cadence::metrics::domain::{RawTask, SprintMonthMap, TeamProfile};
/// use cadence::metrics::services::compute;
///
/// let rows = vec![
///     RawTask::new("Checkout flow")
///         .with_state("13. Producción")
///         .with_estimated_points(5)
///         .with_sprint("Sprint 4")
///         .completed(),
/// ];
/// let report = compute(&rows, TeamProfile::Productive, 5, SprintMonthMap::default())
///     .expect("one completed sprint");
/// assert_eq!(report.sprint_metrics.len(), 1);
/// assert_eq!(report.summary.total_delivered, 1);
/// ```
pub fn compute(
    rows: &[RawTask],
    profile: TeamProfile,
    team_size: i64,
    sprint_month_map: SprintMonthMap,
) -> MetricsEngineResult<MetricsReport> {
    let config = MetricsConfig::new(profile, TeamSize::new(team_size)?)
        .with_sprint_month_map(sprint_month_map);
    MetricsEngine::new(config)?.compute(rows)
}

/// Returns the highest and lowest velocity sprints; the earliest wins ties.
fn velocity_extremes(sprints: &[PeriodMetrics]) -> Option<(&PeriodMetrics, &PeriodMetrics)> {
    let first = sprints.first()?;
    Some(
        sprints
            .iter()
            .fold((first, first), |(best, worst), candidate| {
                let next_best = if candidate.velocity > best.velocity {
                    candidate
                } else {
                    best
                };
                let next_worst = if candidate.velocity < worst.velocity {
                    candidate
                } else {
                    worst
                };
                (next_best, next_worst)
            }),
    )
}

fn scope_counts(classified: &[ClassifiedTask<'_>]) -> ProcessingStats {
    classified
        .iter()
        .filter(|entry| entry.task.is_in_scope())
        .fold(ProcessingStats::default(), |mut stats, entry| {
            stats.in_scope_tasks += 1;
            if !entry.classification.is_eligible() {
                stats.ineligible_tasks += 1;
            }
            if entry.classification.is_delivered() {
                stats.delivered_tasks += 1;
            }
            stats
        })
}

fn rate(means: &MetricMeans, thresholds: &Thresholds) -> MetricRatings {
    MetricRatings {
        cycle_time_days: means
            .cycle_time_days
            .map(|value| thresholds.rate_cycle_time(value)),
        predictability_pct: means
            .predictability_pct
            .map(|value| thresholds.rate_predictability(value)),
        efficiency: means
            .efficiency
            .map(|value| thresholds.rate_efficiency(value)),
        rework_pct: means.rework_pct.map(|value| thresholds.rate_rework(value)),
    }
}
