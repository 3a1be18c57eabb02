//! Groups classified tasks by sprint and month and computes period metrics.

use super::classifier::ClassifiedTask;
use super::stats::{WeightedMean, len_as_f64, mean, median};
use crate::metrics::domain::{
    MonthLabel, PeriodKind, PeriodMetrics, SprintMonthMap, SprintNumber, TeamSize, Warning,
    WarningKind,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

const PERCENT: f64 = 100.0;

/// Sprint and month rows produced by one aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Sprint rows ordered by sprint number.
    pub sprints: Vec<PeriodMetrics>,
    /// Month rows in mapping order.
    pub months: Vec<PeriodMetrics>,
    /// Sprints left out of month rows.
    pub warnings: Vec<Warning>,
}

/// Computes the six metrics per sprint and per mapped month.
#[derive(Debug, Clone)]
pub struct PeriodAggregator<'a> {
    team_size: TeamSize,
    month_map: &'a SprintMonthMap,
}

impl<'a> PeriodAggregator<'a> {
    /// Creates an aggregator for a team size and month mapping.
    #[must_use]
    pub const fn new(team_size: TeamSize, month_map: &'a SprintMonthMap) -> Self {
        Self {
            team_size,
            month_map,
        }
    }

    /// Aggregates classified tasks.
    ///
    /// Only tasks in a closed sprint with a valid label are in scope. Every
    /// sprint with at least one in-scope task gets a row, even when none of
    /// its tasks is eligible.
    #[must_use]
    pub fn aggregate(&self, tasks: &[ClassifiedTask<'_>]) -> Aggregation {
        let mut accumulators: BTreeMap<SprintNumber, PeriodAccumulator> = BTreeMap::new();
        for classified in tasks {
            if !classified.task.is_in_scope() {
                continue;
            }
            if let Some(sprint) = classified.task.sprint_number() {
                accumulators.entry(sprint).or_default().add(classified);
            }
        }

        let sprints: Vec<PeriodMetrics> = accumulators
            .iter()
            .map(|(sprint, accumulator)| self.sprint_metrics(*sprint, accumulator))
            .collect();
        let (months, warnings) = self.month_metrics(&sprints, &accumulators);
        debug!(
            sprints = sprints.len(),
            months = months.len(),
            "aggregated period metrics"
        );

        Aggregation {
            sprints,
            months,
            warnings,
        }
    }

    fn sprint_metrics(&self, sprint: SprintNumber, accumulator: &PeriodAccumulator) -> PeriodMetrics {
        let velocity = accumulator.delivered_points;
        PeriodMetrics {
            sprint_number: Some(sprint),
            month: self.month_map.month_for(sprint).cloned(),
            throughput: accumulator.throughput,
            velocity,
            cycle_time_days: mean(&accumulator.cycle_times),
            cycle_time_median_days: median(&accumulator.cycle_times),
            cycle_time_samples: accumulator.cycle_time_samples(),
            predictability_pct: predictability(
                accumulator.delivered_points,
                accumulator.eligible_points,
            ),
            efficiency: self.efficiency(velocity),
            rework_pct: rework(accumulator.defect_points, accumulator.delivered_points),
            task_count: accumulator.task_count,
            delivered_points: accumulator.delivered_points,
            eligible_points: accumulator.eligible_points,
            defect_points: accumulator.defect_points,
            source_labels: accumulator.labels.iter().cloned().collect(),
            sprint_count: 1,
            ..PeriodMetrics::empty(sprint.label(), PeriodKind::Sprint)
        }
    }

    fn month_metrics(
        &self,
        sprints: &[PeriodMetrics],
        accumulators: &BTreeMap<SprintNumber, PeriodAccumulator>,
    ) -> (Vec<PeriodMetrics>, Vec<Warning>) {
        let mut warnings = Vec::new();
        let mut months: BTreeMap<&MonthLabel, MonthAccumulator> = BTreeMap::new();

        for sprint_row in sprints {
            let Some(sprint) = sprint_row.sprint_number else {
                continue;
            };
            let Some(month) = self.month_map.month_for(sprint) else {
                let message = format!(
                    "{} has no month in the sprint mapping; excluded from month metrics",
                    sprint_row.period_id
                );
                warn!(sprint = sprint.value(), "{message}");
                warnings.push(Warning::general(WarningKind::UnmappedSprint, message));
                continue;
            };
            let samples = accumulators
                .get(&sprint)
                .map(|accumulator| accumulator.cycle_times.as_slice())
                .unwrap_or_default();
            months.entry(month).or_default().add(sprint_row, samples);
        }

        let rows = self
            .month_map
            .month_order()
            .into_iter()
            .filter_map(|month| {
                months
                    .get(month)
                    .map(|accumulator| self.finish_month(month, accumulator))
            })
            .collect();
        (rows, warnings)
    }

    fn finish_month(&self, month: &MonthLabel, accumulator: &MonthAccumulator) -> PeriodMetrics {
        PeriodMetrics {
            month: Some(month.clone()),
            throughput: accumulator.throughput,
            velocity: accumulator.velocity,
            cycle_time_days: accumulator.cycle_time.value(),
            cycle_time_median_days: median(&accumulator.cycle_times),
            cycle_time_samples: accumulator.cycle_time_samples,
            predictability_pct: accumulator.predictability.value(),
            efficiency: accumulator
                .efficiency
                .value()
                .unwrap_or_else(|| self.efficiency(accumulator.velocity)),
            rework_pct: accumulator.rework.value().unwrap_or(0.0),
            task_count: accumulator.task_count,
            delivered_points: accumulator.delivered_points,
            eligible_points: accumulator.eligible_points,
            defect_points: accumulator.defect_points,
            source_labels: accumulator.sprint_labels.clone(),
            sprint_count: accumulator.sprint_count(),
            throughput_avg: accumulator.per_sprint(f64::from(accumulator.throughput)),
            velocity_avg: accumulator.per_sprint(accumulator.velocity),
            ..PeriodMetrics::empty(month.as_str(), PeriodKind::Month)
        }
    }

    fn efficiency(&self, velocity: f64) -> f64 {
        velocity / f64::from(self.team_size.value())
    }
}

/// `100 × delivered / eligible`, or `None` when nothing was eligible.
fn predictability(delivered_points: f64, eligible_points: f64) -> Option<f64> {
    (eligible_points > 0.0).then(|| PERCENT * delivered_points / eligible_points)
}

/// `100 × defect / delivered`, or zero when nothing was delivered.
fn rework(defect_points: f64, delivered_points: f64) -> f64 {
    if delivered_points > 0.0 {
        PERCENT * defect_points / delivered_points
    } else {
        0.0
    }
}

#[derive(Debug, Default)]
struct PeriodAccumulator {
    throughput: u32,
    task_count: u32,
    delivered_points: f64,
    eligible_points: f64,
    defect_points: f64,
    cycle_times: Vec<f64>,
    labels: BTreeSet<String>,
}

impl PeriodAccumulator {
    fn add(&mut self, classified: &ClassifiedTask<'_>) {
        let task = classified.task;
        if let Some(label) = task.sprint() {
            self.labels.insert(label.raw().to_owned());
        }
        if !classified.classification.is_eligible() {
            return;
        }

        let points = task.effective_points();
        self.task_count = self.task_count.saturating_add(1);
        self.eligible_points += points;
        if !classified.classification.is_delivered() {
            return;
        }

        self.throughput = self.throughput.saturating_add(1);
        self.delivered_points += points;
        if task.kind().is_defect() {
            self.defect_points += points;
        }
        if let Some(days) = task
            .cycle_time_days()
            .and_then(|days| i32::try_from(days).ok())
        {
            self.cycle_times.push(f64::from(days));
        }
    }

    fn cycle_time_samples(&self) -> u32 {
        u32::try_from(self.cycle_times.len()).unwrap_or(u32::MAX)
    }
}

/// Month totals plus task-count weighted averages of sprint figures.
#[derive(Debug, Default)]
struct MonthAccumulator {
    throughput: u32,
    velocity: f64,
    task_count: u32,
    delivered_points: f64,
    eligible_points: f64,
    defect_points: f64,
    cycle_time_samples: u32,
    cycle_times: Vec<f64>,
    cycle_time: WeightedMean,
    predictability: WeightedMean,
    efficiency: WeightedMean,
    rework: WeightedMean,
    sprint_labels: Vec<String>,
}

impl MonthAccumulator {
    fn add(&mut self, sprint: &PeriodMetrics, samples: &[f64]) {
        self.throughput = self.throughput.saturating_add(sprint.throughput);
        self.velocity += sprint.velocity;
        self.task_count = self.task_count.saturating_add(sprint.task_count);
        self.delivered_points += sprint.delivered_points;
        self.eligible_points += sprint.eligible_points;
        self.defect_points += sprint.defect_points;
        self.cycle_time_samples = self
            .cycle_time_samples
            .saturating_add(sprint.cycle_time_samples);
        self.cycle_times.extend_from_slice(samples);

        if let Some(cycle_time) = sprint.cycle_time_days {
            self.cycle_time.add(cycle_time, sprint.cycle_time_samples);
        }
        if let Some(predictability) = sprint.predictability_pct {
            self.predictability.add(predictability, sprint.task_count);
        }
        self.efficiency.add(sprint.efficiency, sprint.task_count);
        self.rework.add(sprint.rework_pct, sprint.throughput);
        self.sprint_labels.push(sprint.period_id.clone());
    }

    fn sprint_count(&self) -> u32 {
        u32::try_from(self.sprint_labels.len()).unwrap_or(u32::MAX)
    }

    /// `total` spread over the contributing sprints.
    fn per_sprint(&self, total: f64) -> Option<f64> {
        (!self.sprint_labels.is_empty()).then(|| total / len_as_f64(self.sprint_labels.len()))
    }
}
