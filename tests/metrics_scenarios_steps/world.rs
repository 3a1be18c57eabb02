//! Shared world state for delivery metrics BDD scenarios.

use cadence::metrics::{
    domain::{MetricsReport, PeriodMetrics, RawTask, SprintMonthMap, TeamProfile},
    services::MetricsEngineResult,
};
use eyre::eyre;
use rstest::fixture;

/// Scenario world for metrics behaviour tests.
#[derive(Default)]
pub struct MetricsWorld {
    pub profile: Option<TeamProfile>,
    pub team_size: Option<i64>,
    pub sprint_month_map: Option<SprintMonthMap>,
    pub rows: Vec<RawTask>,
    pub outcome: Option<MetricsEngineResult<MetricsReport>>,
}

impl MetricsWorld {
    /// Returns the computed report, failing when the run did not succeed.
    pub fn report(&self) -> Result<&MetricsReport, eyre::Report> {
        match self.outcome.as_ref() {
            Some(Ok(report)) => Ok(report),
            Some(Err(err)) => Err(eyre!("metrics run failed: {err}")),
            None => Err(eyre!("metrics have not been computed")),
        }
    }

    /// Finds a sprint row by canonical label.
    pub fn sprint(&self, label: &str) -> Result<&PeriodMetrics, eyre::Report> {
        self.report()?
            .sprint_metrics
            .iter()
            .find(|row| row.period_id == label)
            .ok_or_else(|| eyre!("no sprint row '{label}'"))
    }

    /// Finds a month row by label.
    pub fn month(&self, label: &str) -> Result<&PeriodMetrics, eyre::Report> {
        self.report()?
            .month_metrics
            .iter()
            .find(|row| row.period_id == label)
            .ok_or_else(|| eyre!("no month row '{label}'"))
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MetricsWorld {
    MetricsWorld::default()
}
