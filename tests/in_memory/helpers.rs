//! Shared test helpers for pipeline integration tests.

use cadence::metrics::{
    adapters::InMemoryTaskSource,
    domain::{MetricsConfig, RawTask, TeamProfile, TeamSize},
    services::MetricsEngine,
};
use rstest::fixture;

/// A raw row delivered in production in a closed sprint.
#[must_use]
pub fn delivered(name: &str, points: u32, sprint: &str) -> RawTask {
    RawTask::new(name)
        .with_state("13. Producción")
        .with_task_type("HDU")
        .with_estimated_points(points)
        .with_sprint(sprint)
        .completed()
}

/// A raw row still in progress in a closed sprint.
#[must_use]
pub fn in_progress(name: &str, points: u32, sprint: &str) -> RawTask {
    RawTask::new(name)
        .with_state("5. En desarrollo")
        .with_task_type("HDU")
        .with_estimated_points(points)
        .with_sprint(sprint)
        .completed()
}

/// Builds an engine with the default mapping and thresholds.
///
/// # Panics
///
/// Panics if `team_size` is not positive.
#[must_use]
pub fn engine_for(profile: TeamProfile, team_size: i64) -> MetricsEngine {
    let size = TeamSize::new(team_size).expect("positive team size");
    MetricsEngine::new(MetricsConfig::new(profile, size)).expect("valid configuration")
}

/// Provides a productive engine for a five-person team.
#[fixture]
pub fn engine() -> MetricsEngine {
    engine_for(TeamProfile::Productive, 5)
}

/// Provides a source covering three sprints across two months.
#[fixture]
pub fn quarter_source() -> InMemoryTaskSource {
    InMemoryTaskSource::new([
        delivered("Login page", 5, "Sprint 3"),
        delivered("Session refresh", 3, "Sprint 3")
            .with_start_date("2025-08-01")
            .with_ready_for_production_date("2025-08-08"),
        in_progress("Audit log", 8, "Sprint 3"),
        delivered("Audit log (copy)", 8, "Sprint 4"),
        delivered("Login crash", 2, "Sprint 4").with_task_type("Bug"),
        delivered("Reports", 8, "Sprint 05 FIDSIN")
            .with_start_date("01/09/2025")
            .with_ready_for_production_date("2025-09-11T17:00:00"),
        in_progress("Exports", 4, "Sprint 5 Auto3P"),
        in_progress("Next quarter", 5, "Sprint 6").with_sprint_completed("no"),
    ])
}
