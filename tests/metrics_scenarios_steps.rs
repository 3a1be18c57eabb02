//! Behaviour tests for delivery metrics scenarios.

#[path = "metrics_scenarios_steps/mod.rs"]
mod metrics_scenarios_steps_defs;

use metrics_scenarios_steps_defs::world::{MetricsWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/metrics_scenarios.feature",
    name = "Zero-point placeholder at QA certification is excluded"
)]
fn zero_point_placeholder_is_excluded(world: MetricsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/metrics_scenarios.feature",
    name = "A copy delivered alongside its original is not double counted"
)]
fn copy_is_not_double_counted(world: MetricsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/metrics_scenarios.feature",
    name = "Predictability compares delivered and committed points"
)]
fn predictability_compares_points(world: MetricsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/metrics_scenarios.feature",
    name = "No completed sprint stops the run"
)]
fn no_completed_sprint_stops_the_run(world: MetricsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/metrics_scenarios.feature",
    name = "Sprints are reported under their mapped month"
)]
fn sprints_are_reported_under_their_month(world: MetricsWorld) {
    let _ = world;
}
