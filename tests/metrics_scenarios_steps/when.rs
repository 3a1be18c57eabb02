//! When steps for delivery metrics BDD scenarios.

use super::world::MetricsWorld;
use cadence::metrics::{
    domain::{MetricsConfig, TeamSize},
    services::MetricsEngine,
};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::when;

#[when("the metrics are computed")]
fn metrics_are_computed(world: &mut MetricsWorld) -> Result<(), eyre::Report> {
    let profile = world
        .profile
        .ok_or_else(|| eyre!("missing team profile in scenario world"))?;
    let members = world
        .team_size
        .ok_or_else(|| eyre!("missing team size in scenario world"))?;
    let mut config = MetricsConfig::new(profile, TeamSize::new(members)?);
    if let Some(map) = world.sprint_month_map.clone() {
        config = config.with_sprint_month_map(map);
    }

    let engine = MetricsEngine::new(config).wrap_err("build scenario engine")?;
    world.outcome = Some(engine.compute(&world.rows));
    Ok(())
}
