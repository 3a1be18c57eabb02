//! Given steps for delivery metrics BDD scenarios.

use super::world::MetricsWorld;
use cadence::metrics::domain::{RawTask, SprintMonthMap, TeamProfile};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a team with profile "{profile}" and {members:i64} members"#)]
fn team(world: &mut MetricsWorld, profile: String, members: i64) -> Result<(), eyre::Report> {
    let parsed = TeamProfile::try_from(profile.as_str()).wrap_err("parse scenario profile")?;
    world.profile = Some(parsed);
    world.team_size = Some(members);
    Ok(())
}

#[given(r#"the sprint mapping "{mapping}""#)]
fn sprint_mapping(world: &mut MetricsWorld, mapping: String) -> Result<(), eyre::Report> {
    let parsed = SprintMonthMap::parse(&mapping).wrap_err("parse scenario sprint mapping")?;
    world.sprint_month_map = Some(parsed);
    Ok(())
}

#[given(
    r#"a task "{name}" in state "{state}" worth {points:u32} points in completed sprint "{sprint}""#
)]
fn completed_task(
    world: &mut MetricsWorld,
    name: String,
    state: String,
    points: u32,
    sprint: String,
) {
    world.rows.push(
        RawTask::new(name)
            .with_state(state)
            .with_estimated_points(points)
            .with_sprint(sprint)
            .completed(),
    );
}

#[given(r#"a task "{name}" in state "{state}" worth {points:u32} points in open sprint "{sprint}""#)]
fn open_task(world: &mut MetricsWorld, name: String, state: String, points: u32, sprint: String) {
    world.rows.push(
        RawTask::new(name)
            .with_state(state)
            .with_estimated_points(points)
            .with_sprint(sprint)
            .with_sprint_completed("no"),
    );
}
