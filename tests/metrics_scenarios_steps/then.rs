//! Then steps for delivery metrics BDD scenarios.

use super::world::MetricsWorld;
use cadence::metrics::services::MetricsEngineError;
use eyre::eyre;
use rstest_bdd_macros::then;

const TOLERANCE: f64 = 1e-9;

fn check_close(what: &str, actual: f64, expected: f64) -> Result<(), eyre::Report> {
    if (actual - expected).abs() < TOLERANCE {
        Ok(())
    } else {
        Err(eyre!("expected {what} {expected}, found {actual}"))
    }
}

#[then(r#"sprint "{label}" has throughput {expected:u32}"#)]
fn sprint_throughput(world: &MetricsWorld, label: String, expected: u32) -> Result<(), eyre::Report> {
    let sprint = world.sprint(&label)?;
    if sprint.throughput != expected {
        return Err(eyre!(
            "expected throughput {expected}, found {}",
            sprint.throughput
        ));
    }
    Ok(())
}

#[then(r#"sprint "{label}" has velocity {expected:f64}"#)]
fn sprint_velocity(world: &MetricsWorld, label: String, expected: f64) -> Result<(), eyre::Report> {
    check_close("velocity", world.sprint(&label)?.velocity, expected)
}

#[then(r#"sprint "{label}" has predictability {expected:f64}"#)]
fn sprint_predictability(
    world: &MetricsWorld,
    label: String,
    expected: f64,
) -> Result<(), eyre::Report> {
    let predictability = world
        .sprint(&label)?
        .predictability_pct
        .ok_or_else(|| eyre!("predictability is null for {label}"))?;
    check_close("predictability", predictability, expected)
}

#[then(r#"sprint "{label}" has no predictability"#)]
fn sprint_without_predictability(world: &MetricsWorld, label: String) -> Result<(), eyre::Report> {
    match world.sprint(&label)?.predictability_pct {
        None => Ok(()),
        Some(value) => Err(eyre!("expected null predictability, found {value}")),
    }
}

#[then(r#"month "{label}" has velocity {expected:f64}"#)]
fn month_velocity(world: &MetricsWorld, label: String, expected: f64) -> Result<(), eyre::Report> {
    check_close("velocity", world.month(&label)?.velocity, expected)
}

#[then(r#"month "{label}" has throughput {expected:u32}"#)]
fn month_throughput(world: &MetricsWorld, label: String, expected: u32) -> Result<(), eyre::Report> {
    let month = world.month(&label)?;
    if month.throughput != expected {
        return Err(eyre!(
            "expected throughput {expected}, found {}",
            month.throughput
        ));
    }
    Ok(())
}

#[then("the run fails because no period is valid")]
fn run_fails_without_valid_periods(world: &MetricsWorld) -> Result<(), eyre::Report> {
    match world.outcome.as_ref() {
        Some(Err(MetricsEngineError::NoValidPeriods)) => Ok(()),
        Some(Err(other)) => Err(eyre!("expected no valid periods, got {other}")),
        Some(Ok(_)) => Err(eyre!("expected the run to fail, but a report was produced")),
        None => Err(eyre!("metrics have not been computed")),
    }
}
