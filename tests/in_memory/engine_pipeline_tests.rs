//! End-to-end metrics tests for [`MetricsEngine`] over an in-memory source.

use crate::in_memory::helpers::{delivered, engine, engine_for, in_progress, quarter_source};
use cadence::metrics::{
    adapters::InMemoryTaskSource,
    domain::{MetricsConfig, MetricsReport, PeriodMetrics, SprintMonthMap, TeamProfile, TeamSize},
    ports::TaskSourceError,
    services::{MetricsEngine, MetricsEngineError, MetricsRunError},
};
use eyre::{Result, ensure, eyre};
use rstest::rstest;

const TOLERANCE: f64 = 1e-6;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < TOLERANCE
}

fn sprint_figures(report: &MetricsReport) -> Vec<(String, u32, f64, Option<f64>)> {
    report
        .sprint_metrics
        .iter()
        .map(|row| {
            (
                row.period_id.clone(),
                row.throughput,
                row.velocity,
                row.predictability_pct,
            )
        })
        .collect()
}

fn period<'a>(rows: &'a [PeriodMetrics], id: &str) -> Result<&'a PeriodMetrics> {
    rows.iter()
        .find(|row| row.period_id == id)
        .ok_or_else(|| eyre!("no period '{id}'"))
}

#[rstest]
fn sprint_rows_cover_completed_sprints(
    engine: MetricsEngine,
    quarter_source: InMemoryTaskSource,
) -> Result<()> {
    let report = engine.run(&quarter_source)?;
    let ids: Vec<&str> = report
        .sprint_metrics
        .iter()
        .map(|row| row.period_id.as_str())
        .collect();
    ensure!(ids == ["Sprint 3", "Sprint 4", "Sprint 5"], "sprints were {ids:?}");

    let third = period(&report.sprint_metrics, "Sprint 3")?;
    ensure!(third.throughput == 2, "throughput was {}", third.throughput);
    ensure!(close(third.velocity, 8.0), "velocity was {}", third.velocity);
    ensure!(
        third.predictability_pct.is_some_and(|value| close(value, 50.0)),
        "predictability was {:?}",
        third.predictability_pct
    );
    ensure!(close(third.efficiency, 1.6), "efficiency was {}", third.efficiency);
    ensure!(
        third.cycle_time_days.is_some_and(|value| close(value, 7.0)),
        "cycle time was {:?}",
        third.cycle_time_days
    );

    let fourth = period(&report.sprint_metrics, "Sprint 4")?;
    ensure!(fourth.throughput == 1, "copy must not count as delivered");
    ensure!(close(fourth.rework_pct, 100.0), "rework was {}", fourth.rework_pct);

    let fifth = period(&report.sprint_metrics, "Sprint 5")?;
    ensure!(
        fifth.source_labels == ["Sprint 05 FIDSIN", "Sprint 5 Auto3P"],
        "labels were {:?}",
        fifth.source_labels
    );
    ensure!(
        fifth.cycle_time_days.is_some_and(|value| close(value, 10.0)),
        "cycle time was {:?}",
        fifth.cycle_time_days
    );
    Ok(())
}

#[rstest]
fn month_rows_weight_sprint_figures(
    engine: MetricsEngine,
    quarter_source: InMemoryTaskSource,
) -> Result<()> {
    let report = engine.run(&quarter_source)?;
    let august = period(&report.month_metrics, "Agosto")?;

    ensure!(august.throughput == 3, "throughput was {}", august.throughput);
    ensure!(close(august.velocity, 10.0), "velocity was {}", august.velocity);
    ensure!(
        august.predictability_pct.is_some_and(|value| close(value, 62.5)),
        "predictability was {:?}",
        august.predictability_pct
    );
    ensure!(close(august.efficiency, 1.3), "efficiency was {}", august.efficiency);
    ensure!(
        close(august.rework_pct, 100.0 / 3.0),
        "rework was {}",
        august.rework_pct
    );

    let september = period(&report.month_metrics, "Septiembre")?;
    ensure!(
        september.source_labels == ["Sprint 5"],
        "sources were {:?}",
        september.source_labels
    );
    Ok(())
}

#[rstest]
fn summary_reports_means_and_extremes(
    engine: MetricsEngine,
    quarter_source: InMemoryTaskSource,
) -> Result<()> {
    let report = engine.run(&quarter_source)?;
    let summary = &report.summary;

    ensure!(summary.total_sprints == 3, "total sprints {}", summary.total_sprints);
    ensure!(summary.total_delivered == 4, "total delivered {}", summary.total_delivered);
    ensure!(summary.best_sprint.period_id == "Sprint 3", "best tie goes to earliest");
    ensure!(
        summary.worst_sprint.period_id == "Sprint 4",
        "worst was {}",
        summary.worst_sprint.period_id
    );
    ensure!(
        summary.means.velocity.is_some_and(|value| close(value, 6.0)),
        "mean velocity was {:?}",
        summary.means.velocity
    );
    ensure!(report.warnings.is_empty(), "warnings were {:?}", report.warnings);
    Ok(())
}

#[rstest]
fn stats_count_scope_and_copies(
    engine: MetricsEngine,
    quarter_source: InMemoryTaskSource,
) -> Result<()> {
    let stats = engine.run(&quarter_source)?.stats;

    ensure!(stats.rows_received == 8, "stats were {stats:?}");
    ensure!(stats.copies_tagged == 1, "stats were {stats:?}");
    ensure!(stats.in_scope_tasks == 7, "stats were {stats:?}");
    ensure!(stats.ineligible_tasks == 1, "stats were {stats:?}");
    ensure!(stats.delivered_tasks == 4, "stats were {stats:?}");
    ensure!(stats.completed_sprints == 3, "stats were {stats:?}");
    Ok(())
}

#[rstest]
fn alternate_configurations_run_side_by_side(quarter_source: InMemoryTaskSource) -> Result<()> {
    let productive = engine_for(TeamProfile::Productive, 5);
    let remapped = MetricsEngine::new(
        MetricsConfig::new(TeamProfile::Productive, TeamSize::new(5)?)
            .with_sprint_month_map(SprintMonthMap::parse("Sprint 3:Q3,Sprint 4:Q3,Sprint 5:Q3")?),
    )?;

    let default_report = productive.run(&quarter_source)?;
    let remapped_report = remapped.run(&quarter_source)?;

    ensure!(
        sprint_figures(&default_report) == sprint_figures(&remapped_report),
        "sprint figures must not depend on the mapping"
    );
    ensure!(remapped_report.month_metrics.len() == 1, "expected one quarter row");
    ensure!(
        default_report.config_fingerprint != remapped_report.config_fingerprint,
        "fingerprints must differ"
    );
    Ok(())
}

#[rstest]
fn in_development_profile_counts_qa_certified_work() -> Result<()> {
    let source = InMemoryTaskSource::new([
        delivered("Shipped", 3, "Sprint 4"),
        in_progress("Certified", 5, "Sprint 4").with_state("9. Certificado QA"),
        in_progress("Placeholder", 0, "Sprint 4").with_state("9. Certificado QA"),
    ]);

    let productive = engine_for(TeamProfile::Productive, 2).run(&source)?;
    let developing = engine_for(TeamProfile::InDevelopment, 2).run(&source)?;

    let productive_sprint = period(&productive.sprint_metrics, "Sprint 4")?;
    let developing_sprint = period(&developing.sprint_metrics, "Sprint 4")?;
    ensure!(productive_sprint.throughput == 1, "productive throughput");
    ensure!(productive_sprint.task_count == 3, "productive task count");
    ensure!(developing_sprint.throughput == 2, "in-development throughput");
    ensure!(developing_sprint.task_count == 2, "placeholder must be excluded");
    ensure!(close(developing_sprint.velocity, 8.0), "in-development velocity");
    Ok(())
}

#[rstest]
fn sources_without_completed_sprints_fail(engine: MetricsEngine) {
    let source = InMemoryTaskSource::new([in_progress("Open", 3, "Sprint 4")
        .with_sprint_completed("")]);

    assert!(matches!(
        engine.run(&source),
        Err(MetricsRunError::Engine(MetricsEngineError::NoValidPeriods))
    ));
}

#[rstest]
fn empty_sources_fail_before_computation(engine: MetricsEngine) {
    assert!(matches!(
        engine.run(&InMemoryTaskSource::default()),
        Err(MetricsRunError::Source(TaskSourceError::Empty))
    ));
}
