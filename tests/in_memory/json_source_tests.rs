//! Export file tests for [`JsonFileTaskSource`].

use crate::in_memory::helpers::engine;
use cadence::metrics::{
    adapters::JsonFileTaskSource,
    ports::{TaskSource, TaskSourceError},
    services::{MetricsEngine, MetricsRunError},
};
use camino::Utf8PathBuf;
use eyre::{Result, ensure, eyre};
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

const EXPORT: &str = r#"[
  {"Item ID": "T-1", "Name": "Login page", "Estado": "13. Producción", "Tipo Tarea": "HDU",
   "Estimación Original": 5, "Fecha Inicio": "2025-08-01",
   "Fecha Ready for Production": "2025-08-04", "Sprint": "Sprint 3",
   "Sprint Completed?": "Sí", "Carry over": null},
  {"Item ID": "T-2", "Name": "Login page (copia)", "Estado": "13. Producción",
   "Tipo Tarea": "HDU", "Estimación Original": 5, "Fecha Inicio": "",
   "Sprint": "Sprint 4", "Sprint Completed?": "✓"},
  {"Item ID": "T-3", "Name": "Crash on save", "Estado": "11. Ready for Product Release",
   "Tipo Tarea": "Bug", "Estimación Original": "3", "Puntos Logrados": 2,
   "Fecha Inicio": "05/08/2025", "Sprint": "Sprint 04 FIDSIN", "Sprint Completed?": true},
  {"Item ID": "T-4", "Name": "", "Estado": "1. Backlog", "Tipo Tarea": "HDU",
   "Estimación Original": 1, "Fecha Inicio": null, "Sprint": "Sprint 4",
   "Sprint Completed?": "x"}
]"#;

fn write_export(contents: &str) -> Result<(TempDir, Utf8PathBuf)> {
    let dir = TempDir::new()?;
    let path = Utf8PathBuf::from_path_buf(dir.path().join("export.json"))
        .map_err(|path| eyre!("non UTF-8 temp path {}", path.display()))?;
    fs::write(&path, contents)?;
    Ok((dir, path))
}

#[rstest]
fn export_file_produces_a_report(engine: MetricsEngine) -> Result<()> {
    let (_dir, path) = write_export(EXPORT)?;
    let source = JsonFileTaskSource::new(path.clone());

    let report = engine.run(&source)?;

    ensure!(source.path() == path.as_path(), "path not retained");
    ensure!(report.stats.rows_received == 4, "stats were {:?}", report.stats);
    ensure!(report.stats.rows_skipped == 1, "stats were {:?}", report.stats);
    ensure!(report.stats.copies_tagged == 1, "stats were {:?}", report.stats);

    let velocities: Vec<(&str, f64)> = report
        .sprint_metrics
        .iter()
        .map(|row| (row.period_id.as_str(), row.velocity))
        .collect();
    ensure!(
        velocities == [("Sprint 3", 5.0), ("Sprint 4", 2.0)],
        "velocities were {velocities:?}"
    );
    Ok(())
}

#[rstest]
fn loading_reads_every_row() -> Result<()> {
    let (_dir, path) = write_export(EXPORT)?;

    let rows = JsonFileTaskSource::new(path).load()?;

    ensure!(rows.len() == 4, "expected four rows");
    ensure!(
        rows.get(2).and_then(|row| row.achieved_points.as_deref()) == Some("2"),
        "achieved points not read"
    );
    Ok(())
}

#[rstest]
fn missing_columns_stop_the_run(engine: MetricsEngine) -> Result<()> {
    let (_dir, path) = write_export(r#"[{"Name": "A", "Sprint": "Sprint 3"}]"#)?;

    match engine.run(&JsonFileTaskSource::new(path)) {
        Err(MetricsRunError::Source(TaskSourceError::MissingColumns(columns))) => {
            ensure!(columns.len() == 5, "columns were {columns:?}");
            ensure!(!columns.contains(&"Sprint".to_owned()), "Sprint is present");
            Ok(())
        }
        other => Err(eyre!("expected missing columns, got {other:?}")),
    }
}

#[rstest]
fn missing_files_are_io_errors() -> Result<()> {
    let dir = TempDir::new()?;
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json"))
        .map_err(|path| eyre!("non UTF-8 temp path {}", path.display()))?;

    let result = JsonFileTaskSource::new(path).load();

    ensure!(
        matches!(result, Err(TaskSourceError::Io(_))),
        "expected an I/O error, got {result:?}"
    );
    Ok(())
}
