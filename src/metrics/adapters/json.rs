//! Task source reading a JSON export: an array of objects keyed by the
//! tracker's column headers.

use crate::metrics::{
    domain::RawTask,
    ports::{REQUIRED_COLUMNS, TaskSource, TaskSourceError, TaskSourceResult},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Reads raw rows from a JSON export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileTaskSource {
    path: Utf8PathBuf,
}

impl JsonFileTaskSource {
    /// Creates a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the export path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read(&self) -> TaskSourceResult<String> {
        let file_name = self.path.file_name().ok_or_else(|| {
            TaskSourceError::Parse(format!("'{}' does not name a file", self.path))
        })?;
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(TaskSourceError::io)?;
        dir.read_to_string(file_name).map_err(TaskSourceError::io)
    }
}

impl TaskSource for JsonFileTaskSource {
    fn load(&self) -> TaskSourceResult<Vec<RawTask>> {
        let contents = self.read()?;
        let rows = parse_export_rows(&contents)?;
        debug!(path = %self.path, rows = rows.len(), "loaded export rows");
        Ok(rows)
    }
}

/// Parses a JSON export into raw rows, checking required columns.
///
/// A column counts as present when any row carries it, matching how a
/// spreadsheet export has one header row for all records. Elements that are
/// not objects become blank rows, which the normaliser skips as malformed,
/// so row positions stay aligned with the export.
///
/// # Errors
///
/// Returns [`TaskSourceError::Parse`] when the input is not a JSON array,
/// [`TaskSourceError::Empty`] for an empty array, and
/// [`TaskSourceError::MissingColumns`] when required headers are absent.
pub fn parse_export_rows(contents: &str) -> TaskSourceResult<Vec<RawTask>> {
    let elements: Vec<Value> =
        serde_json::from_str(contents).map_err(|error| TaskSourceError::Parse(error.to_string()))?;
    if elements.is_empty() {
        return Err(TaskSourceError::Empty);
    }

    let records: Vec<Option<&Map<String, Value>>> = elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let record = element.as_object();
            if record.is_none() {
                warn!(row = index + 1, "export element is not an object; row left blank");
            }
            record
        })
        .collect();

    let headers: BTreeSet<&str> = records
        .iter()
        .flatten()
        .flat_map(|record| record.keys().map(|key| key.trim()))
        .collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.contains(column))
        .collect();
    if !missing.is_empty() {
        return Err(TaskSourceError::missing_columns(missing));
    }

    Ok(records
        .into_iter()
        .map(|record| record.map(raw_task_from_record).unwrap_or_default())
        .collect())
}

fn raw_task_from_record(record: &Map<String, Value>) -> RawTask {
    let cells: BTreeMap<&str, &Value> = record
        .iter()
        .map(|(key, value)| (key.trim(), value))
        .collect();
    let cell = |column: &str| cells.get(column).and_then(|value| cell_text(value));

    RawTask {
        id: cell("Item ID"),
        name: cell("Name"),
        state: cell("Estado"),
        qa_state: cell("Estado QA"),
        uat_state: cell("Estado UAT"),
        task_type: cell("Tipo Tarea"),
        estimated_points: cell("Estimación Original"),
        achieved_points: cell("Puntos Logrados"),
        start_date: cell("Fecha Inicio"),
        planned_end_date: cell("Fecha Término"),
        ready_for_production_date: cell("Fecha Ready for Production"),
        deployed_date: cell("Fecha paso a Producción"),
        uat_cycle_count: cell("Ciclos UAT"),
        sprint: cell("Sprint"),
        sprint_completed: cell("Sprint Completed?"),
        carry_over: cell("Carry over"),
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
