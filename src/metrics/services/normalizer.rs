//! Cleans raw export rows into a task set with resolved points and copies.

use crate::metrics::domain::{
    RawTask, SprintLabel, Task, TaskData, TaskId, TaskKind, Warning, WarningKind, WorkflowState,
    parse_flag,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Output of the normaliser: retained tasks plus what went wrong.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTasks {
    /// Retained tasks in export order, copies tagged.
    pub tasks: Vec<Task>,
    /// Recoverable problems found while cleaning.
    pub warnings: Vec<Warning>,
    /// Rows received.
    pub rows_received: usize,
    /// Rows skipped as malformed.
    pub rows_skipped: usize,
}

impl NormalizedTasks {
    /// Returns the number of tasks tagged as copies.
    #[must_use]
    pub fn copies_tagged(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_copy()).count()
    }
}

/// Turns raw rows into normalised [`Task`] values.
///
/// Malformed rows are skipped with a warning; malformed cells become absent
/// values with a warning. Nothing here aborts the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskNormalizer;

impl TaskNormalizer {
    /// Creates a normaliser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Normalises the raw rows and resolves duplicate copies.
    #[must_use]
    pub fn normalize(&self, rows: &[RawTask]) -> NormalizedTasks {
        let mut warnings = Vec::new();
        let mut tasks = Vec::with_capacity(rows.len());

        for (index, raw) in rows.iter().enumerate() {
            let mut cells = CellReader {
                row: index + 1,
                warnings: &mut warnings,
            };
            if let Some(task) = cells.read_task(raw) {
                tasks.push(task);
            }
        }

        let rows_skipped = rows.len() - tasks.len();
        let resolved = resolve_copies(tasks);
        debug!(
            rows = rows.len(),
            retained = resolved.len(),
            skipped = rows_skipped,
            "normalised task rows"
        );

        NormalizedTasks {
            tasks: resolved,
            warnings,
            rows_received: rows.len(),
            rows_skipped,
        }
    }
}

/// Reads typed values out of one raw row, recording a warning per bad cell.
struct CellReader<'a> {
    row: usize,
    warnings: &'a mut Vec<Warning>,
}

impl CellReader<'_> {
    fn read_task(&mut self, raw: &RawTask) -> Option<Task> {
        let Some(name) = non_blank(raw.name.as_deref()) else {
            self.warn(WarningKind::MalformedRow, "row has no task name; skipped");
            return None;
        };

        let id = non_blank(raw.id.as_deref()).map_or_else(|| TaskId::positional(self.row), TaskId::new);
        let start_date = self.date("start date", raw.start_date.as_deref());
        let ready_for_production_date =
            self.date("ready-for-production date", raw.ready_for_production_date.as_deref());
        if let (Some(start), Some(ready)) = (start_date, ready_for_production_date)
            && ready < start
        {
            self.warn(
                WarningKind::NegativeCycleTime,
                format!("'{name}' is ready for production ({ready}) before it started ({start}); cycle time is negative"),
            );
        }

        Some(Task::new(TaskData {
            row: self.row,
            id,
            name: name.to_owned(),
            state: WorkflowState::parse(raw.state.as_deref().unwrap_or_default()),
            qa_state: non_blank(raw.qa_state.as_deref()).map(WorkflowState::parse),
            uat_state: non_blank(raw.uat_state.as_deref()).map(WorkflowState::parse),
            kind: TaskKind::from_label(raw.task_type.as_deref().unwrap_or_default()),
            estimated_points: self.points("estimated points", raw.estimated_points.as_deref()),
            achieved_points: self.points("achieved points", raw.achieved_points.as_deref()),
            start_date,
            planned_end_date: self.date("planned end date", raw.planned_end_date.as_deref()),
            ready_for_production_date,
            deployed_date: self.date("deployed date", raw.deployed_date.as_deref()),
            uat_cycle_count: self.count("UAT cycle count", raw.uat_cycle_count.as_deref()),
            sprint: self.sprint(raw.sprint.as_deref()),
            sprint_completed: parse_flag(raw.sprint_completed.as_deref()),
            carry_over: parse_flag(raw.carry_over.as_deref()),
        }))
    }

    fn points(&mut self, field: &str, value: Option<&str>) -> Option<f64> {
        let raw = non_blank(value)?;
        let parsed = raw
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|points| points.is_finite() && *points >= 0.0);
        if parsed.is_none() {
            self.warn(
                WarningKind::InvalidPoints,
                format!("{field} '{raw}' is not a non-negative number; treated as absent"),
            );
        }
        parsed
    }

    fn date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let raw = non_blank(value)?;
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.warn(
                WarningKind::InvalidDate,
                format!("{field} '{raw}' is not a recognised date; treated as absent"),
            );
        }
        parsed
    }

    fn count(&mut self, field: &str, value: Option<&str>) -> Option<u32> {
        let raw = non_blank(value)?;
        let digits = raw.strip_suffix(".0").unwrap_or(raw);
        let parsed = digits.parse::<u32>().ok();
        if parsed.is_none() {
            self.warn(
                WarningKind::InvalidCount,
                format!("{field} '{raw}' is not a non-negative integer; treated as absent"),
            );
        }
        parsed
    }

    fn sprint(&mut self, value: Option<&str>) -> Option<SprintLabel> {
        let raw = non_blank(value)?;
        match SprintLabel::parse(raw) {
            Ok(label) => Some(label),
            Err(error) => {
                self.warn(
                    WarningKind::InvalidSprintLabel,
                    format!("{error}; task excluded from aggregation"),
                );
                None
            }
        }
    }

    fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let warning = Warning::for_row(kind, self.row, message);
        warn!(row = self.row, kind = ?kind, "{}", warning.message);
        self.warnings.push(warning);
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

/// Parses the date forms found in tracker exports.
///
/// Day-first is tried before month-first, so `03/04/2025` is 3 April.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

/// Tags re-created copies so each duplicate group keeps one survivor.
///
/// A task whose name carries copy markers is a copy when another task with
/// the same base name sits in the same or an adjacent sprint and is of an
/// earlier generation: fewer markers, or as many markers and an earlier
/// position in the export.
fn resolve_copies(tasks: Vec<Task>) -> Vec<Task> {
    let keys: Vec<(String, usize)> = tasks
        .iter()
        .map(|task| {
            let (base, depth) = task.base_name();
            (base.to_lowercase(), depth)
        })
        .collect();

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (position, (base, _)) in keys.iter().enumerate() {
        groups.entry(base.as_str()).or_default().push(position);
    }

    let copy_flags: Vec<bool> = keys
        .iter()
        .enumerate()
        .map(|(position, (base, depth))| {
            *depth > 0
                && groups.get(base.as_str()).is_some_and(|members| {
                    members.iter().any(|&other| {
                        is_earlier_generation(&tasks, &keys, other, position)
                            && sprints_overlap(&tasks, other, position)
                    })
                })
        })
        .collect();

    tasks
        .into_iter()
        .zip(copy_flags)
        .map(|(task, is_copy)| {
            if is_copy {
                debug!(row = task.row(), name = task.name(), "tagged duplicate copy");
                task.into_copy()
            } else {
                task
            }
        })
        .collect()
}

fn is_earlier_generation(
    tasks: &[Task],
    keys: &[(String, usize)],
    other: usize,
    position: usize,
) -> bool {
    if other == position {
        return false;
    }
    let (Some((_, other_depth)), Some((_, depth))) = (keys.get(other), keys.get(position)) else {
        return false;
    };
    let (Some(other_task), Some(task)) = (tasks.get(other), tasks.get(position)) else {
        return false;
    };
    other_depth < depth || (other_depth == depth && other_task.row() < task.row())
}

fn sprints_overlap(tasks: &[Task], other: usize, position: usize) -> bool {
    let (Some(other_task), Some(task)) = (tasks.get(other), tasks.get(position)) else {
        return false;
    };
    match (other_task.sprint_number(), task.sprint_number()) {
        (Some(left), Some(right)) => left.is_adjacent_to(right),
        (None, None) => true,
        _ => false,
    }
}
