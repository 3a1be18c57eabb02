//! Raw export rows and the normalised task entity.

use super::{SprintLabel, SprintNumber, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffixes the tracker appends when a task is duplicated, lowercased.
const COPY_MARKERS: [&str; 2] = ["(copy)", "(copia)"];

/// Values accepted as "true" for boolean-like export columns.
const TRUTHY_FLAGS: [&str; 8] = ["true", "v", "yes", "si", "sí", "x", "1", "✓"];

/// One row of a task-tracker export, exactly as the input collaborator
/// delivered it.
///
/// Every cell is optional text; coercion to typed values happens in the
/// normaliser so one bad cell never prevents reading the rest of the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTask {
    /// Exported item identifier.
    pub id: Option<String>,
    /// Task name, possibly carrying a copy marker.
    pub name: Option<String>,
    /// Workflow state, e.g. `11. Ready for Product Release`.
    pub state: Option<String>,
    /// QA workflow state.
    pub qa_state: Option<String>,
    /// UAT workflow state.
    pub uat_state: Option<String>,
    /// Task type, e.g. `Bug`, `HDU`, `Solicitud`.
    pub task_type: Option<String>,
    /// Original story-point estimate.
    pub estimated_points: Option<String>,
    /// Story points actually achieved.
    pub achieved_points: Option<String>,
    /// Work start date.
    pub start_date: Option<String>,
    /// Planned end date.
    pub planned_end_date: Option<String>,
    /// Date the task became ready for production.
    pub ready_for_production_date: Option<String>,
    /// Date the task was deployed.
    pub deployed_date: Option<String>,
    /// Number of UAT cycles.
    pub uat_cycle_count: Option<String>,
    /// Sprint label.
    pub sprint: Option<String>,
    /// Whether the sprint is closed.
    pub sprint_completed: Option<String>,
    /// Whether the task was carried over.
    pub carry_over: Option<String>,
}

impl RawTask {
    /// Creates a raw row with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the exported identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the workflow state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the task type.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    /// Sets the estimated points.
    #[must_use]
    pub fn with_estimated_points(mut self, points: impl fmt::Display) -> Self {
        self.estimated_points = Some(points.to_string());
        self
    }

    /// Sets the achieved points.
    #[must_use]
    pub fn with_achieved_points(mut self, points: impl fmt::Display) -> Self {
        self.achieved_points = Some(points.to_string());
        self
    }

    /// Sets the start date.
    #[must_use]
    pub fn with_start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Sets the ready-for-production date.
    #[must_use]
    pub fn with_ready_for_production_date(mut self, date: impl Into<String>) -> Self {
        self.ready_for_production_date = Some(date.into());
        self
    }

    /// Sets the sprint label.
    #[must_use]
    pub fn with_sprint(mut self, sprint: impl Into<String>) -> Self {
        self.sprint = Some(sprint.into());
        self
    }

    /// Sets the sprint-completed flag.
    #[must_use]
    pub fn with_sprint_completed(mut self, flag: impl Into<String>) -> Self {
        self.sprint_completed = Some(flag.into());
        self
    }

    /// Marks the row's sprint as completed.
    #[must_use]
    pub fn completed(self) -> Self {
        self.with_sprint_completed("true")
    }

    /// Sets the carry-over flag.
    #[must_use]
    pub fn with_carry_over(mut self, flag: impl Into<String>) -> Self {
        self.carry_over = Some(flag.into());
        self
    }
}

/// Workflow state with its numeric stage prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowState {
    label: String,
    stage: Option<u8>,
}

impl WorkflowState {
    /// Parses a state label such as `9. Certificado QA`.
    ///
    /// Labels without a leading number keep their text but have no stage.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let label = value.trim();
        let digits: String = label.chars().take_while(char::is_ascii_digit).collect();
        Self {
            label: label.to_owned(),
            stage: digits.parse().ok(),
        }
    }

    /// Returns the trimmed state label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the numeric stage prefix, if any.
    #[must_use]
    pub const fn stage(&self) -> Option<u8> {
        self.stage
    }
}

/// Task category relevant to rework.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum TaskKind {
    /// Defect fix; counts towards rework.
    Defect,
    /// Feature work such as a user story.
    Feature,
    /// Change request.
    Request,
    /// Any other exported type.
    Other(String),
}

impl TaskKind {
    /// Classifies an exported task type label.
    #[must_use]
    pub fn from_label(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        if normalized.contains("bug") || normalized.contains("defect") {
            Self::Defect
        } else if normalized.contains("hdu")
            || normalized.contains("feature")
            || normalized.contains("story")
        {
            Self::Feature
        } else if normalized.contains("solicitud") || normalized.contains("request") {
            Self::Request
        } else {
            Self::Other(value.trim().to_owned())
        }
    }

    /// Returns `true` for defect tasks.
    #[must_use]
    pub const fn is_defect(&self) -> bool {
        matches!(self, Self::Defect)
    }
}

/// Resolves the story points used in every calculation.
///
/// The chain has exactly three branches: achieved points when present,
/// otherwise the original estimate, otherwise zero.
#[must_use]
pub fn effective_points(achieved: Option<f64>, estimated: Option<f64>) -> f64 {
    achieved.or(estimated).unwrap_or(0.0)
}

/// Splits trailing copy markers off a task name.
///
/// Returns the base name and how many markers were stripped. Matching is
/// case-insensitive and covers the English and Spanish variants.
///
/// # Examples
///
/// ```
/// use cadence::metrics::domain::strip_copy_markers;
///
/// assert_eq!(strip_copy_markers("Fix login (Copy)"), ("Fix login", 1));
/// assert_eq!(strip_copy_markers("Fix login (copia) (copy)"), ("Fix login", 2));
/// assert_eq!(strip_copy_markers("Fix login"), ("Fix login", 0));
/// ```
#[must_use]
pub fn strip_copy_markers(name: &str) -> (&str, usize) {
    let mut base = name.trim();
    let mut depth = 0;
    loop {
        let lowered = base.to_ascii_lowercase();
        let Some(marker) = COPY_MARKERS
            .iter()
            .find(|marker| lowered.ends_with(*marker))
        else {
            return (base, depth);
        };
        let cut = base.len() - marker.len();
        let Some(stripped) = base.get(..cut) else {
            return (base, depth);
        };
        base = stripped.trim_end();
        depth += 1;
    }
}

/// Interprets a boolean-like export cell.
///
/// Only affirmative markers count; blanks and anything unrecognised are
/// `false`.
#[must_use]
pub fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|raw| {
        let normalized = raw.trim().to_lowercase();
        TRUTHY_FLAGS.contains(&normalized.as_str())
    })
}

/// Parameter object for constructing a normalised [`Task`].
#[derive(Debug, Clone, PartialEq)]
pub struct TaskData {
    /// Row position in the export, starting at 1.
    pub row: usize,
    /// Task identifier.
    pub id: TaskId,
    /// Trimmed task name.
    pub name: String,
    /// Workflow state.
    pub state: WorkflowState,
    /// QA workflow state, if exported.
    pub qa_state: Option<WorkflowState>,
    /// UAT workflow state, if exported.
    pub uat_state: Option<WorkflowState>,
    /// Task category.
    pub kind: TaskKind,
    /// Original estimate, if parseable.
    pub estimated_points: Option<f64>,
    /// Achieved points, if parseable.
    pub achieved_points: Option<f64>,
    /// Start date, if parseable.
    pub start_date: Option<NaiveDate>,
    /// Planned end date, if parseable.
    pub planned_end_date: Option<NaiveDate>,
    /// Ready-for-production date, if parseable.
    pub ready_for_production_date: Option<NaiveDate>,
    /// Deployment date, if parseable.
    pub deployed_date: Option<NaiveDate>,
    /// UAT cycle count, if parseable.
    pub uat_cycle_count: Option<u32>,
    /// Sprint label, if present and well formed.
    pub sprint: Option<SprintLabel>,
    /// Whether the sprint is closed.
    pub sprint_completed: bool,
    /// Whether the task was carried over.
    pub carry_over: bool,
}

/// A cleaned task with resolved effective points and copy flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    row: usize,
    id: TaskId,
    name: String,
    state: WorkflowState,
    qa_state: Option<WorkflowState>,
    uat_state: Option<WorkflowState>,
    kind: TaskKind,
    estimated_points: Option<f64>,
    achieved_points: Option<f64>,
    effective_points: f64,
    start_date: Option<NaiveDate>,
    planned_end_date: Option<NaiveDate>,
    ready_for_production_date: Option<NaiveDate>,
    deployed_date: Option<NaiveDate>,
    uat_cycle_count: Option<u32>,
    sprint: Option<SprintLabel>,
    sprint_completed: bool,
    carry_over: bool,
    is_copy: bool,
}

impl Task {
    /// Builds a task, resolving its effective points.
    ///
    /// The task starts as an original; copy resolution needs the whole task
    /// set and is applied afterwards with [`Task::into_copy`].
    #[must_use]
    pub fn new(data: TaskData) -> Self {
        Self {
            effective_points: effective_points(data.achieved_points, data.estimated_points),
            row: data.row,
            id: data.id,
            name: data.name,
            state: data.state,
            qa_state: data.qa_state,
            uat_state: data.uat_state,
            kind: data.kind,
            estimated_points: data.estimated_points,
            achieved_points: data.achieved_points,
            start_date: data.start_date,
            planned_end_date: data.planned_end_date,
            ready_for_production_date: data.ready_for_production_date,
            deployed_date: data.deployed_date,
            uat_cycle_count: data.uat_cycle_count,
            sprint: data.sprint,
            sprint_completed: data.sprint_completed,
            carry_over: data.carry_over,
            is_copy: false,
        }
    }

    /// Returns this task tagged as a duplicate copy.
    #[must_use]
    pub fn into_copy(self) -> Self {
        Self {
            is_copy: true,
            ..self
        }
    }

    /// Returns the row position in the export, starting at 1.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name with copy markers removed, together with the number
    /// of markers.
    #[must_use]
    pub fn base_name(&self) -> (&str, usize) {
        strip_copy_markers(&self.name)
    }

    /// Returns the workflow state.
    #[must_use]
    pub const fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Returns the QA workflow state.
    #[must_use]
    pub const fn qa_state(&self) -> Option<&WorkflowState> {
        self.qa_state.as_ref()
    }

    /// Returns the UAT workflow state.
    #[must_use]
    pub const fn uat_state(&self) -> Option<&WorkflowState> {
        self.uat_state.as_ref()
    }

    /// Returns the task category.
    #[must_use]
    pub const fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Returns the original estimate.
    #[must_use]
    pub const fn estimated_points(&self) -> Option<f64> {
        self.estimated_points
    }

    /// Returns the achieved points.
    #[must_use]
    pub const fn achieved_points(&self) -> Option<f64> {
        self.achieved_points
    }

    /// Returns the points used in calculations; never absent.
    #[must_use]
    pub const fn effective_points(&self) -> f64 {
        self.effective_points
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the planned end date.
    #[must_use]
    pub const fn planned_end_date(&self) -> Option<NaiveDate> {
        self.planned_end_date
    }

    /// Returns the ready-for-production date.
    #[must_use]
    pub const fn ready_for_production_date(&self) -> Option<NaiveDate> {
        self.ready_for_production_date
    }

    /// Returns the deployment date.
    #[must_use]
    pub const fn deployed_date(&self) -> Option<NaiveDate> {
        self.deployed_date
    }

    /// Returns the UAT cycle count.
    #[must_use]
    pub const fn uat_cycle_count(&self) -> Option<u32> {
        self.uat_cycle_count
    }

    /// Returns the sprint label.
    #[must_use]
    pub const fn sprint(&self) -> Option<&SprintLabel> {
        self.sprint.as_ref()
    }

    /// Returns the unified sprint number.
    #[must_use]
    pub fn sprint_number(&self) -> Option<SprintNumber> {
        self.sprint.as_ref().map(SprintLabel::number)
    }

    /// Returns whether the task's sprint is closed.
    #[must_use]
    pub const fn sprint_completed(&self) -> bool {
        self.sprint_completed
    }

    /// Returns whether the task was carried over.
    #[must_use]
    pub const fn carry_over(&self) -> bool {
        self.carry_over
    }

    /// Returns whether the task is a duplicate copy of another task.
    #[must_use]
    pub const fn is_copy(&self) -> bool {
        self.is_copy
    }

    /// Returns whether the task belongs to a closed, well-labelled sprint.
    #[must_use]
    pub const fn is_in_scope(&self) -> bool {
        self.sprint_completed && self.sprint.is_some()
    }

    /// Returns the whole days from start to ready-for-production.
    ///
    /// `None` when either date is missing. Negative when the ready date
    /// precedes the start date.
    #[must_use]
    pub fn cycle_time_days(&self) -> Option<i64> {
        let start = self.start_date?;
        let ready = self.ready_for_production_date?;
        Some((ready - start).num_days())
    }
}
