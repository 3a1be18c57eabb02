//! Input port supplying raw task rows.

use crate::metrics::domain::RawTask;
use std::sync::Arc;
use thiserror::Error;

/// Export columns every input must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Name",
    "Estado",
    "Tipo Tarea",
    "Estimación Original",
    "Fecha Inicio",
    "Sprint",
    "Sprint Completed?",
];

/// Export columns read when present.
pub const OPTIONAL_COLUMNS: [&str; 9] = [
    "Item ID",
    "Estado QA",
    "Estado UAT",
    "Puntos Logrados",
    "Fecha Término",
    "Fecha Ready for Production",
    "Fecha paso a Producción",
    "Ciclos UAT",
    "Carry over",
];

/// Result type for task source operations.
pub type TaskSourceResult<T> = Result<T, TaskSourceError>;

/// Supplier of raw task rows.
///
/// Implementations confirm that required columns are present before any
/// row reaches the pipeline.
#[cfg_attr(test, mockall::automock)]
pub trait TaskSource: Send + Sync {
    /// Loads every raw row.
    ///
    /// # Errors
    ///
    /// Returns [`TaskSourceError::MissingColumns`] when required columns are
    /// absent, [`TaskSourceError::Empty`] when there are no rows, and
    /// [`TaskSourceError::Io`] or [`TaskSourceError::Parse`] when the input
    /// cannot be read.
    fn load(&self) -> TaskSourceResult<Vec<RawTask>>;
}

/// Errors returned by task source implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskSourceError {
    /// Required columns are missing.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The input holds no rows.
    #[error("input contains no task rows")]
    Empty,

    /// The input could not be read.
    #[error("failed to read input: {0}")]
    Io(Arc<std::io::Error>),

    /// The input is not in the expected format.
    #[error("failed to parse input: {0}")]
    Parse(String),
}

impl TaskSourceError {
    /// Wraps an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }

    /// Builds a missing-columns error from column names.
    #[must_use]
    pub fn missing_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Self {
        Self::MissingColumns(columns.into_iter().map(str::to_owned).collect())
    }
}
