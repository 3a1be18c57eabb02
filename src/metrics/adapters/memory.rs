//! In-memory task source for tests and embedding callers.

use crate::metrics::{
    domain::RawTask,
    ports::{TaskSource, TaskSourceError, TaskSourceResult},
};

/// Task source serving rows held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryTaskSource {
    rows: Vec<RawTask>,
}

impl InMemoryTaskSource {
    /// Creates a source over the given rows.
    #[must_use]
    pub fn new(rows: impl IntoIterator<Item = RawTask>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Returns the held rows.
    #[must_use]
    pub fn rows(&self) -> &[RawTask] {
        &self.rows
    }
}

impl TaskSource for InMemoryTaskSource {
    fn load(&self) -> TaskSourceResult<Vec<RawTask>> {
        if self.rows.is_empty() {
            return Err(TaskSourceError::Empty);
        }
        Ok(self.rows.clone())
    }
}
