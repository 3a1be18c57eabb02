//! Identifier and validated scalar types for the metrics domain.

use super::MetricsDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a task row as exported by the tracker.
///
/// Identifiers are not unique in raw exports; duplicate handling is the
/// normaliser's job, not the identifier's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task identifier from its exported value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Creates a positional identifier for rows exported without one.
    #[must_use]
    pub fn positional(row: usize) -> Self {
        Self(format!("row-{row}"))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence number of a sprint, used for grouping and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SprintNumber(u32);

impl SprintNumber {
    /// Creates a sprint number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` when both sprints are the same or consecutive.
    #[must_use]
    pub const fn is_adjacent_to(self, other: Self) -> bool {
        self.0.abs_diff(other.0) <= 1
    }

    /// Returns the canonical `Sprint <n>` label.
    #[must_use]
    pub fn label(self) -> String {
        format!("Sprint {}", self.0)
    }
}

impl fmt::Display for SprintNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sprint label as exported, together with its unified sprint number.
///
/// Exports label the same iteration differently per sub-team
/// (`Sprint 07 FIDSIN`, `Sprint 07 Auto3P`, `sprint 7`); all of those unify
/// to sprint number 7.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SprintLabel {
    number: SprintNumber,
    raw: String,
}

impl SprintLabel {
    /// Parses a sprint label.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsDomainError::InvalidSprintLabel`] when the label has
    /// no `Sprint` keyword followed by a number.
    ///
    /// # Examples
    ///
    /// ```
    /// use cadence::metrics::domain::SprintLabel;
    ///
    /// let label = SprintLabel::parse("Sprint 07 FIDSIN").expect("valid label");
    /// assert_eq!(label.number().value(), 7);
    /// assert_eq!(label.canonical(), "Sprint 7");
    /// ```
    pub fn parse(value: &str) -> Result<Self, MetricsDomainError> {
        let raw = value.trim();
        let number = parse_sprint_number(raw)
            .ok_or_else(|| MetricsDomainError::InvalidSprintLabel(value.to_owned()))?;
        Ok(Self {
            number: SprintNumber::new(number),
            raw: raw.to_owned(),
        })
    }

    /// Returns the unified sprint number.
    #[must_use]
    pub const fn number(&self) -> SprintNumber {
        self.number
    }

    /// Returns the trimmed label as it appeared in the export.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the canonical `Sprint <n>` label.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.number.label()
    }
}

impl fmt::Display for SprintLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

const SPRINT_KEYWORD: &str = "sprint";

fn parse_sprint_number(raw: &str) -> Option<u32> {
    let lowered = raw.to_lowercase();
    let mut cursor = 0;
    while let Some(offset) = lowered.get(cursor..)?.find(SPRINT_KEYWORD) {
        let after_keyword = cursor + offset + SPRINT_KEYWORD.len();
        let digits: String = lowered
            .get(after_keyword..)?
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        if !digits.is_empty() {
            return digits.parse().ok();
        }
        cursor = after_keyword;
    }
    None
}
