//! Error types for metrics domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing metrics domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricsDomainError {
    /// The team size is zero, negative, or too large to represent.
    #[error("invalid team size {0}, expected a positive integer")]
    InvalidTeamSize(i64),

    /// The team profile is not one of the supported profiles.
    #[error("unknown team profile '{0}', expected 'productive' or 'in_development'")]
    UnknownProfile(String),

    /// The sprint label does not contain a `Sprint <number>` pattern.
    #[error("invalid sprint label '{0}', expected 'Sprint <number>'")]
    InvalidSprintLabel(String),

    /// A sprint-to-month mapping entry is malformed.
    #[error("invalid sprint mapping entry '{0}', expected 'Sprint <number>:<month>'")]
    InvalidSprintMapping(String),

    /// A generated sprint range would map two sprints a year apart to the
    /// same month label.
    #[error("sprints {first} to {last} span more than twelve months")]
    SprintRangeSpansYear {
        /// First sprint of the range.
        first: u32,
        /// Last sprint of the range.
        last: u32,
    },

    /// The month label is empty after trimming.
    #[error("month label must not be empty")]
    EmptyMonthLabel,

    /// The configuration was produced for a different schema version.
    #[error("unsupported configuration version {found}, expected {expected}")]
    UnsupportedConfigVersion {
        /// Version found on the configuration value.
        found: u32,
        /// Version understood by this build.
        expected: u32,
    },
}
