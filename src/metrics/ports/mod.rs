//! Port contracts for delivery metrics.
//!
//! Ports define the boundaries to the input and output collaborators; the
//! pipeline itself performs no I/O.

pub mod report;
pub mod source;

pub use report::{ReportRenderError, ReportRenderer};
pub use source::{
    OPTIONAL_COLUMNS, REQUIRED_COLUMNS, TaskSource, TaskSourceError, TaskSourceResult,
};
