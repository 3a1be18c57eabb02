//! Output port turning a report into a rendered document.

use crate::metrics::domain::MetricsReport;
use thiserror::Error;

/// Renders a computed report; renderers never alter the metrics.
pub trait ReportRenderer {
    /// Renders the report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportRenderError`] when serialisation or templating fails.
    fn render(&self, report: &MetricsReport) -> Result<String, ReportRenderError>;
}

/// Errors returned by report renderers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportRenderError {
    /// Serialising the report failed.
    #[error("failed to serialise report: {0}")]
    Serialize(String),

    /// Rendering the template failed.
    #[error("failed to render report template: {0}")]
    Template(String),
}
