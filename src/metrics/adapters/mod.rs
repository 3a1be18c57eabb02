//! Adapter implementations for the metrics ports.

pub mod json;
pub mod memory;
pub mod render;

pub use json::{JsonFileTaskSource, parse_export_rows};
pub use memory::InMemoryTaskSource;
pub use render::{JsonReportRenderer, TextReportRenderer};
