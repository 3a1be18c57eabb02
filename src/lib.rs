//! Cadence: agile delivery metrics from task-tracker exports.
//!
//! This crate turns a raw task export into per-sprint and per-month
//! delivery metrics and a summary of team performance.
//!
//! # Architecture
//!
//! Cadence follows hexagonal architecture principles:
//!
//! - **Domain**: Value types and configuration with no I/O
//! - **Ports**: Trait boundaries for task input and report output
//! - **Adapters**: In-memory and JSON-file sources, text and JSON renderers
//! - **Services**: The normalise, classify, aggregate pipeline and its facade
//!
//! # Modules
//!
//! - [`metrics`]: Delivery metrics computation

pub mod metrics;
