//! Agile delivery metrics for Cadence.
//!
//! This module turns a noisy task-tracker export into per-sprint and
//! per-month delivery metrics: throughput, velocity, cycle time,
//! predictability, efficiency, and rework. The pipeline runs in four pure
//! stages (normalise, classify, aggregate, summarise) and follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Pipeline services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
