//! Step definitions for delivery metrics scenarios.

pub mod world;

mod given;
mod then;
mod when;
