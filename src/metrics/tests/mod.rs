//! Unit tests for the metrics bounded context.

mod classifier_tests;
