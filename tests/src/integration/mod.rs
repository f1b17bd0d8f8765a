//! # Integration Tests
//!
//! Drive `QnaService` through the public API against repository adapters.

pub mod fixtures;

mod failures;
mod telemetry;
