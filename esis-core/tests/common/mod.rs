//! Test infrastructure for the ESIS reader and writers
//!
//! Provides fixture loading, stochastic document generation, and assertion helpers.

#![allow(dead_code)]

mod generators;
mod harness;
mod loader;

pub use generators::Gen;
pub use harness::{collect_events, convert, format_event, run_test, run_with_variations};
pub use loader::{load_fixtures_by_name, TestCase};
