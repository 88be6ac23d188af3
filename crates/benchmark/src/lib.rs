//! Benchmark tooling for slabcut
//!
//! This crate provides:
//! - JSON job files (slab, pieces, goal)
//! - Synthetic job generation for stress testing
//! - Run records and summary tables for comparing goals and strategies

mod job;
mod report;
mod synthetic;

pub use job::Job;
pub use report::{BenchmarkResult, PlacementInfo, RunResult, REPORT_OFFCUT_MIN_SIDE};
pub use synthetic::SyntheticGenerator;
