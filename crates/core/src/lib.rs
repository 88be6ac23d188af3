//! # slabcut Core
//!
//! Core abstractions for the slabcut sheet-cutting optimizer.
//!
//! This crate provides the types shared by the placement engine and its
//! tooling, with no knowledge of pieces or slabs.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Rect`], the axis-aligned rectangle every footprint is made of
//! - **Configuration**: [`Config`], [`Strategy`], [`OptimizationGoal`]
//! - **GA framework**: [`GaRunner`], [`GaProblem`], [`Individual`] plus
//!   [`order_crossover`] and [`uniform_crossover`]
//! - **Errors**: [`Error`], [`Result`]
//!
//! ## Configuration
//!
//! ```rust
//! use slabcut_core::{Config, OptimizationGoal, Strategy};
//!
//! let config = Config::new()
//!     .with_strategy(Strategy::GeneticAlgorithm)
//!     .with_goal(OptimizationGoal::ProductionSpeed)
//!     .with_seed(42);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod ga;
pub mod geometry;
pub mod solver;

// Re-exports
pub use error::{Error, Result};
pub use ga::{
    order_crossover, uniform_crossover, GaConfig, GaProblem, GaProgress, GaResult, GaRunner,
    Individual,
};
pub use geometry::{Rect, EPSILON, FIT_TOLERANCE};
pub use solver::{Config, OptimizationGoal, ProgressCallback, ProgressInfo, Strategy};
