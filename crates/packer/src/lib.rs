//! # slabcut Packer
//!
//! Rectangle-based placement engine for cutting pieces from a single slab.
//!
//! Pieces of any shape are packed by their axis-aligned bounding box into a
//! maximal free-rectangle model, scored per optimisation goal, and ordered
//! either by a sweep of fixed sort strategies or by a genetic search over
//! piece order and rotation bias.
//!
//! ## Features
//!
//! - Rectangle, L, T, circle, triangle and polygon pieces
//! - Margin, inter-piece spacing, defect zones and grain direction
//! - Priority-aware, goal-weighted candidate scoring
//! - Deterministic cutting order for every placed piece
//! - Offcut extraction with quality grades
//!
//! ## Quick Start
//!
//! ```rust
//! use slabcut_packer::{optimize, OptimizationGoal, Piece, Slab};
//!
//! let slab = Slab::new(300.0, 140.0).with_margin(1.0).with_spacing(0.5);
//! let pieces = vec![
//!     Piece::rectangle("door", 100.0, 100.0),
//!     Piece::l_left("counter", 80.0, 60.0, 30.0, 20.0).with_priority(2),
//! ];
//!
//! let result = optimize(&pieces, &slab, OptimizationGoal::WasteReduction);
//! println!(
//!     "placed {} of {}, efficiency {:.2}%",
//!     result.placed_count(),
//!     pieces.len(),
//!     result.efficiency
//! );
//! assert!(result.all_placed());
//! ```
//!
//! ## Configured Solve
//!
//! ```rust
//! use slabcut_packer::{Config, Optimizer, Piece, Slab, Strategy};
//!
//! let optimizer = Optimizer::new(
//!     Config::new()
//!         .with_strategy(Strategy::MultiStrategy)
//!         .with_time_limit(500),
//! );
//! let pieces = vec![Piece::rectangle("a", 10.0, 10.0)];
//! let result = optimizer.solve_checked(&pieces, &Slab::new(50.0, 50.0)).unwrap();
//! assert_eq!(result.cutting_sequence, vec!["a".to_string()]);
//! ```

pub mod constraints;
pub mod free_space;
pub mod ga_packing;
pub mod offcut;
pub mod optimizer;
pub mod packer;
pub mod piece;
pub mod result;
pub mod scorer;
pub mod slab;
pub mod sort;

// Re-exports
pub use free_space::FreeSpace;
pub use ga_packing::{run_ga_packing, PackingChromosome, PackingProblem};
pub use offcut::{extract_offcuts, Offcut, OffcutQuality};
pub use optimizer::{optimize, Optimizer};
pub use packer::{pack, HeuristicPacker};
pub use piece::{CutCorner, GrainDirection, LHand, Piece, PieceId, Placement, ShapeKind};
pub use result::{EfficiencyRating, OptimizationResult};
pub use scorer::{score, GoalWeights, ScoreContext};
pub use slab::Slab;
pub use sort::SortStrategy;
pub use slabcut_core::{
    Config, Error, OptimizationGoal, ProgressCallback, ProgressInfo, Rect, Result, Strategy,
};
