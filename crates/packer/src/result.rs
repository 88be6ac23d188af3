//! Optimization result representation.

use crate::piece::{Piece, PieceId};
use crate::slab::Slab;
use slabcut_core::Rect;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lower bound of the target efficiency band, in percent.
pub const TARGET_EFFICIENCY_MIN: f64 = 70.0;
/// Upper bound of the target efficiency band, in percent.
pub const TARGET_EFFICIENCY_MAX: f64 = 85.0;

/// Efficiency relative to the target band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EfficiencyRating {
    /// Below the band.
    BelowTarget,
    /// Within the band.
    OnTarget,
    /// Above the band.
    AboveTarget,
}

/// Layout produced by one optimization call.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationResult {
    /// Placed pieces in cutting order, each with its final position,
    /// orientation and colour.
    pub placed: Vec<Piece>,

    /// Pieces that could not be placed, in visiting order.
    pub unplaced: Vec<Piece>,

    /// Used area over slab area, in percent, rounded to two decimals.
    pub efficiency: f64,

    /// Sum of the effective areas of the placed pieces.
    pub used_area: f64,

    /// Slab area not covered by placed pieces.
    pub waste_area: f64,

    /// Piece IDs in cutting order.
    pub cutting_sequence: Vec<PieceId>,

    /// Approximate number of candidate layouts evaluated. This is a cost
    /// signal proportional to strategies x pieces or population x
    /// generations, not an exact count.
    pub combinations_tested: u64,

    /// Free rectangles left after packing.
    pub free_rectangles: Vec<Rect>,

    /// Strategy that produced this layout.
    pub strategy: String,

    /// Generations run (genetic path only).
    pub generations: u32,

    /// Fitness of the layout.
    pub best_fitness: f64,

    /// Best-ever fitness per generation (genetic path only).
    pub fitness_history: Vec<f64>,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl OptimizationResult {
    /// Builds a result from the outcome of a packing pass.
    pub fn new(
        placed: Vec<Piece>,
        unplaced: Vec<Piece>,
        free_rectangles: Vec<Rect>,
        slab: &Slab,
    ) -> Self {
        let total_area = slab_area(slab);
        let used_area: f64 = placed.iter().map(Piece::effective_area).sum();
        let efficiency = if total_area > 0.0 {
            round2(used_area / total_area * 100.0)
        } else {
            0.0
        };
        let cutting_sequence = placed.iter().map(|p| p.id().clone()).collect();

        let mut result = Self {
            placed,
            unplaced,
            efficiency,
            used_area,
            waste_area: total_area - used_area,
            cutting_sequence,
            combinations_tested: 0,
            free_rectangles,
            strategy: String::new(),
            generations: 0,
            best_fitness: 0.0,
            fitness_history: Vec::new(),
            computation_time_ms: 0,
        };
        result.best_fitness = result.fitness();
        result
    }

    /// Maximal-waste result: every piece unplaced, efficiency zero.
    pub fn all_unplaced(pieces: &[Piece], slab: &Slab) -> Self {
        let unplaced = pieces
            .iter()
            .map(|piece| {
                let mut piece = piece.clone();
                piece.unplace();
                piece
            })
            .collect();
        Self::new(Vec::new(), unplaced, Vec::new(), slab)
    }

    /// Fitness used by the genetic search: efficiency plus 100 per placed
    /// piece minus 1000 per unplaced piece.
    pub fn fitness(&self) -> f64 {
        self.efficiency + 100.0 * self.placed.len() as f64 - 1000.0 * self.unplaced.len() as f64
    }

    /// Returns true if this result has fewer unplaced pieces than `other`,
    /// or as many and a strictly higher efficiency.
    pub fn is_better_than(&self, other: &OptimizationResult) -> bool {
        match self.unplaced.len().cmp(&other.unplaced.len()) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => self.efficiency > other.efficiency,
        }
    }

    /// Classifies the efficiency against the target band.
    pub fn efficiency_rating(&self) -> EfficiencyRating {
        if self.efficiency < TARGET_EFFICIENCY_MIN {
            EfficiencyRating::BelowTarget
        } else if self.efficiency <= TARGET_EFFICIENCY_MAX {
            EfficiencyRating::OnTarget
        } else {
            EfficiencyRating::AboveTarget
        }
    }

    /// Returns the number of placed pieces.
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Returns the number of unplaced pieces.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.len()
    }

    /// Returns true if every piece was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Returns efficiency as a percentage string.
    pub fn efficiency_percent(&self) -> String {
        format!("{:.2}%", self.efficiency)
    }

    /// Sets the strategy name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }
}

fn slab_area(slab: &Slab) -> f64 {
    let area = slab.area();
    if area.is_finite() && slab.width > 0.0 && slab.height > 0.0 {
        area
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn placed(id: &str, w: f64, h: f64, order: u32) -> Piece {
        let mut piece = Piece::rectangle(id, w, h);
        piece.place(0.0, 0.0, order);
        piece
    }

    #[test]
    fn test_areas_and_rounding() {
        let slab = Slab::new(30.0, 10.0);
        let result = OptimizationResult::new(
            vec![placed("a", 10.0, 10.0, 1)],
            Vec::new(),
            Vec::new(),
            &slab,
        );
        assert_relative_eq!(result.used_area, 100.0);
        assert_relative_eq!(result.waste_area, 200.0);
        assert_relative_eq!(result.used_area + result.waste_area, slab.area());
        assert_relative_eq!(result.efficiency, 33.33);
        assert_eq!(result.cutting_sequence, vec!["a".to_string()]);
    }

    #[test]
    fn test_all_unplaced() {
        let slab = Slab::new(100.0, 100.0);
        let pieces = vec![Piece::rectangle("a", 10.0, 10.0)];
        let result = OptimizationResult::all_unplaced(&pieces, &slab);
        assert_eq!(result.efficiency, 0.0);
        assert_eq!(result.unplaced_count(), 1);
        assert_relative_eq!(result.waste_area, 10000.0);
        assert_relative_eq!(result.fitness(), -1000.0);

        let broken = OptimizationResult::all_unplaced(&pieces, &Slab::new(-5.0, 10.0));
        assert_eq!(broken.waste_area, 0.0);
    }

    #[test]
    fn test_fewer_unplaced_wins() {
        let slab = Slab::new(100.0, 100.0);
        let full = OptimizationResult::new(
            vec![placed("a", 10.0, 10.0, 1)],
            Vec::new(),
            Vec::new(),
            &slab,
        );
        let dense_but_partial = OptimizationResult::new(
            vec![placed("b", 90.0, 90.0, 1)],
            vec![Piece::rectangle("c", 5.0, 5.0)],
            Vec::new(),
            &slab,
        );
        assert!(full.is_better_than(&dense_but_partial));
        assert!(full.fitness() > dense_but_partial.fitness());
        assert!(!full.is_better_than(&full.clone()));
    }

    #[test]
    fn test_efficiency_rating() {
        let slab = Slab::new(10.0, 10.0);
        let rating = |side: f64| {
            OptimizationResult::new(vec![placed("a", side, 10.0, 1)], Vec::new(), Vec::new(), &slab)
                .efficiency_rating()
        };
        assert_eq!(rating(5.0), EfficiencyRating::BelowTarget);
        assert_eq!(rating(8.0), EfficiencyRating::OnTarget);
        assert_eq!(rating(9.0), EfficiencyRating::AboveTarget);
    }
}
