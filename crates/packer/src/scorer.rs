//! Multi-objective placement scoring.
//!
//! A candidate is a piece placed at the min corner of a free rectangle in one
//! of its two orientations. Each optimisation goal weighs the same set of
//! terms differently; only the relative order of scores matters.

use crate::constraints::grain_aligned;
use crate::piece::Piece;
use crate::slab::Slab;
use slabcut_core::{OptimizationGoal, Rect, EPSILON};

/// Score added per unit of priority.
pub const PRIORITY_WEIGHT: f64 = 1000.0;
/// Bonus for grain-aligned candidates.
pub const GRAIN_BONUS: f64 = 100.0;
/// Bonus per candidate edge on the region's origin sides.
pub const CONTACT_BONUS: f64 = 50.0;
/// Bonus per placed footprint whose far edge meets the candidate's near edge.
pub const GUILLOTINE_BONUS: f64 = 25.0;
/// Penalty for candidates in free rectangles thinner than [`SLIVER_ASPECT`].
pub const SLIVER_PENALTY: f64 = 50.0;
/// Aspect ratio above which a free rectangle counts as a sliver.
pub const SLIVER_ASPECT: f64 = 3.0;

/// Per-goal multipliers for each scoring term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalWeights {
    /// Wasted area of the free rectangle, relative to its size.
    pub waste: f64,
    /// Leftover along the tighter side of the free rectangle.
    pub short_side: f64,
    /// Distance of the candidate from the region origin.
    pub distance: f64,
    /// Grain alignment.
    pub grain: f64,
    /// Contact with the region's origin sides.
    pub contact: f64,
    /// Collinearity with placed pieces.
    pub guillotine: f64,
    /// Sliver free rectangles.
    pub aspect: f64,
}

impl GoalWeights {
    /// Weights for an optimisation goal.
    pub fn for_goal(goal: OptimizationGoal) -> Self {
        match goal {
            OptimizationGoal::WasteReduction => Self {
                waste: 1.0,
                short_side: 1.0,
                distance: 0.0,
                grain: 1.0,
                contact: 1.0,
                guillotine: 1.0,
                aspect: 1.0,
            },
            OptimizationGoal::ProductionSpeed => Self {
                waste: 0.0,
                short_side: 0.0,
                distance: 1.0,
                grain: 1.0,
                contact: 1.0,
                guillotine: 2.0,
                aspect: 0.5,
            },
            OptimizationGoal::AestheticMatching => Self {
                waste: 0.5,
                short_side: 0.5,
                distance: 0.0,
                grain: 10.0,
                contact: 1.0,
                guillotine: 1.0,
                aspect: 1.0,
            },
            OptimizationGoal::CostEfficiency => Self {
                waste: 1.5,
                short_side: 1.0,
                distance: 0.0,
                grain: 1.0,
                contact: 1.0,
                guillotine: 1.0,
                aspect: 2.0,
            },
        }
    }
}

/// Slab-level inputs shared by every candidate of one packing run.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    /// The slab being packed.
    pub slab: &'a Slab,
    /// Margin-inset packable region.
    pub region: Rect,
}

impl<'a> ScoreContext<'a> {
    /// Creates a context, or `None` if the slab has no packable region.
    pub fn new(slab: &'a Slab) -> Option<Self> {
        slab.packable_region().map(|region| Self { slab, region })
    }
}

/// Scores `piece` placed at the min corner of `free`, higher is better.
///
/// `piece` is given in its input orientation and `rotated` selects the
/// candidate orientation. `placed` holds the reserved footprints of the
/// pieces placed so far.
pub fn score(
    piece: &Piece,
    free: &Rect,
    rotated: bool,
    goal: OptimizationGoal,
    ctx: &ScoreContext<'_>,
    placed: &[Rect],
) -> f64 {
    let weights = GoalWeights::for_goal(goal);
    let (width, height) = if rotated {
        (piece.height(), piece.width())
    } else {
        (piece.width(), piece.height())
    };
    let (x, y) = (free.x, free.y);
    let region = &ctx.region;

    let mut total = f64::from(piece.priority()) * PRIORITY_WEIGHT;

    if free.area() > 0.0 {
        let waste = (free.area() - piece.effective_area()).max(0.0);
        total -= weights.waste * waste / free.area() * 100.0;
    }

    let leftover_short = (free.width - width).min(free.height - height).max(0.0);
    let free_short = free.width.min(free.height);
    if free_short > 0.0 {
        total -= weights.short_side * leftover_short / free_short * 10.0;
    }

    let span = region.width + region.height;
    if span > 0.0 {
        let distance = (x - region.x) + (y - region.y);
        total -= weights.distance * distance / span * 100.0;
    }

    if grain_aligned(piece.grain(), rotated, ctx.slab.grain) {
        total += weights.grain * GRAIN_BONUS;
    }

    let contacts = [x - region.x, y - region.y]
        .iter()
        .filter(|d| d.abs() <= EPSILON)
        .count();
    total += weights.contact * CONTACT_BONUS * contacts as f64;

    let aligned = placed
        .iter()
        .filter(|p| (p.right() - x).abs() <= EPSILON || (p.bottom() - y).abs() <= EPSILON)
        .count();
    total += weights.guillotine * GUILLOTINE_BONUS * aligned as f64;

    if free.aspect_ratio() > SLIVER_ASPECT {
        total -= weights.aspect * SLIVER_PENALTY;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::GrainDirection;

    fn setup() -> Slab {
        Slab::new(200.0, 200.0)
    }

    #[test]
    fn test_priority_dominates() {
        let slab = setup();
        let ctx = ScoreContext::new(&slab).unwrap();
        let free_good = Rect::new(0.0, 0.0, 20.0, 20.0);
        let free_bad = Rect::new(150.0, 150.0, 50.0, 10.0);

        let high = Piece::rectangle("h", 10.0, 10.0).with_priority(2);
        let low = Piece::rectangle("l", 10.0, 10.0).with_priority(1);

        let goal = OptimizationGoal::WasteReduction;
        let high_bad = score(&high, &free_bad, false, goal, &ctx, &[]);
        let low_good = score(&low, &free_good, false, goal, &ctx, &[]);
        assert!(high_bad > low_good);
    }

    #[test]
    fn test_tighter_fit_scores_higher() {
        let slab = setup();
        let ctx = ScoreContext::new(&slab).unwrap();
        let piece = Piece::rectangle("p", 40.0, 40.0);
        let tight = Rect::new(100.0, 100.0, 45.0, 45.0);
        let loose = Rect::new(100.0, 100.0, 100.0, 100.0);

        let goal = OptimizationGoal::WasteReduction;
        assert!(
            score(&piece, &tight, false, goal, &ctx, &[])
                > score(&piece, &loose, false, goal, &ctx, &[])
        );
    }

    #[test]
    fn test_contact_and_guillotine_bonuses() {
        let slab = setup();
        let ctx = ScoreContext::new(&slab).unwrap();
        let piece = Piece::rectangle("p", 10.0, 10.0);
        let goal = OptimizationGoal::WasteReduction;

        let corner = Rect::new(0.0, 0.0, 30.0, 30.0);
        let floating = Rect::new(50.0, 50.0, 30.0, 30.0);
        let corner_score = score(&piece, &corner, false, goal, &ctx, &[]);
        let floating_score = score(&piece, &floating, false, goal, &ctx, &[]);
        assert!((corner_score - floating_score - 2.0 * CONTACT_BONUS).abs() < 1e-9);

        let neighbour = Rect::new(20.0, 50.0, 30.0, 10.0);
        let next_to = score(&piece, &floating, false, goal, &ctx, &[neighbour]);
        assert!((next_to - floating_score - GUILLOTINE_BONUS).abs() < 1e-9);
    }

    #[test]
    fn test_sliver_penalty() {
        let slab = setup();
        let ctx = ScoreContext::new(&slab).unwrap();
        let piece = Piece::rectangle("p", 10.0, 10.0);
        let goal = OptimizationGoal::ProductionSpeed;
        let square = Rect::new(50.0, 50.0, 40.0, 40.0);
        let sliver = Rect::new(50.0, 50.0, 160.0, 40.0);
        let diff = score(&piece, &square, false, goal, &ctx, &[])
            - score(&piece, &sliver, false, goal, &ctx, &[]);
        assert!((diff - 0.5 * SLIVER_PENALTY).abs() < 1e-9);
    }

    #[test]
    fn test_aesthetic_goal_rewards_grain() {
        let slab = setup().with_grain(GrainDirection::Horizontal);
        let ctx = ScoreContext::new(&slab).unwrap();
        let piece = Piece::rectangle("p", 30.0, 10.0).with_grain(GrainDirection::Horizontal);
        let free = Rect::new(50.0, 50.0, 40.0, 40.0);
        let goal = OptimizationGoal::AestheticMatching;

        let aligned = score(&piece, &free, false, goal, &ctx, &[]);
        let crossed = score(&piece, &free, true, goal, &ctx, &[]);
        assert!(aligned - crossed >= 10.0 * GRAIN_BONUS - 1e-9);
    }

    #[test]
    fn test_production_speed_prefers_origin() {
        let slab = setup();
        let ctx = ScoreContext::new(&slab).unwrap();
        let piece = Piece::rectangle("p", 10.0, 10.0);
        let goal = OptimizationGoal::ProductionSpeed;
        let near = Rect::new(20.0, 20.0, 100.0, 100.0);
        let far = Rect::new(80.0, 80.0, 20.0, 20.0);
        assert!(
            score(&piece, &near, false, goal, &ctx, &[])
                > score(&piece, &far, false, goal, &ctx, &[])
        );
    }
}
