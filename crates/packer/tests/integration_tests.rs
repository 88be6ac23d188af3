//! Integration tests for slabcut-packer.

use approx::assert_relative_eq;
use rand::prelude::*;
use slabcut_packer::{
    extract_offcuts, optimize, pack, Config, GrainDirection, OptimizationGoal, OptimizationResult,
    Optimizer, Piece, Rect, Slab, Strategy,
};

const TOL: f64 = 1e-6;

/// Checks bounds, defects, spacing and non-overlap for rectangle-only layouts.
fn assert_layout_valid(result: &OptimizationResult, slab: &Slab) {
    let region = slab.packable_region().expect("slab has a packable region");
    let bodies: Vec<Rect> = result.placed.iter().filter_map(Piece::footprint).collect();
    assert_eq!(bodies.len(), result.placed.len());

    for body in &bodies {
        assert!(region.contains(body), "{:?} outside {:?}", body, region);
        for defect in &slab.defects {
            assert!(!defect.overlaps(body), "{:?} hits defect {:?}", body, defect);
        }
    }

    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            let gap_x = (b.x - a.right()).max(a.x - b.right());
            let gap_y = (b.y - a.bottom()).max(a.y - b.bottom());
            assert!(
                gap_x.max(gap_y) >= slab.min_spacing - TOL,
                "{:?} and {:?} closer than {}",
                a,
                b,
                slab.min_spacing
            );
        }
    }
}

/// Optimizer with a small GA budget so debug test runs stay fast.
fn quick_optimizer(goal: OptimizationGoal) -> Optimizer {
    Optimizer::new(
        Config::default()
            .with_goal(goal)
            .with_max_population(12)
            .with_max_generations(10),
    )
}

fn random_rectangles(rng: &mut StdRng, count: usize) -> Vec<Piece> {
    (0..count)
        .map(|i| {
            let w = rng.gen_range(5.0..60.0_f64).round();
            let h = rng.gen_range(5.0..40.0_f64).round();
            Piece::rectangle(format!("r{}", i), w, h).with_priority(rng.gen_range(1..=3))
        })
        .collect()
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_piece_larger_than_packable_region() {
        let slab = Slab::new(300.0, 140.0).with_margin(1.0);
        let pieces = vec![Piece::rectangle("full", 300.0, 140.0)];
        let result = optimize(&pieces, &slab, OptimizationGoal::WasteReduction);
        assert_eq!(result.unplaced.len(), 1);
        assert_eq!(result.efficiency, 0.0);
    }

    #[test]
    fn test_two_rectangles_both_placed() {
        let slab = Slab::new(300.0, 140.0);
        let pieces = vec![
            Piece::rectangle("big", 100.0, 100.0),
            Piece::rectangle("small", 50.0, 50.0),
        ];
        let result = optimize(&pieces, &slab, OptimizationGoal::WasteReduction);
        assert!(result.unplaced.is_empty());
        assert!(result.efficiency > 0.0 && result.efficiency <= 100.0);
        assert_layout_valid(&result, &slab);
    }

    #[test]
    fn test_defect_blocks_only_remaining_corner() {
        let slab = Slab::new(100.0, 50.0).with_defect(Rect::new(0.0, 0.0, 50.0, 50.0));
        let pieces = vec![
            Piece::rectangle("block", 50.0, 50.0),
            Piece::rectangle("small", 40.0, 40.0),
        ];
        let result = pack(&pieces, &slab, OptimizationGoal::WasteReduction);
        assert_eq!(result.placed_count(), 1);
        assert_eq!(result.placed[0].id(), "block");
        assert_eq!(result.unplaced[0].id(), "small");
        assert_layout_valid(&result, &slab);
    }

    #[test]
    fn test_defect_inside_margin_with_spacing() {
        let slab = Slab::new(100.0, 50.0)
            .with_margin(2.0)
            .with_spacing(1.0)
            .with_defect(Rect::new(2.0, 2.0, 46.0, 46.0));
        let pieces = vec![
            Piece::rectangle("block", 46.0, 46.0),
            Piece::rectangle("small", 40.0, 40.0),
        ];
        let result = pack(&pieces, &slab, OptimizationGoal::WasteReduction);
        assert_eq!(result.placed_count(), 1);
        assert_eq!(result.placed[0].id(), "block");
        let placement = *result.placed[0].placement().unwrap();
        assert_eq!((placement.x, placement.y), (48.0, 2.0));
        assert_eq!(result.unplaced[0].id(), "small");
        assert_layout_valid(&result, &slab);
    }

    #[test]
    fn test_fully_defective_slab() {
        let slab = Slab::new(50.0, 50.0).with_defect(Rect::new(0.0, 0.0, 50.0, 50.0));
        let pieces = vec![Piece::rectangle("p", 40.0, 40.0)];
        let result = optimize(&pieces, &slab, OptimizationGoal::WasteReduction);
        assert_eq!(result.unplaced_count(), 1);
    }

    #[test]
    fn test_l_left_cutout_becomes_free_space() {
        let slab = Slab::new(100.0, 100.0);
        let pieces = vec![Piece::l_left("l", 40.0, 30.0, 15.0, 10.0).with_rotatable(false)];
        let result = pack(&pieces, &slab, OptimizationGoal::WasteReduction);
        let placement = *result.placed[0].placement().unwrap();
        let expected = Rect::new(placement.x, placement.y, 15.0, 10.0);
        assert!(result.free_rectangles.contains(&expected));
    }

    #[test]
    fn test_rotated_l_cutout_moves_clockwise() {
        let slab = Slab::new(30.0, 100.0);
        let pieces = vec![Piece::l_left("l", 40.0, 30.0, 15.0, 10.0)];
        let result = pack(&pieces, &slab, OptimizationGoal::WasteReduction);
        let placed = &result.placed[0];
        assert!(placed.is_rotated());
        assert_eq!(placed.cutout(), Some(Rect::new(20.0, 0.0, 10.0, 15.0)));
        assert!(result
            .free_rectangles
            .contains(&Rect::new(20.0, 0.0, 10.0, 15.0)));
    }
}

mod property_tests {
    use super::*;

    #[test]
    fn test_area_accounting_is_exact() {
        let slab = Slab::new(240.0, 120.0).with_margin(2.0);
        let pieces = vec![
            Piece::rectangle("r", 40.0, 30.0),
            Piece::circle("c", 10.0),
            Piece::triangle("t", 30.0, 20.0),
            Piece::l_right("l", 50.0, 40.0, 20.0, 15.0),
            Piece::t_shape("tee", 40.0, 30.0, 40.0, 10.0),
        ];
        for goal in OptimizationGoal::ALL {
            let result = optimize(&pieces, &slab, goal);
            assert_relative_eq!(result.used_area + result.waste_area, slab.area());
            let expected: f64 = result.placed.iter().map(Piece::effective_area).sum();
            assert_relative_eq!(result.used_area, expected);
        }
    }

    #[test]
    fn test_random_layouts_are_valid() {
        let mut rng = StdRng::seed_from_u64(2024);
        for case in 0..12 {
            let mut slab = Slab::new(
                rng.gen_range(120.0..300.0_f64).round(),
                rng.gen_range(80.0..200.0_f64).round(),
            )
            .with_margin(rng.gen_range(0.0..5.0_f64).round())
            .with_spacing([0.0, 0.5, 3.0][case % 3]);
            if case % 2 == 0 {
                slab = slab.with_defect(Rect::new(30.0, 20.0, 15.0, 25.0));
            }
            let pieces = random_rectangles(&mut rng, 8 + case * 3);
            let goal = OptimizationGoal::ALL[case % 4];
            let result = quick_optimizer(goal).solve(&pieces, &slab);

            assert_layout_valid(&result, &slab);
            assert_eq!(result.placed_count() + result.unplaced_count(), pieces.len());
            assert!(result.efficiency >= 0.0 && result.efficiency <= 100.0);
        }
    }

    #[test]
    fn test_cutting_order_is_sequential() {
        let mut rng = StdRng::seed_from_u64(5);
        let slab = Slab::new(200.0, 150.0);
        let result = quick_optimizer(OptimizationGoal::default())
            .solve(&random_rectangles(&mut rng, 12), &slab);
        for (i, piece) in result.placed.iter().enumerate() {
            assert_eq!(piece.placement().map(|p| p.cutting_order), Some(i as u32 + 1));
            assert_eq!(&result.cutting_sequence[i], piece.id());
            assert!(piece.color().is_some());
        }
        for piece in &result.unplaced {
            assert!(piece.placement().is_none());
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut rng = StdRng::seed_from_u64(99);
        let pieces = random_rectangles(&mut rng, 15);
        let slab = Slab::new(180.0, 120.0).with_spacing(1.0);
        let optimizer = Optimizer::new(
            Config::default()
                .with_seed(1234)
                .with_max_population(16)
                .with_max_generations(12),
        );

        let first = optimizer.solve(&pieces, &slab);
        let second = optimizer.solve(&pieces, &slab);
        assert_eq!(first.cutting_sequence, second.cutting_sequence);
        let positions = |r: &OptimizationResult| -> Vec<(f64, f64, bool)> {
            r.placed
                .iter()
                .map(|p| {
                    let at = p.placement().unwrap();
                    (at.x, at.y, p.is_rotated())
                })
                .collect()
        };
        assert_eq!(positions(&first), positions(&second));
        assert_eq!(first.efficiency, second.efficiency);
    }

    #[test]
    fn test_large_instance_layout_valid() {
        let mut rng = StdRng::seed_from_u64(17);
        let slab = Slab::new(600.0, 400.0).with_margin(3.0).with_spacing(2.0);
        let pieces = random_rectangles(&mut rng, 60);
        let result = quick_optimizer(OptimizationGoal::CostEfficiency).solve(&pieces, &slab);
        assert!(result.strategy.starts_with("MultiStrategy"));
        assert_layout_valid(&result, &slab);
    }
}

mod constraint_tests {
    use super::*;

    #[test]
    fn test_priority_wins_contested_space() {
        let slab = Slab::new(50.0, 50.0);
        let pieces = vec![
            Piece::rectangle("normal", 50.0, 50.0),
            Piece::rectangle("urgent", 50.0, 50.0).with_priority(5),
        ];
        let optimizer = Optimizer::new(Config::default().with_strategy(Strategy::MultiStrategy));
        let result = optimizer.solve(&pieces, &slab);
        assert_eq!(result.placed_count(), 1);
        assert_eq!(result.placed[0].id(), "urgent");
    }

    #[test]
    fn test_grain_alignment_rotates_piece() {
        let slab = Slab::new(200.0, 200.0).with_grain(GrainDirection::Horizontal);
        let pieces = vec![Piece::rectangle("veneer", 30.0, 10.0).with_grain(GrainDirection::Vertical)];
        let result = pack(&pieces, &slab, OptimizationGoal::AestheticMatching);
        let placed = &result.placed[0];
        assert!(placed.is_rotated());
        assert_eq!(placed.grain(), GrainDirection::Horizontal);
        assert_eq!((placed.width(), placed.height()), (10.0, 30.0));
    }

    #[test]
    fn test_non_rotatable_keeps_orientation() {
        let slab = Slab::new(200.0, 200.0).with_grain(GrainDirection::Horizontal);
        let pieces = vec![Piece::rectangle("veneer", 30.0, 10.0)
            .with_grain(GrainDirection::Vertical)
            .with_rotatable(false)];
        let result = pack(&pieces, &slab, OptimizationGoal::AestheticMatching);
        assert!(!result.placed[0].is_rotated());
    }

    #[test]
    fn test_offcuts_from_layout() {
        let slab = Slab::new(200.0, 100.0);
        let pieces = vec![Piece::rectangle("a", 80.0, 100.0).with_rotatable(false)];
        let result = optimize(&pieces, &slab, OptimizationGoal::WasteReduction);
        let offcuts = extract_offcuts(&result, 20.0, 20.0);
        assert_eq!(offcuts.len(), 1);
        assert_relative_eq!(offcuts[0].area(), 120.0 * 100.0);
        assert!(offcuts[0].is_usable);
    }
}
