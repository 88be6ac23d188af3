//! Synthetic job generator.
//!
//! Produces mixed-shape jobs for stress testing and strategy comparison.

use crate::job::Job;
use rand::prelude::*;
use slabcut_core::OptimizationGoal;
use slabcut_packer::{GrainDirection, Piece, Rect, Slab};

/// Generator for synthetic jobs.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticGenerator {
    /// Creates a new generator with a random seed.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates `count` rectangles sized relative to the slab.
    pub fn rectangles(&mut self, count: usize, slab: Slab) -> Job {
        let pieces = (0..count)
            .map(|i| {
                let (w, h) = self.piece_size(&slab);
                Piece::rectangle(format!("R{}", i), w, h)
            })
            .collect();
        Job::new(format!("rectangles_{}", count), slab, pieces)
    }

    /// Generates a mix of every shape kind, with occasional priorities and
    /// grain directions.
    pub fn mixed(&mut self, count: usize, slab: Slab) -> Job {
        let pieces = (0..count)
            .map(|i| {
                let piece = self.random_shape(i, &slab);
                let piece = if self.rng.gen_bool(0.2) {
                    piece.with_priority(self.rng.gen_range(2..=4))
                } else {
                    piece
                };
                if self.rng.gen_bool(0.25) {
                    let grain = if self.rng.gen_bool(0.5) {
                        GrainDirection::Horizontal
                    } else {
                        GrainDirection::Vertical
                    };
                    piece.with_grain(grain)
                } else {
                    piece
                }
            })
            .collect();
        Job::new(format!("mixed_{}", count), slab, pieces)
    }

    /// Adds `count` random defect zones to a slab.
    pub fn with_defects(&mut self, slab: Slab, count: usize) -> Slab {
        let mut slab = slab;
        for _ in 0..count {
            let w = self.rng.gen_range(5.0..=slab.width * 0.1).round().max(1.0);
            let h = self.rng.gen_range(5.0..=slab.height * 0.1).round().max(1.0);
            let x = self.rng.gen_range(0.0..(slab.width - w)).round();
            let y = self.rng.gen_range(0.0..(slab.height - h)).round();
            slab = slab.with_defect(Rect::new(x, y, w, h));
        }
        slab
    }

    /// A fixed suite covering both dispatch paths, defects and grain.
    pub fn standard_suite(&mut self) -> Vec<Job> {
        let sheet = Slab::new(300.0, 140.0).with_margin(1.0).with_spacing(0.3);
        let defective = self.with_defects(sheet.clone(), 3);
        let grained = sheet.clone().with_grain(GrainDirection::Horizontal);

        vec![
            self.rectangles(10, sheet.clone()),
            self.mixed(25, sheet.clone()),
            self.mixed(60, sheet),
            Job {
                name: "defects_20".to_string(),
                ..self.mixed(20, defective)
            },
            Job {
                name: "grain_20".to_string(),
                ..self.mixed(20, grained)
            }
            .with_goal(OptimizationGoal::AestheticMatching),
        ]
    }

    fn piece_size(&mut self, slab: &Slab) -> (f64, f64) {
        let w = self.rng.gen_range(slab.width * 0.05..=slab.width * 0.3).round();
        let h = self.rng.gen_range(slab.height * 0.05..=slab.height * 0.4).round();
        (w.max(2.0), h.max(2.0))
    }

    fn random_shape(&mut self, index: usize, slab: &Slab) -> Piece {
        let (w, h) = self.piece_size(slab);
        let roll = self.rng.gen_range(0..100);
        match roll {
            0..=49 => Piece::rectangle(format!("R{}", index), w, h),
            50..=64 => {
                let cw = (w * self.rng.gen_range(0.2..0.6)).round().max(1.0);
                let ch = (h * self.rng.gen_range(0.2..0.6)).round().max(1.0);
                if self.rng.gen_bool(0.5) {
                    Piece::l_left(format!("L{}", index), w, h, cw, ch)
                } else {
                    Piece::l_right(format!("L{}", index), w, h, cw, ch)
                }
            }
            65..=74 => {
                let stem = (w * self.rng.gen_range(0.2..0.5)).round().max(1.0);
                Piece::t_shape(format!("T{}", index), w, h, w, stem)
            }
            75..=84 => Piece::circle(format!("C{}", index), (w.min(h) / 2.0).max(1.0)),
            85..=94 => Piece::triangle(format!("V{}", index), w, h),
            _ => Piece::custom(
                format!("P{}", index),
                vec![(0.0, 0.0), (w, 0.0), (w, h * 0.7), (w * 0.5, h), (0.0, h * 0.7)],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_job() {
        let slab = Slab::new(300.0, 140.0);
        let a = SyntheticGenerator::with_seed(42).mixed(30, slab.clone());
        let b = SyntheticGenerator::with_seed(42).mixed(30, slab);
        assert_eq!(a.pieces, b.pieces);
    }

    #[test]
    fn test_generated_pieces_are_valid() {
        let mut generator = SyntheticGenerator::with_seed(7);
        for job in generator.standard_suite() {
            assert!(job.slab.validate().is_ok(), "{}", job.name);
            for piece in &job.pieces {
                assert!(piece.validate().is_ok(), "{}: {:?}", job.name, piece);
            }
        }
    }

    #[test]
    fn test_defects_inside_slab() {
        let mut generator = SyntheticGenerator::with_seed(3);
        let slab = generator.with_defects(Slab::new(200.0, 100.0), 5);
        assert_eq!(slab.defects.len(), 5);
        let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert!(slab.defects.iter().all(|d| bounds.contains(d)));
    }
}
