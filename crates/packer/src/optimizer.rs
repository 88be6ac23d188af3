//! Top-level dispatcher.
//!
//! Small instances go to the genetic search; larger ones get one greedy pass
//! per fixed sort order, keeping the result with the fewest unplaced pieces
//! and then the highest efficiency.

use crate::ga_packing::run_ga_packing;
use crate::packer::HeuristicPacker;
use crate::piece::Piece;
use crate::result::OptimizationResult;
use crate::slab::Slab;
use crate::sort::SortStrategy;
use slabcut_core::{Config, OptimizationGoal, ProgressCallback, ProgressInfo, Result, Strategy};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Packs pieces onto a slab with the default configuration and the given goal.
pub fn optimize(pieces: &[Piece], slab: &Slab, goal: OptimizationGoal) -> OptimizationResult {
    Optimizer::new(Config::default().with_goal(goal)).solve(pieces, slab)
}

/// Strategy dispatcher with cancellation support.
pub struct Optimizer {
    config: Config,
    cancelled: Arc<AtomicBool>,
}

impl Optimizer {
    /// Creates a new optimizer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates an optimizer with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a handle that cancels a running solve when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Cancels an ongoing solve; the best result found so far is returned.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Strategy `Auto` resolves to for `piece_count` pieces.
    pub fn resolve_strategy(&self, piece_count: usize) -> Strategy {
        match self.config.strategy {
            Strategy::Auto if piece_count <= self.config.genetic_threshold => {
                Strategy::GeneticAlgorithm
            }
            Strategy::Auto => Strategy::MultiStrategy,
            explicit => explicit,
        }
    }

    /// Packs `pieces` onto `slab`. Never fails: invalid input degrades to
    /// unplaced pieces.
    pub fn solve(&self, pieces: &[Piece], slab: &Slab) -> OptimizationResult {
        self.solve_inner(pieces, slab, None)
    }

    /// Like [`solve`](Self::solve), but rejects an invalid slab, piece or
    /// configuration up front.
    pub fn solve_checked(&self, pieces: &[Piece], slab: &Slab) -> Result<OptimizationResult> {
        self.config.validate()?;
        slab.validate()?;
        for piece in pieces {
            piece.validate()?;
        }
        Ok(self.solve(pieces, slab))
    }

    /// Like [`solve`](Self::solve), reporting progress through `callback`.
    pub fn solve_with_progress(
        &self,
        pieces: &[Piece],
        slab: &Slab,
        callback: ProgressCallback,
    ) -> OptimizationResult {
        self.solve_inner(pieces, slab, Some(&callback))
    }

    fn solve_inner(
        &self,
        pieces: &[Piece],
        slab: &Slab,
        progress: Option<&ProgressCallback>,
    ) -> OptimizationResult {
        let start = Instant::now();
        self.cancelled.store(false, Ordering::Relaxed);

        let strategy = self.resolve_strategy(pieces.len());
        let mut result = if pieces.is_empty() || slab.packable_region().is_none() {
            if !pieces.is_empty() {
                log::warn!(
                    "slab {}x{} (margin {}) has no packable region, {} pieces unplaced",
                    slab.width,
                    slab.height,
                    slab.margin,
                    pieces.len()
                );
            }
            OptimizationResult::all_unplaced(pieces, slab).with_strategy(strategy.name())
        } else {
            let invalid = pieces.iter().filter(|p| p.validate().is_err()).count();
            if invalid > 0 {
                log::warn!("{} invalid pieces will be left unplaced", invalid);
            }
            log::info!(
                "packing {} pieces on {}x{} with {} ({})",
                pieces.len(),
                slab.width,
                slab.height,
                strategy.name(),
                self.config.goal.name()
            );
            match strategy {
                Strategy::GeneticAlgorithm => run_ga_packing(
                    pieces,
                    slab,
                    &self.config,
                    self.cancelled.clone(),
                    progress,
                ),
                Strategy::MultiStrategy | Strategy::Auto => {
                    self.multi_strategy(pieces, slab, start, progress)
                }
            }
        };

        result.computation_time_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// One greedy pass per sort strategy, best result kept.
    fn multi_strategy(
        &self,
        pieces: &[Piece],
        slab: &Slab,
        start: Instant,
        progress: Option<&ProgressCallback>,
    ) -> OptimizationResult {
        let packer = HeuristicPacker::new(slab, self.config.goal);
        let time_limit =
            (self.config.time_limit_ms > 0).then(|| Duration::from_millis(self.config.time_limit_ms));
        let total = SortStrategy::ALL.len() as u32;

        let mut best: Option<(SortStrategy, OptimizationResult)> = None;
        let mut runs = 0u64;
        for (i, strategy) in SortStrategy::ALL.iter().enumerate() {
            if best.is_some() {
                if self.cancelled.load(Ordering::Relaxed) {
                    log::info!("packing cancelled after {} strategies", runs);
                    break;
                }
                if time_limit.is_some_and(|limit| start.elapsed() > limit) {
                    log::info!("time limit reached after {} strategies", runs);
                    break;
                }
            }

            let order = strategy.order(pieces);
            let result = packer.pack_order(pieces, &order, None);
            runs += 1;
            log::debug!(
                "strategy {}: efficiency={:.2}%, unplaced={}",
                strategy.name(),
                result.efficiency,
                result.unplaced_count()
            );

            if best
                .as_ref()
                .map_or(true, |(_, current)| result.is_better_than(current))
            {
                best = Some((*strategy, result));
            }

            if let (Some(callback), Some((_, current))) = (progress, best.as_ref()) {
                callback(
                    ProgressInfo::new()
                        .with_iteration(i as u32 + 1, total)
                        .with_efficiency(current.efficiency)
                        .with_fitness(current.fitness())
                        .with_items(current.placed_count(), pieces.len())
                        .with_elapsed(start.elapsed().as_millis() as u64)
                        .with_phase(strategy.name()),
                );
            }
        }

        let Some((winner, mut result)) = best else {
            return OptimizationResult::all_unplaced(pieces, slab)
                .with_strategy(Strategy::MultiStrategy.name());
        };

        if let Some(callback) = progress {
            callback(
                ProgressInfo::new()
                    .with_iteration(runs as u32, total)
                    .with_efficiency(result.efficiency)
                    .with_fitness(result.fitness())
                    .with_items(result.placed_count(), pieces.len())
                    .with_elapsed(start.elapsed().as_millis() as u64)
                    .with_phase("done")
                    .finished(),
            );
        }

        result.strategy = format!("{}/{}", Strategy::MultiStrategy.name(), winner.name());
        result.best_fitness = result.fitness();
        result.combinations_tested = runs * pieces.len() as u64;
        result
    }
}
