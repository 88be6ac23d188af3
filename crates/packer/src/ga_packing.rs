//! Genetic search over piece order and rotation bias.
//!
//! An individual is a permutation of piece indices plus one rotation-bias
//! bit per piece. It is decoded by running the greedy packer in the
//! permutation's order with the bias advising orientation, and its fitness is
//! the packed layout's fitness.

use crate::packer::HeuristicPacker;
use crate::piece::Piece;
use crate::result::OptimizationResult;
use crate::slab::Slab;
use crate::sort::SortStrategy;
use rand::prelude::*;
use slabcut_core::{
    order_crossover, uniform_crossover, Config, GaProblem, GaProgress, GaRunner, Individual,
    OptimizationGoal, ProgressCallback, ProgressInfo,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Permutation plus rotation bias, with the decoded layout cached.
#[derive(Debug, Clone)]
pub struct PackingChromosome {
    /// Piece indices in visiting order.
    pub order: Vec<usize>,
    /// Preferred orientation per piece index (true = rotated).
    pub rotation_bias: Vec<bool>,
    fitness: f64,
    result: Option<OptimizationResult>,
}

impl PackingChromosome {
    /// Creates an unevaluated chromosome.
    pub fn new(order: Vec<usize>, rotation_bias: Vec<bool>) -> Self {
        Self {
            order,
            rotation_bias,
            fitness: f64::NEG_INFINITY,
            result: None,
        }
    }

    /// Creates a chromosome with a shuffled order and random bias.
    pub fn random<R: Rng>(piece_count: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..piece_count).collect();
        order.shuffle(rng);
        let rotation_bias = (0..piece_count).map(|_| rng.gen_bool(0.5)).collect();
        Self::new(order, rotation_bias)
    }

    /// Layout decoded at the last evaluation.
    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    /// Takes the decoded layout.
    pub fn into_result(self) -> Option<OptimizationResult> {
        self.result
    }

    fn set_result(&mut self, result: OptimizationResult) {
        self.fitness = result.fitness();
        self.result = Some(result);
    }

    fn invalidate(&mut self) {
        self.fitness = f64::NEG_INFINITY;
        self.result = None;
    }

    /// Swaps two random positions of the order.
    pub fn swap_mutate<R: Rng>(&mut self, rng: &mut R) {
        let n = self.order.len();
        if n < 2 {
            return;
        }
        let i = rng.gen_range(0..n);
        let mut j = rng.gen_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        self.order.swap(i, j);
    }
}

impl Individual for PackingChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        let order = order_crossover(&self.order, &other.order, rng);
        let rotation_bias = uniform_crossover(&self.rotation_bias, &other.rotation_bias, rng);
        Self::new(order, rotation_bias)
    }

    fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        if rng.gen::<f64>() < rate {
            self.swap_mutate(rng);
        }
        for bit in &mut self.rotation_bias {
            if rng.gen::<f64>() < rate {
                *bit = !*bit;
            }
        }
        self.invalidate();
    }
}

/// The packing problem seen by the GA runner.
pub struct PackingProblem {
    pieces: Vec<Piece>,
    slab: Slab,
    goal: OptimizationGoal,
    best_placed: AtomicUsize,
    best_efficiency: AtomicU64,
}

impl PackingProblem {
    /// Creates a problem over owned copies of the inputs.
    pub fn new(pieces: Vec<Piece>, slab: Slab, goal: OptimizationGoal) -> Self {
        Self {
            pieces,
            slab,
            goal,
            best_placed: AtomicUsize::new(0),
            best_efficiency: AtomicU64::new(0f64.to_bits()),
        }
    }

    /// Number of pieces.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Packs the pieces as the chromosome directs.
    pub fn decode(&self, chromosome: &PackingChromosome) -> OptimizationResult {
        HeuristicPacker::new(&self.slab, self.goal).pack_order(
            &self.pieces,
            &chromosome.order,
            Some(&chromosome.rotation_bias),
        )
    }

    /// Placed count of the best individual so far.
    pub fn best_placed(&self) -> usize {
        self.best_placed.load(Ordering::Relaxed)
    }

    /// Efficiency of the best individual so far.
    pub fn best_efficiency(&self) -> f64 {
        f64::from_bits(self.best_efficiency.load(Ordering::Relaxed))
    }
}

impl GaProblem for PackingProblem {
    type Individual = PackingChromosome;

    fn initialize_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<PackingChromosome> {
        let n = self.pieces.len();
        let mut population: Vec<PackingChromosome> = SortStrategy::ALL
            .iter()
            .take(size)
            .map(|strategy| PackingChromosome::new(strategy.order(&self.pieces), vec![false; n]))
            .collect();
        while population.len() < size {
            population.push(PackingChromosome::random(n, rng));
        }
        population
    }

    fn evaluate(&self, individual: &mut PackingChromosome) {
        let result = self.decode(individual);
        individual.set_result(result);
    }

    fn on_generation(&self, generation: u32, best: &PackingChromosome, _population: &[PackingChromosome]) {
        if let Some(result) = best.result() {
            self.best_placed.store(result.placed_count(), Ordering::Relaxed);
            self.best_efficiency
                .store(result.efficiency.to_bits(), Ordering::Relaxed);
            log::debug!(
                "GA generation {}: fitness={:.2}, efficiency={:.2}%, placed={}/{}",
                generation,
                best.fitness(),
                result.efficiency,
                result.placed_count(),
                self.pieces.len()
            );
        }
    }
}

/// Runs the genetic search and returns the best-ever layout.
///
/// `pieces` must be non-empty.
pub fn run_ga_packing(
    pieces: &[Piece],
    slab: &Slab,
    config: &Config,
    cancelled: Arc<AtomicBool>,
    progress: Option<&ProgressCallback>,
) -> OptimizationResult {
    // Every piece placed with no waste cannot be improved on.
    let perfect = 100.0 + 100.0 * pieces.len() as f64;
    let ga_config = config.ga_config(pieces.len()).with_target_fitness(perfect);
    let population_size = ga_config.population_size;
    let problem = PackingProblem::new(pieces.to_vec(), slab.clone(), config.goal);
    let runner = GaRunner::new(ga_config, problem).with_cancel_handle(cancelled);

    let ga_result = match progress {
        Some(callback) => runner.run_with_progress(|p: GaProgress| {
            let mut info = ProgressInfo::new()
                .with_iteration(p.generation, p.max_generations)
                .with_fitness(p.best_fitness)
                .with_efficiency(runner.problem().best_efficiency())
                .with_items(runner.problem().best_placed(), pieces.len())
                .with_elapsed(p.elapsed.as_millis() as u64)
                .with_phase("genetic");
            if !p.running {
                info = info.finished();
            }
            callback(info);
        }),
        None => runner.run(),
    };

    let generations = ga_result.generations;
    let history = ga_result.history;
    let best = ga_result.best;
    let (order, bias) = (best.order.clone(), best.rotation_bias.clone());
    let mut result = match best.into_result() {
        Some(result) => result,
        None => runner.problem().decode(&PackingChromosome::new(order, bias)),
    };
    result.strategy = "GeneticAlgorithm".to_string();
    result.generations = generations;
    result.best_fitness = result.fitness();
    result.fitness_history = history;
    result.combinations_tested = population_size as u64 * u64::from(generations.max(1));
    result
}
