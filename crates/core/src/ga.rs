//! Genetic Algorithm framework for optimization.
//!
//! This module defines the GA abstraction layer: [`Individual`] carries the
//! genome and its cached fitness and knows how to recombine and mutate itself,
//! [`GaProblem`] knows how to seed and evaluate a population, and [`GaRunner`]
//! drives the generational loop (ranking, elitism, tournament selection,
//! crossover, mutation) while remembering the best individual ever seen.

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the genetic algorithm.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Population size.
    pub population_size: usize,
    /// Maximum number of generations.
    pub max_generations: u32,
    /// Crossover rate (0.0 - 1.0).
    pub crossover_rate: f64,
    /// Mutation rate (0.0 - 1.0), handed to [`Individual::mutate`].
    pub mutation_rate: f64,
    /// Number of elite individuals to preserve each generation.
    pub elite_count: usize,
    /// Tournament size for selection.
    pub tournament_size: usize,
    /// Seed for the runner's RNG (None = entropy).
    pub seed: Option<u64>,
    /// Maximum time limit (None = unlimited).
    pub time_limit: Option<Duration>,
    /// Target fitness to stop early (None = run all generations).
    pub target_fitness: Option<f64>,
    /// Stagnation generations before early stop (None = never).
    pub stagnation_limit: Option<u32>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            crossover_rate: 1.0,
            mutation_rate: 0.1,
            elite_count: 2,
            tournament_size: 3,
            seed: None,
            time_limit: None,
            target_fitness: None,
            stagnation_limit: None,
        }
    }
}

impl GaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(2);
        self
    }

    /// Sets the maximum generations.
    pub fn with_max_generations(mut self, gen: u32) -> Self {
        self.max_generations = gen;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Sets the target fitness.
    pub fn with_target_fitness(mut self, fitness: f64) -> Self {
        self.target_fitness = Some(fitness);
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, generations: u32) -> Self {
        self.stagnation_limit = Some(generations);
        self
    }
}

/// Trait for individuals in the genetic algorithm.
///
/// Crossover and mutation live on the individual itself; the problem only
/// seeds and evaluates.
pub trait Individual: Clone + Send + Sync {
    /// Returns the cached fitness (higher is better).
    fn fitness(&self) -> f64;

    /// Performs crossover with another individual.
    fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self;

    /// Mutates this individual in place; `rate` is the per-operator probability.
    fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R);
}

/// Trait for problem-specific GA operations.
pub trait GaProblem: Send + Sync {
    /// The individual type for this problem.
    type Individual: Individual;

    /// Creates the initial population.
    fn initialize_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Self::Individual>;

    /// Evaluates the fitness of an individual and caches it on the individual.
    fn evaluate(&self, individual: &mut Self::Individual);

    /// Evaluates multiple individuals in parallel.
    ///
    /// Evaluation must not depend on other individuals, so the parallel
    /// result equals the sequential one.
    fn evaluate_parallel(&self, individuals: &mut [Self::Individual]) {
        individuals.par_iter_mut().for_each(|ind| {
            self.evaluate(ind);
        });
    }

    /// Called after each generation (for progress reporting).
    fn on_generation(
        &self,
        _generation: u32,
        _best: &Self::Individual,
        _population: &[Self::Individual],
    ) {
    }
}

/// Progress information during GA execution.
#[derive(Debug, Clone)]
pub struct GaProgress {
    /// Current generation number.
    pub generation: u32,
    /// Maximum generations configured.
    pub max_generations: u32,
    /// Best fitness so far.
    pub best_fitness: f64,
    /// Average fitness of current population.
    pub avg_fitness: f64,
    /// Elapsed time since start.
    pub elapsed: Duration,
    /// Whether the algorithm is still running.
    pub running: bool,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found in any generation.
    pub best: I,
    /// Generations completed.
    pub generations: u32,
    /// Individuals evaluated, initial population included.
    pub evaluations: u64,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Whether the target fitness was reached.
    pub target_reached: bool,
    /// Whether the run stopped on the cancel handle or the time limit.
    pub interrupted: bool,
    /// Fitness history (best-ever fitness per generation).
    pub history: Vec<f64>,
}

/// Genetic algorithm runner.
pub struct GaRunner<P: GaProblem> {
    config: GaConfig,
    problem: P,
    cancelled: Arc<AtomicBool>,
}

impl<P: GaProblem> GaRunner<P> {
    /// Creates a new GA runner.
    pub fn new(config: GaConfig, problem: P) -> Self {
        Self {
            config,
            problem,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares an existing cancellation flag with this runner.
    pub fn with_cancel_handle(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Returns a handle to cancel the algorithm.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Returns the problem being solved.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs the genetic algorithm with an RNG built from the configured seed.
    pub fn run(&self) -> GaResult<P::Individual> {
        let mut rng = self.make_rng();
        self.run_with_rng(&mut rng)
    }

    /// Runs the genetic algorithm with a progress callback.
    pub fn run_with_progress<F>(&self, progress_callback: F) -> GaResult<P::Individual>
    where
        F: Fn(GaProgress),
    {
        let mut rng = self.make_rng();
        self.run_with_rng_and_progress(&mut rng, Some(progress_callback))
    }

    /// Runs the genetic algorithm with a specific RNG.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> GaResult<P::Individual> {
        self.run_with_rng_and_progress::<R, fn(GaProgress)>(rng, None)
    }

    fn make_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Runs the genetic algorithm with a specific RNG and optional progress callback.
    ///
    /// # Panics
    /// Panics if the problem returns an empty initial population.
    pub fn run_with_rng_and_progress<R: Rng, F>(
        &self,
        rng: &mut R,
        progress_callback: Option<F>,
    ) -> GaResult<P::Individual>
    where
        F: Fn(GaProgress),
    {
        let start = Instant::now();
        let mut history = Vec::new();
        let population_size = self.config.population_size.max(2);
        let elite_count = self.config.elite_count.min(population_size - 1);

        let mut population = self.problem.initialize_population(population_size, rng);
        assert!(
            !population.is_empty(),
            "GaProblem::initialize_population returned no individuals"
        );
        self.problem.evaluate_parallel(&mut population);
        let mut evaluations = population.len() as u64;
        sort_by_fitness(&mut population);

        let mut best = population[0].clone();
        let mut best_fitness = best.fitness();
        let mut stagnation_count = 0u32;
        let mut generation = 0u32;
        let mut target_reached = false;
        let mut interrupted = false;

        while generation < self.config.max_generations {
            if self.cancelled.load(Ordering::Relaxed) {
                interrupted = true;
                break;
            }

            if let Some(limit) = self.config.time_limit {
                if start.elapsed() > limit {
                    interrupted = true;
                    break;
                }
            }

            if let Some(target) = self.config.target_fitness {
                if best_fitness >= target {
                    target_reached = true;
                    break;
                }
            }

            history.push(best_fitness);

            let mut new_population = Vec::with_capacity(population_size);

            // Elitism: population is ranked, keep the head unchanged
            new_population.extend(population.iter().take(elite_count).cloned());

            let mut children: Vec<P::Individual> =
                Vec::with_capacity(population_size - new_population.len());

            while children.len() < population_size - new_population.len() {
                let parent1 = self.tournament_select(&population, rng);
                let parent2 = self.tournament_select(&population, rng);

                let mut child = if rng.gen::<f64>() < self.config.crossover_rate {
                    parent1.crossover(parent2, rng)
                } else {
                    parent1.clone()
                };

                child.mutate(self.config.mutation_rate, rng);
                children.push(child);
            }

            self.problem.evaluate_parallel(&mut children);
            evaluations += children.len() as u64;

            new_population.extend(children);
            sort_by_fitness(&mut new_population);

            // Fitness is not monotonic across generations, so compare to best-ever
            let generation_best = new_population[0].fitness();
            if generation_best > best_fitness {
                best = new_population[0].clone();
                best_fitness = generation_best;
                stagnation_count = 0;
            } else {
                stagnation_count += 1;
            }

            self.problem
                .on_generation(generation, &best, &new_population);

            if let Some(ref callback) = progress_callback {
                callback(GaProgress {
                    generation,
                    max_generations: self.config.max_generations,
                    best_fitness,
                    avg_fitness: average_fitness(&new_population),
                    elapsed: start.elapsed(),
                    running: true,
                });
            }

            population = new_population;
            generation += 1;

            if let Some(limit) = self.config.stagnation_limit {
                if stagnation_count >= limit {
                    break;
                }
            }
        }

        history.push(best_fitness);

        if let Some(ref callback) = progress_callback {
            callback(GaProgress {
                generation,
                max_generations: self.config.max_generations,
                best_fitness,
                avg_fitness: average_fitness(&population),
                elapsed: start.elapsed(),
                running: false,
            });
        }

        GaResult {
            best,
            generations: generation,
            evaluations,
            elapsed: start.elapsed(),
            target_reached,
            interrupted,
            history,
        }
    }

    /// Tournament selection: sample `tournament_size` individuals, keep the fittest.
    fn tournament_select<'a, R: Rng>(
        &self,
        population: &'a [P::Individual],
        rng: &mut R,
    ) -> &'a P::Individual {
        let mut best_idx = rng.gen_range(0..population.len());

        for _ in 1..self.config.tournament_size {
            let idx = rng.gen_range(0..population.len());
            if population[idx].fitness() > population[best_idx].fitness() {
                best_idx = idx;
            }
        }

        &population[best_idx]
    }
}

/// Stable sort, fittest first.
fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        b.fitness()
            .partial_cmp(&a.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn average_fitness<I: Individual>(population: &[I]) -> f64 {
    population.iter().map(|ind| ind.fitness()).sum::<f64>() / population.len().max(1) as f64
}

/// Order crossover (OX) on permutations.
///
/// Copies a random contiguous slice from `parent1` into the same positions of
/// the child, then fills the remaining positions left to right with the genes
/// of `parent2` in their relative order, skipping genes already copied.
/// Both parents must be permutations of `0..n`.
pub fn order_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = parent1.len();
    if n < 2 || parent2.len() != n {
        return parent1.to_vec();
    }

    let (mut p1, mut p2) = (rng.gen_range(0..n), rng.gen_range(0..n));
    if p1 > p2 {
        std::mem::swap(&mut p1, &mut p2);
    }

    let mut child = vec![usize::MAX; n];
    let mut used = vec![false; n];

    for i in p1..=p2 {
        child[i] = parent1[i];
        used[parent1[i]] = true;
    }

    let mut donors = parent2.iter().copied().filter(|&gene| !used[gene]);
    for slot in child.iter_mut().filter(|slot| **slot == usize::MAX) {
        if let Some(gene) = donors.next() {
            *slot = gene;
        }
    }

    child
}

/// Uniform crossover: each gene is taken from either parent with equal probability.
pub fn uniform_crossover<T: Copy, R: Rng>(parent1: &[T], parent2: &[T], rng: &mut R) -> Vec<T> {
    parent1
        .iter()
        .zip(parent2)
        .map(|(a, b)| if rng.gen() { *a } else { *b })
        .collect()
}
