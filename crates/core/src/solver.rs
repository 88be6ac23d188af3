//! Solver configuration and progress reporting.

use crate::ga::GaConfig;
use crate::{Error, Result};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Top-level search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Genetic search for small instances, multi-strategy sweep otherwise.
    #[default]
    Auto,
    /// One greedy pass per fixed sort order, best result kept.
    MultiStrategy,
    /// Genetic search over piece order and rotation bias.
    GeneticAlgorithm,
}

impl Strategy {
    /// Short name used in results and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Auto => "Auto",
            Strategy::MultiStrategy => "MultiStrategy",
            Strategy::GeneticAlgorithm => "GeneticAlgorithm",
        }
    }
}

/// What the placement scorer should favour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum OptimizationGoal {
    /// Tightest fit, least leftover material.
    #[default]
    WasteReduction,
    /// Placements close to the working origin and saw-friendly alignment.
    ProductionSpeed,
    /// Grain continuity across pieces.
    AestheticMatching,
    /// Tight fit while keeping leftovers reusable.
    CostEfficiency,
}

impl OptimizationGoal {
    /// All goals, in declaration order.
    pub const ALL: [OptimizationGoal; 4] = [
        OptimizationGoal::WasteReduction,
        OptimizationGoal::ProductionSpeed,
        OptimizationGoal::AestheticMatching,
        OptimizationGoal::CostEfficiency,
    ];

    /// Short name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizationGoal::WasteReduction => "waste-reduction",
            OptimizationGoal::ProductionSpeed => "production-speed",
            OptimizationGoal::AestheticMatching => "aesthetic-matching",
            OptimizationGoal::CostEfficiency => "cost-efficiency",
        }
    }
}

/// Configuration for the optimizer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Search strategy.
    pub strategy: Strategy,

    /// Scoring goal.
    pub goal: OptimizationGoal,

    /// Piece count at or below which `Auto` runs the genetic search.
    pub genetic_threshold: usize,

    // GA-specific parameters
    /// Upper bound on the GA population size.
    pub max_population: usize,

    /// Upper bound on the number of GA generations.
    pub max_generations: u32,

    /// Crossover rate for GA (0.0 - 1.0).
    pub crossover_rate: f64,

    /// Mutation rate for GA (0.0 - 1.0).
    pub mutation_rate: f64,

    /// Individuals carried unchanged into the next generation.
    pub elite_count: usize,

    /// Individuals sampled per tournament.
    pub tournament_size: usize,

    /// Random seed. Equal seeds give equal results.
    pub seed: u64,

    /// Maximum computation time in milliseconds (0 = unlimited).
    pub time_limit_ms: u64,

    /// Stop the GA after this many generations without improvement.
    pub stagnation_limit: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            goal: OptimizationGoal::default(),
            genetic_threshold: 30,
            max_population: 50,
            max_generations: 100,
            crossover_rate: 1.0,
            mutation_rate: 0.1,
            elite_count: 2,
            tournament_size: 3,
            seed: 0x5EED_CAFE,
            time_limit_ms: 0,
            stagnation_limit: None,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the optimization goal.
    pub fn with_goal(mut self, goal: OptimizationGoal) -> Self {
        self.goal = goal;
        self
    }

    /// Sets the piece count threshold for the genetic path.
    pub fn with_genetic_threshold(mut self, threshold: usize) -> Self {
        self.genetic_threshold = threshold;
        self
    }

    /// Sets the GA population cap.
    pub fn with_max_population(mut self, size: usize) -> Self {
        self.max_population = size;
        self
    }

    /// Sets the GA generation cap.
    pub fn with_max_generations(mut self, generations: u32) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the number of non-improving generations after which the GA stops.
    pub fn with_stagnation_limit(mut self, generations: u32) -> Self {
        self.stagnation_limit = Some(generations);
        self
    }

    /// Checks that the GA parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_population < 2 {
            return Err(Error::ConfigError(
                "max_population must be at least 2".into(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(Error::ConfigError(
                "tournament_size must be positive".into(),
            ));
        }
        if self.elite_count >= self.max_population {
            return Err(Error::ConfigError(format!(
                "elite_count ({}) must be below max_population ({})",
                self.elite_count, self.max_population
            )));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::ConfigError(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }

    /// Derives the GA configuration for an instance of `piece_count` pieces.
    ///
    /// Population and generation counts grow with the instance and are capped
    /// by `max_population` and `max_generations`.
    pub fn ga_config(&self, piece_count: usize) -> GaConfig {
        let max_population = self.max_population.max(2);
        let population = (piece_count * 4).clamp(10.min(max_population), max_population);
        let generations = ((piece_count as u32).saturating_mul(5))
            .clamp(20.min(self.max_generations), self.max_generations);

        let mut ga = GaConfig::default()
            .with_population_size(population)
            .with_max_generations(generations)
            .with_crossover_rate(self.crossover_rate)
            .with_mutation_rate(self.mutation_rate)
            .with_elite_count(self.elite_count.min(population - 1))
            .with_tournament_size(self.tournament_size)
            .with_seed(self.seed);
        if self.time_limit_ms > 0 {
            ga = ga.with_time_limit(Duration::from_millis(self.time_limit_ms));
        }
        if let Some(limit) = self.stagnation_limit {
            ga = ga.with_stagnation_limit(limit);
        }
        ga
    }
}

/// Progress callback for long-running operations.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) + Send + Sync>;

/// Progress information during solving.
#[derive(Debug, Clone, Default)]
pub struct ProgressInfo {
    /// Current iteration/generation number.
    pub iteration: u32,
    /// Total expected iterations (0 if unknown).
    pub total_iterations: u32,
    /// Current best efficiency (percent).
    pub efficiency: f64,
    /// Current best fitness value.
    pub best_fitness: f64,
    /// Number of pieces placed by the current best.
    pub items_placed: usize,
    /// Total number of pieces.
    pub total_items: usize,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Current phase description.
    pub phase: String,
    /// Whether the solver is still running.
    pub running: bool,
}

impl ProgressInfo {
    /// Creates a new progress info with default values.
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Sets the iteration info.
    pub fn with_iteration(mut self, current: u32, total: u32) -> Self {
        self.iteration = current;
        self.total_iterations = total;
        self
    }

    /// Sets the efficiency.
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// Sets the best fitness.
    pub fn with_fitness(mut self, fitness: f64) -> Self {
        self.best_fitness = fitness;
        self
    }

    /// Sets the items placed info.
    pub fn with_items(mut self, placed: usize, total: usize) -> Self {
        self.items_placed = placed;
        self.total_items = total;
        self
    }

    /// Sets the elapsed time.
    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Sets the phase description.
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Marks the solver as finished.
    pub fn finished(mut self) -> Self {
        self.running = false;
        self
    }

    /// Calculates the progress fraction (0.0 to 1.0).
    pub fn progress_percent(&self) -> f64 {
        if self.total_iterations > 0 {
            self.iteration as f64 / self.total_iterations as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.genetic_threshold, 30);
        assert_eq!(config.elite_count, 2);
        assert_eq!(config.tournament_size, 3);
        assert_eq!(config.goal, OptimizationGoal::WasteReduction);
    }

    #[test]
    fn test_invalid_config() {
        let config = Config::default().with_max_population(1);
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.crossover_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ga_config_scaling() {
        let config = Config::default();

        let small = config.ga_config(2);
        assert_eq!(small.population_size, 10);
        assert_eq!(small.max_generations, 20);

        let medium = config.ga_config(8);
        assert_eq!(medium.population_size, 32);
        assert_eq!(medium.max_generations, 40);

        let large = config.ga_config(30);
        assert_eq!(large.population_size, 50);
        assert_eq!(large.max_generations, 100);
        assert_eq!(large.elite_count, 2);
        assert_eq!(large.seed, Some(config.seed));
        assert!(large.time_limit.is_none());
        assert!(large.stagnation_limit.is_none());
        assert!(large.target_fitness.is_none());
    }

    #[test]
    fn test_ga_config_carries_stagnation_limit() {
        let ga = Config::default().with_stagnation_limit(5).ga_config(10);
        assert_eq!(ga.stagnation_limit, Some(5));
    }

    #[test]
    fn test_ga_config_respects_small_caps() {
        let config = Config::default()
            .with_max_population(4)
            .with_max_generations(3)
            .with_time_limit(250);
        let ga = config.ga_config(12);
        assert_eq!(ga.population_size, 4);
        assert_eq!(ga.max_generations, 3);
        assert_eq!(ga.time_limit, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_progress_info() {
        let info = ProgressInfo::new()
            .with_iteration(5, 20)
            .with_items(3, 4)
            .with_phase("genetic");
        assert!(info.running);
        assert!((info.progress_percent() - 0.25).abs() < 1e-12);
        assert!(!info.finished().running);
    }
}
