//! slabcut benchmark runner CLI

use clap::{Parser, Subcommand, ValueEnum};
use slabcut_benchmark::{BenchmarkResult, Job, RunResult, SyntheticGenerator};
use slabcut_core::{Config, OptimizationGoal, ProgressInfo, Strategy};
use slabcut_packer::{Optimizer, Slab};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "slabcut-bench")]
#[command(about = "Job runner and benchmark tool for slabcut")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a single job file
    Run {
        /// Path to the JSON job file
        file: PathBuf,

        /// Goal override (defaults to the job's goal)
        #[arg(short, long, value_enum)]
        goal: Option<GoalArg>,

        /// Search strategy
        #[arg(short, long, value_enum, default_value = "auto")]
        strategy: StrategyArg,

        /// Random seed for the genetic search
        #[arg(long)]
        seed: Option<u64>,

        /// Time limit in seconds
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Print generation progress
        #[arg(short, long)]
        verbose: bool,

        /// Output file for results (JSON, with placements)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Optimize a job file once per goal
    Compare {
        /// Path to the JSON job file
        file: PathBuf,

        /// Search strategy
        #[arg(short, long, value_enum, default_value = "auto")]
        strategy: StrategyArg,

        /// Random seed for the genetic search
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the synthetic suite
    Suite {
        /// Random seed for job generation and search
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Time limit per job in seconds
        #[arg(short, long, default_value = "30")]
        time_limit: u64,

        /// Output file for results (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate synthetic job files
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "jobs")]
        output: PathBuf,

        /// Number of pieces (writes the standard suite when omitted)
        #[arg(short, long)]
        count: Option<usize>,

        /// Slab width
        #[arg(long, default_value = "300")]
        width: f64,

        /// Slab height
        #[arg(long, default_value = "140")]
        height: f64,

        /// Random seed for reproducibility
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// GA for small jobs, sort sweep otherwise
    Auto,
    /// One greedy pass per sort order
    Multi,
    /// Genetic Algorithm
    Ga,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => Strategy::Auto,
            StrategyArg::Multi => Strategy::MultiStrategy,
            StrategyArg::Ga => Strategy::GeneticAlgorithm,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GoalArg {
    Waste,
    Speed,
    Aesthetic,
    Cost,
}

impl From<GoalArg> for OptimizationGoal {
    fn from(arg: GoalArg) -> Self {
        match arg {
            GoalArg::Waste => OptimizationGoal::WasteReduction,
            GoalArg::Speed => OptimizationGoal::ProductionSpeed,
            GoalArg::Aesthetic => OptimizationGoal::AestheticMatching,
            GoalArg::Cost => OptimizationGoal::CostEfficiency,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            goal,
            strategy,
            seed,
            time_limit,
            verbose,
            output,
        } => {
            let job = Job::load(&file)?;
            let goal = goal.map(Into::into).unwrap_or(job.goal);

            let mut config = Config::new()
                .with_strategy(strategy.into())
                .with_goal(goal);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(secs) = time_limit {
                config = config.with_time_limit(secs * 1000);
            }

            println!(
                "Optimizing {} ({} pieces on {}x{})",
                job.name,
                job.pieces.len(),
                job.slab.width,
                job.slab.height
            );

            config.validate()?;
            job.validate()?;

            let optimizer = Optimizer::new(config);
            let result = if verbose {
                optimizer.solve_with_progress(
                    &job.pieces,
                    &job.slab,
                    Box::new(|info: ProgressInfo| {
                        println!(
                            "  [{}] {}/{} placed {}/{} eff {:.2}%",
                            info.phase,
                            info.iteration,
                            info.total_iterations,
                            info.items_placed,
                            info.total_items,
                            info.efficiency
                        );
                    }),
                )
            } else {
                optimizer.solve(&job.pieces, &job.slab)
            };

            println!("Efficiency: {} ({:?})", result.efficiency_percent(), result.efficiency_rating());
            println!("Cutting sequence: {}", result.cutting_sequence.join(", "));
            for piece in &result.unplaced {
                println!("  unplaced: {} ({}x{})", piece.id(), piece.width(), piece.height());
            }

            let mut results = BenchmarkResult::new();
            results.add_run(RunResult::from_result(&job.name, goal, &result).with_placements(&result));
            results.print_summary();

            if let Some(path) = output {
                results.save_json(&path)?;
                println!("Results saved to: {}", path.display());
            }
        }

        Commands::Compare {
            file,
            strategy,
            seed,
            output,
        } => {
            let job = Job::load(&file)?;
            let mut results = BenchmarkResult::new();

            for goal in OptimizationGoal::ALL {
                let config = Config::new()
                    .with_strategy(strategy.into())
                    .with_goal(goal)
                    .with_seed(seed);
                let result = Optimizer::new(config).solve_checked(&job.pieces, &job.slab)?;
                results.add_run(RunResult::from_result(&job.name, goal, &result));
            }

            results.print_summary();
            if let Some(best) = results.best_run() {
                println!("Best goal: {} ({:.2}%)", best.goal.name(), best.efficiency);
            }

            if let Some(path) = output {
                results.save_json(&path)?;
                println!("Results saved to: {}", path.display());
            }
        }

        Commands::Suite {
            seed,
            time_limit,
            output,
        } => {
            let mut generator = SyntheticGenerator::with_seed(seed);
            let mut results = BenchmarkResult::new();

            for job in generator.standard_suite() {
                log::info!("running suite job {}", job.name);
                let config = Config::new()
                    .with_goal(job.goal)
                    .with_seed(seed)
                    .with_time_limit(time_limit * 1000);
                let result = Optimizer::new(config).solve_checked(&job.pieces, &job.slab)?;
                results.add_run(RunResult::from_result(&job.name, job.goal, &result));
            }

            results.print_summary();

            if let Some(path) = output {
                results.save_json(&path)?;
                println!("Results saved to: {}", path.display());
            }
        }

        Commands::Generate {
            output,
            count,
            width,
            height,
            seed,
        } => {
            fs::create_dir_all(&output)?;
            let mut generator = SyntheticGenerator::with_seed(seed);

            let jobs = match count {
                Some(count) => {
                    let slab = Slab::new(width, height);
                    slab.validate()?;
                    vec![generator.mixed(count, slab)]
                }
                None => generator.standard_suite(),
            };

            for job in &jobs {
                save_job(job, &output)?;
            }
            println!("Generated {} job(s) in {}", jobs.len(), output.display());
        }
    }

    Ok(())
}

fn save_job(job: &Job, dir: &Path) -> anyhow::Result<()> {
    let path = dir.join(format!("{}.json", job.name));
    job.save(&path)?;
    println!("  {} ({} pieces)", path.display(), job.pieces.len());
    Ok(())
}
