//! Run records and summary output.

use serde::{Deserialize, Serialize};
use slabcut_core::OptimizationGoal;
use slabcut_packer::{extract_offcuts, OptimizationResult};
use std::fs;
use std::path::Path;

/// Smallest offcut side counted in reports.
pub const REPORT_OFFCUT_MIN_SIDE: f64 = 10.0;

/// Placement info for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementInfo {
    pub piece_id: String,
    pub position: [f64; 2],
    pub size: [f64; 2],
    pub rotated: bool,
    pub cutting_order: u32,
}

/// Result of a single optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Job name
    pub job: String,
    /// Goal used
    pub goal: OptimizationGoal,
    /// Strategy that produced the layout
    pub strategy: String,
    /// Number of pieces placed
    pub pieces_placed: usize,
    /// Total pieces in the job
    pub total_pieces: usize,
    /// Efficiency in percent
    pub efficiency: f64,
    /// Wasted slab area
    pub waste_area: f64,
    /// Usable offcuts left on the slab
    pub usable_offcuts: usize,
    /// Approximate candidate layouts evaluated
    pub combinations_tested: u64,
    /// GA generations (0 for the sort sweep)
    pub generations: u32,
    /// Computation time in milliseconds
    pub time_ms: u64,
    /// Placement coordinates (optional, for visualization)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placements: Option<Vec<PlacementInfo>>,
}

impl RunResult {
    /// Summarises an optimization result.
    pub fn from_result(job: &str, goal: OptimizationGoal, result: &OptimizationResult) -> Self {
        let usable_offcuts = extract_offcuts(result, REPORT_OFFCUT_MIN_SIDE, REPORT_OFFCUT_MIN_SIDE)
            .iter()
            .filter(|o| o.is_usable)
            .count();
        Self {
            job: job.to_string(),
            goal,
            strategy: result.strategy.clone(),
            pieces_placed: result.placed_count(),
            total_pieces: result.placed_count() + result.unplaced_count(),
            efficiency: result.efficiency,
            waste_area: result.waste_area,
            usable_offcuts,
            combinations_tested: result.combinations_tested,
            generations: result.generations,
            time_ms: result.computation_time_ms,
            placements: None,
        }
    }

    /// Attaches per-piece placements.
    pub fn with_placements(mut self, result: &OptimizationResult) -> Self {
        let placements = result
            .placed
            .iter()
            .filter_map(|piece| {
                piece.placement().map(|at| PlacementInfo {
                    piece_id: piece.id().clone(),
                    position: [at.x, at.y],
                    size: [piece.width(), piece.height()],
                    rotated: piece.is_rotated(),
                    cutting_order: at.cutting_order,
                })
            })
            .collect();
        self.placements = Some(placements);
        self
    }
}

/// Collection of runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Individual run results
    pub runs: Vec<RunResult>,
    /// Crate version that produced the results
    pub version: String,
}

impl BenchmarkResult {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Adds a run result.
    pub fn add_run(&mut self, result: RunResult) {
        self.runs.push(result);
    }

    /// Run with the highest efficiency among those placing every piece, if any.
    pub fn best_run(&self) -> Option<&RunResult> {
        self.runs
            .iter()
            .filter(|r| r.pieces_placed == r.total_pieces)
            .max_by(|a, b| a.efficiency.total_cmp(&b.efficiency))
    }

    /// Saves results to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Prints a summary table to stdout.
    pub fn print_summary(&self) {
        println!("\n{:=<104}", "");
        println!("SLABCUT RESULTS");
        println!("{:=<104}", "");
        println!(
            "{:<16} {:<20} {:<34} {:>9} {:>8} {:>8} {:>5}",
            "Job", "Goal", "Strategy", "Placed", "Eff%", "Time(ms)", "Offc"
        );
        println!("{:-<104}", "");

        for run in &self.runs {
            println!(
                "{:<16} {:<20} {:<34} {:>9} {:>8.2} {:>8} {:>5}",
                run.job,
                run.goal.name(),
                run.strategy,
                format!("{}/{}", run.pieces_placed, run.total_pieces),
                run.efficiency,
                run.time_ms,
                run.usable_offcuts
            );
        }

        println!("{:=<104}\n", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slabcut_packer::{pack, Piece, Slab};

    #[test]
    fn test_run_from_result() {
        let slab = Slab::new(100.0, 100.0);
        let pieces = vec![
            Piece::rectangle("a", 50.0, 100.0),
            Piece::rectangle("b", 200.0, 10.0).with_rotatable(false),
        ];
        let result = pack(&pieces, &slab, OptimizationGoal::WasteReduction);
        let run = RunResult::from_result("job", OptimizationGoal::WasteReduction, &result)
            .with_placements(&result);

        assert_eq!(run.pieces_placed, 1);
        assert_eq!(run.total_pieces, 2);
        assert_relative_eq!(run.efficiency, 50.0);
        assert_relative_eq!(run.waste_area, 5000.0);
        assert_eq!(run.usable_offcuts, 1);
        let placements = run.placements.unwrap();
        assert_eq!(placements[0].piece_id, "a");
        assert_eq!(placements[0].cutting_order, 1);
    }

    #[test]
    fn test_best_run_requires_all_placed() {
        let slab = Slab::new(100.0, 100.0);
        let goal = OptimizationGoal::WasteReduction;
        let full = pack(&[Piece::rectangle("a", 10.0, 10.0)], &slab, goal);
        let partial = pack(
            &[
                Piece::rectangle("a", 90.0, 90.0),
                Piece::rectangle("b", 500.0, 5.0),
            ],
            &slab,
            goal,
        );

        let mut results = BenchmarkResult::new();
        results.add_run(RunResult::from_result("partial", goal, &partial));
        results.add_run(RunResult::from_result("full", goal, &full));
        assert_eq!(results.best_run().map(|r| r.job.as_str()), Some("full"));
    }
}
