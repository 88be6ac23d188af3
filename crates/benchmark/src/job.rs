//! Job files: one slab, its pieces and a goal, stored as JSON.

use serde::{Deserialize, Serialize};
use slabcut_core::OptimizationGoal;
use slabcut_packer::{Piece, Slab};
use std::fs;
use std::path::Path;

/// A packing job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Job name used in reports.
    pub name: String,
    /// The stock sheet.
    pub slab: Slab,
    /// Pieces to cut.
    pub pieces: Vec<Piece>,
    /// Optimisation goal.
    #[serde(default)]
    pub goal: OptimizationGoal,
}

impl Job {
    /// Creates a job with the default goal.
    pub fn new(name: impl Into<String>, slab: Slab, pieces: Vec<Piece>) -> Self {
        Self {
            name: name.into(),
            slab,
            pieces,
            goal: OptimizationGoal::default(),
        }
    }

    /// Sets the goal.
    pub fn with_goal(mut self, goal: OptimizationGoal) -> Self {
        self.goal = goal;
        self
    }

    /// Reads a job from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Writes the job to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Checks the slab and every piece, returning the first problem found.
    pub fn validate(&self) -> slabcut_core::Result<()> {
        self.slab.validate()?;
        self.pieces.iter().try_for_each(Piece::validate)
    }

    /// Sum of the effective piece areas.
    pub fn total_piece_area(&self) -> f64 {
        self.pieces.iter().map(Piece::effective_area).sum()
    }
}
