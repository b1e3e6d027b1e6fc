//! Reproducible random sampling of cells and windows.

use audit_common::{GridCell, WindowPolicy};
use rand::prelude::*;

/// Uniform sampler over grid cells and window indices, seeded so that a
/// run can be replayed exactly.
pub struct CellSampler {
    rng: StdRng,
    rows: usize,
    columns: usize,
    seed: u64,
}

impl CellSampler {
    /// Create a sampler for a grid. When no seed is given one is drawn
    /// from entropy and kept so the summary can report it.
    pub fn new(rows: usize, columns: usize, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            rng: StdRng::seed_from_u64(seed),
            rows,
            columns,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_cell(&mut self) -> GridCell {
        GridCell::new(
            self.rng.gen_range(0..self.rows),
            self.rng.gen_range(0..self.columns),
        )
    }

    pub fn next_window_index(&mut self, policy: &WindowPolicy) -> usize {
        self.rng.gen_range(0..policy.window_count())
    }
}
