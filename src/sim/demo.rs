//! Seeded demo level generation
//!
//! Used when no level files exist so the game is still playable. Same seed,
//! same grid.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::level::TileGrid;

/// Smallest grid the generator will build
pub const MIN_DEMO_COLS: usize = 16;
pub const MIN_DEMO_ROWS: usize = 8;

/// Generated grid plus the cell the player should start in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoLevel {
    pub grid: TileGrid,
    /// (col, row) of the spawn cell, resting on the floor
    pub spawn: (usize, usize),
}

/// Build a level: full floor, a checkpoint near the start, spikes in the
/// second half, floating platforms with orbs, and an orb at the far end
pub fn generate_demo_level(seed: u64, cols: usize, rows: usize) -> DemoLevel {
    let cols = cols.max(MIN_DEMO_COLS);
    let rows = rows.max(MIN_DEMO_ROWS);
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut grid = TileGrid::empty(cols, rows);

    let floor = rows - 1;
    for col in 0..cols {
        grid.set(col, floor, GROUND_TILE);
    }
    let surface = floor - 1;

    let checkpoint_col = rng.random_range(4..cols / 2);
    grid.set(checkpoint_col, surface, CHECKPOINT_TILE);

    for _ in 0..(cols / 8).max(1) {
        let col = rng.random_range(cols / 2..cols - 1);
        grid.set(col, surface, SPIKE_TILE);
    }

    // Platforms stay at least two rows clear of the surface
    for _ in 0..(cols / 6).max(1) {
        let len = rng.random_range(2..=5);
        let col = rng.random_range(0..cols - len);
        let row = rng.random_range(2..=surface - 3);
        for c in col..col + len {
            grid.set(c, row, GROUND_TILE);
        }
        if rng.random_bool(0.5) {
            let code = rng.random_range(1..=MAX_LEVELS as i32);
            grid.set(col + len / 2, row - 1, code);
        }
    }

    let exit = rng.random_range(1..=MAX_LEVELS as i32);
    grid.set(cols - 1, surface, exit);

    DemoLevel {
        grid,
        spawn: (1, surface),
    }
}
