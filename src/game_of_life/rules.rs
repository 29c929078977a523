//! 3D Life transition rule (survive on 5 or 6, born on 4)

use super::grid::{Coord, Grid};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A single cell changing state, with the neighbour count that caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEvent {
    pub coord: Coord,
    pub neighbors: u8,
}

/// Outcome of one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The successor grid, same dimensions as the input
    pub grid: Grid,
    /// Cells going alive -> dead, in ordinal order
    pub dying: Vec<CellEvent>,
    /// Cells going dead -> alive, in ordinal order
    pub born: Vec<CellEvent>,
}

impl Step {
    pub fn changed(&self) -> usize {
        self.dying.len() + self.born.len()
    }
}

/// Transition engine over the 26-cell Moore neighbourhood
pub struct TransitionEngine;

impl TransitionEngine {
    /// Neighbour counts that keep a live cell alive
    pub const SURVIVAL_COUNTS: [u8; 2] = [5, 6];
    /// Neighbour counts that bring a dead cell to life
    pub const BIRTH_COUNTS: [u8; 1] = [4];
    /// Size of the 3D Moore neighbourhood
    pub const MAX_NEIGHBORS: u8 = 26;

    /// Compute the next generation. Every cell is evaluated against `current`,
    /// never against the partially built successor.
    pub fn step(current: &Grid) -> Step {
        let dims = current.dimensions();

        // Index order is x outer, y middle, z inner; collect keeps it.
        let evaluated: Vec<(bool, u8)> = (0..current.total_cells())
            .into_par_iter()
            .map(|idx| {
                let coord = current.coord_of(idx);
                let neighbors = current.count_neighbors(coord.x, coord.y, coord.z);
                let alive = current.cells()[idx];
                (Self::should_be_alive(alive, neighbors), neighbors)
            })
            .collect();

        let mut dying = Vec::new();
        let mut born = Vec::new();
        let mut next_cells = Vec::with_capacity(evaluated.len());

        for (idx, &(next, neighbors)) in evaluated.iter().enumerate() {
            let was_alive = current.cells()[idx];
            match (was_alive, next) {
                (true, false) => dying.push(CellEvent {
                    coord: current.coord_of(idx),
                    neighbors,
                }),
                (false, true) => born.push(CellEvent {
                    coord: current.coord_of(idx),
                    neighbors,
                }),
                _ => {}
            }
            next_cells.push(next);
        }

        Step {
            grid: Grid::from_raw(dims, next_cells),
            dying,
            born,
        }
    }

    /// Evolve the grid for multiple generations, discarding events
    pub fn evolve_generations(mut grid: Grid, generations: usize) -> Grid {
        for _ in 0..generations {
            grid = Self::step(&grid).grid;
        }
        grid
    }

    /// Next state of a cell given its current state and live-neighbour count
    pub fn should_be_alive(current_state: bool, neighbor_count: u8) -> bool {
        if current_state {
            Self::SURVIVAL_COUNTS.contains(&neighbor_count)
        } else {
            Self::BIRTH_COUNTS.contains(&neighbor_count)
        }
    }
}
