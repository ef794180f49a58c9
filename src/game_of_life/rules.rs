//! Game of Life rules implementation

use super::cell::{Cell, Dimensions, LiveSet};
use super::grid::PaddedGrid;
use rayon::prelude::*;

/// Game of Life rules engine. Stateless; every function is pure.
pub struct GameOfLifeRules;

impl GameOfLifeRules {
    /// Compute the next generation of `live` on a `width x height` board.
    ///
    /// Only on-board positions are evaluated, so the result always satisfies
    /// the board's bounds. Every cell's fate depends on the current generation
    /// alone, which makes the row-parallel evaluation order irrelevant.
    pub fn step(live: &LiveSet, width: usize, height: usize) -> LiveSet {
        let dims = Dimensions::new(width, height);
        if dims.is_empty() {
            return LiveSet::new();
        }

        let grid = PaddedGrid::from_cells(live, dims);

        (0..height)
            .into_par_iter()
            .flat_map_iter(|y| {
                let grid = &grid;
                (0..width).filter_map(move |x| {
                    let alive = grid.is_alive(x, y);
                    let neighbors = grid.count_neighbors(x, y);
                    Self::should_be_alive(alive, neighbors).then_some(Cell::new(x, y))
                })
            })
            .collect()
    }

    /// Evolve a live set for multiple generations
    pub fn evolve_generations(mut live: LiveSet, dims: Dimensions, generations: usize) -> LiveSet {
        for _ in 0..generations {
            live = Self::step(&live, dims.width, dims.height);
        }
        live
    }

    /// Check if a cell should be alive in the next generation given its current state and neighbor count
    pub fn should_be_alive(current_state: bool, neighbor_count: u8) -> bool {
        matches!((current_state, neighbor_count), (true, 2) | (true, 3) | (false, 3))
    }
}
