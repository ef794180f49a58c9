//! Bordered grid used while computing a generation

use super::cell::{Cell, Dimensions};
use itertools::iproduct;
use std::fmt;

/// Dense grid of `(width + 2) x (height + 2)` cells surrounded by a one-cell
/// border that is always dead. Board cell `(x, y)` lives at padded position
/// `(x + 1, y + 1)`, so every interior cell has eight addressable neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedGrid {
    dims: Dimensions,
    cells: Vec<bool>,
}

impl PaddedGrid {
    /// Create an empty grid for a board of the given size
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: vec![false; (dims.width + 2) * (dims.height + 2)],
        }
    }

    /// Build a grid from live cells. Cells outside `dims` are not marked.
    pub fn from_cells<'a, I>(cells: I, dims: Dimensions) -> Self
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut grid = Self::new(dims);
        for cell in cells {
            if dims.contains(cell) {
                let idx = grid.index(cell.x + 1, cell.y + 1);
                grid.cells[idx] = true;
            }
        }
        grid
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Convert padded coordinates to a flat index
    #[inline]
    fn index(&self, px: usize, py: usize) -> usize {
        py * (self.dims.width + 2) + px
    }

    /// State of a board cell; anything off the board is dead
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        x < self.dims.width && y < self.dims.height && self.cells[self.index(x + 1, y + 1)]
    }

    /// Count live cells in the Moore neighborhood of board cell `(x, y)`.
    /// The caller guarantees `(x, y)` is on the board.
    pub fn count_neighbors(&self, x: usize, y: usize) -> u8 {
        let (px, py) = (x + 1, y + 1);
        iproduct!(-1isize..=1, -1isize..=1)
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter(|&(dx, dy)| {
                let nx = px.wrapping_add_signed(dx);
                let ny = py.wrapping_add_signed(dy);
                self.cells[self.index(nx, ny)]
            })
            .count() as u8
    }

    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }
}

impl fmt::Display for PaddedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.dims.height {
            for x in 0..self.dims.width {
                write!(f, "{}", if self.is_alive(x, y) { '1' } else { '0' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = PaddedGrid::new(Dimensions::new(3, 3));
        assert_eq!(grid.cells.len(), 25);
        assert_eq!(grid.living_count(), 0);
    }

    #[test]
    fn test_neighbor_counting() {
        let ring: Vec<Cell> = iproduct!(0..3, 0..3)
            .filter(|&(x, y)| !(x == 1 && y == 1))
            .map(Cell::from)
            .collect();
        let grid = PaddedGrid::from_cells(&ring, Dimensions::new(3, 3));

        assert_eq!(grid.count_neighbors(1, 1), 8);
        // Corner sees two edge cells, the dead center and the dead border
        assert_eq!(grid.count_neighbors(0, 0), 2);
    }

    #[test]
    fn test_border_is_dead() {
        let cells = vec![Cell::new(0, 0), Cell::new(1, 1)];
        let grid = PaddedGrid::from_cells(&cells, Dimensions::new(2, 2));
        assert_eq!(grid.count_neighbors(0, 0), 1);
        assert_eq!(grid.count_neighbors(1, 0), 2);
    }

    #[test]
    fn test_out_of_bounds_cells_are_ignored() {
        let cells = vec![Cell::new(5, 0), Cell::new(1, 0)];
        let grid = PaddedGrid::from_cells(&cells, Dimensions::new(2, 2));
        assert_eq!(grid.living_count(), 1);
        assert!(grid.is_alive(1, 0));
        assert!(!grid.is_alive(5, 0));
    }

    #[test]
    fn test_display() {
        let cells = vec![Cell::new(1, 0)];
        let grid = PaddedGrid::from_cells(&cells, Dimensions::new(2, 2));
        assert_eq!(grid.to_string(), "01\n00\n");
    }
}
