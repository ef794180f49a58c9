//! The shared board: live cells plus dimensions behind one lock

use crate::game_of_life::{Cell, Dimensions, LiveSet};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Board handle shared between the input path, the simulation loop and renderers
pub type SharedBoard = Arc<BoardState>;

/// Consistent copy of the board taken at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cells: LiveSet,
    /// `None` until the board has been sized for the first time
    pub dimensions: Option<Dimensions>,
    /// Generations committed since the last reset
    pub generation: u64,
    /// Bumped by every resize and reset; a generation computed from this
    /// snapshot is only committed while the board still carries this value
    #[serde(default)]
    pub epoch: u64,
}

impl Snapshot {
    pub fn living_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells.contains(&Cell::new(x, y))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Default)]
struct Inner {
    cells: LiveSet,
    dimensions: Option<Dimensions>,
    generation: u64,
    epoch: u64,
}

/// Owner of the live-cell set and the board dimensions.
///
/// Every operation takes the same mutex for its whole duration, so all of them
/// are totally ordered and no caller can observe a set in the middle of being
/// changed. Snapshots are owned copies, so readers hold no lock afterwards.
#[derive(Debug, Default)]
pub struct BoardState {
    inner: Mutex<Inner>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedBoard {
        Arc::new(Self::new())
    }

    /// Resize the board and drop every cell that no longer fits.
    /// Dropped cells are not restored if the board grows again.
    pub fn set_dimensions(&self, width: usize, height: usize) {
        let dims = Dimensions::new(width, height);
        let mut inner = self.inner.lock();
        let before = inner.cells.len();
        inner.dimensions = Some(dims);
        inner.epoch += 1;
        inner.cells.retain(|cell| dims.contains(cell));
        log::debug!(
            "Board resized to {} ({} cells trimmed)",
            dims,
            before - inner.cells.len()
        );
    }

    /// Mark a cell alive. Ignored before the board is sized or when the cell
    /// is off the board. Returns whether the cell was newly added.
    pub fn add_cell(&self, x: usize, y: usize) -> bool {
        let cell = Cell::new(x, y);
        let mut inner = self.inner.lock();
        match inner.dimensions {
            Some(dims) if dims.contains(&cell) => inner.cells.insert(cell),
            _ => false,
        }
    }

    /// Add several cells under a single lock acquisition, with the same
    /// filtering as [`BoardState::add_cell`]. Returns how many were new.
    pub fn add_cells<I>(&self, cells: I) -> usize
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut inner = self.inner.lock();
        let Some(dims) = inner.dimensions else {
            return 0;
        };
        cells
            .into_iter()
            .filter(|cell| dims.contains(cell))
            .filter(|cell| inner.cells.insert(*cell))
            .count()
    }

    /// Kill every cell; dimensions are kept
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.cells.clear();
        inner.generation = 0;
        inner.epoch += 1;
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.lock();
        Snapshot {
            cells: inner.cells.clone(),
            dimensions: inner.dimensions,
            generation: inner.generation,
            epoch: inner.epoch,
        }
    }

    /// Install a generation computed from the snapshot taken at `epoch`.
    ///
    /// The commit is dropped if the board was resized or reset since that
    /// snapshot, because the cells were computed for dimensions or contents
    /// that no longer exist. Returns whether the cells were installed.
    pub fn replace_cells(&self, cells: LiveSet, epoch: u64) -> bool {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return false;
        }
        inner.cells = cells;
        inner.generation += 1;
        true
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.inner.lock().dimensions
    }

    pub fn living_count(&self) -> usize {
        self.inner.lock().cells.len()
    }
}
