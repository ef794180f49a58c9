//! Concurrent Game of Life board
//!
//! A bounded, resizable board shared between an input source, a background
//! simulation loop and any number of renderers. All board access goes through
//! [`board::BoardState`], whose operations are serialized, so renderers always
//! draw a fully applied generation.

pub mod board;
pub mod config;
pub mod game_of_life;
pub mod input;
pub mod simulation;
pub mod utils;

pub use board::{BoardState, SharedBoard, Snapshot};
pub use config::Settings;
pub use game_of_life::{Cell, Dimensions, GameOfLifeRules, LiveSet};
pub use simulation::{LoopError, LoopState, RenderSink, SimulationLoop};

use anyhow::Result;

/// Build a board sized from the settings' default window and seeded with the
/// configured pattern, centered
pub fn prepare_board(settings: &Settings) -> Result<SharedBoard> {
    let board = BoardState::shared();
    let dims = settings.board_dimensions();
    board.set_dimensions(dims.width, dims.height);

    if let Some(ref path) = settings.input.pattern_file {
        let pattern = game_of_life::load_pattern_from_file(path)?;
        let origin = pattern.centered_origin(dims);
        let added = board.add_cells(pattern.placed_at(origin));
        log::info!("Seeded {} cells from {}", added, path.display());
    }

    Ok(board)
}
