//! Translation of pointer, resize and menu events into board operations

use crate::board::SharedBoard;
use crate::config::{PixelSize, WindowConfig};
use crate::game_of_life::Cell;
use crate::simulation::{LoopError, RenderSink, SimulationLoop};
use std::sync::Arc;

/// Commands offered by the host's game menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Play,
    Stop,
    Reset,
}

/// Which menu entries the host should currently enable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub play_enabled: bool,
    pub stop_enabled: bool,
    pub reset_enabled: bool,
}

/// Front door for a UI layer. Owns the simulation loop and forwards every
/// event as a plain call on the shared board.
pub struct InputController {
    board: SharedBoard,
    simulation: SimulationLoop,
    renderer: Arc<dyn RenderSink>,
    window: WindowConfig,
}

impl InputController {
    pub fn new(
        board: SharedBoard,
        simulation: SimulationLoop,
        renderer: Arc<dyn RenderSink>,
        window: WindowConfig,
    ) -> Self {
        Self {
            board,
            simulation,
            renderer,
            window,
        }
    }

    pub fn board(&self) -> &SharedBoard {
        &self.board
    }

    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    /// Map a pixel position to a board cell. The first block on each axis is
    /// margin, so positions there (and anything left of or above the window)
    /// map to nothing.
    pub fn cell_at(&self, px: i32, py: i32) -> Option<Cell> {
        let block = self.window.block_size.max(1) as i32;
        let x = px / block - 1;
        let y = py / block - 1;
        if x < 0 || y < 0 {
            return None;
        }
        Some(Cell::new(x as usize, y as usize))
    }

    /// The host window was resized to `size` pixels
    pub fn on_resize(&self, size: PixelSize) {
        let dims = self.window.board_dimensions(size);
        self.board.set_dimensions(dims.width, dims.height);
        self.renderer.request_render();
    }

    /// Pointer released over the board: bring the cell under it to life
    pub fn on_pointer_release(&self, px: i32, py: i32) {
        self.paint(px, py);
    }

    /// Pointer dragged with the button held: paint every cell it crosses
    pub fn on_pointer_drag(&self, px: i32, py: i32) {
        self.paint(px, py);
    }

    fn paint(&self, px: i32, py: i32) {
        match self.cell_at(px, py) {
            Some(cell) => {
                self.board.add_cell(cell.x, cell.y);
            }
            None => log::debug!("Ignoring pointer outside the board at ({}, {})", px, py),
        }
        self.renderer.request_render();
    }

    pub fn on_command(&mut self, command: MenuCommand) -> Result<(), LoopError> {
        let result = match command {
            MenuCommand::Play => self.simulation.start(),
            MenuCommand::Stop => self.simulation.stop().map(|_| ()),
            MenuCommand::Reset => {
                self.board.reset();
                self.renderer.request_render();
                Ok(())
            }
        };
        if let Err(ref e) = result {
            log::warn!("Rejected {:?}: {}", command, e);
        }
        result
    }

    /// Play is only offered while stopped and Stop only while running
    pub fn menu_state(&self) -> MenuState {
        let running = self.simulation.is_running();
        MenuState {
            play_enabled: !running,
            stop_enabled: running,
            reset_enabled: true,
        }
    }
}
