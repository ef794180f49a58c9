//! Shared board state

pub mod state;

pub use state::{BoardState, SharedBoard, Snapshot};
