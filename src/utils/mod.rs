//! Output helpers

pub mod display;

pub use display::{ColorOutput, SnapshotFormatter, TerminalRenderer};
