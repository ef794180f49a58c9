//! Display and output formatting utilities

use crate::board::{SharedBoard, Snapshot};
use crate::config::{OutputConfig, OutputFormat};
use crate::simulation::RenderSink;
use anyhow::Result;
use parking_lot::Mutex;
use std::io::Write;

/// Format board snapshots for the terminal
pub struct SnapshotFormatter;

impl SnapshotFormatter {
    /// Format a snapshot as a character grid
    pub fn format_compact(snapshot: &Snapshot, live: char, dead: char) -> String {
        let Some(dims) = snapshot.dimensions else {
            return String::from("(board not sized)\n");
        };

        let mut output = String::with_capacity(dims.height * (dims.width + 1));
        for y in 0..dims.height {
            for x in 0..dims.width {
                output.push(if snapshot.is_alive(x, y) { live } else { dead });
            }
            output.push('\n');
        }
        output
    }

    /// Format a snapshot with row and column numbers
    pub fn format_with_coords(snapshot: &Snapshot) -> String {
        let Some(dims) = snapshot.dimensions else {
            return String::from("(board not sized)\n");
        };

        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for x in 0..dims.width {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        for y in 0..dims.height {
            output.push_str(&format!("{:2} ", y));
            for x in 0..dims.width {
                output.push_str(if snapshot.is_alive(x, y) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// One-line summary of a snapshot
    pub fn format_summary(snapshot: &Snapshot) -> String {
        match snapshot.dimensions {
            Some(dims) => format!(
                "Generation {} | {} | {} living cells",
                snapshot.generation,
                dims,
                snapshot.living_count()
            ),
            None => format!("Generation {} | unsized", snapshot.generation),
        }
    }

    /// Format a snapshot according to the output configuration
    pub fn format(snapshot: &Snapshot, config: &OutputConfig) -> Result<String> {
        match config.format {
            OutputFormat::Text => Ok(format!(
                "{}\n{}",
                Self::format_summary(snapshot),
                Self::format_compact(snapshot, config.live_char, config.dead_char)
            )),
            OutputFormat::Json => Ok(snapshot.to_json()?),
        }
    }
}

/// Renderer that prints a fresh snapshot of the board to a writer on every
/// request
pub struct TerminalRenderer<W: Write + Send> {
    board: SharedBoard,
    config: OutputConfig,
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(board: SharedBoard, config: OutputConfig, out: W) -> Self {
        Self {
            board,
            config,
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn draw(&self) -> Result<()> {
        let frame = SnapshotFormatter::format(&self.board.snapshot(), &self.config)?;
        let mut out = self.out.lock();
        writeln!(out, "{}", frame)?;
        out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> RenderSink for TerminalRenderer<W> {
    fn request_render(&self) {
        if let Err(e) = self.draw() {
            log::warn!("Failed to draw frame: {}", e);
        }
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    fn paint(text: &str, code: u8) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    /// Honors `NO_COLOR` and dumb terminals
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && std::env::var("TERM").unwrap_or_default() != "dumb"
    }

    pub fn success(text: &str) -> String {
        Self::paint(text, 32)
    }

    pub fn error(text: &str) -> String {
        Self::paint(text, 31)
    }

    pub fn warning(text: &str) -> String {
        Self::paint(text, 33)
    }

    pub fn info(text: &str) -> String {
        Self::paint(text, 36)
    }
}
