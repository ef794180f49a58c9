//! Text patterns for seeding a board
//!
//! Format: each line is a row, `1` marks a live cell and `0` a dead one.
//! Blank lines and surrounding whitespace are ignored.

use super::cell::{Cell, Dimensions, LiveSet};
use anyhow::{Context, Result};
use std::path::Path;

/// A parsed pattern: its live cells relative to the top-left corner and
/// the bounding size of the text it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub cells: LiveSet,
    pub size: Dimensions,
}

impl Pattern {
    /// Cells of the pattern shifted so its top-left corner sits at `origin`
    pub fn placed_at(&self, origin: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .map(move |c| Cell::new(c.x + origin.x, c.y + origin.y))
    }

    /// Origin that centers the pattern on a board, or the top-left corner if
    /// the pattern is larger than the board
    pub fn centered_origin(&self, board: Dimensions) -> Cell {
        Cell::new(
            board.width.saturating_sub(self.size.width) / 2,
            board.height.saturating_sub(self.size.height) / 2,
        )
    }
}

/// Load a pattern from a text file
pub fn load_pattern_from_file<P: AsRef<Path>>(path: P) -> Result<Pattern> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read pattern file: {}", path.as_ref().display()))?;

    parse_pattern(&content)
        .with_context(|| format!("Failed to parse pattern from file: {}", path.as_ref().display()))
}

/// Parse a pattern from its string representation
pub fn parse_pattern(content: &str) -> Result<Pattern> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Pattern is empty or contains no valid rows");
    }

    let width = lines[0].len();
    let mut cells = LiveSet::new();

    for (y, line) in lines.iter().enumerate() {
        if line.len() != width {
            anyhow::bail!(
                "Row {} has length {}, expected {} (all rows must have the same length)",
                y,
                line.len(),
                width
            );
        }

        for (x, ch) in line.chars().enumerate() {
            match ch {
                '0' => {}
                '1' => {
                    cells.insert(Cell::new(x, y));
                }
                _ => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). Only '0' and '1' are allowed",
                    ch,
                    x,
                    y
                ),
            }
        }
    }

    Ok(Pattern {
        cells,
        size: Dimensions::new(width, lines.len()),
    })
}

/// Render live cells as pattern text covering `dims`
pub fn pattern_to_string(cells: &LiveSet, dims: Dimensions) -> String {
    let mut result = String::with_capacity(dims.height * (dims.width + 1));
    for y in 0..dims.height {
        for x in 0..dims.width {
            result.push(if cells.contains(&Cell::new(x, y)) { '1' } else { '0' });
        }
        result.push('\n');
    }
    result
}

/// Well-known patterns as `(name, text)` pairs
pub fn builtin_patterns() -> [(&'static str, &'static str); 4] {
    [
        ("glider", "010\n001\n111\n"),
        ("blinker", "000\n111\n000\n"),
        ("block", "0000\n0110\n0110\n0000\n"),
        ("beacon", "1100\n1100\n0011\n0011\n"),
    ]
}

/// Look up a built-in pattern by name
pub fn builtin_pattern(name: &str) -> Option<Pattern> {
    builtin_patterns()
        .iter()
        .find(|(n, _)| *n == name)
        .and_then(|(_, text)| parse_pattern(text).ok())
}

/// Write the built-in patterns as example files
pub fn create_example_patterns<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    for (name, text) in builtin_patterns() {
        let file = dir.join(format!("{}.txt", name));
        std::fs::write(&file, text)
            .with_context(|| format!("Failed to write {}", file.display()))?;
    }

    Ok(())
}
