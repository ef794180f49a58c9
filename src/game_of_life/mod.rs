//! Game of Life core functionality

pub mod cell;
pub mod grid;
pub mod io;
pub mod rules;

pub use cell::{Cell, Dimensions, LiveSet};
pub use grid::PaddedGrid;
pub use io::{builtin_pattern, create_example_patterns, load_pattern_from_file, parse_pattern, Pattern};
pub use rules::GameOfLifeRules;
