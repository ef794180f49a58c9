//! Configuration management for the board simulator

pub mod settings;

pub use settings::{
    Settings, SimulationConfig, WindowConfig, PixelSize, InputConfig, OutputConfig, OutputFormat,
    CliOverrides
};
