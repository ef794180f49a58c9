//! Configuration settings for the board simulator

use crate::game_of_life::Dimensions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub window: WindowConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub generations_per_second: u64,
}

/// Pixel geometry of the host window; the board is derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub default_size: PixelSize,
    pub minimum_size: PixelSize,
    /// Edge length of one cell in pixels
    pub block_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub pattern_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub live_char: char,
    pub dead_char: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                generations_per_second: 3,
            },
            window: WindowConfig {
                default_size: PixelSize { width: 800, height: 600 },
                minimum_size: PixelSize { width: 400, height: 400 },
                block_size: 10,
            },
            input: InputConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Text,
                live_char: '█',
                dead_char: '·',
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.simulation.generations_per_second == 0 {
            anyhow::bail!("Generations per second must be positive");
        }

        if self.simulation.generations_per_second > 1000 {
            anyhow::bail!("Generations per second cannot exceed 1000");
        }

        if self.window.block_size == 0 {
            anyhow::bail!("Block size must be positive");
        }

        let (default, minimum) = (self.window.default_size, self.window.minimum_size);
        if default.width < minimum.width || default.height < minimum.height {
            anyhow::bail!(
                "Default window size {}x{} is smaller than the minimum {}x{}",
                default.width,
                default.height,
                minimum.width,
                minimum.height
            );
        }

        if let Some(ref pattern) = self.input.pattern_file {
            if !pattern.exists() {
                anyhow::bail!("Pattern file does not exist: {}", pattern.display());
            }
        }

        Ok(())
    }

    /// Pause between two generations
    pub fn period(&self) -> Duration {
        Duration::from_millis(1000 / self.simulation.generations_per_second.max(1))
    }

    /// Board size in cells for a window of the default size
    pub fn board_dimensions(&self) -> Dimensions {
        self.window.board_dimensions(self.window.default_size)
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(speed) = cli_overrides.generations_per_second {
            self.simulation.generations_per_second = speed;
        }
        if let Some(ref pattern) = cli_overrides.pattern_file {
            self.input.pattern_file = Some(pattern.clone());
        }
        if let Some(width) = cli_overrides.window_width {
            self.window.default_size.width = width;
        }
        if let Some(height) = cli_overrides.window_height {
            self.window.default_size.height = height;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

impl WindowConfig {
    /// Board size in cells for a window of `size` pixels. One block on every
    /// side is reserved as margin.
    pub fn board_dimensions(&self, size: PixelSize) -> Dimensions {
        let block = self.block_size.max(1);
        Dimensions::new(
            (size.width / block).saturating_sub(2) as usize,
            (size.height / block).saturating_sub(2) as usize,
        )
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub generations_per_second: Option<u64>,
    pub pattern_file: Option<PathBuf>,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub format: Option<OutputFormat>,
}
