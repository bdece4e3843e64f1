use std::fs;
use std::path::Path;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::grid::Grid;

const SCREEN_WIDTH: u16 = 640;
const SCREEN_HEIGHT: u16 = 480;
const CELL_SIZE: u16 = 20;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board in cells
    pub grid_width: u16,
    /// Height of the board in cells
    pub grid_height: u16,
    pub apples: usize,
    pub poisons: usize,
    pub stones: usize,
    /// Ticks per second at the start of every game
    pub start_speed: u32,
    pub min_speed: u32,
    pub max_speed: u32,
    /// Fixed RNG seed, for reproducible boards
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: SCREEN_WIDTH / CELL_SIZE,
            grid_height: SCREEN_HEIGHT / CELL_SIZE,
            apples: 3,
            poisons: 2,
            stones: 5,
            start_speed: 10,
            min_speed: 5,
            max_speed: 25,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: u16, height: u16) -> Self {
        GameConfig { grid_width: width, grid_height: height, ..Default::default() }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.grid_width > 0 && self.grid_height > 0, "grid must be at least 1x1");
        ensure!(self.min_speed >= 1, "min speed must be at least 1 tick per second");
        ensure!(
            self.min_speed <= self.start_speed && self.start_speed <= self.max_speed,
            "speeds must satisfy min <= start <= max, got {} <= {} <= {}",
            self.min_speed, self.start_speed, self.max_speed
        );
        Ok(())
    }

    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.grid_width, self.grid_height)
    }

    pub fn clamp_speed(&self, speed: u32) -> u32 {
        speed.clamp(self.min_speed, self.max_speed)
    }
}

/// Load a JSON config, with defaults if the file is missing or invalid.
pub fn load_config(path: &Path) -> GameConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(loaded) => {
                tracing::info!("Config loaded from {}", path.display());
                loaded
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                GameConfig::default()
            }
        },
        Err(e) => {
            tracing::info!("{} not readable ({}), using defaults", path.display(), e);
            GameConfig::default()
        }
    }
}
