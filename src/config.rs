use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::snake::{Cell, Direction};

pub const HIGH_SCORE_KEY: &str = "snake-highscore";

/// Smallest cell that still leaves room for the segment inset and food radius.
pub const MIN_GRID_UNIT: u32 = 4;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Pixel size of one board cell
    pub grid_unit: u32,
    /// Time between two ticks, in milliseconds
    pub tick_interval_ms: u64,
    /// Points awarded for each piece of food
    pub food_reward: u32,
    /// Snake layout after a reset, head first
    pub initial_snake: Vec<Cell>,
    pub initial_direction: Direction,
    /// Storage key of the persisted best score
    pub high_score_key: String,
    /// Fixed seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_unit: 20,
            tick_interval_ms: 100,
            food_reward: 10,
            initial_snake: vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)],
            initial_direction: Direction::Right,
            high_score_key: HIGH_SCORE_KEY.to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reads a YAML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let config: Self = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_unit >= MIN_GRID_UNIT,
            "grid_unit must be at least {}",
            MIN_GRID_UNIT
        );
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");
        ensure!(!self.initial_snake.is_empty(), "initial_snake needs at least one cell");

        for (i, cell) in self.initial_snake.iter().enumerate() {
            ensure!(
                cell.x >= 0 && cell.y >= 0,
                "initial_snake cell {} is off the board",
                i
            );
            ensure!(
                !self.initial_snake[..i].contains(cell),
                "initial_snake cell {} overlaps another segment",
                i
            );
        }

        if let [head, neck, ..] = &self.initial_snake[..] {
            ensure!(
                head.moved(self.initial_direction) != *neck,
                "initial_direction {:?} points back into the snake",
                self.initial_direction
            );
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
