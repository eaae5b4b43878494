use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::state::Position;
use crate::error::ResourceError;

/// Largest interior, per axis, the engine and the terminal renderer handle
pub const MAX_INTERIOR_CELLS: i32 = 200;

/// What happens to a bonus food nobody picked up in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusExpiry {
    /// Remove the bonus until the next threshold is reached
    #[default]
    Clear,
    /// Immediately place a fresh bonus somewhere else
    Respawn,
}

/// Configuration for the game
///
/// All distances are in pixels; every position the engine produces is a
/// multiple of `cell_size`. The outermost ring of cells is wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playfield including the wall
    pub screen_width: i32,
    /// Height of the playfield including the wall
    pub screen_height: i32,
    /// Size of one grid cell
    pub cell_size: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Minimum time between two simulation steps
    pub tick_interval_ms: u64,

    /// Score for ordinary food
    pub food_reward: u32,
    /// Score for bonus food
    pub bonus_reward: u32,
    /// Ordinary foods that must be eaten before a bonus appears
    pub bonus_threshold: u32,
    /// Lifetime of a bonus food
    pub bonus_duration_ms: u64,
    /// Pickup window around the bonus position, per axis
    pub bonus_tolerance: i32,
    /// Policy applied when a bonus outlives `bonus_duration_ms`
    pub bonus_expiry: BonusExpiry,
    /// Whether eating a bonus adds a segment
    pub grow_on_bonus: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 480,
            cell_size: 20,
            initial_snake_length: 1,
            tick_interval_ms: 100,
            food_reward: 10,
            bonus_reward: 50,
            bonus_threshold: 5,
            bonus_duration_ms: 4000,
            bonus_tolerance: 20,
            bonus_expiry: BonusExpiry::Clear,
            grow_on_bonus: true,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom playfield size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            ..Default::default()
        }
    }

    /// Create a small playfield for testing (8x8 interior cells)
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ResourceError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| ResourceError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<(), ResourceError> {
        let invalid = |msg: String| -> Result<(), ResourceError> {
            Err(ResourceError::InvalidConfig(msg))
        };

        if self.cell_size <= 0 {
            return invalid(format!("cell_size must be positive, got {}", self.cell_size));
        }
        if self.screen_width % self.cell_size != 0 || self.screen_height % self.cell_size != 0 {
            return invalid(format!(
                "screen {}x{} is not a multiple of cell_size {}",
                self.screen_width, self.screen_height, self.cell_size
            ));
        }
        if self.interior_columns() < 3 || self.interior_rows() < 3 {
            return invalid(format!(
                "playfield needs at least 3x3 interior cells, got {}x{}",
                self.interior_columns(),
                self.interior_rows()
            ));
        }
        if self.interior_columns() > MAX_INTERIOR_CELLS
            || self.interior_rows() > MAX_INTERIOR_CELLS
        {
            return invalid(format!(
                "playfield of {}x{} interior cells exceeds {}x{}",
                self.interior_columns(),
                self.interior_rows(),
                MAX_INTERIOR_CELLS,
                MAX_INTERIOR_CELLS
            ));
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick_interval_ms must be positive".to_string());
        }
        if self.bonus_threshold == 0 {
            return invalid("bonus_threshold must be positive".to_string());
        }
        if self.initial_snake_length == 0 {
            return invalid("initial_snake_length must be at least 1".to_string());
        }
        // The tail trails to the left of the centred head, down to column 1
        let room_left = (self.grid_columns() / 2) as usize;
        if self.initial_snake_length > room_left {
            return invalid(format!(
                "initial_snake_length {} does not fit, at most {}",
                self.initial_snake_length, room_left
            ));
        }
        Ok(())
    }

    /// Number of cell columns including the wall
    pub fn grid_columns(&self) -> i32 {
        self.screen_width / self.cell_size
    }

    /// Number of cell rows including the wall
    pub fn grid_rows(&self) -> i32 {
        self.screen_height / self.cell_size
    }

    /// Columns a snake can occupy
    pub fn interior_columns(&self) -> i32 {
        self.grid_columns() - 2
    }

    /// Rows a snake can occupy
    pub fn interior_rows(&self) -> i32 {
        self.grid_rows() - 2
    }

    /// True if `pos` is inside the wall ring
    pub fn is_interior(&self, pos: Position) -> bool {
        let cell = self.cell_size;
        pos.x >= cell
            && pos.x < self.screen_width - cell
            && pos.y >= cell
            && pos.y < self.screen_height - cell
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn bonus_duration(&self) -> Duration {
        Duration::from_millis(self.bonus_duration_ms)
    }
}
