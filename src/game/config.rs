use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Smallest grid edge that still leaves an inset region for obstacles
pub const MIN_GRID_SIZE: usize = 5;

/// Largest grid edge the terminal renderer can lay out
pub const MAX_GRID_SIZE: usize = 200;

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Points for one food item before the difficulty and level factors
    pub base_score: u32,
    /// Obstacles placed when a session starts in an obstacle mode
    pub initial_obstacles: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            base_score: 10,
            initial_obstacles: 2,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width >= MIN_GRID_SIZE && self.grid_height >= MIN_GRID_SIZE,
            "grid must be at least {}x{}, got {}x{}",
            MIN_GRID_SIZE,
            MIN_GRID_SIZE,
            self.grid_width,
            self.grid_height
        );
        ensure!(
            self.grid_width <= MAX_GRID_SIZE && self.grid_height <= MAX_GRID_SIZE,
            "grid must be at most {}x{}, got {}x{}",
            MAX_GRID_SIZE,
            MAX_GRID_SIZE,
            self.grid_width,
            self.grid_height
        );
        Ok(())
    }
}

/// Fixed attributes of a difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    pub name: &'static str,
    /// Simulation steps per second
    pub ticks_per_second: u32,
    /// Score multiplier applied to every food item
    pub multiplier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn settings(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                name: "Easy",
                ticks_per_second: 8,
                multiplier: 1.0,
            },
            Difficulty::Normal => DifficultySettings {
                name: "Normal",
                ticks_per_second: 12,
                multiplier: 1.5,
            },
            Difficulty::Hard => DifficultySettings {
                name: "Hard",
                ticks_per_second: 16,
                multiplier: 2.0,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.settings().name
    }

    /// Time between two simulation steps
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.settings().ticks_per_second))
    }

    /// Points awarded for one food item at the given level
    pub fn points_for_food(&self, base_score: u32, level: u32) -> u32 {
        let per_level = (base_score as f32 * self.settings().multiplier).round() as u32;
        per_level.saturating_mul(level)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed attributes of a game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSettings {
    pub name: &'static str,
    pub description: &'static str,
    pub walls: bool,
    pub obstacles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Classic,
    Walls,
    Obstacles,
    Extreme,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Classic, Mode::Walls, Mode::Obstacles, Mode::Extreme];

    pub fn settings(&self) -> ModeSettings {
        match self {
            Mode::Classic => ModeSettings {
                name: "Classic",
                description: "Basic snake game",
                walls: false,
                obstacles: false,
            },
            Mode::Walls => ModeSettings {
                name: "Walls",
                description: "Walls around the border",
                walls: true,
                obstacles: false,
            },
            Mode::Obstacles => ModeSettings {
                name: "Obstacles",
                description: "Random obstacles appear",
                walls: false,
                obstacles: true,
            },
            Mode::Extreme => ModeSettings {
                name: "Extreme",
                description: "Walls + Obstacles",
                walls: true,
                obstacles: true,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.settings().name
    }

    pub fn has_walls(&self) -> bool {
        self.settings().walls
    }

    pub fn has_obstacles(&self) -> bool {
        self.settings().obstacles
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
