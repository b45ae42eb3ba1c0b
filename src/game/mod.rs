//! Core snake logic
//!
//! Everything here is free of terminal I/O so sessions can be stepped
//! directly from tests.

pub mod config;
pub mod direction;
pub mod engine;
pub mod placement;
pub mod state;

// Re-export commonly used types
pub use config::{Difficulty, GameConfig, Mode};
pub use direction::Direction;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use state::{CollisionType, GameState, Position, Snake};
