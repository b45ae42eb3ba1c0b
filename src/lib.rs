//! Term Arcade - a small collection of terminal games
//!
//! This library provides:
//! - Core snake logic with difficulties, modes and levels (game module)
//! - Persistent best scores per difficulty and mode (scoreboard module)
//! - TUI rendering and key mapping for the snake game (render, input modules)
//! - The interactive snake session (modes module)
//! - Line-based console games: number guessing and rock-paper-scissors (console module)
//! - A text launcher that runs each game as a child process (launcher module)

pub mod console;
pub mod game;
pub mod input;
pub mod launcher;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scoreboard;
