//! Line-based console games

pub mod guess;
pub mod input;
pub mod prompt;
pub mod rps;

pub use input::{InterruptSender, InterruptibleInput};
pub use prompt::Console;
