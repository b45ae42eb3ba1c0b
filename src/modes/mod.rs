pub mod screen;
pub mod snake;

pub use screen::{MenuSelection, Screen};
pub use snake::SnakeMode;
