use crate::game::{Difficulty, Direction, Mode};

/// Which screen of the snake game is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Paused,
    GameOver { new_best: bool },
}

/// Cursor state of the difficulty/mode menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSelection {
    difficulty: usize,
    mode: usize,
}

impl Default for MenuSelection {
    fn default() -> Self {
        Self::new(Difficulty::default(), Mode::default())
    }
}

impl MenuSelection {
    pub fn new(difficulty: Difficulty, mode: Mode) -> Self {
        Self {
            difficulty: Difficulty::ALL.iter().position(|d| *d == difficulty).unwrap_or(0),
            mode: Mode::ALL.iter().position(|m| *m == mode).unwrap_or(0),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::ALL[self.difficulty]
    }

    pub fn mode(&self) -> Mode {
        Mode::ALL[self.mode]
    }

    /// Up/Down cycle the difficulty, Left/Right cycle the mode
    pub fn navigate(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.difficulty = step_back(self.difficulty, Difficulty::ALL.len()),
            Direction::Down => self.difficulty = (self.difficulty + 1) % Difficulty::ALL.len(),
            Direction::Left => self.mode = step_back(self.mode, Mode::ALL.len()),
            Direction::Right => self.mode = (self.mode + 1) % Mode::ALL.len(),
        }
    }
}

fn step_back(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}
