use std::collections::HashSet;

use super::config::{Difficulty, Mode};
use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
///
/// `direction` is the heading used by the last step. Input only ever writes
/// `next_direction`; the engine copies it over at the start of each step.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction locked in for the current tick
    pub direction: Direction,
    /// Direction queued by input for the next tick
    pub next_direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self {
            body,
            direction,
            next_direction: direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Queue a turn for the next tick.
    ///
    /// Returns false when the turn would reverse the locked-in direction.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Lock in the queued direction and return where the head would go
    pub fn commit_direction(&mut self) -> Position {
        self.direction = self.next_direction;
        self.head().moved_in_direction(self.direction)
    }

    /// Prepend a new head, keeping the tail only when growing
    pub fn push_head(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// What the head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the grid
    OutOfBounds,
    /// Head hit a segment of the snake
    SelfCollision,
    /// Head hit a border wall cell
    Wall,
    /// Head hit an obstacle
    Obstacle,
}

/// Food needed to leave `level`
pub fn food_required_for_level(level: u32) -> u32 {
    5 + 2 * level.saturating_sub(1)
}

/// Complete state of one snake session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Append-only within a session
    pub obstacles: Vec<Position>,
    pub walls: HashSet<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub score: u32,
    pub level: u32,
    /// Food eaten since the last level-up
    pub food_eaten: u32,
    pub food_for_next_level: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state with no walls or obstacles
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            obstacles: Vec::new(),
            walls: HashSet::new(),
            grid_width,
            grid_height,
            difficulty: Difficulty::default(),
            mode: Mode::default(),
            score: 0,
            level: 1,
            food_eaten: 0,
            food_for_next_level: food_required_for_level(1),
            steps: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.contains(&pos)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// First rule a head at `pos` would break, if any.
    ///
    /// Bounds are checked in every mode, the wall ring sits on top of them.
    pub fn collision_at(&self, pos: Position) -> Option<CollisionType> {
        if !self.is_in_bounds(pos) {
            Some(CollisionType::OutOfBounds)
        } else if self.is_occupied_by_snake(pos) {
            Some(CollisionType::SelfCollision)
        } else if self.is_wall(pos) {
            Some(CollisionType::Wall)
        } else if self.is_obstacle(pos) {
            Some(CollisionType::Obstacle)
        } else {
            None
        }
    }

    pub fn collides(&self, pos: Position) -> bool {
        self.collision_at(pos).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_10x10() -> GameState {
        GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(8, 8),
            10,
            10,
        )
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(4, 5));
        assert_eq!(snake.body[2], Position::new(3, 5));
        assert_eq!(snake.next_direction, Direction::Right);
    }

    #[test]
    fn test_reversal_guard() {
        for current in Direction::ALL {
            let mut snake = Snake::new(Position::new(5, 5), current, 1);
            assert!(!snake.turn(current.opposite()));
            assert_eq!(snake.next_direction, current);
        }
    }

    #[test]
    fn test_guard_checks_locked_direction() {
        // Up then Left while moving Right: Left is still a reversal of the
        // locked-in heading even though Up was queued in between.
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 1);
        assert!(snake.turn(Direction::Up));
        assert!(!snake.turn(Direction::Left));
        assert_eq!(snake.next_direction, Direction::Up);
        assert_eq!(snake.direction, Direction::Right);
    }

    #[test]
    fn test_push_head() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.push_head(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));

        snake.push_head(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.body.last(), Some(&Position::new(4, 5)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = state_10x10();

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(9, 9)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(10, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 10)));
    }

    #[test]
    fn test_out_of_bounds_always_collides() {
        let mut state = state_10x10();
        let outside = [
            Position::new(-1, 3),
            Position::new(10, 3),
            Position::new(3, -1),
            Position::new(3, 10),
            Position::new(-5, -5),
        ];
        for mode in Mode::ALL {
            state.mode = mode;
            for pos in outside {
                assert_eq!(state.collision_at(pos), Some(CollisionType::OutOfBounds));
            }
        }
    }

    #[test]
    fn test_collision_kinds() {
        let mut state = state_10x10();
        state.walls.insert(Position::new(0, 0));
        state.obstacles.push(Position::new(2, 2));

        assert_eq!(
            state.collision_at(Position::new(4, 5)),
            Some(CollisionType::SelfCollision)
        );
        assert_eq!(state.collision_at(Position::new(0, 0)), Some(CollisionType::Wall));
        assert_eq!(
            state.collision_at(Position::new(2, 2)),
            Some(CollisionType::Obstacle)
        );
        assert!(!state.collides(Position::new(7, 7)));
        // food is not an obstacle
        assert!(!state.collides(state.food));
    }

    #[test]
    fn test_food_threshold_grows_with_level() {
        assert_eq!(food_required_for_level(1), 5);
        assert_eq!(food_required_for_level(2), 7);
        assert_eq!(food_required_for_level(5), 13);
    }
}
