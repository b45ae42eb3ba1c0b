use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{
    config::{Difficulty, GameConfig, Mode},
    direction::Direction,
    placement::{place_food, place_obstacles, wall_ring},
    state::{food_required_for_level, CollisionType, GameState, Position, Snake},
};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Points added to the score this step
    pub points: u32,
    /// Whether eating pushed the session to a new level
    pub leveled_up: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Engine with a fixed seed, for reproducible sessions
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh session for the given difficulty and mode
    pub fn reset(&mut self, difficulty: Difficulty, mode: Mode) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(Position::new(center_x, center_y), Direction::Right, 1);
        let mut state = GameState::new(
            snake,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
        );
        state.difficulty = difficulty;
        state.mode = mode;

        if mode.has_walls() {
            state.walls = wall_ring(self.config.grid_width, self.config.grid_height);
        }

        // A valid config always leaves room around a length-1 snake
        match place_food(&mut self.rng, &state) {
            Some(food) => state.food = food,
            None => state.is_alive = false,
        }

        if mode.has_obstacles() {
            let obstacles = place_obstacles(&mut self.rng, &state, self.config.initial_obstacles);
            state.obstacles.extend(obstacles);
        }

        info!(
            "new session: difficulty={} mode={} grid={}x{}",
            difficulty, mode, self.config.grid_width, self.config.grid_height
        );
        state
    }

    /// Queue a turn; ignored when it would reverse the current heading
    pub fn turn(&self, state: &mut GameState, direction: Direction) -> bool {
        state.snake.turn(direction)
    }

    /// Advance one tick. Returns false once the session is over.
    pub fn advance(&mut self, state: &mut GameState) -> bool {
        !self.step(state).terminated
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_alive {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        let new_head = state.snake.commit_direction();
        state.steps += 1;

        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.is_alive = false;
            info!(
                "game over: {:?} at ({}, {}), score={} level={}",
                collision_type, new_head.x, new_head.y, state.score, state.level
            );
            return StepResult {
                terminated: true,
                info: StepInfo {
                    collision_type: Some(collision_type),
                    ..Default::default()
                },
            };
        }

        let ate_food = new_head == state.food;
        state.snake.push_head(new_head, ate_food);

        let mut info = StepInfo {
            ate_food,
            ..Default::default()
        };

        if ate_food {
            info.points = state
                .difficulty
                .points_for_food(self.config.base_score, state.level);
            state.score = state.score.saturating_add(info.points);
            state.food_eaten += 1;

            match place_food(&mut self.rng, state) {
                Some(food) => state.food = food,
                None => {
                    info!("board full, score={}", state.score);
                    state.is_alive = false;
                    return StepResult {
                        terminated: true,
                        info,
                    };
                }
            }

            if state.food_eaten >= state.food_for_next_level {
                self.level_up(state);
                info.leveled_up = true;
            }
        }

        StepResult {
            terminated: false,
            info,
        }
    }

    /// Check if the new head position causes a collision
    pub fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        state.collision_at(pos)
    }

    /// Move to the next level: reset the food counter, raise the threshold,
    /// and add `level - 1` obstacles in obstacle modes.
    pub fn level_up(&mut self, state: &mut GameState) {
        state.level += 1;
        state.food_eaten = 0;
        state.food_for_next_level = food_required_for_level(state.level);

        if state.mode.has_obstacles() {
            let count = (state.level - 1) as usize;
            let added = place_obstacles(&mut self.rng, state, count);
            debug!("level {}: {} new obstacles", state.level, added.len());
            state.obstacles.extend(added);
        }

        info!("level up: level={} next_threshold={}", state.level, state.food_for_next_level);
    }
}
