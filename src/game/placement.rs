//! Random placement of food and obstacles, and the fixed wall ring
//!
//! Sampling is rejection-based while the grid is sparse. After
//! `ATTEMPTS_PER_CELL * cells` misses it falls back to listing every free
//! cell and picking one uniformly, so a crowded grid still terminates.

use std::collections::HashSet;
use std::ops::Range;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::state::{GameState, Position};

const ATTEMPTS_PER_CELL: usize = 4;

/// Pick a uniformly random cell in the given region satisfying `is_free`
pub fn sample_free_cell<R, F>(
    rng: &mut R,
    xs: Range<i32>,
    ys: Range<i32>,
    is_free: F,
) -> Option<Position>
where
    R: Rng + ?Sized,
    F: Fn(Position) -> bool,
{
    if xs.is_empty() || ys.is_empty() {
        return None;
    }

    let cells = xs.len() * ys.len();
    for _ in 0..cells * ATTEMPTS_PER_CELL {
        let pos = Position::new(rng.gen_range(xs.clone()), rng.gen_range(ys.clone()));
        if is_free(pos) {
            return Some(pos);
        }
    }

    debug!("rejection sampling exhausted after {} attempts, scanning", cells * ATTEMPTS_PER_CELL);
    let free: Vec<Position> = ys
        .flat_map(|y| xs.clone().map(move |x| Position::new(x, y)))
        .filter(|&pos| is_free(pos))
        .collect();
    free.choose(rng).copied()
}

/// Pick a cell for the food that is not covered by snake, obstacle or wall.
///
/// Returns `None` only when the grid has no free cell left.
pub fn place_food<R: Rng + ?Sized>(rng: &mut R, state: &GameState) -> Option<Position> {
    sample_free_cell(
        rng,
        0..state.grid_width as i32,
        0..state.grid_height as i32,
        |pos| !state.is_occupied_by_snake(pos) && !state.is_obstacle(pos) && !state.is_wall(pos),
    )
}

/// Pick up to `count` new obstacle cells inside the outermost ring.
///
/// New cells avoid the snake, the food, existing obstacles and each other.
/// Fewer than `count` are returned when the inset region runs out of room.
pub fn place_obstacles<R: Rng + ?Sized>(
    rng: &mut R,
    state: &GameState,
    count: usize,
) -> Vec<Position> {
    let mut chosen: Vec<Position> = Vec::with_capacity(count);
    let xs = 1..state.grid_width as i32 - 1;
    let ys = 1..state.grid_height as i32 - 1;

    for _ in 0..count {
        let next = sample_free_cell(rng, xs.clone(), ys.clone(), |pos| {
            !state.is_occupied_by_snake(pos)
                && pos != state.food
                && !state.is_obstacle(pos)
                && !chosen.contains(&pos)
        });
        match next {
            Some(pos) => chosen.push(pos),
            None => {
                debug!("no room for more obstacles, placed {} of {}", chosen.len(), count);
                break;
            }
        }
    }

    chosen
}

/// Every cell on the four border edges
pub fn wall_ring(grid_width: usize, grid_height: usize) -> HashSet<Position> {
    let (w, h) = (grid_width as i32, grid_height as i32);
    let mut walls = HashSet::with_capacity(2 * (grid_width + grid_height));
    for x in 0..w {
        walls.insert(Position::new(x, 0));
        walls.insert(Position::new(x, h - 1));
    }
    for y in 0..h {
        walls.insert(Position::new(0, y));
        walls.insert(Position::new(w - 1, y));
    }
    walls
}
