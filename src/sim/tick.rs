//! Fixed timestep simulation tick
//!
//! Advances the snake one cell per call and resolves everything that
//! follows from the move: collisions, food, scoring, levels and obstacles.

use rand::Rng;

use super::grid::{Cell, Grid};
use super::state::{
    CollisionKind, Direction, FOOD_POINTS, GamePhase, GameState, LEVEL_SPEEDUP_MS,
    MIN_TICK_INTERVAL_MS, OBSTACLE_CHANCE, OBSTACLE_MIN_LEVEL, POINTS_PER_LEVEL,
};

/// Rejection-sampling budget per grid cell before falling back to a scan
pub const PLACEMENT_ATTEMPTS_PER_CELL: usize = 4;

/// Notable outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Plain move (or nothing happened because the run is not active)
    None,
    /// Food eaten without a level change
    Ate,
    /// Food eaten and at least one level boundary crossed
    LeveledUp { level: u32 },
    /// Terminal collision, the run is over
    Collision(CollisionKind),
}

/// Outcome of [`tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub event: TickEvent,
    /// Interval the scheduler must switch to (set on level-up)
    pub new_interval_ms: Option<u32>,
    /// Obstacle spawned by this tick, if any
    pub obstacle_added: Option<Cell>,
}

impl TickResult {
    fn event(event: TickEvent) -> Self {
        Self {
            event,
            new_interval_ms: None,
            obstacle_added: None,
        }
    }
}

/// Buffer a direction change for the next tick.
///
/// Reversing onto the committed direction and non-cardinal deltas are
/// ignored. Returns whether the request was accepted.
pub fn set_direction(state: &mut GameState, requested: Direction) -> bool {
    if !requested.is_cardinal() || requested.is_opposite(state.run.direction) {
        log::trace!("Ignoring direction {:?}", requested);
        return false;
    }
    state.run.pending_direction = requested;
    true
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState) -> TickResult {
    if !state.run.is_running() {
        return TickResult::event(TickEvent::None);
    }

    state.time_ticks += 1;
    state.run.direction = state.run.pending_direction;

    let mut head = state.snake.head().step(state.run.direction);
    if !state.grid.in_bounds(head) {
        if state.config.walls_enabled {
            return end_run(state, CollisionKind::Wall);
        }
        head = state.grid.wrap(head);
    }

    // Tail still counts: it has not moved yet
    if state.snake.contains(head) {
        return end_run(state, CollisionKind::SelfHit);
    }
    if state.is_obstacle(head) {
        return end_run(state, CollisionKind::Obstacle);
    }

    state.snake.advance_head(head);

    if head == state.food {
        eat_food(state)
    } else {
        state.snake.retract();
        TickResult::event(TickEvent::None)
    }
}

fn end_run(state: &mut GameState, kind: CollisionKind) -> TickResult {
    state.run.phase = GamePhase::Ended(kind);
    log::info!(
        "Run ended by {} collision: score {}, level {}, length {}",
        kind.as_str(),
        state.run.score,
        state.run.level,
        state.snake.len()
    );
    TickResult::event(TickEvent::Collision(kind))
}

fn eat_food(state: &mut GameState) -> TickResult {
    let previous_score = state.run.score;
    state.run.score += FOOD_POINTS * state.run.level as u64;

    match random_free_cell(&mut state.rng, &state.grid, |c| {
        state.snake.contains(c) || state.obstacles.contains(&c)
    }) {
        Some(cell) => state.food = cell,
        None => log::warn!("No free cell left for food"),
    }

    let mut result = TickResult::event(TickEvent::Ate);

    let levels_gained = state.run.score / POINTS_PER_LEVEL - previous_score / POINTS_PER_LEVEL;
    if levels_gained > 0 {
        for _ in 0..levels_gained {
            state.run.level += 1;
            state.run.interval_ms = next_interval(state.run.interval_ms);
        }
        log::info!(
            "Level {} reached, tick interval now {}ms",
            state.run.level,
            state.run.interval_ms
        );
        result.event = TickEvent::LeveledUp {
            level: state.run.level,
        };
        result.new_interval_ms = Some(state.run.interval_ms);
    }

    if state.config.obstacle_growth_enabled
        && state.run.level > OBSTACLE_MIN_LEVEL
        && state.rng.random_bool(OBSTACLE_CHANCE)
    {
        result.obstacle_added = add_obstacle(state);
    }

    result
}

/// Interval after one level-up, floored at `MIN_TICK_INTERVAL_MS`
fn next_interval(current: u32) -> u32 {
    current
        .saturating_sub(LEVEL_SPEEDUP_MS)
        .max(MIN_TICK_INTERVAL_MS)
}

fn add_obstacle(state: &mut GameState) -> Option<Cell> {
    let food = state.food;
    let cell = random_free_cell(&mut state.rng, &state.grid, |c| {
        c == food || state.snake.contains(c) || state.obstacles.contains(&c)
    });
    match cell {
        Some(cell) => {
            log::debug!("Obstacle added at ({}, {})", cell.x, cell.y);
            state.obstacles.push(cell);
        }
        None => log::warn!("No free cell left for an obstacle"),
    }
    cell
}

/// Pick a uniformly random cell for which `occupied` is false.
///
/// Rejection sampling is tried first; after
/// `PLACEMENT_ATTEMPTS_PER_CELL * cell_count` misses the free cells are
/// enumerated and one is chosen directly. Returns `None` on a full grid.
pub fn random_free_cell<R, F>(rng: &mut R, grid: &Grid, occupied: F) -> Option<Cell>
where
    R: Rng + ?Sized,
    F: Fn(Cell) -> bool,
{
    let size = grid.size() as i32;
    for _ in 0..grid.cell_count() * PLACEMENT_ATTEMPTS_PER_CELL {
        let cell = Cell::new(rng.random_range(0..size), rng.random_range(0..size));
        if !occupied(cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = grid.cells().filter(|&c| !occupied(c)).collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}
