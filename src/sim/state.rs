//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; there is no
//! process-wide state.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::{ConfigError, GameConfig};
use super::grid::{Cell, Grid};
use super::tick::random_free_cell;

/// Score awarded per food, multiplied by the current level
pub const FOOD_POINTS: u64 = 10;
/// Every this many cumulative points the level goes up
pub const POINTS_PER_LEVEL: u64 = 50;
/// Tick interval never drops below this on level-up
pub const MIN_TICK_INTERVAL_MS: u32 = 40;
/// Interval reduction per level gained
pub const LEVEL_SPEEDUP_MS: u32 = 10;
/// Obstacles only appear past this level
pub const OBSTACLE_MIN_LEVEL: u32 = 2;
/// Chance of an obstacle spawning when food is eaten
pub const OBSTACLE_CHANCE: f64 = 0.3;
/// Length of a freshly spawned snake
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Movement direction as a grid delta (screen coordinates, y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    x: i32,
    y: i32,
}

impl Direction {
    pub const UP: Direction = Direction { x: 0, y: -1 };
    pub const DOWN: Direction = Direction { x: 0, y: 1 };
    pub const LEFT: Direction = Direction { x: -1, y: 0 };
    pub const RIGHT: Direction = Direction { x: 1, y: 0 };

    /// Build an arbitrary delta; only cardinal unit vectors are accepted by
    /// the engine, see [`Direction::is_cardinal`]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn dx(&self) -> i32 {
        self.x
    }

    pub fn dy(&self) -> i32 {
        self.y
    }

    /// Exactly one axis moves, by exactly one cell
    pub fn is_cardinal(&self) -> bool {
        self.x.abs() + self.y.abs() == 1
    }

    pub fn opposite(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// The snake body, head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Spawn a horizontal snake with its head at `head`, trailing to the left
    pub fn spawn(head: Cell, length: usize) -> Self {
        let body = (0..length.max(1) as i32)
            .map(|i| Cell::new(head.x - i, head.y))
            .collect();
        Self { body }
    }

    /// Build a snake from explicit cells (head first). Returns `None` if empty.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    pub fn head(&self) -> Cell {
        // Body is never empty: every constructor guarantees at least one cell
        // and `retract` refuses to remove the last one.
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub(crate) fn advance_head(&mut self, head: Cell) {
        self.body.push_front(head);
    }

    pub(crate) fn retract(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Wall,
    SelfHit,
    Obstacle,
}

impl CollisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionKind::Wall => "wall",
            CollisionKind::SelfHit => "self",
            CollisionKind::Obstacle => "obstacle",
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Snake is moving
    Running,
    /// Frozen by the player
    Paused,
    /// Run ended by a collision; state is kept for inspection
    Ended(CollisionKind),
}

/// Score, level and steering for the current run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub score: u64,
    pub level: u32,
    pub phase: GamePhase,
    /// Direction applied on the last tick
    pub direction: Direction,
    /// Direction that the next tick will commit
    pub pending_direction: Direction,
    /// Current tick interval, shrinks as the level rises
    pub interval_ms: u32,
}

impl RunState {
    fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            level: 1,
            phase: GamePhase::Running,
            direction: Direction::RIGHT,
            pending_direction: Direction::RIGHT,
            interval_ms: config.tick_interval_ms,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, GamePhase::Ended(_))
    }
}

/// Complete state of one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub grid: Grid,
    /// Run seed for reproducibility
    pub seed: u64,
    pub snake: Snake,
    pub food: Cell,
    /// Obstacles in spawn order
    pub obstacles: Vec<Cell>,
    pub run: RunState,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh session: centered snake moving right, food placed at random
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.grid_size);
        let snake = Snake::spawn(grid.center(), INITIAL_SNAKE_LENGTH);
        let mut rng = Pcg32::seed_from_u64(seed);
        // A valid grid always has free cells around the spawn snake
        let food = random_free_cell(&mut rng, &grid, |c| snake.contains(c))
            .unwrap_or(Cell::new(0, 0));

        Ok(Self {
            config,
            grid,
            seed,
            snake,
            food,
            obstacles: Vec::new(),
            run: RunState::new(&config),
            time_ticks: 0,
            rng,
        })
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// Cell is covered by the snake or an obstacle
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.snake.contains(cell) || self.is_obstacle(cell)
    }

    pub fn score(&self) -> u64 {
        self.run.score
    }

    pub fn level(&self) -> u32 {
        self.run.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_layout() {
        let state = GameState::new(GameConfig::default(), 42).unwrap();
        let cells: Vec<Cell> = state.snake.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]
        );
        assert_eq!(state.run.score, 0);
        assert_eq!(state.run.level, 1);
        assert_eq!(state.run.direction, Direction::RIGHT);
        assert_eq!(state.run.interval_ms, 100);
        assert!(state.obstacles.is_empty());
        assert!(!state.snake.contains(state.food));
        assert!(state.grid.in_bounds(state.food));
    }

    #[test]
    fn test_new_session_rejects_bad_config() {
        let config = GameConfig {
            grid_size: 2,
            ..Default::default()
        };
        assert_eq!(
            GameState::new(config, 1).unwrap_err(),
            ConfigError::GridTooSmall(2)
        );
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameState::new(GameConfig::default(), 7).unwrap();
        let b = GameState::new(GameConfig::default(), 7).unwrap();
        assert_eq!(a.food, b.food);
    }

    #[test]
    fn test_direction_rules() {
        assert!(Direction::UP.is_opposite(Direction::DOWN));
        assert!(Direction::LEFT.is_opposite(Direction::RIGHT));
        assert!(!Direction::UP.is_opposite(Direction::LEFT));
        assert!(Direction::RIGHT.is_cardinal());
        assert!(!Direction::new(1, 1).is_cardinal());
        assert!(!Direction::new(0, 0).is_cardinal());
        assert!(!Direction::new(2, 0).is_cardinal());
    }

    #[test]
    fn test_snake_never_empties() {
        let mut snake = Snake::spawn(Cell::new(5, 5), 1);
        snake.retract();
        assert_eq!(snake.len(), 1);
        assert!(Snake::from_cells(Vec::new()).is_none());
    }
}
