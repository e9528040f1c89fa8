//! Draw list construction
//!
//! Turns a [`GameState`] into triangles in grid units: one unit per cell,
//! origin at the top-left corner, y pointing down. Nothing here mutates
//! the state, so a frame can be rebuilt as often as the display wants.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{Cell, Direction, GameState};

/// Gap left around filled cells so neighbours read as separate tiles
pub const TILE_INSET: f32 = 0.05;
/// Grid line thickness
pub const GRID_LINE_WIDTH: f32 = 0.04;
/// Food radius (the cell is 1.0 wide)
pub const FOOD_RADIUS: f32 = 0.4;
/// Segments used to tessellate the food disc
pub const FOOD_SEGMENTS: u32 = 20;
/// Eye square size relative to a cell
pub const EYE_SIZE: f32 = 1.0 / 6.0;
/// Eye distance from the cell edges
pub const EYE_OFFSET: f32 = 1.0 / 4.0;

/// Build the full frame for `state`
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let size = state.grid.size() as f32;
    let mut vertices = Vec::with_capacity(estimated_vertex_count(state));

    vertices.extend(shapes::rect(Vec2::ZERO, Vec2::splat(size), colors::BACKGROUND));

    for i in 0..=state.grid.size() {
        let p = i as f32;
        vertices.extend(shapes::line(
            Vec2::new(p, 0.0),
            Vec2::new(p, size),
            GRID_LINE_WIDTH,
            colors::GRID_LINE,
        ));
        vertices.extend(shapes::line(
            Vec2::new(0.0, p),
            Vec2::new(size, p),
            GRID_LINE_WIDTH,
            colors::GRID_LINE,
        ));
    }

    vertices.extend(shapes::radial_circle(
        cell_center(state.food),
        FOOD_RADIUS,
        colors::FOOD_CORE,
        colors::FOOD_RIM,
        FOOD_SEGMENTS,
    ));

    for obstacle in &state.obstacles {
        let (min, max) = tile_bounds(*obstacle);
        vertices.extend(shapes::rect(min, max, colors::OBSTACLE));
    }

    // Tail first so the head is painted on top
    let length = state.snake.len();
    let segments: Vec<Cell> = state.snake.cells().collect();
    for (index, segment) in segments.iter().enumerate().rev() {
        let (min, max) = tile_bounds(*segment);
        if index == 0 {
            vertices.extend(shapes::gradient_rect(
                min,
                max,
                colors::HEAD_LIGHT,
                colors::HEAD_DARK,
            ));
        } else {
            vertices.extend(shapes::rect(min, max, body_color(index, length)));
        }
    }

    let head = state.snake.head();
    for eye in eye_positions(head, state.run.direction) {
        vertices.extend(shapes::rect(eye, eye + Vec2::splat(EYE_SIZE), colors::EYE));
    }

    vertices
}

/// Body segments fade toward the tail, down to half opacity
pub fn body_color(index: usize, length: usize) -> [f32; 4] {
    let opacity = 1.0 - (index as f32 / length.max(1) as f32) * 0.5;
    let [r, g, b] = colors::BODY;
    [r, g, b, opacity]
}

/// Top-left corners of the two eyes, placed on the leading edge of the head
pub fn eye_positions(head: Cell, direction: Direction) -> [Vec2; 2] {
    let origin = Vec2::new(head.x as f32, head.y as f32);
    let leading = |d: i32| {
        if d > 0 {
            1.0 - EYE_OFFSET
        } else {
            EYE_OFFSET - EYE_SIZE
        }
    };

    if direction.dx() != 0 {
        let x = leading(direction.dx());
        [
            origin + Vec2::new(x, EYE_OFFSET - EYE_SIZE / 2.0),
            origin + Vec2::new(x, 1.0 - EYE_OFFSET - EYE_SIZE / 2.0),
        ]
    } else {
        let y = leading(direction.dy());
        [
            origin + Vec2::new(EYE_OFFSET - EYE_SIZE / 2.0, y),
            origin + Vec2::new(1.0 - EYE_OFFSET - EYE_SIZE / 2.0, y),
        ]
    }
}

fn cell_center(cell: Cell) -> Vec2 {
    Vec2::new(cell.x as f32 + 0.5, cell.y as f32 + 0.5)
}

fn tile_bounds(cell: Cell) -> (Vec2, Vec2) {
    let min = Vec2::new(cell.x as f32, cell.y as f32);
    (
        min + Vec2::splat(TILE_INSET),
        min + Vec2::splat(1.0 - TILE_INSET),
    )
}

fn estimated_vertex_count(state: &GameState) -> usize {
    let grid_lines = (state.grid.size() as usize + 1) * 2;
    6 + grid_lines * 6
        + FOOD_SEGMENTS as usize * 3
        + (state.obstacles.len() + state.snake.len() + 2) * 6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameConfig, Snake, tick};

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 11).unwrap();
        state.food = Cell::new(2, 2);
        state.obstacles.push(Cell::new(4, 4));
        state
    }

    #[test]
    fn test_vertex_count() {
        let state = state();
        let scene = build_scene(&state);
        assert_eq!(scene.len(), estimated_vertex_count(&state));
    }

    #[test]
    fn test_rendering_is_repeatable_and_pure() {
        let state = state();
        let before = state.clone();
        let first = build_scene(&state);
        let second = build_scene(&state);
        assert_eq!(first, second);
        assert_eq!(state.snake, before.snake);
        assert_eq!(state.run, before.run);
        assert_eq!(state.food, before.food);
    }

    #[test]
    fn test_head_drawn_last_and_distinct() {
        let state = state();
        let scene = build_scene(&state);
        // Head quad sits just before the 12 eye vertices
        let head = &scene[scene.len() - 18..scene.len() - 12];
        assert_eq!(head[0].color, colors::HEAD_LIGHT);
        assert_eq!(head[0].position, [10.0 + TILE_INSET, 10.0 + TILE_INSET]);
        let body = &scene[scene.len() - 24..scene.len() - 18];
        assert_ne!(body[0].color, head[0].color);
    }

    #[test]
    fn test_body_fades_toward_tail() {
        let near = body_color(1, 10);
        let far = body_color(9, 10);
        assert!(near[3] > far[3]);
        assert!(far[3] >= 0.5);
    }

    #[test]
    fn test_eyes_follow_direction() {
        let head = Cell::new(3, 3);

        let right = eye_positions(head, Direction::RIGHT);
        assert!(right.iter().all(|e| e.x > 3.5));
        assert!(right[0].y < right[1].y);

        let left = eye_positions(head, Direction::LEFT);
        assert!(left.iter().all(|e| e.x + EYE_SIZE < 3.5));

        let up = eye_positions(head, Direction::UP);
        assert!(up.iter().all(|e| e.y + EYE_SIZE < 3.5));

        let down = eye_positions(head, Direction::DOWN);
        assert!(down.iter().all(|e| e.y > 3.5));
    }

    #[test]
    fn test_eyes_stay_inside_head() {
        for dir in [Direction::UP, Direction::DOWN, Direction::LEFT, Direction::RIGHT] {
            for eye in eye_positions(Cell::new(0, 0), dir) {
                assert!(eye.x >= 0.0 && eye.x + EYE_SIZE <= 1.0);
                assert!(eye.y >= 0.0 && eye.y + EYE_SIZE <= 1.0);
            }
        }
    }

    #[test]
    fn test_scene_tracks_movement() {
        let mut state = state();
        state.snake =
            Snake::from_cells([Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)]).unwrap();
        let before = build_scene(&state);
        tick(&mut state);
        let after = build_scene(&state);
        assert_ne!(before, after);
    }
}
