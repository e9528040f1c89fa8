//! Grid coordinate space
//!
//! Cells are addressed with signed coordinates so that a step off the edge
//! can be represented before it is rejected or wrapped.

use serde::{Deserialize, Serialize};

use super::state::Direction;

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `dir` (may be off-grid)
    pub fn step(self, dir: Direction) -> Self {
        Self {
            x: self.x + dir.dx(),
            y: self.y + dir.dy(),
        }
    }
}

/// Square playfield of `size` x `size` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: i32,
}

impl Grid {
    pub fn new(size: u32) -> Self {
        Self { size: size as i32 }
    }

    pub fn size(&self) -> u32 {
        self.size as u32
    }

    pub fn cell_count(&self) -> usize {
        (self.size * self.size) as usize
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.size).contains(&cell.x) && (0..self.size).contains(&cell.y)
    }

    /// Wrap a cell onto the torus
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell {
            x: cell.x.rem_euclid(self.size),
            y: cell.y.rem_euclid(self.size),
        }
    }

    /// Cell at the middle of the grid (rounded down)
    pub fn center(&self) -> Cell {
        Cell::new(self.size / 2, self.size / 2)
    }

    /// All cells, row-major
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds() {
        let grid = Grid::new(20);
        assert!(grid.in_bounds(Cell::new(0, 0)));
        assert!(grid.in_bounds(Cell::new(19, 19)));
        assert!(!grid.in_bounds(Cell::new(20, 5)));
        assert!(!grid.in_bounds(Cell::new(5, -1)));
    }

    #[test]
    fn test_wrap() {
        let grid = Grid::new(20);
        assert_eq!(grid.wrap(Cell::new(20, 10)), Cell::new(0, 10));
        assert_eq!(grid.wrap(Cell::new(-1, 10)), Cell::new(19, 10));
        assert_eq!(grid.wrap(Cell::new(4, -1)), Cell::new(4, 19));
        assert_eq!(grid.wrap(Cell::new(7, 7)), Cell::new(7, 7));
    }

    #[test]
    fn test_cells_covers_grid() {
        let grid = Grid::new(4);
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(cells.len(), grid.cell_count());
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[1], Cell::new(1, 0));
        assert_eq!(cells[15], Cell::new(3, 3));
    }

    #[test]
    fn test_step() {
        let cell = Cell::new(3, 3);
        assert_eq!(cell.step(Direction::RIGHT), Cell::new(4, 3));
        assert_eq!(cell.step(Direction::UP), Cell::new(3, 2));
    }
}
