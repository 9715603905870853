use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use Direction::*;
use MoveResult::*;

/// A cell of the board in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Re-enters the board from the opposite edge when a single step left it.
    pub fn wrapped(&self, bounds: Bounds) -> Self {
        let mut cell = *self;

        if cell.x >= bounds.cols {
            cell.x = 0;
        } else if cell.x < 0 {
            cell.x = bounds.cols - 1;
        }

        if cell.y >= bounds.rows {
            cell.y = 0;
        } else if cell.y < 0 {
            cell.y = bounds.rows - 1;
        }

        cell
    }
}

/// Board size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub cols: i32,
    pub rows: i32,
}

impl Bounds {
    pub fn new(cols: i32, rows: i32) -> Self {
        Bounds { cols, rows }
    }

    /// Grid bounds for a surface of the given pixel size.
    pub fn from_surface(width: u32, height: u32, grid_unit: u32) -> Self {
        let unit = grid_unit.max(1);
        Bounds::new((width / unit) as i32, (height / unit) as i32)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.cols && cell.y >= 0 && cell.y < self.rows
    }

    pub fn cell_count(&self) -> usize {
        self.cols.max(0) as usize * self.rows.max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Up, Down) | (Down, Up) | (Left, Right) | (Right, Left)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The head advanced and the tail cell was released.
    Moved { new_head: Cell, old_tail: Cell },
    /// The head advanced onto the food and the tail stayed put.
    Ate { new_head: Cell },
    /// The head would have landed on the body. Nothing moved.
    Crashed { at: Cell },
}

/// Snake body, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        debug_assert!(!body.is_empty(), "a snake needs at least one segment");
        Snake { body }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Moves one step in `direction` on a toroidal board, growing when the new
    /// head lands on `food`.
    pub fn advance(&mut self, direction: Direction, bounds: Bounds, food: Cell) -> MoveResult {
        let new_head = self.head().moved(direction).wrapped(bounds);

        // Every segment counts, the tail included: it has not moved away yet.
        if self.occupies(new_head) {
            return Crashed { at: new_head };
        }

        self.body.push_front(new_head);

        if new_head == food {
            Ate { new_head }
        } else {
            // Never empty: a head was just pushed.
            let old_tail = self.body.pop_back().unwrap_or(new_head);
            Moved { new_head, old_tail }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::new(cells.iter().map(|&(x, y)| Cell::new(x, y)))
    }

    #[test]
    fn test_opposite_directions() {
        assert!(Up.is_opposite(Down));
        assert!(Down.is_opposite(Up));
        assert!(Left.is_opposite(Right));
        assert!(Right.is_opposite(Left));

        assert!(!Up.is_opposite(Left));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn test_wrap_on_every_edge() {
        let bounds = Bounds::new(10, 8);

        assert_eq!(Cell::new(9, 3).moved(Right).wrapped(bounds), Cell::new(0, 3));
        assert_eq!(Cell::new(0, 3).moved(Left).wrapped(bounds), Cell::new(9, 3));
        assert_eq!(Cell::new(4, 7).moved(Down).wrapped(bounds), Cell::new(4, 0));
        assert_eq!(Cell::new(4, 0).moved(Up).wrapped(bounds), Cell::new(4, 7));
        assert_eq!(Cell::new(4, 4).moved(Up).wrapped(bounds), Cell::new(4, 3));
    }

    #[test]
    fn test_bounds_from_surface_floor() {
        assert_eq!(Bounds::from_surface(219, 200, 20), Bounds::new(10, 10));
        assert_eq!(Bounds::from_surface(19, 400, 20), Bounds::new(0, 20));
        assert!(Bounds::from_surface(19, 400, 20).is_empty());
    }

    #[test]
    fn test_advance_without_food_keeps_length() {
        let mut s = snake(&[(5, 5), (4, 5), (3, 5)]);
        let res = s.advance(Right, Bounds::new(10, 10), Cell::new(0, 0));

        assert_eq!(
            res,
            Moved { new_head: Cell::new(6, 5), old_tail: Cell::new(3, 5) }
        );
        assert_eq!(s, snake(&[(6, 5), (5, 5), (4, 5)]));
    }

    #[test]
    fn test_advance_onto_food_grows() {
        let mut s = snake(&[(5, 5), (4, 5), (3, 5)]);
        let res = s.advance(Down, Bounds::new(10, 10), Cell::new(5, 6));

        assert_eq!(res, Ate { new_head: Cell::new(5, 6) });
        assert_eq!(s.len(), 4);
        assert_eq!(s.head(), Cell::new(5, 6));
    }

    #[test]
    fn test_crash_leaves_body_untouched() {
        let mut s = snake(&[(5, 5), (4, 5), (3, 5), (3, 6), (4, 6), (5, 6)]);
        let before = s.clone();

        let res = s.advance(Left, Bounds::new(10, 10), Cell::new(0, 0));

        assert_eq!(res, Crashed { at: Cell::new(4, 5) });
        assert_eq!(s, before);
    }

    #[test]
    fn test_moving_into_tail_is_fatal() {
        // Head at (4,6) chasing the tail at (4,5).
        let mut s = snake(&[(4, 6), (5, 6), (5, 5), (4, 5)]);
        let res = s.advance(Up, Bounds::new(10, 10), Cell::new(0, 0));

        assert_eq!(res, Crashed { at: Cell::new(4, 5) });
    }
}
