use rand::Rng;

use crate::snake::{Bounds, Cell, Snake};

/// Picks a uniformly random free cell for the next piece of food.
///
/// Samples are drawn over the whole board and rejected while they land on the
/// snake. Returns `None` when the board has no free cell at all, which would
/// otherwise never terminate.
pub fn spawn_food<R: Rng + ?Sized>(bounds: Bounds, snake: &Snake, rng: &mut R) -> Option<Cell> {
    if bounds.is_empty() {
        return None;
    }

    let occupied = snake.body().iter().filter(|cell| bounds.contains(**cell)).count();
    if occupied >= bounds.cell_count() {
        return None;
    }

    loop {
        let cell = Cell::new(rng.gen_range(0..bounds.cols), rng.gen_range(0..bounds.rows));
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }
}
