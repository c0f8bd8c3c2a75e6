//! Offset hex grid geometry
//!
//! Cells are addressed by (row, col). Odd rows are shifted half an orb to the
//! right, so which diagonal neighbors a cell has depends on its row parity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A discrete grid cell.
///
/// Ordered row-major, which is the scan order used wherever ties are broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Pixel center of this cell
    #[inline]
    pub fn center(self) -> Vec2 {
        cell_to_position(self.row, self.col)
    }

    #[inline]
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        neighbors_of(self.row, self.col)
    }
}

/// Map a cell to its pixel center
#[inline]
pub fn cell_to_position(row: i32, col: i32) -> Vec2 {
    let x = col as f32 * ORB_DIAMETER + row.rem_euclid(2) as f32 * ORB_RADIUS + GRID_LEFT;
    let y = row as f32 * ROW_HEIGHT + ORB_RADIUS;
    Vec2::new(x, y)
}

/// Up to six adjacent cells.
///
/// Even rows reach diagonally to the left, odd rows to the right. Columns
/// outside `0..USABLE_COLS` are dropped; rows are not bounded here, an
/// off-grid row simply never holds an orb.
pub fn neighbors_of(row: i32, col: i32) -> impl Iterator<Item = Cell> {
    let diag = if row.rem_euclid(2) == 0 { -1 } else { 1 };
    [
        (row, col - 1),
        (row, col + 1),
        (row - 1, col),
        (row + 1, col),
        (row - 1, col + diag),
        (row + 1, col + diag),
    ]
    .into_iter()
    .filter(|&(_, c)| (0..USABLE_COLS).contains(&c))
    .map(|(r, c)| Cell::new(r, c))
}

/// Closest unoccupied cell to `pos` within rows `0..max_rows` and columns
/// `0..GRID_COLS`.
///
/// Scans row-major ascending; the first cell at the minimum distance wins.
/// Returns `None` only when every scanned cell is occupied.
pub fn nearest_empty_cell(
    pos: Vec2,
    max_rows: i32,
    is_occupied: impl Fn(Cell) -> bool,
) -> Option<Cell> {
    let mut best: Option<(Cell, f32)> = None;
    for row in 0..max_rows {
        for col in 0..GRID_COLS {
            let cell = Cell::new(row, col);
            if is_occupied(cell) {
                continue;
            }
            let dist = pos.distance_squared(cell.center());
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((cell, dist));
            }
        }
    }
    best.map(|(cell, _)| cell)
}
