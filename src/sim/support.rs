//! Ceiling support detection
//!
//! An orb is supported when a chain of adjacent orbs, of any colors, links it
//! to row 0. Everything else is floating and has to fall.

use std::collections::HashSet;

use super::grid::{Grid, RestingOrb};
use super::hex::Cell;

/// Cells transitively connected to an occupied row-0 cell
pub fn supported_cells(grid: &Grid) -> HashSet<Cell> {
    let mut connected: HashSet<Cell> = HashSet::with_capacity(grid.len());
    let mut stack: Vec<Cell> = grid
        .iter()
        .filter(|orb| orb.cell.row == 0)
        .map(|orb| orb.cell)
        .collect();

    while let Some(cell) = stack.pop() {
        if !connected.insert(cell) {
            continue;
        }
        stack.extend(
            cell.neighbors()
                .filter(|n| grid.contains(*n) && !connected.contains(n)),
        );
    }

    connected
}

/// Orbs with no path to the ceiling, in grid order
pub fn find_unsupported_orbs(grid: &Grid) -> Vec<RestingOrb> {
    let connected = supported_cells(grid);
    grid.iter()
        .filter(|orb| !connected.contains(&orb.cell))
        .copied()
        .collect()
}
