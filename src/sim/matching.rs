//! Same-color cluster detection

use std::collections::HashSet;

use super::grid::{Grid, RestingOrb};
use super::hex::Cell;

/// Every orb connected to `seed` through neighbors of the seed's color.
///
/// The seed itself is always included. The caller decides whether the
/// cluster is big enough to pop. Iterative flood fill with a visited set,
/// since hex adjacency is full of cycles.
pub fn find_same_color_cluster(grid: &Grid, seed: &RestingOrb) -> Vec<RestingOrb> {
    let color = seed.color;
    let mut visited: HashSet<Cell> = HashSet::new();
    let mut stack = vec![*seed];
    let mut cluster = Vec::new();

    while let Some(current) = stack.pop() {
        if !visited.insert(current.cell) {
            continue;
        }
        cluster.push(current);
        for n in current.cell.neighbors() {
            if visited.contains(&n) {
                continue;
            }
            if let Some(orb) = grid.get(n)
                && orb.color == color
            {
                stack.push(*orb);
            }
        }
    }

    cluster
}
