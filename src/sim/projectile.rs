//! Projectile flight and snapping
//!
//! A fired orb moves in a straight line, bounces off the gate's side walls,
//! and snaps into the grid when it reaches the ceiling or touches a resting
//! orb. Snapping runs the match and support passes and reports what changed;
//! scoring and status updates are left to the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, RestingOrb};
use super::hex::{Cell, nearest_empty_cell};
use super::matching::find_same_color_cluster;
use super::support::find_unsupported_orbs;
use crate::aim_direction;
use crate::consts::*;
use crate::tuning::Tuning;

/// An orb in free flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub color: u8,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Projectile {
    /// Leave the launcher along `angle` (radians from vertical)
    pub fn launch(id: u32, color: u8, angle: f32, speed: f32) -> Self {
        Self {
            id,
            color,
            pos: LAUNCHER_POS,
            vel: aim_direction(angle) * speed,
        }
    }
}

/// Result of one flight step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    InFlight,
    Arrived,
}

/// Advance one tick: move, bounce, then test for arrival
pub fn advance(projectile: &mut Projectile, grid: &Grid) -> Flight {
    projectile.pos += projectile.vel;

    // Only flip when heading further out, so a deep overshoot can't re-flip
    let p = projectile;
    if (p.pos.x < WALL_LEFT && p.vel.x < 0.0) || (p.pos.x > WALL_RIGHT && p.vel.x > 0.0) {
        p.vel.x = -p.vel.x;
    }

    if p.pos.y < CEILING_Y {
        p.pos.y = CEILING_Y;
        return Flight::Arrived;
    }

    if touches_grid(p.pos, grid) {
        Flight::Arrived
    } else {
        Flight::InFlight
    }
}

/// True when an orb centered at `pos` overlaps any resting orb
pub fn touches_grid(pos: Vec2, grid: &Grid) -> bool {
    grid.iter()
        .any(|orb| orb.pos().distance_squared(pos) < ORB_DIAMETER * ORB_DIAMETER)
}

/// Everything a snap changed in the grid
#[derive(Debug, Clone, PartialEq)]
pub struct SnapOutcome {
    /// The orb as placed, whether or not it survived the match
    pub placed: RestingOrb,
    /// Same-color cluster around the placed orb (popped or not)
    pub cluster: Vec<RestingOrb>,
    /// The cluster met the threshold and was removed
    pub popped: bool,
    /// Orbs cut off from the ceiling by the pop, already removed
    pub detached: Vec<RestingOrb>,
    /// The landing row is at or past the ceiling limit
    pub breached: bool,
}

impl SnapOutcome {
    pub fn popped_color(&self) -> Option<u8> {
        self.popped.then_some(self.placed.color)
    }
}

/// Commit an arrived projectile to the grid.
///
/// Places it in the nearest free cell, jiggles its neighbors, pops a large
/// enough cluster and removes any orbs left floating. The landing row is
/// checked against the ceiling limit after matching, using the cell as
/// placed. Returns `None` if the scan window has no free cell.
pub fn resolve_arrival(
    grid: &mut Grid,
    projectile: &Projectile,
    tuning: &Tuning,
) -> Option<SnapOutcome> {
    let cell: Cell = nearest_empty_cell(projectile.pos, tuning.snap_scan_rows, |c| {
        grid.contains(c)
    })?;
    let placed = RestingOrb::new(projectile.id, projectile.color, cell);
    grid.insert(placed);
    grid.jiggle_neighbors(cell, tuning.jiggle_ticks);

    let cluster = find_same_color_cluster(grid, &placed);
    let popped = cluster.len() >= tuning.match_threshold;

    let mut detached = Vec::new();
    if popped {
        for orb in &cluster {
            grid.remove(orb.cell);
        }
        detached = find_unsupported_orbs(grid);
        for orb in &detached {
            grid.remove(orb.cell);
        }
    }

    let breached = cell.row >= tuning.ceiling_row_limit;

    log::debug!(
        "Snapped orb {} at ({}, {}): cluster {}, popped {}, detached {}",
        placed.id,
        cell.row,
        cell.col,
        cluster.len(),
        popped,
        detached.len()
    );

    Some(SnapOutcome {
        placed,
        cluster,
        popped,
        detached,
        breached,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hex::cell_to_position;

    fn grid_of(cells: &[(i32, i32, u8)]) -> Grid {
        cells
            .iter()
            .enumerate()
            .map(|(i, &(r, c, color))| RestingOrb::new(i as u32 + 1, color, Cell::new(r, c)))
            .collect()
    }

    fn shot(pos: Vec2, vel: Vec2, color: u8) -> Projectile {
        Projectile {
            id: 100,
            color,
            pos,
            vel,
        }
    }

    #[test]
    fn test_launch_straight_up() {
        let p = Projectile::launch(1, 0, 0.0, ORB_SPEED);
        assert_eq!(p.pos, LAUNCHER_POS);
        assert!(p.vel.x.abs() < 1e-5);
        assert!((p.vel.y + ORB_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_advance_moves_by_velocity() {
        let mut p = shot(Vec2::new(400.0, 400.0), Vec2::new(3.0, -4.0), 0);
        assert_eq!(advance(&mut p, &Grid::new()), Flight::InFlight);
        assert_eq!(p.pos, Vec2::new(403.0, 396.0));
    }

    #[test]
    fn test_wall_bounce_flips_x_only() {
        let mut p = shot(Vec2::new(WALL_LEFT + 2.0, 400.0), Vec2::new(-5.0, -5.0), 0);
        advance(&mut p, &Grid::new());
        assert_eq!(p.vel, Vec2::new(5.0, -5.0));

        let mut p = shot(Vec2::new(WALL_RIGHT - 2.0, 400.0), Vec2::new(5.0, -5.0), 0);
        advance(&mut p, &Grid::new());
        assert_eq!(p.vel, Vec2::new(-5.0, -5.0));

        // Already heading back in: no second flip
        let mut p = shot(Vec2::new(WALL_LEFT - 10.0, 400.0), Vec2::new(5.0, -5.0), 0);
        advance(&mut p, &Grid::new());
        assert_eq!(p.vel.x, 5.0);
    }

    #[test]
    fn test_ceiling_arrival_clamps_y() {
        let mut p = shot(Vec2::new(400.0, CEILING_Y + 5.0), Vec2::new(0.0, -12.0), 0);
        assert_eq!(advance(&mut p, &Grid::new()), Flight::Arrived);
        assert_eq!(p.pos.y, CEILING_Y);
    }

    #[test]
    fn test_contact_arrival() {
        let grid = grid_of(&[(0, 5, 1)]);
        let target = cell_to_position(0, 5);
        let mut p = shot(target + Vec2::new(0.0, 50.0), Vec2::new(0.0, -12.0), 0);
        assert_eq!(advance(&mut p, &grid), Flight::Arrived);
    }

    #[test]
    fn test_snap_without_match() {
        let mut grid = grid_of(&[(0, 3, 1)]);
        let p = shot(cell_to_position(1, 3) + Vec2::new(1.0, 2.0), Vec2::ZERO, 4);
        let out = resolve_arrival(&mut grid, &p, &Tuning::default()).expect("free cell");
        assert_eq!(out.placed.cell, Cell::new(1, 3));
        assert!(!out.popped);
        assert_eq!(out.popped_color(), None);
        assert_eq!(grid.len(), 2);
        // The neighbor above got jiggled
        assert_eq!(grid.get(Cell::new(0, 3)).map(|o| o.jiggle), Some(JIGGLE_TICKS));
    }

    #[test]
    fn test_snap_pops_cluster_and_drops_hangers() {
        // Red pair on the ceiling holding a blue orb; a red shot pops the pair
        let mut grid = grid_of(&[(0, 2, 0), (0, 3, 0), (1, 2, 5), (0, 6, 2)]);
        let p = shot(cell_to_position(0, 4), Vec2::ZERO, 0);
        let out = resolve_arrival(&mut grid, &p, &Tuning::default()).expect("free cell");

        assert!(out.popped);
        assert_eq!(out.cluster.len(), 3);
        assert_eq!(out.popped_color(), Some(0));
        assert_eq!(out.detached.len(), 1);
        assert_eq!(out.detached[0].cell, Cell::new(1, 2));
        assert_eq!(grid.len(), 1);
        assert!(grid.contains(Cell::new(0, 6)));
    }

    #[test]
    fn test_breach_uses_landing_row_even_when_popped() {
        let limit = Tuning::default().ceiling_row_limit;
        // A same-color chain reaching down to the limit row
        let mut cells = Vec::new();
        for r in 0..limit {
            cells.push((r, 2, 3));
        }
        let mut grid = grid_of(&cells);
        let p = shot(cell_to_position(limit, 2), Vec2::ZERO, 3);
        let out = resolve_arrival(&mut grid, &p, &Tuning::default()).expect("free cell");

        assert!(out.popped);
        assert!(!grid.contains(out.placed.cell));
        assert!(out.breached);
    }
}
