//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no delta-time scaling
//! - Seeded RNG only
//! - Stable iteration order (grid is kept row-major)
//! - No rendering, audio or platform dependencies

pub mod grid;
pub mod hex;
pub mod matching;
pub mod projectile;
pub mod state;
pub mod support;
pub mod tick;

pub use grid::{Grid, RestingOrb};
pub use hex::{Cell, cell_to_position, nearest_empty_cell, neighbors_of};
pub use matching::find_same_color_cluster;
pub use projectile::{Flight, Projectile, SnapOutcome, advance, resolve_arrival};
pub use state::{
    AimingOrb, FallingOrb, GameEvent, GameOverCause, GameState, GameStatus, Particle, Snapshot,
    MAX_PARTICLES,
};
pub use support::{find_unsupported_orbs, supported_cells};
pub use tick::{TickInput, tick};
