//! Gate Gauntlet - a hex-grid orb shooter
//!
//! Fire orbs into a hexagonally packed ceiling of colored orbs. Three or more
//! of a color pop and lock that color's chevron; lock all seven to open the
//! gate and move on to the next level.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hex grid, matching, support, game loop)
//! - `levels`: Static level layouts
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `audio`: Fire-and-forget sound effects
//! - `platform`: Frame driver and browser bindings

pub mod audio;
pub mod levels;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use levels::LevelData;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Playfield dimensions (screen space, y grows downward)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Radius of the circular gate the orbs are played inside
    pub const PLAYFIELD_RADIUS: f32 = 280.0;

    /// Orb size
    pub const ORB_DIAMETER: f32 = 40.0;
    pub const ORB_RADIUS: f32 = ORB_DIAMETER / 2.0;
    /// Vertical distance between grid rows (rows overlap slightly)
    pub const ROW_HEIGHT: f32 = ORB_DIAMETER - 6.0;
    /// Horizontal offset of column 0
    pub const GRID_LEFT: f32 = ORB_RADIUS * 3.0;

    /// Grid columns scanned when snapping
    pub const GRID_COLS: i32 = 12;
    /// Columns that take part in adjacency (matching and support)
    pub const USABLE_COLS: i32 = GRID_COLS - 3;
    /// Rows scanned when snapping a projectile
    pub const SNAP_SCAN_ROWS: i32 = 20;

    /// Palette size; each color owns one chevron
    pub const NUM_COLORS: u8 = 7;
    pub const NUM_CHEVRONS: usize = 7;

    /// Projectile speed (pixels per tick)
    pub const ORB_SPEED: f32 = 12.0;
    /// Falling orb acceleration (pixels per tick²)
    pub const FALL_GRAVITY: f32 = 0.2;

    pub const SHOTS_BEFORE_CEILING_DROP: u32 = 8;
    pub const CEILING_ROW_LIMIT: i32 = 11;

    /// Ticks the gate stays open before the next level (3 s at 60 Hz)
    pub const LEVEL_CLEAR_DELAY_TICKS: u32 = 180;
    /// Jiggle applied to neighbors of a freshly snapped orb
    pub const JIGGLE_TICKS: u8 = 10;

    pub const MATCH_THRESHOLD: usize = 3;
    pub const MATCH_POINTS: u64 = 10;
    pub const DROP_POINTS: u64 = 20;

    /// Widest aim away from vertical (radians, ~80 degrees)
    pub const MAX_AIM_ANGLE: f32 = 1.4;

    /// Where the aiming orb sits
    pub const LAUNCHER_POS: Vec2 = Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT - 30.0);
    /// Horizontal bounce thresholds for the projectile
    pub const WALL_LEFT: f32 = GAME_WIDTH / 2.0 - (PLAYFIELD_RADIUS - ORB_RADIUS);
    pub const WALL_RIGHT: f32 = GAME_WIDTH / 2.0 + (PLAYFIELD_RADIUS - ORB_RADIUS);
    /// Highest point a projectile can reach
    pub const CEILING_Y: f32 = ORB_RADIUS;
    /// Falling orbs are dropped once below this
    pub const FALL_KILL_Y: f32 = GAME_HEIGHT + ORB_DIAMETER;
}

/// Unit direction for an aim angle measured from vertical.
///
/// Zero points straight up, positive angles lean right.
#[inline]
pub fn aim_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}

/// Aim angle (from vertical) that points the launcher at `target`
#[inline]
pub fn aim_angle_toward(target: Vec2) -> f32 {
    let d = target - consts::LAUNCHER_POS;
    d.x.atan2(-d.y)
}
