//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here, so a host can
//! rebalance without touching code. Missing fields fall back to the
//! constants in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Shots fired before the ceiling drops a row
    pub shots_before_drop: u32,
    /// Landing on (or being pushed to) this row ends the run
    pub ceiling_row_limit: i32,
    /// Projectile speed (pixels per tick)
    pub orb_speed: f32,
    /// Falling orb acceleration (pixels per tick²)
    pub fall_gravity: f32,
    /// Minimum cluster size that pops
    pub match_threshold: usize,
    /// Points per popped orb
    pub match_points: u64,
    /// Points per orb dropped off the ceiling
    pub drop_points: u64,
    /// Ticks between gate opening and the next level
    pub level_clear_delay_ticks: u32,
    /// Rows searched when snapping
    pub snap_scan_rows: i32,
    pub jiggle_ticks: u8,
    pub particles_per_orb: u32,
    /// Aim clamp (radians from vertical)
    pub max_aim_angle: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            shots_before_drop: SHOTS_BEFORE_CEILING_DROP,
            ceiling_row_limit: CEILING_ROW_LIMIT,
            orb_speed: ORB_SPEED,
            fall_gravity: FALL_GRAVITY,
            match_threshold: MATCH_THRESHOLD,
            match_points: MATCH_POINTS,
            drop_points: DROP_POINTS,
            level_clear_delay_ticks: LEVEL_CLEAR_DELAY_TICKS,
            snap_scan_rows: SNAP_SCAN_ROWS,
            jiggle_ticks: JIGGLE_TICKS,
            particles_per_orb: 10,
            max_aim_angle: MAX_AIM_ANGLE,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Clamp counts that must stay positive. A zero shot budget would drop
    /// the ceiling every tick, a zero scan depth could never snap, and a
    /// zero threshold would pop every lone orb.
    pub fn sanitized(mut self) -> Self {
        self.shots_before_drop = self.shots_before_drop.max(1);
        self.snap_scan_rows = self.snap_scan_rows.max(1);
        self.match_threshold = self.match_threshold.max(1);
        self
    }

    /// Parse JSON, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }
}
