//! Session state and core simulation types
//!
//! One `GameState` owns everything a running session needs: the grid, the
//! launcher queue, transient effects, scoring and the status machine.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, RestingOrb};
use super::projectile::Projectile;
use crate::consts::*;
use crate::levels::{LevelData, builtin_levels};
use crate::tuning::Tuning;

/// Overall session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the first start
    NotStarted,
    Playing,
    /// All chevrons locked, gate open, next level pending
    LevelCleared,
    /// Terminal until the next start
    GameOver,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// A ceiling drop pushed the grid past the limit row
    CeilingDrop,
    /// A shot landed on or past the limit row
    Landing,
    /// The last level was cleared
    LevelsExhausted,
}

/// Things the host may want to react to (sound, UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Fire,
    Snap,
    Match,
    ChevronLock,
    GateOpen,
    GameOver,
}

/// The orb sitting in the launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AimingOrb {
    pub id: u32,
    pub color: u8,
}

/// An orb that lost its support and is dropping out of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingOrb {
    pub id: u32,
    pub color: u8,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Palette index of the orb it came from
    pub color: u8,
    /// Ticks left
    pub life: u32,
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 512;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    levels: Vec<LevelData>,
    pub level_index: usize,
    /// Carried across levels, reset on start
    pub score: u64,
    /// Palette indices whose chevron is locked this level
    pub locked: BTreeSet<u8>,
    pub shots_until_drop: u32,
    pub status: GameStatus,
    pub game_over_cause: Option<GameOverCause>,
    pub grid: Grid,
    pub aiming: Option<AimingOrb>,
    pub projectile: Option<Projectile>,
    /// Color the next aiming orb will get
    pub next_color: u8,
    /// Radians from vertical, clamped by tuning
    pub aim_angle: f32,
    pub falling: Vec<FallingOrb>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub particle_cap: usize,
    /// Ticks until the open gate moves on; `None` when nothing is pending
    pub level_clear_ticks: Option<u32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// A session over the stock levels and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), builtin_levels())
    }

    pub fn with_config(seed: u64, tuning: Tuning, levels: Vec<LevelData>) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            shots_until_drop: tuning.shots_before_drop,
            tuning,
            levels,
            level_index: 0,
            score: 0,
            locked: BTreeSet::new(),
            status: GameStatus::NotStarted,
            game_over_cause: None,
            grid: Grid::new(),
            aiming: None,
            projectile: None,
            next_color: 0,
            aim_angle: 0.0,
            falling: Vec::new(),
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            level_clear_ticks: None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Begin a fresh run from the first level.
    ///
    /// Any pending level transition from the previous run is dropped here, so
    /// a restart during the gate-open pause cannot be hijacked by it.
    pub fn start_game(&mut self) {
        self.score = 0;
        self.level_index = 0;
        self.level_clear_ticks = None;
        self.game_over_cause = None;
        self.particles.clear();
        if self.load_level(0) {
            self.status = GameStatus::Playing;
        } else {
            self.end_game(GameOverCause::LevelsExhausted);
        }
    }

    /// Replace the grid and per-level state with level `index`.
    ///
    /// Returns false if there is no such level.
    pub fn load_level(&mut self, index: usize) -> bool {
        let Some(level) = self.levels.get(index) else {
            return false;
        };
        let cells: Vec<_> = level.orbs().collect();

        self.grid.clear();
        for (cell, color) in cells {
            let id = self.next_entity_id();
            self.grid.insert(RestingOrb::new(id, color, cell));
        }

        self.level_index = index;
        self.shots_until_drop = self.tuning.shots_before_drop;
        self.locked.clear();
        self.falling.clear();
        self.projectile = None;
        self.aiming = None;
        self.level_clear_ticks = None;
        self.next_color = self.rng.random_range(0..NUM_CHEVRONS as u8);
        self.replenish_aiming();

        log::info!(
            "Loaded level {} ({} orbs)",
            index + 1,
            self.grid.len()
        );
        true
    }

    /// Move to the level after the current one, or end the run if none is left
    pub fn advance_level(&mut self) {
        let next = self.level_index + 1;
        if self.load_level(next) {
            self.status = GameStatus::Playing;
        } else {
            log::info!("All gates opened, final score {}", self.score);
            self.end_game(GameOverCause::LevelsExhausted);
        }
    }

    pub fn end_game(&mut self, cause: GameOverCause) {
        log::info!("Game over ({:?}), score {}", cause, self.score);
        self.status = GameStatus::GameOver;
        self.game_over_cause = Some(cause);
        self.projectile = None;
        self.level_clear_ticks = None;
        self.events.push(GameEvent::GameOver);
    }

    /// Colors a new orb may be drawn from: chevron colors still in the grid,
    /// or every chevron color once the grid is empty
    pub fn available_colors(&self) -> Vec<u8> {
        let in_grid: Vec<u8> = self
            .grid
            .colors()
            .into_iter()
            .filter(|&c| (c as usize) < NUM_CHEVRONS)
            .collect();
        if in_grid.is_empty() {
            (0..NUM_CHEVRONS as u8).collect()
        } else {
            in_grid
        }
    }

    /// Draw a color uniformly from [`Self::available_colors`]
    pub fn roll_color(&mut self) -> u8 {
        let colors = self.available_colors();
        colors[self.rng.random_range(0..colors.len())]
    }

    /// Promote the preview into the launcher and roll a new preview.
    /// Does nothing while an orb is already queued.
    pub fn replenish_aiming(&mut self) {
        if self.aiming.is_some() {
            return;
        }
        let id = self.next_entity_id();
        self.aiming = Some(AimingOrb {
            id,
            color: self.next_color,
        });
        self.next_color = self.roll_color();
    }

    pub fn set_aim(&mut self, angle: f32) {
        let max = self.tuning.max_aim_angle;
        self.aim_angle = angle.clamp(-max, max);
    }

    /// Launch the aiming orb along the current aim.
    ///
    /// No-op (returns false) unless playing with an orb queued and nothing
    /// already in flight.
    pub fn fire(&mut self) -> bool {
        if self.status != GameStatus::Playing || self.projectile.is_some() {
            return false;
        }
        let Some(orb) = self.aiming.take() else {
            return false;
        };
        self.projectile = Some(Projectile::launch(
            orb.id,
            orb.color,
            self.aim_angle,
            self.tuning.orb_speed,
        ));
        self.shots_until_drop = self.shots_until_drop.saturating_sub(1);
        self.events.push(GameEvent::Fire);
        true
    }

    /// Add `color` to the locked set. Returns true if it was new.
    pub fn lock_color(&mut self, color: u8) -> bool {
        self.locked.insert(color)
    }

    pub fn all_chevrons_locked(&self) -> bool {
        self.locked.len() >= NUM_CHEVRONS
    }

    /// Burst of particles where an orb popped
    pub fn spawn_particles(&mut self, pos: Vec2, color: u8) {
        for _ in 0..self.tuning.particles_per_orb {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 8.0,
                (self.rng.random::<f32>() - 0.5) * 8.0,
            );
            self.particles.push(Particle {
                pos,
                vel,
                color,
                life: self.rng.random_range(20..40),
                size: 2.0 + self.rng.random::<f32>() * 4.0,
            });
        }
        if self.particles.len() > self.particle_cap {
            let excess = self.particles.len() - self.particle_cap;
            self.particles.drain(..excess);
        }
    }

    /// Turn detached grid orbs into falling orbs with a small random kick
    pub fn drop_orbs(&mut self, orbs: &[RestingOrb]) {
        for orb in orbs {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 2.0,
                -self.rng.random::<f32>() * 2.0,
            );
            self.falling.push(FallingOrb {
                id: orb.id,
                color: orb.color,
                pos: orb.pos(),
                vel,
            });
        }
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for renderers and hosts
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            game_over_cause: self.game_over_cause,
            level_index: self.level_index,
            score: self.score,
            locked: self.locked.iter().copied().collect(),
            shots_until_drop: self.shots_until_drop,
            aim_angle: self.aim_angle,
            aiming: self.aiming,
            next_color: self.next_color,
            grid: self
                .grid
                .iter()
                .map(|orb| SnapshotOrb {
                    orb: *orb,
                    pos: orb.pos(),
                })
                .collect(),
            projectile: self.projectile,
            falling: self.falling.clone(),
            particles: self.particles.clone(),
        }
    }
}

/// A resting orb together with its projected position
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotOrb {
    #[serde(flatten)]
    pub orb: RestingOrb,
    pub pos: Vec2,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub game_over_cause: Option<GameOverCause>,
    pub level_index: usize,
    pub score: u64,
    pub locked: Vec<u8>,
    pub shots_until_drop: u32,
    pub aim_angle: f32,
    pub aiming: Option<AimingOrb>,
    pub next_color: u8,
    pub grid: Vec<SnapshotOrb>,
    pub projectile: Option<Projectile>,
    pub falling: Vec<FallingOrb>,
    pub particles: Vec<Particle>,
}
