//! Per-frame simulation tick
//!
//! Core game loop. One call advances the session by exactly one frame; the
//! host calls it once per display refresh.

use super::projectile::{Flight, SnapOutcome, advance, resolve_arrival};
use super::state::{GameEvent, GameOverCause, GameState, GameStatus};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Launcher angle from vertical (radians), if the pointer moved
    pub aim_angle: Option<f32>,
    /// Fire the aiming orb (click/tap)
    pub fire: bool,
    /// Start a new run from the first level
    pub start: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.start {
        state.start_game();
    }

    if let Some(angle) = input.aim_angle {
        state.set_aim(angle);
    }

    match state.status {
        GameStatus::NotStarted | GameStatus::GameOver => return,
        GameStatus::LevelCleared => step_level_cleared(state),
        GameStatus::Playing => step_playing(state, input.fire),
    }

    state.time_ticks += 1;
}

/// Count down the open-gate pause, then load the next level
fn step_level_cleared(state: &mut GameState) {
    let Some(remaining) = state.level_clear_ticks else {
        // Nothing pending (should not happen), move on right away
        state.advance_level();
        return;
    };
    let remaining = remaining.saturating_sub(1);
    if remaining == 0 {
        state.level_clear_ticks = None;
        state.advance_level();
    } else {
        state.level_clear_ticks = Some(remaining);
    }
}

fn step_playing(state: &mut GameState, fire: bool) {
    if fire {
        state.fire();
    }

    advance_effects(state);

    match state.projectile.as_mut() {
        None => state.replenish_aiming(),
        Some(projectile) => {
            if advance(projectile, &state.grid) == Flight::Arrived {
                let projectile = *projectile;
                state.projectile = None;
                match resolve_arrival(&mut state.grid, &projectile, &state.tuning) {
                    Some(outcome) => apply_snap(state, &outcome),
                    None => log::warn!("No free cell for orb {}, discarded", projectile.id),
                }
            }
        }
    }

    if state.status == GameStatus::Playing && state.shots_until_drop == 0 {
        drop_ceiling(state);
    }
}

/// Particles, falling orbs and jiggle timers
fn advance_effects(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);

    let gravity = state.tuning.fall_gravity;
    for orb in state.falling.iter_mut() {
        orb.pos += orb.vel;
        orb.vel.y += gravity;
    }
    state.falling.retain(|o| o.pos.y < FALL_KILL_Y);

    state.grid.decay_jiggle();
}

/// Score, lock, drop and status updates for a completed snap
fn apply_snap(state: &mut GameState, outcome: &SnapOutcome) {
    state.events.push(GameEvent::Snap);

    let mut newly_locked = false;
    if let Some(color) = outcome.popped_color() {
        state.events.push(GameEvent::Match);
        state.score += outcome.cluster.len() as u64 * state.tuning.match_points;
        for orb in &outcome.cluster {
            state.spawn_particles(orb.pos(), orb.color);
        }
        newly_locked = state.lock_color(color);
        log::debug!(
            "Popped {} orbs of color {}, locked {}/{}",
            outcome.cluster.len(),
            color,
            state.locked.len(),
            NUM_CHEVRONS
        );
    }

    if !outcome.detached.is_empty() {
        state.drop_orbs(&outcome.detached);
        state.score += outcome.detached.len() as u64 * state.tuning.drop_points;
    }

    // Landing breach wins over a simultaneous gate opening
    if outcome.breached {
        state.end_game(GameOverCause::Landing);
        return;
    }

    if newly_locked {
        if state.all_chevrons_locked() {
            log::info!("Gate {} open, score {}", state.level_index + 1, state.score);
            state.events.push(GameEvent::GateOpen);
            state.status = GameStatus::LevelCleared;
            state.level_clear_ticks = Some(state.tuning.level_clear_delay_ticks);
        } else {
            state.events.push(GameEvent::ChevronLock);
        }
    }
}

/// Push the whole grid down one row and reset the shot counter
fn drop_ceiling(state: &mut GameState) {
    state.shots_until_drop = state.tuning.shots_before_drop;
    let lowest = state.grid.shift_down();
    log::debug!("Ceiling dropped, lowest row now {:?}", lowest);
    if lowest.is_some_and(|row| row >= state.tuning.ceiling_row_limit) {
        state.end_game(GameOverCause::CeilingDrop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelData;
    use crate::sim::grid::RestingOrb;
    use crate::sim::hex::{Cell, cell_to_position};
    use crate::sim::projectile::Projectile;
    use crate::sim::state::FallingOrb;
    use crate::tuning::Tuning;
    use crate::{aim_angle_toward, levels::builtin_levels};
    use glam::Vec2;

    fn playing(layout: Vec<Vec<Option<u8>>>) -> GameState {
        let mut state = GameState::with_config(5, Tuning::default(), vec![LevelData { layout }]);
        state.start_game();
        state.drain_events();
        state
    }

    fn set_aiming_color(state: &mut GameState, color: u8) {
        if let Some(orb) = state.aiming.as_mut() {
            orb.color = color;
        }
    }

    /// Fire and tick until the shot snaps (or the run ends)
    fn fire_and_settle(state: &mut GameState, angle: f32) {
        let input = TickInput {
            aim_angle: Some(angle),
            fire: true,
            ..Default::default()
        };
        tick(state, &input);
        for _ in 0..200 {
            if state.projectile.is_none() {
                break;
            }
            tick(state, &TickInput::default());
        }
        assert!(state.projectile.is_none(), "shot never landed");
    }

    #[test]
    fn test_tick_not_started_is_idle() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput { fire: true, ..Default::default() });
        assert_eq!(state.status, GameStatus::NotStarted);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_tick_start_begins_play() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput { start: true, ..Default::default() });
        assert_eq!(state.status, GameStatus::Playing);
        assert!(state.aiming.is_some());
    }

    #[test]
    fn test_match_pops_run_and_scores() {
        // Three blue orbs on the ceiling; a blue shot lands at the end of the run
        let mut state = playing(vec![vec![Some(1), Some(1), Some(1)]]);
        set_aiming_color(&mut state, 1);
        let target = cell_to_position(0, 3);
        fire_and_settle(&mut state, aim_angle_toward(target));

        assert!(state.grid.is_empty(), "grid: {:?}", state.grid);
        assert!(state.score >= 4 * MATCH_POINTS);
        assert!(state.locked.contains(&1));
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::Fire, GameEvent::Snap, GameEvent::Match, GameEvent::ChevronLock]
        );
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_unsupported_orb_falls_after_match() {
        // (2,2) hangs from the two reds on row 1; popping them drops it
        let mut state = playing(vec![
            vec![Some(4), Some(4), Some(4), Some(4)],
            vec![None, Some(0), Some(0), None],
            vec![None, None, Some(6), None],
        ]);
        let hanging = *state.grid.get(Cell::new(2, 2)).expect("hanging orb");

        // A red shot about to touch the grid right under (0,0)
        state.aiming = None;
        state.projectile = Some(Projectile {
            id: 500,
            color: 0,
            pos: cell_to_position(1, 0) + Vec2::new(0.0, 1.0),
            vel: Vec2::new(0.0, -1.0),
        });
        tick(&mut state, &TickInput::default());

        assert!(!state.grid.contains(Cell::new(2, 2)));
        assert!(!state.grid.contains(Cell::new(1, 1)));
        assert!(
            state.falling.iter().any(|f: &FallingOrb| f.id == hanging.id),
            "hanging orb should be falling"
        );
        assert_eq!(state.score, 3 * MATCH_POINTS + DROP_POINTS);
        assert_eq!(state.grid.len(), 4);
    }

    #[test]
    fn test_eight_misses_drop_ceiling_once() {
        // Alternating colors across the top so nothing ever matches
        let row: Vec<Option<u8>> = (0..USABLE_COLS).map(|c| Some((c % 2) as u8)).collect();
        let mut state = playing(vec![row]);
        let before: Vec<Cell> = state.grid.iter().map(|o| o.cell).collect();

        let colors = [2u8, 3, 4, 5, 6, 2, 3, 4];
        let aims = [-0.6f32, -0.3, 0.0, 0.3, 0.6, -0.45, 0.15, 0.45];
        let mut drops = 0;
        for (i, (&color, &aim)) in colors.iter().zip(aims.iter()).enumerate() {
            // Let the launcher refill
            tick(&mut state, &TickInput::default());
            set_aiming_color(&mut state, color);
            let before_shots = state.shots_until_drop;
            fire_and_settle(&mut state, aim);
            assert_eq!(state.status, GameStatus::Playing, "shot {}", i);
            if state.shots_until_drop > before_shots {
                drops += 1;
            }
        }

        assert_eq!(drops, 1);
        assert_eq!(state.shots_until_drop, SHOTS_BEFORE_CEILING_DROP);
        for cell in before {
            let moved = Cell::new(cell.row + 1, cell.col);
            assert!(state.grid.contains(moved), "{:?} did not move down", cell);
            assert_eq!(state.grid.get(moved).map(|o| o.pos()), Some(moved.center()));
        }
    }

    #[test]
    fn test_zero_shot_budget_does_not_drop_while_idle() {
        let tuning = Tuning {
            shots_before_drop: 0,
            ..Tuning::default()
        };
        let mut state = GameState::with_config(5, tuning, vec![LevelData {
            layout: vec![vec![Some(0)]],
        }]);
        state.start_game();
        assert_eq!(state.shots_until_drop, 1);

        for _ in 0..12 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.grid.max_row(), Some(0));
    }

    #[test]
    fn test_ceiling_drop_past_limit_ends_game() {
        let mut state = playing(vec![vec![Some(0)]]);
        state
            .grid
            .insert(RestingOrb::new(77, 1, Cell::new(CEILING_ROW_LIMIT - 1, 4)));
        state.shots_until_drop = 1;
        tick(&mut state, &TickInput { fire: true, ..Default::default() });
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.game_over_cause, Some(GameOverCause::CeilingDrop));
        assert!(state.drain_events().contains(&GameEvent::GameOver));

        // Terminal: further ticks do nothing
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_landing_past_limit_ends_game() {
        let mut state = playing(vec![vec![Some(0)]]);
        state.aiming = None;
        state.projectile = Some(Projectile {
            id: 600,
            color: 3,
            pos: cell_to_position(CEILING_ROW_LIMIT, 4) + Vec2::new(0.0, 1.0),
            vel: Vec2::new(0.0, -1.0),
        });
        state
            .grid
            .insert(RestingOrb::new(77, 1, Cell::new(CEILING_ROW_LIMIT - 1, 4)));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.game_over_cause, Some(GameOverCause::Landing));
    }

    fn lock_all_but(state: &mut GameState, color: u8) {
        for c in 0..NUM_CHEVRONS as u8 {
            if c != color {
                state.lock_color(c);
            }
        }
    }

    #[test]
    fn test_last_chevron_opens_gate_then_next_level() {
        let mut state = GameState::new(11);
        state.start_game();
        // Replace level 1 with a simple pair so the test controls the match
        state.grid = [
            RestingOrb::new(900, 6, Cell::new(0, 4)),
            RestingOrb::new(901, 6, Cell::new(0, 5)),
        ]
        .into_iter()
        .collect();
        lock_all_but(&mut state, 6);
        set_aiming_color(&mut state, 6);
        state.drain_events();

        fire_and_settle(&mut state, aim_angle_toward(cell_to_position(0, 6)));
        assert_eq!(state.status, GameStatus::LevelCleared);
        assert!(state.drain_events().contains(&GameEvent::GateOpen));

        for _ in 0..LEVEL_CLEAR_DELAY_TICKS - 1 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.status, GameStatus::LevelCleared);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.level_index, 1);
        assert!(state.locked.is_empty());
        assert_eq!(state.grid.len(), builtin_levels()[1].orbs().count());
        assert!(state.score > 0, "score carries over");
    }

    #[test]
    fn test_gate_on_last_level_ends_run() {
        let mut state = playing(vec![vec![Some(6), Some(6)]]);
        lock_all_but(&mut state, 6);
        set_aiming_color(&mut state, 6);
        fire_and_settle(&mut state, aim_angle_toward(cell_to_position(0, 2)));
        assert_eq!(state.status, GameStatus::LevelCleared);

        for _ in 0..LEVEL_CLEAR_DELAY_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.game_over_cause, Some(GameOverCause::LevelsExhausted));
    }

    #[test]
    fn test_restart_cancels_pending_level_transition() {
        let mut state = GameState::new(11);
        state.start_game();
        state.status = GameStatus::LevelCleared;
        state.level_clear_ticks = Some(2);

        tick(&mut state, &TickInput { start: true, ..Default::default() });
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.level_clear_ticks, None);

        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.level_index, 0);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn test_effects_advance_and_expire() {
        let mut state = playing(vec![vec![Some(0)]]);
        state.spawn_particles(Vec2::new(400.0, 300.0), 0);
        state.falling.push(FallingOrb {
            id: 1,
            color: 0,
            pos: Vec2::new(400.0, FALL_KILL_Y - 0.1),
            vel: Vec2::new(0.0, 1.0),
        });
        state.falling.push(FallingOrb {
            id: 2,
            color: 0,
            pos: Vec2::new(400.0, 100.0),
            vel: Vec2::new(0.0, 0.0),
        });

        tick(&mut state, &TickInput::default());
        // First one crossed the bottom edge
        assert_eq!(state.falling.len(), 1);
        assert_eq!(state.falling[0].id, 2);
        assert!((state.falling[0].vel.y - FALL_GRAVITY).abs() < 1e-6);
        assert!((state.falling[0].pos.y - 100.0).abs() < 1e-6);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.falling.len(), 1);
        assert!((state.falling[0].pos.y - (100.0 + FALL_GRAVITY)).abs() < 1e-4);

        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_launcher_refills_after_snap() {
        let mut state = playing(vec![vec![Some(0), Some(1)]]);
        set_aiming_color(&mut state, 5);
        fire_and_settle(&mut state, 0.0);
        assert!(state.aiming.is_none());
        tick(&mut state, &TickInput::default());
        assert!(state.aiming.is_some());
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput { aim_angle: Some(-0.4), fire: true, ..Default::default() },
            TickInput::default(),
            TickInput { aim_angle: Some(0.2), ..Default::default() },
        ];
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        a.start_game();
        b.start_game();
        for _ in 0..60 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.score, b.score);
        assert_eq!(a.status, b.status);
        assert_eq!(a.next_color, b.next_color);
    }
}
