//! Level layouts
//!
//! A level is a row-major matrix of palette indices, `None` for an empty
//! cell. Rows may differ in width. Layouts are read once when a level loads
//! and never mutated.

use serde::{Deserialize, Serialize};

use crate::consts::NUM_COLORS;
use crate::sim::hex::Cell;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub layout: Vec<Vec<Option<u8>>>,
}

impl LevelData {
    /// Occupied cells and their colors, row-major.
    ///
    /// Out-of-palette indices are skipped with a warning.
    pub fn orbs(&self) -> impl Iterator<Item = (Cell, u8)> + '_ {
        self.layout.iter().enumerate().flat_map(|(r, row)| {
            row.iter().enumerate().filter_map(move |(c, color)| {
                let color = (*color)?;
                if color >= NUM_COLORS {
                    log::warn!("Level cell ({}, {}) has unknown color {}", r, c, color);
                    return None;
                }
                Some((Cell::new(r as i32, c as i32), color))
            })
        })
    }
}

/// Parse an ordered list of levels from JSON.
///
/// Accepts `[{ "layout": [[0, null, 1], ...] }, ...]`.
pub fn levels_from_json(json: &str) -> serde_json::Result<Vec<LevelData>> {
    serde_json::from_str(json)
}

/// The stock three-gate campaign; every level uses all seven colors
pub fn builtin_levels() -> Vec<LevelData> {
    const N: Option<u8> = None;
    let level = |rows: &[&[Option<u8>]]| LevelData {
        layout: rows.iter().map(|r| r.to_vec()).collect(),
    };
    let s = |c: u8| Some(c);

    vec![
        level(&[
            &[s(1), s(1), s(2), s(2), s(3), s(0), s(0), s(3), s(2), s(2), s(1), s(1)],
            &[s(1), s(2), s(2), s(3), s(3), N, N, s(3), s(3), s(2), s(2), s(1)],
            &[s(5), s(2), s(3), s(3), N, N, N, N, N, s(3), s(3), s(2)],
            &[N, s(6), s(3), s(4), N, N, N, N, s(4), N, s(3), s(6)],
        ]),
        level(&[
            &[s(4), N, N, s(1), s(1), s(1), s(1), s(1), s(1), N, N, s(2)],
            &[s(4), s(5), N, s(1), s(1), s(1), s(1), s(1), s(1), s(1), s(1), N],
            &[s(6), N, s(1), s(1), s(0), s(0), s(3), s(3), s(0), s(0), s(1), s(1)],
            &[N, s(1), s(1), s(0), s(0), s(3), s(3), s(3), s(3), s(0), s(0), s(1)],
            &[N, s(1), s(0), s(0), s(3), s(3), s(2), s(2), s(3), s(3), s(0), s(0)],
        ]),
        level(&[
            &[s(2), s(3), s(4), s(5), s(0), s(1), s(1), s(0), s(5), s(4), s(3), s(2)],
            &[s(2), s(3), s(4), s(5), s(0), N, N, s(0), s(5), s(4), s(3), s(2)],
            &[s(2), s(3), s(4), s(5), N, N, N, N, s(5), s(4), s(3), s(2)],
            &[N, s(3), s(4), s(6), N, s(2), s(2), N, s(6), s(4), s(3), N],
        ]),
    ]
}
