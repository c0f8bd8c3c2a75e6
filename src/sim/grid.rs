//! The resting-orb grid

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hex::Cell;

/// An orb locked into a grid cell.
///
/// Its pixel position is never stored; `pos()` projects the cell each time so
/// the two cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrb {
    pub id: u32,
    /// Palette index
    pub color: u8,
    pub cell: Cell,
    /// Decorative shake countdown (ticks)
    pub jiggle: u8,
}

impl RestingOrb {
    pub fn new(id: u32, color: u8, cell: Cell) -> Self {
        Self {
            id,
            color,
            cell,
            jiggle: 0,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.cell.center()
    }
}

/// Cell-keyed orb storage.
///
/// Every stored orb's `cell` equals its key. Iteration is row-major, which
/// keeps RNG draws made while walking the grid reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    orbs: BTreeMap<Cell, RestingOrb>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbs.is_empty()
    }

    pub fn get(&self, cell: Cell) -> Option<&RestingOrb> {
        self.orbs.get(&cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.orbs.contains_key(&cell)
    }

    /// Place an orb at its own cell, returning whatever was there
    pub fn insert(&mut self, orb: RestingOrb) -> Option<RestingOrb> {
        self.orbs.insert(orb.cell, orb)
    }

    pub fn remove(&mut self, cell: Cell) -> Option<RestingOrb> {
        self.orbs.remove(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestingOrb> {
        self.orbs.values()
    }

    pub fn clear(&mut self) {
        self.orbs.clear();
    }

    /// Set the jiggle countdown on every occupied neighbor of `cell`
    pub fn jiggle_neighbors(&mut self, cell: Cell, ticks: u8) {
        for n in cell.neighbors() {
            if let Some(orb) = self.orbs.get_mut(&n) {
                orb.jiggle = ticks;
            }
        }
    }

    /// Count every jiggle down by one, stopping at zero
    pub fn decay_jiggle(&mut self) {
        for orb in self.orbs.values_mut() {
            orb.jiggle = orb.jiggle.saturating_sub(1);
        }
    }

    /// Move every orb down one row. Returns the lowest resulting row, or
    /// `None` for an empty grid.
    pub fn shift_down(&mut self) -> Option<i32> {
        let shifted: BTreeMap<Cell, RestingOrb> = std::mem::take(&mut self.orbs)
            .into_values()
            .map(|mut orb| {
                orb.cell.row += 1;
                (orb.cell, orb)
            })
            .collect();
        self.orbs = shifted;
        self.max_row()
    }

    /// Distinct colors present, ascending
    pub fn colors(&self) -> Vec<u8> {
        let mut seen = [false; 256];
        for orb in self.orbs.values() {
            seen[orb.color as usize] = true;
        }
        (0..=u8::MAX).filter(|&c| seen[c as usize]).collect()
    }

    /// Lowest occupied row
    pub fn max_row(&self) -> Option<i32> {
        self.orbs.keys().map(|c| c.row).max()
    }
}

impl FromIterator<RestingOrb> for Grid {
    fn from_iter<T: IntoIterator<Item = RestingOrb>>(iter: T) -> Self {
        Self {
            orbs: iter.into_iter().map(|orb| (orb.cell, orb)).collect(),
        }
    }
}
