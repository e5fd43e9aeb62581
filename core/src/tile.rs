use serde::{Deserialize, Serialize};

use crate::*;

/// Opaque identity of a cell, stable across snapshots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey(u64);

impl CellKey {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    Exploded,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

/// A single grid position.
///
/// Flags are only ever set on unrevealed cells: revealing clears the flag and flagging a revealed cell is refused
/// before it reaches here.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    key: CellKey,
    position: Vec2,
    revealed: bool,
    mine: bool,
    flag: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            key: crate::rng::unique_key(),
            position,
            revealed: false,
            mine: false,
            flag: false,
            adjacent_mines: 0,
        }
    }

    pub fn key(&self) -> CellKey {
        self.key
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn x(&self) -> Coord {
        self.position.x
    }

    pub fn y(&self) -> Coord {
        self.position.y
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_mine(&self) -> bool {
        self.mine
    }

    pub fn is_flagged(&self) -> bool {
        self.flag
    }

    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    /// Revealed safe cell showing a non-zero count.
    pub fn is_numbered(&self) -> bool {
        self.revealed && !self.mine && self.adjacent_mines > 0
    }

    /// Revealed safe cell with no adjacent mines, the only kind flood reveal propagates through.
    pub fn is_open_zero(&self) -> bool {
        self.revealed && !self.mine && self.adjacent_mines == 0
    }

    pub fn view(&self) -> CellView {
        match (self.revealed, self.mine, self.flag) {
            (true, true, _) => CellView::Exploded,
            (true, false, _) => CellView::Revealed(self.adjacent_mines),
            (false, _, true) => CellView::Flagged,
            (false, _, false) => CellView::Hidden,
        }
    }

    /// Returns whether the cell was hidden before.
    pub(crate) fn reveal(&mut self) -> bool {
        self.flag = false;
        !core::mem::replace(&mut self.revealed, true)
    }

    pub(crate) fn toggle_flag(&mut self) {
        self.flag = !self.flag;
    }

    /// Returns whether a mine was newly placed.
    pub(crate) fn plant_mine(&mut self) -> bool {
        !core::mem::replace(&mut self.mine, true)
    }

    pub(crate) fn add_adjacent_mine(&mut self) {
        self.adjacent_mines = (self.adjacent_mines + 1).min(8);
    }
}
