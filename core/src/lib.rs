//! Game-state engine for a single-player mine-clearing puzzle.
//!
//! A [`GameState`] starts idle with an empty board. The first [`Action::Reveal`] plants the mines around the
//! revealed cell, so the first move is always safe. Every other interaction goes through [`GameState::dispatch`],
//! which never mutates its input and hands back either a new snapshot or the unchanged one.

#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use minefield::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod minefield;
mod rng;
mod tile;
mod types;

/// Validated board shape and mine count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let invalid = GameError::InvalidDimension { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid);
        }
        let capacity = mult(width, height).ok_or(invalid)?;
        if mines > capacity {
            return Err(GameError::TooManyMines {
                requested: mines,
                capacity,
            });
        }
        Ok(Self::new_unchecked(width, height, mines))
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(30, 16, 99)
    }

    pub const fn width(&self) -> Coord {
        self.width
    }

    pub const fn height(&self) -> Coord {
        self.height
    }

    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        // validated on construction
        self.width as CellCount * self.height as CellCount
    }
}

/// Wire form of [`GameConfig`], checked by [`GameConfig::new`] before use.
#[derive(Deserialize)]
struct RawGameConfig {
    width: Coord,
    height: Coord,
    mines: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.width, raw.height, raw.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}
