use thiserror::Error;

use crate::{CellCount, Coord, Vec2};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board dimensions {width}x{height}")]
    InvalidDimension { width: Coord, height: Coord },
    #[error("Too many mines, requested {requested} but only {capacity} cells")]
    TooManyMines {
        requested: CellCount,
        capacity: CellCount,
    },
    #[error("Cell index {0} is out of bounds")]
    OutOfBounds(usize),
    #[error("No cell at {0}")]
    CellNotFound(Vec2),
}

pub type Result<T> = core::result::Result<T, GameError>;
