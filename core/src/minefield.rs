use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::ToNdIndex;
use crate::*;

/// The rectangular cell grid.
///
/// Cells are stored as a `(height, width)` array so that the logical iteration order is row-major, i.e. the cell
/// at `index` sits at `(index % width, index / width)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMinefield")]
pub struct Minefield {
    config: GameConfig,
    cells: Array2<Cell>,
}

#[derive(Deserialize)]
struct RawMinefield {
    config: GameConfig,
    cells: Array2<Cell>,
}

impl TryFrom<RawMinefield> for Minefield {
    type Error = GameError;

    /// Cells have to fill the configured shape, each one sitting at its own position.
    fn try_from(raw: RawMinefield) -> Result<Self> {
        let RawMinefield { config, cells } = raw;
        if cells.dim() != (config.height() as usize, config.width() as usize) {
            return Err(GameError::InvalidDimension {
                width: config.width(),
                height: config.height(),
            });
        }
        let misplaced = cells
            .indexed_iter()
            .find(|&((y, x), cell)| cell.position() != Vec2::new(x as Coord, y as Coord));
        if let Some((_, cell)) = misplaced {
            return Err(GameError::CellNotFound(cell.position()));
        }
        Ok(Self { config, cells })
    }
}

impl Minefield {
    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        Ok(Self::from_config(GameConfig::new(width, height, mines)?))
    }

    pub fn from_config(config: GameConfig) -> Self {
        let shape = (config.height() as usize, config.width() as usize);
        let cells = Array2::from_shape_fn(shape, |(y, x)| {
            Cell::new(Vec2::new(x as Coord, y as Coord))
        });
        Self { config, cells }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn width(&self) -> Coord {
        self.config.width()
    }

    pub fn height(&self) -> Coord {
        self.config.height()
    }

    pub fn size(&self) -> Vec2 {
        self.config.size()
    }

    /// Requested number of mines, see [`Minefield::planted_mines`] for the actual number.
    pub fn mine_count(&self) -> CellCount {
        self.config.mines()
    }

    pub fn total_cells(&self) -> CellCount {
        self.config.total_cells()
    }

    pub fn contains(&self, coords: Vec2) -> bool {
        (0..self.width()).contains(&coords.x) && (0..self.height()).contains(&coords.y)
    }

    pub fn index_to_coord(&self, index: usize) -> Result<Vec2> {
        if index >= self.cells.len() {
            return Err(GameError::OutOfBounds(index));
        }
        let width = self.cells.ncols();
        Ok(Vec2::new((index % width) as Coord, (index / width) as Coord))
    }

    pub fn coord_to_index(&self, coords: Vec2) -> Option<usize> {
        self.contains(coords)
            .then(|| coords.y as usize * self.cells.ncols() + coords.x as usize)
    }

    /// Cell at `coords`, `None` when it falls outside the grid.
    pub fn cell(&self, coords: Vec2) -> Option<&Cell> {
        if self.contains(coords) {
            self.cells.get(coords.to_nd_index())
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, coords: Vec2) -> Option<&mut Cell> {
        if self.contains(coords) {
            self.cells.get_mut(coords.to_nd_index())
        } else {
            None
        }
    }

    pub fn cell_at_index(&self, index: usize) -> Option<&Cell> {
        self.cell(self.index_to_coord(index).ok()?)
    }

    /// All cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// In-bounds neighbor coordinates, empty when `coords` itself is outside the grid.
    pub fn iter_adjacent(&self, coords: Vec2) -> NeighborIter {
        let bounds = if self.contains(coords) {
            self.size()
        } else {
            Vec2::ZERO
        };
        NeighborIter::new(coords, bounds)
    }

    pub fn adjacent_cells(&self, coords: Vec2) -> impl Iterator<Item = &Cell> {
        self.iter_adjacent(coords)
            .filter_map(move |pos| self.cell(pos))
    }

    pub fn count_adjacent_flags(&self, coords: Vec2) -> u8 {
        count_u8(self.adjacent_cells(coords).filter(|cell| cell.is_flagged()))
    }

    /// Mines around `coords` counted from scratch, independent of the stored counts.
    pub fn count_adjacent_mines(&self, coords: Vec2) -> u8 {
        count_u8(self.adjacent_cells(coords).filter(|cell| cell.is_mine()))
    }

    pub fn planted_mines(&self) -> CellCount {
        self.tiles().filter(|cell| cell.is_mine()).count() as CellCount
    }

    pub fn revealed_count(&self) -> CellCount {
        self.tiles().filter(|cell| cell.is_revealed()).count() as CellCount
    }

    pub fn flag_count(&self) -> CellCount {
        self.tiles().filter(|cell| cell.is_flagged()).count() as CellCount
    }

    /// Win condition, flags don't matter.
    pub fn all_safe_revealed(&self) -> bool {
        self.tiles().all(|cell| cell.is_mine() || cell.is_revealed())
    }

    /// Lose condition.
    pub fn has_exposed_mine(&self) -> bool {
        self.tiles().any(|cell| cell.is_mine() && cell.is_revealed())
    }

    pub(crate) fn hidden_positions(&self) -> Vec<Vec2> {
        self.tiles()
            .filter(|cell| !cell.is_revealed())
            .map(Cell::position)
            .collect()
    }

    /// Reveals one cell without any propagation, returns whether it was hidden before.
    pub(crate) fn reveal(&mut self, coords: Vec2) -> Result<bool> {
        self.cell_mut(coords)
            .map(Cell::reveal)
            .ok_or(GameError::CellNotFound(coords))
    }

    /// Places a mine and bumps the counts around it, returns whether the cell was mine-free before.
    pub(crate) fn plant_mine(&mut self, coords: Vec2) -> bool {
        let Some(cell) = self.cell_mut(coords) else {
            return false;
        };
        if !cell.plant_mine() {
            return false;
        }
        for pos in self.iter_adjacent(coords) {
            if let Some(neighbor) = self.cell_mut(pos) {
                neighbor.add_adjacent_mine();
            }
        }
        true
    }
}

fn count_u8<'a>(cells: impl Iterator<Item = &'a Cell>) -> u8 {
    cells.count().min(u8::MAX.into()) as u8
}
