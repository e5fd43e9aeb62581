use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// Places mines on a minefield whose opening has already been revealed.
pub trait MinePlanter {
    /// Plants among the unrevealed cells and returns how many mines were placed.
    fn plant(self, minefield: &mut Minefield) -> CellCount;
}

/// How much of the board the first reveal is guaranteed to open safely.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opening {
    /// Only the revealed cell is kept free of mines.
    SafeCell,
    /// The revealed cell and all of its neighbors are kept free of mines.
    #[default]
    ClearArea,
}

impl Opening {
    /// Picks the opening that can actually be honored around `origin`.
    ///
    /// A cleared area that would leave too few hidden cells for the requested mines falls back to a single safe cell.
    pub fn resolve(self, minefield: &Minefield, origin: Vec2) -> Opening {
        match self {
            Opening::SafeCell => Opening::SafeCell,
            Opening::ClearArea => {
                let hidden = minefield.tiles().filter(|cell| !cell.is_revealed()).count();
                let area = minefield
                    .adjacent_cells(origin)
                    .filter(|cell| !cell.is_revealed())
                    .count();
                let mines = minefield.mine_count() as usize;
                if mines + area > hidden {
                    log::warn!(
                        "Cannot clear the area around {}, fallback to safe cell ({} mines, {} hidden cells)",
                        origin,
                        mines,
                        hidden
                    );
                    Opening::SafeCell
                } else {
                    Opening::ClearArea
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_area_kept_when_room() {
        let mut minefield = Minefield::new(4, 4, 7).unwrap();
        let origin = Vec2::new(0, 0);
        minefield.reveal(origin).unwrap();

        // 15 hidden, 3 neighbors
        assert_eq!(Opening::ClearArea.resolve(&minefield, origin), Opening::ClearArea);
    }

    #[test]
    fn clear_area_falls_back_when_crowded() {
        let mut minefield = Minefield::new(3, 3, 1).unwrap();
        let origin = Vec2::new(1, 1);
        minefield.reveal(origin).unwrap();

        assert_eq!(Opening::ClearArea.resolve(&minefield, origin), Opening::SafeCell);
        assert_eq!(Opening::SafeCell.resolve(&minefield, origin), Opening::SafeCell);
    }
}
