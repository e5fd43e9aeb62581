use rand::seq::SliceRandom;

use super::*;
use crate::rng;

/// Purely random planting: every unrevealed cell is equally likely to get a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinePlanter {
    seed: u64,
}

impl RandomMinePlanter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlanter for RandomMinePlanter {
    fn plant(self, minefield: &mut Minefield) -> CellCount {
        let requested = minefield.mine_count();
        let mut candidates = minefield.hidden_positions();

        if requested as usize > candidates.len() {
            log::warn!(
                "Minefield too small, requested {} mines but only {} cells are hidden",
                requested,
                candidates.len()
            );
        }

        let mut source = rng::seeded_rng(self.seed);
        candidates.shuffle(&mut source);

        let mut planted = 0;
        for &coords in candidates.iter().take(requested as usize) {
            if minefield.plant_mine(coords) {
                planted += 1;
            }
        }
        log::debug!("Planted {} mines with seed {}", planted, self.seed);
        planted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn plants_requested_count_on_hidden_cells() {
        let mut minefield = Minefield::new(9, 9, 10).unwrap();
        let origin = Vec2::new(4, 4);
        minefield.reveal(origin).unwrap();

        let planted = RandomMinePlanter::new(3).plant(&mut minefield);

        assert_eq!(planted, 10);
        assert_eq!(minefield.planted_mines(), 10);
        assert!(!minefield.cell(origin).unwrap().is_mine());
    }

    #[test]
    fn adjacent_counts_match_mines() {
        for seed in 0..20 {
            let mut minefield = Minefield::new(8, 6, 12).unwrap();
            minefield.reveal(Vec2::new(0, 0)).unwrap();
            RandomMinePlanter::new(seed).plant(&mut minefield);

            for cell in minefield.tiles() {
                assert_eq!(
                    cell.adjacent_mines(),
                    minefield.count_adjacent_mines(cell.position())
                );
            }
        }
    }

    #[test]
    fn shortfall_plants_every_candidate() {
        let mut minefield = Minefield::new(2, 2, 4).unwrap();
        minefield.reveal(Vec2::new(0, 0)).unwrap();

        assert_eq!(RandomMinePlanter::new(0).plant(&mut minefield), 3);
        assert!(!minefield.cell(Vec2::new(0, 0)).unwrap().is_mine());
    }

    #[test]
    fn same_seed_same_layout() {
        let plant = |seed| {
            let mut minefield = Minefield::new(10, 10, 20).unwrap();
            minefield.reveal(Vec2::new(5, 5)).unwrap();
            RandomMinePlanter::new(seed).plant(&mut minefield);
            minefield
                .tiles()
                .map(Cell::is_mine)
                .collect::<alloc::vec::Vec<_>>()
        };
        assert_eq!(plant(99), plant(99));
    }

    #[test]
    fn placement_is_uniform_over_candidates() {
        const TRIALS: u64 = 4000;
        let origin = Vec2::new(1, 1);
        let mut hits = vec![0u32; 9];

        for seed in 0..TRIALS {
            let mut minefield = Minefield::new(3, 3, 2).unwrap();
            minefield.reveal(origin).unwrap();
            RandomMinePlanter::new(seed).plant(&mut minefield);

            for (index, cell) in minefield.tiles().enumerate() {
                if cell.is_mine() {
                    hits[index] += 1;
                }
            }
        }

        // 8 candidates, 2 mines: expected 1000 hits each, sd ~27
        assert_eq!(hits[4], 0);
        for (index, &count) in hits.iter().enumerate().filter(|&(index, _)| index != 4) {
            assert!((850..=1150).contains(&count), "cell {index} hit {count} times");
        }
    }
}
