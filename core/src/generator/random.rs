use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Purely random placement that keeps the first clicked cell and its neighbors free of mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator<R> {
    rng: R,
    safe_anchor: Coord2,
}

impl<R: Rng> RandomBoardGenerator<R> {
    pub fn new(rng: R, safe_anchor: Coord2) -> Self {
        Self { rng, safe_anchor }
    }
}

impl RandomBoardGenerator<SmallRng> {
    pub fn from_seed(seed: u64, safe_anchor: Coord2) -> Self {
        Self::new(SmallRng::seed_from_u64(seed), safe_anchor)
    }
}

impl<R: Rng> BoardGenerator for RandomBoardGenerator<R> {
    fn generate(mut self, config: GameConfig) -> Result<Grid> {
        let config = config.validate()?;
        let size = config.size();
        let (rows, cols) = size;
        if self.safe_anchor.0 >= rows || self.safe_anchor.1 >= cols {
            return Err(GameError::InvalidCoords);
        }

        let to_index = |(row, col): Coord2| usize::from(row) * usize::from(cols) + usize::from(col);
        let mut cells = vec![false; usize::from(config.total_cells())];

        // reserve the safe block so the draw below skips it
        let mut safe_cells = 0;
        for coords in iter_block(self.safe_anchor, size) {
            cells[to_index(coords)] = true;
            safe_cells += 1;
        }

        let mut free_cells = config.total_cells() - safe_cells;
        if config.mines > free_cells {
            log::debug!(
                "Cannot fit {} mines, only {} cells are outside the safe block",
                config.mines,
                free_cells
            );
            return Err(GameError::TooManyMines);
        }

        for _ in 0..config.mines {
            let mut place = self.rng.random_range(0..free_cells);
            for cell in cells.iter_mut().filter(|cell| !**cell) {
                if place == 0 {
                    *cell = true;
                    break;
                }
                place -= 1;
            }
            free_cells -= 1;
        }

        // undo the reservation
        for coords in iter_block(self.safe_anchor, size) {
            cells[to_index(coords)] = false;
        }

        log::debug!(
            "Generated {}x{} board with {} mines, safe anchor {:?}",
            rows,
            cols,
            config.mines,
            self.safe_anchor
        );
        generate_from_bitmap(rows, cols, &cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_in_block(coords: Coord2, center: Coord2) -> bool {
        coords.0.abs_diff(center.0) <= 1 && coords.1.abs_diff(center.1) <= 1
    }

    #[test]
    fn safe_block_never_holds_mines() {
        let config = GameConfig::new(9, 9, 10).unwrap();

        for seed in 0..200 {
            let grid = RandomBoardGenerator::from_seed(seed, (4, 4))
                .generate(config)
                .unwrap();

            for (coords, cell) in grid.iter_cells() {
                if is_in_block(coords, (4, 4)) {
                    assert!(!cell.is_mine(), "seed {seed} placed a mine at {coords:?}");
                }
            }
            assert_eq!(grid.mine_count(), 10);
        }
    }

    #[test]
    fn corner_anchor_clamps_safe_block() {
        let config = GameConfig::new(9, 9, 72).unwrap();

        for seed in 0..20 {
            let grid = RandomBoardGenerator::from_seed(seed, (0, 0))
                .generate(config)
                .unwrap();

            assert_eq!(grid.mine_count(), 72);
            for coords in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                assert!(!grid[coords].is_mine(), "seed {seed} mined {coords:?}");
            }
            assert_eq!(grid[(0, 0)].neighbor_mine_count(), 0);
        }
    }

    #[test]
    fn fills_every_cell_outside_safe_block() {
        let config = GameConfig::new(9, 9, 72).unwrap();
        let grid = RandomBoardGenerator::from_seed(7, (4, 4))
            .generate(config)
            .unwrap();

        for (coords, cell) in grid.iter_cells() {
            assert_eq!(cell.is_mine(), !is_in_block(coords, (4, 4)));
        }
    }

    #[test]
    fn rejects_config_outside_settings_bounds() {
        for config in [
            GameConfig::new_unchecked(9, 9, 0),
            GameConfig::new_unchecked(3, 3, 0),
            GameConfig::new_unchecked(8, 9, 10),
            GameConfig::new_unchecked(40, 40, 500),
            GameConfig::new_unchecked(9, 9, 73),
        ] {
            let err = RandomBoardGenerator::from_seed(0, (4, 4))
                .generate(config)
                .unwrap_err();
            assert!(err.is_configuration_error(), "{config:?}: {err:?}");
        }
    }

    #[test]
    fn rejects_anchor_outside_board() {
        let config = GameConfig::beginner();

        assert_eq!(
            RandomBoardGenerator::from_seed(0, (9, 0)).generate(config),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn same_seed_same_board() {
        let config = GameConfig::expert();
        let first = RandomBoardGenerator::from_seed(42, (3, 17)).generate(config);
        let second = RandomBoardGenerator::from_seed(42, (3, 17)).generate(config);

        assert_eq!(first, second);
    }

    #[test]
    fn accepts_borrowed_rng() {
        let mut rng = SmallRng::seed_from_u64(3);
        let first = generate(GameConfig::beginner(), (4, 4), &mut rng).unwrap();
        let second = generate(GameConfig::beginner(), (4, 4), &mut rng).unwrap();

        assert_eq!(first.mine_count(), 10);
        assert_eq!(second.mine_count(), 10);
    }
}
