use ndarray::Array2;
use rand::Rng;

use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Grid>;
}

/// Places `config.mines` mines uniformly at random outside the 3×3 block centered on `safe_anchor`.
///
/// `config` is checked against the settings bounds first, boards rebuilt from a bitmap are not.
pub fn generate<R: Rng + ?Sized>(
    config: GameConfig,
    safe_anchor: Coord2,
    rng: &mut R,
) -> Result<Grid> {
    RandomBoardGenerator::new(rng, safe_anchor).generate(config)
}

/// Rebuilds a board from a row-major mine bitmap of `rows * cols` entries.
pub fn generate_from_bitmap(rows: Coord, cols: Coord, mine_bitmap: &[bool]) -> Result<Grid> {
    let mine_mask = Array2::from_shape_vec((rows.into(), cols.into()), mine_bitmap.to_vec())
        .map_err(|_| GameError::InvalidBoardShape)?;
    Ok(Grid::from_mine_mask(&mine_mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_is_row_major() {
        let bitmap = [true, false, false, false, false, true];
        let grid = generate_from_bitmap(2, 3, &bitmap).unwrap();

        assert!(grid[(0, 0)].is_mine());
        assert!(grid[(1, 2)].is_mine());
        assert_eq!(grid.mine_count(), 2);
        assert_eq!(grid[(1, 1)].neighbor_mine_count(), 2);
        assert_eq!(grid.mine_mask().iter().copied().collect::<Vec<_>>(), bitmap);
    }

    #[test]
    fn bitmap_length_must_match_size() {
        assert_eq!(
            generate_from_bitmap(2, 3, &[false; 5]),
            Err(GameError::InvalidBoardShape)
        );
    }
}
