use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Counts the mines in the clamped 8-neighborhood of `coords`.
pub fn count_adjacent_mines(mine_mask: &Array2<bool>, coords: Coord2) -> u8 {
    let count = mine_mask
        .iter_neighbors(coords)
        .filter(|&pos| mine_mask[pos.to_nd_index()])
        .count();
    u8::try_from(count).unwrap_or(u8::MAX)
}

fn to_coords((row, col): (usize, usize)) -> Coord2 {
    (
        Coord::try_from(row).unwrap_or(Coord::MAX),
        Coord::try_from(col).unwrap_or(Coord::MAX),
    )
}

/// The cell matrix of one board, with mine placement fixed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Grid {
    /// Builds a grid from a row-major mine mask and fills in the neighbor counts.
    ///
    /// The mask must have been allocated from `Coord` dimensions, the public entry points are
    /// [`Grid::from_mine_coords`] and [`generate_from_bitmap`].
    pub(crate) fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        let mut mine_count: CellCount = 0;
        let cells = Array2::from_shape_fn(mine_mask.dim(), |index| {
            let mine = mine_mask[index];
            let adjacent_mines = if mine {
                mine_count += 1;
                0
            } else {
                count_adjacent_mines(mine_mask, to_coords(index))
            };
            Cell {
                mine,
                adjacent_mines,
                ..Default::default()
            }
        });
        Self { cells, mine_count }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        shape_of(&self.cells)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        cell_count(rows, cols)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_where(Cell::is_revealed)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_where(Cell::is_flagged)
    }

    /// Row-major mine layout of the board.
    pub fn mine_mask(&self) -> Array2<bool> {
        self.cells.map(|cell| cell.mine)
    }

    /// Cells with their coordinates, in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    fn count_where(&self, predicate: impl Fn(Cell) -> bool) -> CellCount {
        let count = self.cells.iter().filter(|&&cell| predicate(cell)).count();
        // bounded by total_cells
        count as CellCount
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
