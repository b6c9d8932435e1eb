use ndarray::Array2;

/// Single coordinate axis used for row/column counts and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells on a `rows` by `cols` board.
pub const fn cell_count(rows: Coord, cols: Coord) -> CellCount {
    (rows as CellCount).saturating_mul(cols as CellCount)
}

/// Shape of an `Array2` as `(rows, cols)`.
///
/// Every array in this crate is built from `Coord` dimensions, so the conversion cannot overflow.
pub(crate) fn shape_of<T>(array: &Array2<T>) -> Coord2 {
    let (rows, cols) = array.dim();
    (
        Coord::try_from(rows).unwrap_or(Coord::MAX),
        Coord::try_from(cols).unwrap_or(Coord::MAX),
    )
}

pub trait Neighbors {
    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter;
}

impl<T> Neighbors for Array2<T> {
    fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, shape_of(self))
    }
}

/// Row-major walk over the 3×3 window around `center`, clipped to `bounds`.
///
/// Yields nothing when `center` itself is out of bounds.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    include_center: bool,
    first_col: Coord,
    last: Coord2,
    cursor: Option<Coord2>,
}

impl NeighborIter {
    /// The 8-neighborhood of `center`, center excluded.
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self::window(center, bounds, false)
    }

    fn window(center: Coord2, bounds: Coord2, include_center: bool) -> Self {
        let (row, col) = center;
        let (rows, cols) = bounds;
        let first = (row.saturating_sub(1), col.saturating_sub(1));
        let last = (
            row.saturating_add(1).min(rows.saturating_sub(1)),
            col.saturating_add(1).min(cols.saturating_sub(1)),
        );

        Self {
            center,
            include_center,
            first_col: first.1,
            last,
            cursor: (row < rows && col < cols).then_some(first),
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current @ (row, col) = self.cursor?;
            self.cursor = if col < self.last.1 {
                Some((row, col + 1))
            } else if row < self.last.0 {
                Some((row + 1, self.first_col))
            } else {
                None
            };

            if self.include_center || current != self.center {
                return Some(current);
            }
        }
    }
}

/// The 3×3 block centered on `center`, center included.
pub fn iter_block(center: Coord2, bounds: Coord2) -> NeighborIter {
    NeighborIter::window(center, bounds, true)
}
