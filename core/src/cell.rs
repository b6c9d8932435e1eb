use serde::{Deserialize, Serialize};

/// Player-visible state of a cell.
///
/// A single state keeps "revealed" and "flagged" mutually exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Questioned,
    Revealed,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) mine: bool,
    pub(crate) adjacent_mines: u8,
    pub(crate) state: CellState,
    pub(crate) highlighted: bool,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.mine
    }

    /// Number of mines in the clamped 8-neighborhood. Only meaningful for safe cells.
    pub const fn neighbor_mine_count(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn state(self) -> CellState {
        self.state
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    pub const fn is_questioned(self) -> bool {
        matches!(self.state, CellState::Questioned)
    }

    /// Set by a cheat on mines next to a revealed cell.
    pub const fn is_highlighted(self) -> bool {
        self.highlighted
    }
}
