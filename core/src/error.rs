use thiserror::Error;

use crate::{CellCount, Coord, MAX_SIDE, MIN_SIDE};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Row count {0} is outside of {min}..={max}", min = MIN_SIDE, max = MAX_SIDE)]
    InvalidRows(Coord),
    #[error("Column count {0} is outside of {min}..={max}", min = MIN_SIDE, max = MAX_SIDE)]
    InvalidCols(Coord),
    #[error("Mine count {mines} is outside of 1..={max}")]
    InvalidMineCount { mines: CellCount, max: CellCount },
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("No cheats left")]
    NoCheatsLeft,
}

impl GameError {
    /// Whether the error rejects a board configuration, as opposed to a move.
    pub const fn is_configuration_error(self) -> bool {
        matches!(
            self,
            Self::InvalidRows(_) | Self::InvalidCols(_) | Self::InvalidMineCount { .. } | Self::TooManyMines
        )
    }
}

pub type Result<T, E = GameError> = core::result::Result<T, E>;

/// Reasons a seed token is rejected.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Token is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("Token payload could not be decompressed")]
    Decompress(#[source] std::io::Error),
    #[error("Token payload is larger than {0} bytes")]
    PayloadTooLarge(usize),
    #[error("Token payload is truncated, expected {expected} bytes but got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("Token payload has {0} unexpected trailing bytes")]
    TrailingBytes(usize),
    #[error("Legacy token is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("Token describes an empty board")]
    EmptyBoard,
    #[error("Mine layout does not match the declared {rows}x{cols} size")]
    ShapeMismatch { rows: Coord, cols: Coord },
    #[error("Token declares {declared} mines but its layout holds {actual}")]
    MineCountMismatch { declared: CellCount, actual: CellCount },
    #[error("First click {0:?} lies outside of the board")]
    FirstClickOutOfBounds((Coord, Coord)),
    #[error("Token could not be written")]
    Encode(#[source] std::io::Error),
}
