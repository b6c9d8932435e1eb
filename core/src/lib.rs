use core::ops::BitOr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use seed::*;
pub use session::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod grid;
mod seed;
mod session;
mod types;

/// Smallest accepted row or column count.
pub const MIN_SIDE: Coord = 9;
/// Largest accepted row or column count.
pub const MAX_SIDE: Coord = 30;
/// Hard cap on the mine count regardless of board size.
pub const MAX_MINES: CellCount = 199;
/// Cells kept free around the first click, center included.
pub const SAFE_BLOCK: CellCount = 9;

/// Board dimensions and mine count for one session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Validates the settings bounds: both sides in `9..=30` and
    /// `1..=min(rows * cols - 9, 199)` mines.
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&rows) {
            return Err(GameError::InvalidRows(rows));
        }
        if !(MIN_SIDE..=MAX_SIDE).contains(&cols) {
            return Err(GameError::InvalidCols(cols));
        }

        let max = Self::max_mines(rows, cols);
        if !(1..=max).contains(&mines) {
            return Err(GameError::InvalidMineCount { mines, max });
        }

        Ok(Self::new_unchecked(rows, cols, mines))
    }

    /// Checks an already built configuration against the same bounds as [`GameConfig::new`].
    pub fn validate(self) -> Result<Self> {
        Self::new(self.rows, self.cols, self.mines)
    }

    /// Largest mine count accepted by [`GameConfig::new`] for the given size.
    pub fn max_mines(rows: Coord, cols: Coord) -> CellCount {
        cell_count(rows, cols).saturating_sub(SAFE_BLOCK).min(MAX_MINES)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(16, 30, 99)
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_count(self.rows, self.cols)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::expert()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Result of a reveal or chord.
#[derive(Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    /// Nothing could be revealed.
    NoOp,
    /// A mine was revealed; the caller treats this as a loss.
    Detonated,
    /// The listed safe cells were revealed.
    Cascaded(BTreeSet<Coord2>),
}

impl RevealOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoOp)
    }

    pub const fn is_detonated(&self) -> bool {
        matches!(self, Self::Detonated)
    }

    /// Cells revealed by a successful cascade, `None` otherwise.
    pub fn revealed(&self) -> Option<&BTreeSet<Coord2>> {
        match self {
            Self::Cascaded(revealed) => Some(revealed),
            _ => None,
        }
    }
}

/// Used to merge outcomes when revealing several cells at once.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (Detonated, _) | (_, Detonated) => Detonated,
            (Cascaded(mut lhs), Cascaded(rhs)) => {
                lhs.extend(rhs);
                Cascaded(lhs)
            }
            (Cascaded(cells), NoOp) | (NoOp, Cascaded(cells)) => Cascaded(cells),
            (NoOp, NoOp) => NoOp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_accepts_settings_bounds() {
        assert!(GameConfig::new(9, 9, 1).is_ok());
        assert!(GameConfig::new(9, 9, 72).is_ok());
        assert!(GameConfig::new(30, 30, 199).is_ok());
        assert_eq!(GameConfig::new(16, 30, 99), Ok(GameConfig::expert()));
    }

    #[test]
    fn config_rejects_out_of_range_sides() {
        assert_eq!(GameConfig::new(8, 9, 10), Err(GameError::InvalidRows(8)));
        assert_eq!(GameConfig::new(9, 31, 10), Err(GameError::InvalidCols(31)));
    }

    #[test]
    fn config_rejects_out_of_range_mines() {
        assert_eq!(
            GameConfig::new(9, 9, 0),
            Err(GameError::InvalidMineCount { mines: 0, max: 72 })
        );
        assert_eq!(
            GameConfig::new(9, 9, 73),
            Err(GameError::InvalidMineCount { mines: 73, max: 72 })
        );
        assert_eq!(
            GameConfig::new(30, 30, 200),
            Err(GameError::InvalidMineCount { mines: 200, max: 199 })
        );
        assert!(GameConfig::new(9, 9, 73).unwrap_err().is_configuration_error());
    }

    #[test]
    fn presets_are_valid() {
        for preset in [
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
        ] {
            assert_eq!(GameConfig::new(preset.rows, preset.cols, preset.mines), Ok(preset));
        }
    }

    #[test]
    fn detonation_dominates_merge() {
        let cascade = RevealOutcome::Cascaded(BTreeSet::from([(0, 0)]));

        assert_eq!(cascade.clone() | RevealOutcome::Detonated, RevealOutcome::Detonated);
        assert_eq!(RevealOutcome::NoOp | cascade.clone(), cascade);
        assert_eq!(
            cascade | RevealOutcome::Cascaded(BTreeSet::from([(1, 1)])),
            RevealOutcome::Cascaded(BTreeSet::from([(0, 0), (1, 1)]))
        );
    }

    #[test]
    fn outcome_accessors() {
        let cascade = RevealOutcome::Cascaded(BTreeSet::from([(0, 0), (0, 1)]));

        assert_eq!(cascade.revealed().map(BTreeSet::len), Some(2));
        assert!(!cascade.is_detonated());
        assert!(RevealOutcome::Detonated.is_detonated());
        assert_eq!(RevealOutcome::Detonated.revealed(), None);
        assert_eq!(RevealOutcome::NoOp.revealed(), None);
    }
}
