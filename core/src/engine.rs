use core::ops::BitOr;
use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::*;

/// Reveals the cell at `coords`, flood-filling through zero-count regions.
///
/// Revealed, flagged and question-marked cells are left alone.
pub fn reveal(grid: &mut Grid, coords: Coord2) -> Result<RevealOutcome> {
    let coords = grid.validate_coords(coords)?;
    Ok(reveal_cell(grid, coords, false))
}

/// Reveals every hidden neighbor of a revealed cell whose count matches its flagged neighbors.
///
/// Flags are trusted, not checked against the layout. Revealing continues after a mine is hit so the
/// final board shows every opened neighbor; the merged outcome is then [`RevealOutcome::Detonated`].
pub fn chord(grid: &mut Grid, coords: Coord2) -> Result<RevealOutcome> {
    let coords = grid.validate_coords(coords)?;
    if !can_chord(grid, coords) {
        return Ok(RevealOutcome::NoOp);
    }

    let neighbors: SmallVec<[Coord2; 8]> = grid.iter_neighbors(coords).collect();
    Ok(neighbors
        .into_iter()
        .map(|pos| reveal_cell(grid, pos, true))
        .fold(RevealOutcome::NoOp, BitOr::bitor))
}

pub fn can_chord(grid: &Grid, coords: Coord2) -> bool {
    match grid.cell(coords) {
        Some(cell) if cell.is_revealed() && !cell.is_mine() => {
            cell.neighbor_mine_count() == count_flagged_neighbors(grid, coords)
        }
        _ => false,
    }
}

/// Cycles the mark of an unrevealed cell: none, flag, question, none.
pub fn toggle_mark(grid: &mut Grid, coords: Coord2) -> Result<MarkOutcome> {
    use CellState::*;

    let coords = grid.validate_coords(coords)?;
    let cell = grid.cell_mut(coords);
    cell.state = match cell.state {
        Hidden => Flagged,
        Flagged => Questioned,
        Questioned => Hidden,
        Revealed => return Ok(MarkOutcome::NoChange),
    };
    Ok(MarkOutcome::Changed)
}

/// Highlights the unflagged mines around a revealed cell.
///
/// Returns `None` when the target is not revealed, otherwise how many mines were highlighted.
pub fn highlight_adjacent_mines(grid: &mut Grid, coords: Coord2) -> Result<Option<u8>> {
    let coords = grid.validate_coords(coords)?;
    if !grid[coords].is_revealed() {
        return Ok(None);
    }

    let neighbors: SmallVec<[Coord2; 8]> = grid.iter_neighbors(coords).collect();
    let mut highlighted = 0;
    for pos in neighbors {
        let cell = grid.cell_mut(pos);
        if cell.mine && !cell.is_flagged() {
            cell.highlighted = true;
            highlighted += 1;
        }
    }
    Ok(Some(highlighted))
}

/// True exactly when every safe cell is revealed.
pub fn is_won(grid: &Grid) -> bool {
    grid.iter_cells()
        .all(|(_, cell)| cell.is_mine() || cell.is_revealed())
}

fn count_flagged_neighbors(grid: &Grid, coords: Coord2) -> u8 {
    let count = grid
        .iter_neighbors(coords)
        .filter(|&pos| grid[pos].is_flagged())
        .count();
    count as u8
}

fn reveal_cell(grid: &mut Grid, coords: Coord2, reveal_questioned: bool) -> RevealOutcome {
    use CellState::*;

    let cell = grid[coords];
    match cell.state {
        Revealed | Flagged => return RevealOutcome::NoOp,
        Questioned if !reveal_questioned => return RevealOutcome::NoOp,
        Hidden | Questioned => {}
    }

    if cell.mine {
        grid.cell_mut(coords).state = Revealed;
        log::debug!("Revealed mine at {:?}", coords);
        return RevealOutcome::Detonated;
    }

    let mut revealed = BTreeSet::new();
    let mut pending = vec![coords];

    while let Some(visit_coords) = pending.pop() {
        let cell = grid.cell_mut(visit_coords);
        if cell.mine || matches!(cell.state, Revealed | Flagged) {
            continue;
        }

        cell.state = Revealed;
        let adjacent_mines = cell.adjacent_mines;
        revealed.insert(visit_coords);
        log::trace!(
            "Opened cell at {:?}, mine count: {}",
            visit_coords,
            adjacent_mines
        );

        if adjacent_mines == 0 {
            pending.extend(grid.iter_neighbors(visit_coords).filter(|&pos| {
                !matches!(grid[pos].state, Revealed | Flagged)
            }));
        }
    }

    RevealOutcome::Cascaded(revealed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: Coord2, mines: &[Coord2]) -> Grid {
        Grid::from_mine_coords(size, mines).unwrap()
    }

    fn revealed_cells(grid: &Grid) -> BTreeSet<Coord2> {
        grid.iter_cells()
            .filter(|(_, cell)| cell.is_revealed())
            .map(|(coords, _)| coords)
            .collect()
    }

    #[test]
    fn reveal_hits_mine() {
        let mut grid = grid((2, 2), &[(0, 0)]);

        assert_eq!(reveal(&mut grid, (0, 0)), Ok(RevealOutcome::Detonated));
        assert!(grid[(0, 0)].is_revealed());
    }

    #[test]
    fn reveal_numbered_cell_opens_only_itself() {
        let mut grid = grid((3, 3), &[(0, 0)]);

        assert_eq!(
            reveal(&mut grid, (1, 1)),
            Ok(RevealOutcome::Cascaded(BTreeSet::from([(1, 1)])))
        );
        assert_eq!(grid.revealed_count(), 1);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // a wall of mines down the middle column
        let wall: Vec<Coord2> = (0..5).map(|row| (row, 2)).collect();
        let mut grid = grid((5, 5), &wall);

        let outcome = reveal(&mut grid, (2, 0)).unwrap();

        let expected: BTreeSet<Coord2> = (0..5).flat_map(|row| [(row, 0), (row, 1)]).collect();
        assert_eq!(outcome, RevealOutcome::Cascaded(expected.clone()));
        assert_eq!(revealed_cells(&grid), expected);
        assert!(!is_won(&grid));
    }

    #[test]
    fn flood_fill_opens_whole_zero_region() {
        let mut grid = grid((5, 5), &[(0, 4), (4, 0)]);

        reveal(&mut grid, (2, 2)).unwrap();

        assert_eq!(grid.revealed_count(), 23);
        assert!(is_won(&grid));
    }

    #[test]
    fn flood_fill_skips_flags_and_opens_question_marks() {
        let mut grid = grid((3, 4), &[(0, 3)]);
        toggle_mark(&mut grid, (2, 0)).unwrap();
        toggle_mark(&mut grid, (2, 1)).unwrap();
        toggle_mark(&mut grid, (2, 1)).unwrap();
        assert!(grid[(2, 1)].is_questioned());

        reveal(&mut grid, (0, 0)).unwrap();

        assert!(grid[(2, 0)].is_flagged());
        assert!(grid[(2, 1)].is_revealed());
        assert!(!is_won(&grid));
    }

    #[test]
    fn reveal_ignores_marked_target() {
        let mut grid = grid((3, 3), &[(2, 2)]);
        toggle_mark(&mut grid, (0, 0)).unwrap();

        assert_eq!(reveal(&mut grid, (0, 0)), Ok(RevealOutcome::NoOp));

        toggle_mark(&mut grid, (0, 0)).unwrap();
        assert_eq!(reveal(&mut grid, (0, 0)), Ok(RevealOutcome::NoOp));
        assert_eq!(grid.revealed_count(), 0);
    }

    #[test]
    fn reveal_rejects_out_of_range_before_mutation() {
        let mut grid = grid((3, 3), &[(2, 2)]);

        assert_eq!(reveal(&mut grid, (3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(chord(&mut grid, (0, 3)), Err(GameError::InvalidCoords));
        assert_eq!(toggle_mark(&mut grid, (9, 9)), Err(GameError::InvalidCoords));
        assert_eq!(grid.revealed_count(), 0);
    }

    #[test]
    fn mark_cycles_through_flag_and_question() {
        let mut grid = grid((2, 2), &[(0, 0)]);

        assert_eq!(toggle_mark(&mut grid, (0, 0)), Ok(MarkOutcome::Changed));
        assert_eq!(grid[(0, 0)].state(), CellState::Flagged);
        assert_eq!(toggle_mark(&mut grid, (0, 0)), Ok(MarkOutcome::Changed));
        assert_eq!(grid[(0, 0)].state(), CellState::Questioned);
        assert_eq!(toggle_mark(&mut grid, (0, 0)), Ok(MarkOutcome::Changed));
        assert_eq!(grid[(0, 0)].state(), CellState::Hidden);
    }

    #[test]
    fn mark_on_revealed_cell_is_no_change() {
        let mut grid = grid((2, 2), &[(0, 0)]);
        reveal(&mut grid, (1, 1)).unwrap();

        assert_eq!(toggle_mark(&mut grid, (1, 1)), Ok(MarkOutcome::NoChange));
        assert!(grid[(1, 1)].is_revealed());
    }

    #[test]
    fn chord_reveals_when_flags_match() {
        let mut grid = grid((3, 3), &[(0, 1), (2, 1)]);
        reveal(&mut grid, (1, 1)).unwrap();
        toggle_mark(&mut grid, (0, 1)).unwrap();
        toggle_mark(&mut grid, (2, 1)).unwrap();

        let outcome = chord(&mut grid, (1, 1)).unwrap();

        assert_eq!(
            outcome,
            RevealOutcome::Cascaded(BTreeSet::from([
                (0, 0),
                (0, 2),
                (1, 0),
                (1, 2),
                (2, 0),
                (2, 2)
            ]))
        );
        assert!(is_won(&grid));
    }

    #[test]
    fn chord_refuses_when_flags_do_not_match() {
        let mut grid = grid((3, 3), &[(0, 1), (2, 1)]);
        reveal(&mut grid, (1, 1)).unwrap();

        // too few
        toggle_mark(&mut grid, (0, 1)).unwrap();
        assert_eq!(chord(&mut grid, (1, 1)), Ok(RevealOutcome::NoOp));

        // too many
        toggle_mark(&mut grid, (2, 1)).unwrap();
        toggle_mark(&mut grid, (0, 0)).unwrap();
        assert_eq!(chord(&mut grid, (1, 1)), Ok(RevealOutcome::NoOp));
        assert_eq!(grid.revealed_count(), 1);
    }

    #[test]
    fn chord_on_hidden_cell_is_no_op() {
        let mut grid = grid((3, 3), &[(0, 0)]);

        assert_eq!(chord(&mut grid, (1, 1)), Ok(RevealOutcome::NoOp));
        assert!(!can_chord(&grid, (1, 1)));
    }

    #[test]
    fn chord_trusts_wrong_flag_and_keeps_revealing_after_detonation() {
        let mut grid = grid((3, 3), &[(0, 0)]);
        reveal(&mut grid, (1, 1)).unwrap();
        // not the real mine
        toggle_mark(&mut grid, (0, 2)).unwrap();

        let outcome = chord(&mut grid, (1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Detonated);
        assert!(grid[(0, 0)].is_revealed());
        assert!(grid[(0, 2)].is_flagged());
        for coords in [(0, 1), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert!(grid[coords].is_revealed(), "{coords:?} stayed hidden");
        }
    }

    #[test]
    fn chord_opens_question_marked_neighbors() {
        let mut grid = grid((3, 3), &[(0, 0)]);
        reveal(&mut grid, (1, 1)).unwrap();
        toggle_mark(&mut grid, (0, 0)).unwrap();
        toggle_mark(&mut grid, (2, 2)).unwrap();
        toggle_mark(&mut grid, (2, 2)).unwrap();

        assert!(chord(&mut grid, (1, 1)).unwrap().has_update());
        assert!(grid[(2, 2)].is_revealed());
        assert!(is_won(&grid));
    }

    #[test]
    fn highlight_marks_unflagged_adjacent_mines() {
        let mut grid = grid((3, 3), &[(0, 0), (0, 2), (2, 2)]);
        reveal(&mut grid, (1, 1)).unwrap();
        toggle_mark(&mut grid, (0, 2)).unwrap();

        assert_eq!(highlight_adjacent_mines(&mut grid, (1, 1)), Ok(Some(2)));
        assert!(grid[(0, 0)].is_highlighted());
        assert!(!grid[(0, 2)].is_highlighted());
        assert!(grid[(2, 2)].is_highlighted());
        assert!(!grid[(1, 0)].is_highlighted());
    }

    #[test]
    fn highlight_requires_revealed_target() {
        let mut grid = grid((3, 3), &[(0, 0)]);

        assert_eq!(highlight_adjacent_mines(&mut grid, (1, 1)), Ok(None));
        assert!(!grid[(0, 0)].is_highlighted());
    }

    #[test]
    fn victory_on_empty_and_mine_free_boards() {
        assert!(is_won(&grid((0, 0), &[])));

        let mut mine_free = grid((3, 3), &[]);
        assert!(!is_won(&mine_free));
        reveal(&mut mine_free, (0, 0)).unwrap();
        assert!(is_won(&mine_free));
    }

    #[test]
    fn victory_ignores_flags_on_mines() {
        let mut grid = grid((2, 1), &[(0, 0)]);
        toggle_mark(&mut grid, (0, 0)).unwrap();
        assert!(!is_won(&grid));

        reveal(&mut grid, (1, 0)).unwrap();
        assert!(is_won(&grid));
    }
}
