use seedsweeper_core::{Cell, CellState, Coord, Coord2, GameSnapshot, Grid};

fn render_rows(rows: Coord, cols: Coord, mut glyph: impl FnMut(Coord2) -> char) -> String {
    let mut out = String::with_capacity((rows as usize) * (cols as usize + 1));
    for row in 0..rows {
        for col in 0..cols {
            out.push(glyph((row, col)));
        }
        out.push('\n');
    }
    out
}

fn cell_glyph(cell: Cell, show_mines: bool) -> char {
    match cell.state() {
        CellState::Revealed if cell.is_mine() => '*',
        CellState::Revealed => match cell.neighbor_mine_count() {
            0 => '.',
            n => char::from(b'0' + n),
        },
        _ if cell.is_highlighted() => '!',
        _ if show_mines && cell.is_mine() => 'x',
        CellState::Flagged => 'F',
        CellState::Questioned => '?',
        CellState::Hidden => '#',
    }
}

/// Player view of a board. `show_mines` uncovers every hidden mine.
pub(crate) fn render_grid(grid: &Grid, show_mines: bool) -> String {
    render_rows(grid.rows(), grid.cols(), |coords| {
        cell_glyph(grid[coords], show_mines)
    })
}

/// Board that has not been generated yet.
pub(crate) fn render_pending(rows: Coord, cols: Coord) -> String {
    render_rows(rows, cols, |_| '#')
}

/// Full mine layout of a decoded seed, with the first click marked `o`.
pub(crate) fn render_layout(snapshot: &GameSnapshot) -> String {
    let mask = snapshot.mine_mask();
    let first_click = snapshot.first_click();
    render_rows(snapshot.rows(), snapshot.cols(), |coords| {
        if mask[[coords.0 as usize, coords.1 as usize]] {
            '*'
        } else if coords == first_click {
            'o'
        } else {
            '.'
        }
    })
}

pub(crate) fn describe(snapshot: &GameSnapshot) -> String {
    let (row, col) = snapshot.first_click();
    format!(
        "size: {}x{}\nmines: {}\nfirst click: {row},{col}\n",
        snapshot.rows(),
        snapshot.cols(),
        snapshot.mine_count()
    )
}
