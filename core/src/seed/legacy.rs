use super::*;

#[derive(Debug, Serialize, Deserialize)]
struct LegacySeed {
    rows: Coord,
    cols: Coord,
    mines: CellCount,
    first_click: Coord2,
    board: Vec<Vec<bool>>,
}

pub(super) fn write(snapshot: &GameSnapshot) -> Result<Vec<u8>, SeedError> {
    let seed = LegacySeed {
        rows: snapshot.rows(),
        cols: snapshot.cols(),
        mines: snapshot.mine_count(),
        first_click: snapshot.first_click(),
        board: snapshot
            .mine_mask()
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect(),
    };
    Ok(serde_json::to_vec(&seed)?)
}

pub(super) fn read(payload: &[u8]) -> Result<GameSnapshot, SeedError> {
    let seed: LegacySeed = serde_json::from_slice(payload)?;

    let shape_matches = seed.board.len() == usize::from(seed.rows)
        && seed.board.iter().all(|row| row.len() == usize::from(seed.cols));
    if !shape_matches {
        return Err(SeedError::ShapeMismatch {
            rows: seed.rows,
            cols: seed.cols,
        });
    }

    let cells = seed.board.into_iter().flatten().collect();
    GameSnapshot::new(seed.rows, seed.cols, seed.mines, seed.first_click, cells)
}
