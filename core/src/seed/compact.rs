use super::*;

pub(super) const MAGIC: &[u8] = b"v2";

/// `rows, cols, mines_low, mines_high, first_click_row, first_click_col`
const HEADER_LEN: usize = 6;

fn bitmap_len(rows: Coord, cols: Coord) -> usize {
    usize::from(cell_count(rows, cols)).div_ceil(8)
}

pub(super) fn write(snapshot: &GameSnapshot) -> Vec<u8> {
    let (rows, cols) = (snapshot.rows(), snapshot.cols());
    let [mines_low, mines_high] = snapshot.mine_count().to_le_bytes();
    let (first_row, first_col) = snapshot.first_click();

    let mut payload = Vec::with_capacity(MAGIC.len() + HEADER_LEN + bitmap_len(rows, cols));
    payload.extend_from_slice(MAGIC);
    payload.extend_from_slice(&[rows, cols, mines_low, mines_high, first_row, first_col]);

    // most significant bit first, padding bits stay zero
    let mut bitmap = vec![0u8; bitmap_len(rows, cols)];
    for (index, mine) in snapshot.bitmap().enumerate() {
        if mine {
            bitmap[index / 8] |= 0x80 >> (index % 8);
        }
    }
    payload.extend_from_slice(&bitmap);
    payload
}

pub(super) fn read(payload: &[u8]) -> Result<GameSnapshot, SeedError> {
    let body = payload.strip_prefix(MAGIC).unwrap_or(payload);
    let Some((header, bitmap)) = body.split_first_chunk::<HEADER_LEN>() else {
        return Err(SeedError::Truncated {
            expected: MAGIC.len() + HEADER_LEN,
            actual: payload.len(),
        });
    };

    let &[rows, cols, mines_low, mines_high, first_row, first_col] = header;
    let mine_count = CellCount::from_le_bytes([mines_low, mines_high]);

    let expected = bitmap_len(rows, cols);
    if bitmap.len() < expected {
        return Err(SeedError::Truncated {
            expected: MAGIC.len() + HEADER_LEN + expected,
            actual: payload.len(),
        });
    }
    if bitmap.len() > expected {
        return Err(SeedError::TrailingBytes(bitmap.len() - expected));
    }

    let len = usize::from(cell_count(rows, cols));
    let cells = (0..len)
        .map(|index| bitmap[index / 8] & (0x80 >> (index % 8)) != 0)
        .collect();
    GameSnapshot::new(rows, cols, mine_count, (first_row, first_col), cells)
}
