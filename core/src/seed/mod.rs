//! Portable seed tokens describing a complete mine layout.
//!
//! A token is a zlib-compressed payload encoded with the URL-safe base64 alphabet. Two payload
//! formats exist: the compact [`SeedFormat::V2`] bitmap, which starts with the bytes `v2`, and the
//! older [`SeedFormat::V1Legacy`] JSON object. Decoding detects the format from the payload.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::*;

mod compact;
mod legacy;

/// Upper bound on a decompressed payload, well above a legacy 255×255 board.
const MAX_PAYLOAD: usize = 1 << 20;

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeedFormat {
    /// `b"v2"`, a 6 byte header and a row-major mine bitmap.
    V2,
    /// JSON object with `rows`, `cols`, `mines`, `first_click` and a boolean `board` matrix.
    V1Legacy,
}

impl SeedFormat {
    /// Format written by [`encode`]. The compact format is only emitted with the `compact-seed` feature.
    pub const fn preferred() -> Self {
        if cfg!(feature = "compact-seed") {
            Self::V2
        } else {
            Self::V1Legacy
        }
    }

    /// Any payload without the `v2` prefix is treated as legacy JSON.
    pub fn detect(payload: &[u8]) -> Self {
        if payload.starts_with(compact::MAGIC) {
            Self::V2
        } else {
            Self::V1Legacy
        }
    }
}

/// Mine layout of a fixed board together with the click that fixed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
    first_click: Coord2,
}

impl GameSnapshot {
    pub fn from_grid(grid: &Grid, first_click: Coord2) -> Result<Self, SeedError> {
        let (rows, cols) = grid.size();
        let bitmap = grid.mine_mask().iter().copied().collect();
        Self::new(rows, cols, grid.mine_count(), first_click, bitmap)
    }

    /// Checks that the parts of a snapshot agree with each other.
    pub(crate) fn new(
        rows: Coord,
        cols: Coord,
        mine_count: CellCount,
        first_click: Coord2,
        bitmap: Vec<bool>,
    ) -> Result<Self, SeedError> {
        if rows == 0 || cols == 0 {
            return Err(SeedError::EmptyBoard);
        }
        if first_click.0 >= rows || first_click.1 >= cols {
            return Err(SeedError::FirstClickOutOfBounds(first_click));
        }

        let actual = bitmap.iter().filter(|&&mine| mine).count();
        let mine_mask = Array2::from_shape_vec((rows.into(), cols.into()), bitmap)
            .map_err(|_| SeedError::ShapeMismatch { rows, cols })?;
        if actual != usize::from(mine_count) {
            return Err(SeedError::MineCountMismatch {
                declared: mine_count,
                actual: actual.try_into().unwrap_or(CellCount::MAX),
            });
        }

        Ok(Self {
            mine_mask,
            mine_count,
            first_click,
        })
    }

    pub fn rows(&self) -> Coord {
        shape_of(&self.mine_mask).0
    }

    pub fn cols(&self) -> Coord {
        shape_of(&self.mine_mask).1
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn first_click(&self) -> Coord2 {
        self.first_click
    }

    pub fn mine_mask(&self) -> &Array2<bool> {
        &self.mine_mask
    }

    /// Configuration carried by the token. Not checked against the settings bounds.
    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.rows(), self.cols(), self.mine_count)
    }

    /// Builds a fresh board with this layout.
    pub fn to_grid(&self) -> Grid {
        Grid::from_mine_mask(&self.mine_mask)
    }

    fn bitmap(&self) -> impl Iterator<Item = bool> + '_ {
        self.mine_mask.iter().copied()
    }
}

/// Encodes the layout of `grid` in the preferred format.
///
/// When the compact format cannot be produced the legacy format is written instead; both decode the
/// same way. Fails only when `first_click` lies outside the board or neither format can be written.
pub fn encode(grid: &Grid, first_click: Coord2) -> Result<String, SeedError> {
    let snapshot = GameSnapshot::from_grid(grid, first_click)?;

    match encode_snapshot(&snapshot, SeedFormat::preferred()) {
        Ok(token) => Ok(token),
        Err(err) if SeedFormat::preferred() == SeedFormat::V2 => {
            log::warn!("Compact seed encoding failed, falling back to legacy format: {}", err);
            encode_snapshot(&snapshot, SeedFormat::V1Legacy)
        }
        Err(err) => Err(err),
    }
}

/// Encodes the layout of `grid` in the given format.
pub fn encode_as(grid: &Grid, first_click: Coord2, format: SeedFormat) -> Result<String, SeedError> {
    encode_snapshot(&GameSnapshot::from_grid(grid, first_click)?, format)
}

pub fn encode_snapshot(snapshot: &GameSnapshot, format: SeedFormat) -> Result<String, SeedError> {
    let payload = match format {
        SeedFormat::V2 => compact::write(snapshot),
        SeedFormat::V1Legacy => legacy::write(snapshot)?,
    };
    let token = TOKEN_ENGINE.encode(deflate(&payload)?);
    log::debug!(
        "Encoded {}x{} layout as {:?}, {} payload bytes, {} token chars",
        snapshot.rows(),
        snapshot.cols(),
        format,
        payload.len(),
        token.len()
    );
    Ok(token)
}

/// Decodes a token of either format. Any problem yields `None`; see [`try_decode`] for the reason.
pub fn decode(token: &str) -> Option<GameSnapshot> {
    try_decode(token)
        .inspect_err(|err| log::debug!("Rejected seed token: {}", err))
        .ok()
}

pub fn try_decode(token: &str) -> Result<GameSnapshot, SeedError> {
    let compressed = TOKEN_ENGINE.decode(token.trim())?;
    let payload = inflate(&compressed)?;

    let format = SeedFormat::detect(&payload);
    log::debug!("Decoding {} byte {:?} payload", payload.len(), format);
    match format {
        SeedFormat::V2 => compact::read(&payload),
        SeedFormat::V1Legacy => legacy::read(&payload),
    }
}

fn deflate(payload: &[u8]) -> Result<Vec<u8>, SeedError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).map_err(SeedError::Encode)?;
    encoder.finish().map_err(SeedError::Encode)
}

fn inflate(compressed: &[u8]) -> Result<Vec<u8>, SeedError> {
    let mut payload = Vec::new();
    ZlibDecoder::new(compressed)
        .take(MAX_PAYLOAD as u64 + 1)
        .read_to_end(&mut payload)
        .map_err(SeedError::Decompress)?;

    if payload.len() > MAX_PAYLOAD {
        return Err(SeedError::PayloadTooLarge(MAX_PAYLOAD));
    }
    Ok(payload)
}
