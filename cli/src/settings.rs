use anyhow::Context;
use clap::Args;
use seedsweeper_core::{CellCount, Coord, DEFAULT_CHEATS, GameConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file contents, every key optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
    /// Where `--save` writes the seed token.
    pub seed_file: PathBuf,
    pub cheats: u8,
}

impl Default for Settings {
    fn default() -> Self {
        let GameConfig { rows, cols, mines } = GameConfig::default();
        Self {
            rows,
            cols,
            mines,
            seed_file: PathBuf::from("map_seed.txt"),
            cheats: DEFAULT_CHEATS,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read settings from {}", path.display()))?;
        let settings = toml::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Command-line values win over the file.
    pub fn game_config(&self, overrides: &BoardArgs) -> anyhow::Result<GameConfig> {
        let rows = overrides.rows.unwrap_or(self.rows);
        let cols = overrides.cols.unwrap_or(self.cols);
        let mines = overrides.mines.unwrap_or(self.mines);
        GameConfig::new(rows, cols, mines).context("Invalid board configuration")
    }
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct BoardArgs {
    /// Number of rows (9-30)
    #[arg(long)]
    pub rows: Option<Coord>,

    /// Number of columns (9-30)
    #[arg(long)]
    pub cols: Option<Coord>,

    /// Number of mines (1 up to rows * cols - 9, at most 199)
    #[arg(long)]
    pub mines: Option<CellCount>,
}
