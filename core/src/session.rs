use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::engine;
use crate::*;

/// Default number of cheat highlights per game.
pub const DEFAULT_CHEATS: u8 = 1;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Play action coming from the input layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal(Coord2),
    ToggleMark(Coord2),
    Chord(Coord2),
    Highlight(Coord2),
    Reset,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Revealed(RevealOutcome),
    Marked(MarkOutcome),
    /// Number of mines highlighted, `None` when the target was not revealed.
    Highlighted(Option<u8>),
    Reset,
}

impl ActionOutcome {
    pub fn has_update(&self) -> bool {
        match self {
            Self::Revealed(outcome) => outcome.has_update(),
            Self::Marked(outcome) => outcome.has_update(),
            Self::Highlighted(highlighted) => highlighted.is_some(),
            Self::Reset => true,
        }
    }
}

#[derive(Clone, Debug)]
struct FixedBoard {
    grid: Grid,
    first_click: Coord2,
    token: Option<String>,
}

/// One game from configuration to win or loss.
///
/// Mines are placed on the first reveal, unless the session was started from a seed token.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    /// Configuration restored by `reset`, a seeded board may use another size.
    base_config: GameConfig,
    board: Option<FixedBoard>,
    state: SessionState,
    seeded: bool,
    cheat_budget: u8,
    cheats_left: u8,
    rng: SmallRng,
}

impl Session {
    /// Fails with a configuration error when `config` is outside the settings bounds.
    pub fn new(config: GameConfig, rng_seed: u64) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            base_config: config,
            board: None,
            state: SessionState::default(),
            seeded: false,
            cheat_budget: DEFAULT_CHEATS,
            cheats_left: DEFAULT_CHEATS,
            rng: SmallRng::seed_from_u64(rng_seed),
        })
    }

    /// Starts from the layout in `token`, or from a random board with `fallback` if the token is unusable.
    ///
    /// Only `fallback` is checked against the settings bounds, the token's own size is taken as is.
    pub fn from_token(token: &str, fallback: GameConfig, rng_seed: u64) -> Result<Self> {
        let mut session = Self::new(fallback, rng_seed)?;

        match try_decode(token) {
            Ok(snapshot) => {
                log::debug!(
                    "Starting seeded {}x{} board with {} mines",
                    snapshot.rows(),
                    snapshot.cols(),
                    snapshot.mine_count()
                );
                session.config = snapshot.config();
                session.board = Some(FixedBoard {
                    grid: snapshot.to_grid(),
                    first_click: snapshot.first_click(),
                    token: Some(token.trim().to_owned()),
                });
                session.seeded = true;
            }
            Err(err) => {
                log::warn!("Ignoring seed token, using a random board instead: {}", err);
            }
        }

        Ok(session)
    }

    pub fn with_cheats(mut self, cheats: u8) -> Self {
        self.cheat_budget = cheats;
        self.cheats_left = cheats;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// The board once mines are placed.
    pub fn grid(&self) -> Option<&Grid> {
        self.board.as_ref().map(|board| &board.grid)
    }

    /// Token for the current layout, available once mines are placed.
    pub fn seed_token(&self) -> Option<&str> {
        self.board.as_ref()?.token.as_deref()
    }

    pub fn first_click(&self) -> Option<Coord2> {
        self.board.as_ref().map(|board| board.first_click)
    }

    /// Whether the layout came from a seed token.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn cheats_left(&self) -> u8 {
        self.cheats_left
    }

    /// Mines minus flags, negative when over-flagged.
    pub fn mines_left(&self) -> i32 {
        let flagged = self.grid().map_or(0, Grid::flagged_count);
        i32::from(self.config.mines) - i32::from(flagged)
    }

    pub fn apply(&mut self, action: Action) -> Result<ActionOutcome> {
        use Action::*;

        match action {
            Reveal(coords) => self.reveal(coords).map(ActionOutcome::Revealed),
            ToggleMark(coords) => self.toggle_mark(coords).map(ActionOutcome::Marked),
            Chord(coords) => self.chord(coords).map(ActionOutcome::Revealed),
            Highlight(coords) => self.highlight(coords).map(ActionOutcome::Highlighted),
            Reset => {
                self.reset();
                Ok(ActionOutcome::Reset)
            }
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.check_not_finished()?;
        let grid = self.fixed_grid(coords)?;
        let outcome = engine::reveal(grid, coords)?;
        self.update_state(&outcome);
        Ok(outcome)
    }

    pub fn chord(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.check_not_finished()?;
        let Some(board) = self.board.as_mut() else {
            self.check_coords(coords)?;
            return Ok(RevealOutcome::NoOp);
        };
        let outcome = engine::chord(&mut board.grid, coords)?;
        self.update_state(&outcome);
        Ok(outcome)
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.check_not_finished()?;
        let Some(board) = self.board.as_mut() else {
            self.check_coords(coords)?;
            return Ok(MarkOutcome::NoChange);
        };
        engine::toggle_mark(&mut board.grid, coords)
    }

    /// Highlights the unflagged mines next to a revealed cell, using up one cheat.
    pub fn highlight(&mut self, coords: Coord2) -> Result<Option<u8>> {
        self.check_not_finished()?;
        if self.cheats_left == 0 {
            return Err(GameError::NoCheatsLeft);
        }
        let Some(board) = self.board.as_mut() else {
            self.check_coords(coords)?;
            return Ok(None);
        };

        let highlighted = engine::highlight_adjacent_mines(&mut board.grid, coords)?;
        if highlighted.is_some() {
            self.cheats_left -= 1;
        }
        Ok(highlighted)
    }

    /// Drops the board, seeded or not, and waits for a new first click.
    pub fn reset(&mut self) {
        self.board = None;
        self.config = self.base_config;
        self.state = SessionState::Ready;
        self.seeded = false;
        self.cheats_left = self.cheat_budget;
    }

    fn fixed_grid(&mut self, first_click: Coord2) -> Result<&mut Grid> {
        let board = match self.board.take() {
            Some(board) => board,
            None => self.place_mines(first_click)?,
        };
        Ok(&mut self.board.insert(board).grid)
    }

    fn place_mines(&mut self, first_click: Coord2) -> Result<FixedBoard> {
        let grid = generate(self.config, first_click, &mut self.rng)?;
        let token = encode(&grid, first_click)
            .inspect_err(|err| log::warn!("Could not create seed token: {}", err))
            .ok();

        Ok(FixedBoard {
            grid,
            first_click,
            token,
        })
    }

    fn update_state(&mut self, outcome: &RevealOutcome) {
        let won = self.grid().is_some_and(is_won);

        self.state = match outcome {
            RevealOutcome::Detonated => SessionState::Lost,
            _ if won => SessionState::Won,
            RevealOutcome::Cascaded(_) => SessionState::Active,
            RevealOutcome::NoOp => self.state,
        };
        if self.state.is_finished() {
            log::debug!("Game finished: {:?}", self.state);
        }
    }

    fn check_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.config.rows && coords.1 < self.config.cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
