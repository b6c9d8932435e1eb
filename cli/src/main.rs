mod moves;
mod render;
mod settings;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use seedsweeper_core::{
    Action, ActionOutcome, Coord2, GameSnapshot, SeedFormat, Session, SessionState, encode, encode_as,
    generate, try_decode,
};
use std::path::{Path, PathBuf};

use crate::moves::{parse_coords, parse_move};
use crate::settings::{BoardArgs, Settings};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity,

    /// TOML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a board around the first click and print its seed token
    New(NewArgs),
    /// Decode a seed token and print its mine layout
    Inspect(InspectArgs),
    /// Play a scripted sequence of moves
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct NewArgs {
    #[command(flatten)]
    board: BoardArgs,

    /// First click as ROW,COL, its 3x3 block stays free of mines
    #[arg(long, value_parser = parse_coords)]
    first_click: Coord2,

    /// Seed for the board generator
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Write the legacy JSON token instead of the compact one
    #[arg(long)]
    legacy: bool,

    /// Also write the token to the configured seed file
    #[arg(long)]
    save: bool,

    /// Print the generated mine layout
    #[arg(long)]
    show: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Seed token, the configured seed file is read when omitted
    #[arg(conflicts_with = "file")]
    token: Option<String>,

    /// Read the token from this file
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    board: BoardArgs,

    /// Replay the board of this seed token
    #[arg(long)]
    token: Option<String>,

    /// Seed for the board generator
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Write the seed token of the played board to the configured seed file
    #[arg(long)]
    save: bool,

    /// Moves: rR,C reveal, mR,C mark, cR,C chord, hR,C highlight, x reset
    #[arg(value_parser = parse_move, allow_hyphen_values = true)]
    moves: Vec<Action>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::New(args) => run_new(&settings, args),
        Command::Inspect(args) => run_inspect(&settings, args),
        Command::Play(args) => run_play(&settings, args),
    }
}

fn run_new(settings: &Settings, args: NewArgs) -> anyhow::Result<()> {
    let config = settings.game_config(&args.board)?;
    let rng_seed = args.rng_seed.unwrap_or_else(rand::random);
    log::info!("Generating {config:?} with rng seed {rng_seed}");

    let mut rng = SmallRng::seed_from_u64(rng_seed);
    let grid = generate(config, args.first_click, &mut rng)?;
    let token = if args.legacy {
        encode_as(&grid, args.first_click, SeedFormat::V1Legacy)?
    } else {
        encode(&grid, args.first_click)?
    };

    println!("{token}");
    if args.show {
        let snapshot = GameSnapshot::from_grid(&grid, args.first_click)?;
        print!("{}", render::render_layout(&snapshot));
    }
    if args.save {
        save_token(&settings.seed_file, &token)?;
    }
    Ok(())
}

fn run_inspect(settings: &Settings, args: InspectArgs) -> anyhow::Result<()> {
    let token = match (args.token, args.file) {
        (Some(token), _) => token,
        (None, Some(path)) => read_token(&path)?,
        (None, None) => read_token(&settings.seed_file)?,
    };

    let snapshot = try_decode(&token).context("Could not decode seed token")?;
    print!("{}", render::describe(&snapshot));
    print!("{}", render::render_layout(&snapshot));
    Ok(())
}

fn run_play(settings: &Settings, args: PlayArgs) -> anyhow::Result<()> {
    let config = settings.game_config(&args.board)?;
    let rng_seed = args.rng_seed.unwrap_or_else(rand::random);

    let session = match &args.token {
        Some(token) => Session::from_token(token, config, rng_seed),
        None => Session::new(config, rng_seed),
    };
    let mut session = session?.with_cheats(settings.cheats);

    for action in args.moves {
        let outcome = session
            .apply(action)
            .with_context(|| format!("Move {action:?} failed"))?;
        log::debug!("{action:?} -> {outcome:?}");
        match outcome {
            ActionOutcome::Revealed(outcome) if outcome.is_detonated() => {
                println!("{action:?} hit a mine");
            }
            ActionOutcome::Revealed(outcome) => {
                if let Some(cells) = outcome.revealed() {
                    log::info!("{action:?} opened {} cells", cells.len());
                }
            }
            ActionOutcome::Highlighted(Some(mines)) => {
                println!("highlighted {mines} mines, {} cheats left", session.cheats_left());
            }
            _ => {}
        }
    }

    let config = session.config();
    match session.grid() {
        Some(grid) => print!(
            "{}",
            render::render_grid(grid, session.state() == SessionState::Lost)
        ),
        None => print!("{}", render::render_pending(config.rows, config.cols)),
    }
    println!("state: {:?}", session.state());
    println!("mines left: {}", session.mines_left());

    if let Some(token) = session.seed_token() {
        println!("seed: {token}");
        if args.save {
            save_token(&settings.seed_file, token)?;
        }
    } else if args.save {
        log::warn!("No board was generated, nothing to save");
    }
    Ok(())
}

fn read_token(path: &Path) -> anyhow::Result<String> {
    let token = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read seed token from {}", path.display()))?;
    Ok(token.trim().to_owned())
}

fn save_token(path: &Path, token: &str) -> anyhow::Result<()> {
    std::fs::write(path, format!("{token}\n"))
        .with_context(|| format!("Could not write seed token to {}", path.display()))?;
    log::info!("Saved seed token to {}", path.display());
    Ok(())
}
