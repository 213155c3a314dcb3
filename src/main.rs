//! g2c CLI
//!
//! Play the bundled console games or run the framework showcase.

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use g2c::console;
use g2c::game::state::{KEY_GAMES_PLAYED, KEY_SCORE};
use g2c::game::{ClassicGame, ConsoleGame, Game};
use g2c::input::InputError;
use g2c::{Error, Prompter, demo};

#[derive(Parser)]
#[command(name = "g2c")]
#[command(about = "Game to Console: terminal game helpers and sample games")]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Menu-driven guessing game with difficulty levels and a running score
    Play {
        /// Keep previous screens on the terminal
        #[arg(long)]
        no_clear: bool,
    },

    /// Single round of the classic 1-100 guessing game
    Classic,

    /// Walk through the framework's console, state and input helpers
    Demo,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Play { no_clear } => cmd_play(no_clear),
        Commands::Classic => cmd_classic(),
        Commands::Demo => cmd_demo(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("g2c={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// COMMANDS
// ============================================================================

fn cmd_play(no_clear: bool) -> Result<(), Error> {
    let mut game = Game::new(Prompter::stdio());
    if no_clear {
        game = game.without_clearing();
    }
    game.run()?;

    let (state, _) = game.into_parts();
    tracing::info!(
        score = state.get_i64(KEY_SCORE).unwrap_or(0),
        games = state.get_i64(KEY_GAMES_PLAYED).unwrap_or(0),
        "session finished"
    );
    Ok(())
}

fn cmd_classic() -> Result<(), Error> {
    println!("Welcome to G2C - Game to Console Framework!");
    println!("This is a simple example of what can be built with G2C.\n");

    let mut game = ClassicGame::new(Prompter::stdio());
    match game.start() {
        Ok(()) | Err(InputError::Eof) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn cmd_demo() -> Result<(), Error> {
    let mut prompter = Prompter::stdio();
    demo::run(&mut prompter, console::width(), console::size())
}
