//! KONIVRER engine binary
//!
//! Plays AI-vs-AI games between two deck files, or validates a deck.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use konivrer_rs::{
    config::{DriverConfig, EngineConfig},
    core::{PlayerId, PlayerKind},
    game::{DecisionProvider, GameDriver, GameEngine, OutputMode, RandomController, VerbosityLevel, ZeroController},
    loader::{DeckLoader, PlayerSetup},
};
use std::path::{Path, PathBuf};

/// Controller type for AI seats
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always takes the first legal action
    Zero,
    /// Picks uniformly among legal actions
    Random,
}

#[derive(Parser)]
#[command(name = "konivrer")]
#[command(about = "KONIVRER rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game between two AI controllers
    Play {
        /// Deck file (.json) for player 1
        #[arg(value_name = "PLAYER1_DECK")]
        deck1: PathBuf,

        /// Deck file (.json) for player 2
        #[arg(value_name = "PLAYER2_DECK")]
        deck2: PathBuf,

        /// Controller for player 1
        #[arg(long, value_enum, default_value = "zero")]
        p1: ControllerType,

        /// Controller for player 2
        #[arg(long, value_enum, default_value = "zero")]
        p2: ControllerType,

        /// Seed for shuffling and random controllers
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output verbosity (silent/0, minimal/1, normal/2, verbose/3)
        #[arg(long, short = 'v', default_value = "normal")]
        verbosity: VerbosityLevel,

        /// Stop the game after this many turns (0 = no limit)
        #[arg(long, default_value_t = 200)]
        max_turns: u32,

        /// Wait out each controller's thinking time (capped, in ms)
        #[arg(long, value_name = "MS")]
        thinking_delay: Option<u64>,

        /// Write the final game state to this file as JSON
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },

    /// Check that a deck file parses and has exactly one Flag
    Validate {
        #[arg(value_name = "DECK")]
        deck: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            deck1,
            deck2,
            p1,
            p2,
            seed,
            verbosity,
            max_turns,
            thinking_delay,
            export,
        } => {
            let options = PlayOptions {
                p1,
                p2,
                seed,
                verbosity,
                max_turns,
                thinking_delay,
                export,
            };
            run_play(&deck1, &deck2, options).await?
        }
        Commands::Validate { deck } => run_validate(&deck).await?,
    }

    Ok(())
}

struct PlayOptions {
    p1: ControllerType,
    p2: ControllerType,
    seed: u64,
    verbosity: VerbosityLevel,
    max_turns: u32,
    thinking_delay: Option<u64>,
    export: Option<PathBuf>,
}

fn make_provider(kind: ControllerType, player: PlayerId, seed: u64) -> Box<dyn DecisionProvider> {
    match kind {
        ControllerType::Zero => Box::new(ZeroController::new(player)),
        ControllerType::Random => Box::new(RandomController::with_seed(player, seed)),
    }
}

async fn run_play(deck1_path: &Path, deck2_path: &Path, options: PlayOptions) -> anyhow::Result<()> {
    let deck1 = DeckLoader::load_from_file_async(deck1_path)
        .await
        .with_context(|| format!("loading {}", deck1_path.display()))?;
    let deck2 = DeckLoader::load_from_file_async(deck2_path)
        .await
        .with_context(|| format!("loading {}", deck2_path.display()))?;

    let output_mode = if cfg!(feature = "verbose-logging") {
        OutputMode::Stdout
    } else {
        OutputMode::Memory
    };
    let engine_config = EngineConfig::default()
        .with_seed(options.seed)
        .with_verbosity(options.verbosity)
        .with_output_mode(output_mode);
    let mut driver_config = DriverConfig::default().with_max_turns(options.max_turns);
    if let Some(cap) = options.thinking_delay {
        driver_config = driver_config.with_thinking_time(true);
        driver_config.max_thinking_time_ms = cap;
    }

    println!("=== KONIVRER ===");
    println!("  Player 1: {} ({:?})", deck1.name, options.p1);
    println!("  Player 2: {} ({:?})\n", deck2.name, options.p2);

    let mut engine = GameEngine::new(engine_config);
    let state = engine.initialize_game(&[
        PlayerSetup::from_deck_list(deck1.name.clone(), PlayerKind::Ai, &deck1),
        PlayerSetup::from_deck_list(deck2.name.clone(), PlayerKind::Ai, &deck2),
    ])?;
    let (id1, id2) = (state.players[0].id, state.players[1].id);

    let mut driver = GameDriver::new(engine, driver_config)
        .with_provider(make_provider(options.p1, id1, options.seed))
        .with_provider(make_provider(options.p2, id2, options.seed.wrapping_add(1)));
    let result = driver.run_to_completion().await?;

    println!("\n=== Game Over ===");
    match result.winner {
        Some(winner) => {
            let name = driver
                .engine()
                .get_state()
                .map(|state| state.player_name(winner))
                .unwrap_or_default();
            println!("  Winner: {name}");
        }
        None => println!("  No winner"),
    }
    println!("  Turns: {}", result.turns_played);
    if let Some(reason) = result.end_reason {
        println!("  Reason: {reason:?}");
    }
    if result.turn_limit_reached {
        println!("  Turn limit reached");
    }
    let session = driver.session();
    println!("  AI decisions: {} ({} fallbacks)", session.decisions, session.fallbacks);

    if let Some(path) = options.export {
        let json = driver.engine().export_json()?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  Final state written to {}", path.display());
    }
    Ok(())
}

async fn run_validate(path: &Path) -> anyhow::Result<()> {
    let deck = DeckLoader::load_from_file_async(path)
        .await
        .with_context(|| format!("validating {}", path.display()))?;
    println!(
        "{}: {} cards, Flag set aside, {} playable",
        deck.name,
        deck.total_cards(),
        deck.total_cards() - deck.flag_count()
    );
    Ok(())
}
