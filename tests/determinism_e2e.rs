//! End-to-end determinism tests
//!
//! Tests are generated for each deck in `test_decks/` using the `dir-test`
//! procedural macro: valid decks must replay identically from the same
//! seed, and decks under `test_decks/invalid/` must be rejected.

use dir_test::{dir_test, Fixture};
use konivrer_rs::config::{DriverConfig, EngineConfig};
use konivrer_rs::core::{PlayerId, PlayerKind};
use konivrer_rs::game::{GameDriver, GameEngine, RandomController, VerbosityLevel};
use konivrer_rs::loader::{DeckLoader, PlayerSetup};
use konivrer_rs::EngineError;
use similar_asserts::assert_eq;

/// Play the deck against itself and return the game log
fn play_log(content: &str, seed: u64) -> Vec<String> {
    let deck = DeckLoader::parse(content).unwrap();
    let config = EngineConfig::default()
        .with_seed(seed)
        .with_verbosity(VerbosityLevel::Verbose);
    let mut engine = GameEngine::new(config);
    engine
        .initialize_game(&[
            PlayerSetup::from_deck_list("North", PlayerKind::Ai, &deck),
            PlayerSetup::from_deck_list("South", PlayerKind::Ai, &deck),
        ])
        .unwrap();

    let mut driver = GameDriver::new(engine, DriverConfig::default().with_max_turns(30))
        .with_provider(Box::new(RandomController::with_seed(PlayerId::new(0), seed)))
        .with_provider(Box::new(RandomController::with_seed(PlayerId::new(1), seed + 1)));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    runtime.block_on(driver.run_to_completion()).unwrap();

    driver
        .engine()
        .get_state()
        .unwrap()
        .logger
        .messages()
        .map(str::to_string)
        .collect()
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/test_decks",
    glob: "*.json",
)]
fn test_deck_determinism(fixture: Fixture<&str>) {
    let seed = 42u64;

    let run1 = play_log(fixture.content(), seed);
    let run2 = play_log(fixture.content(), seed);

    assert!(!run1.is_empty(), "Deck {} produced an empty log", fixture.path());
    assert!(run1.iter().any(|line| line == "Game started"));
    assert_eq!(run1, run2, "Deck {} is not deterministic", fixture.path());
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/test_decks/invalid",
    glob: "*.json",
)]
fn test_invalid_deck_rejected(fixture: Fixture<&str>) {
    let result = DeckLoader::parse(fixture.content());
    assert!(
        matches!(result, Err(EngineError::InvalidDeckFormat(_))),
        "Deck {} should have been rejected: {result:?}",
        fixture.path()
    );
}

#[test]
fn test_different_seeds_differ() {
    let content = include_str!("../test_decks/ember_rush.json");
    assert_ne!(play_log(content, 1), play_log(content, 2));
}
