//! Engine and driver configuration.

use crate::game::{OutputMode, VerbosityLevel};
use serde::{Deserialize, Serialize};

/// Life Cards each player starts with.
pub const DEFAULT_LIFE_CARDS: usize = 4;

/// Rules-level settings fixed for the lifetime of a game.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Life Cards dealt to each player before the opening hand.
    pub life_cards: usize,

    /// Cards drawn into each player's opening hand.
    pub opening_hand: usize,

    /// Seed for deck shuffling. Same seed and decks produce the same game.
    pub seed: u64,

    pub verbosity: VerbosityLevel,

    pub output_mode: OutputMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            life_cards: DEFAULT_LIFE_CARDS,
            opening_hand: 2,
            seed: 42,
            verbosity: VerbosityLevel::Normal,
            output_mode: OutputMode::Memory,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }
}

/// Settings for the async driver that consults decision providers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// How long a provider may take before its answer is discarded.
    pub decision_timeout_ms: u64,

    /// Actually wait out the provider's cosmetic thinking time.
    pub honor_thinking_time: bool,

    /// Upper bound on any single cosmetic delay.
    pub max_thinking_time_ms: u64,

    /// The driver stops the game after this many turns (0 = unlimited).
    pub max_turns: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            decision_timeout_ms: 2_000,
            honor_thinking_time: false,
            max_thinking_time_ms: 1_500,
            max_turns: 200,
        }
    }
}

impl DriverConfig {
    pub fn with_timeout_ms(mut self, timeout: u64) -> Self {
        self.decision_timeout_ms = timeout;
        self
    }

    pub fn with_thinking_time(mut self, honor: bool) -> Self {
        self.honor_thinking_time = honor;
        self
    }

    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.life_cards, 4);
        assert_eq!(config.opening_hand, 2);

        let driver = DriverConfig::default();
        assert!(!driver.honor_thinking_time);
        assert!(driver.max_turns > 0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_seed(7)
            .with_verbosity(VerbosityLevel::Verbose);
        assert_eq!(config.seed, 7);
        assert_eq!(config.verbosity, VerbosityLevel::Verbose);

        let driver = DriverConfig::default().with_timeout_ms(10).with_max_turns(3);
        assert_eq!(driver.decision_timeout_ms, 10);
        assert_eq!(driver.max_turns, 3);
    }

    #[test]
    fn test_partial_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"seed": 99}"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.life_cards, 4);
    }
}
