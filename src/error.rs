//! Error types for the KONIVRER rules engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Card {0} not found in hand")]
    CardNotInHand(u32),

    #[error("Cannot pay cost for {0}")]
    CostUnpayable(String),

    #[error("Card {card} has no ability at index {index}")]
    UnknownAbility { card: String, index: usize },

    #[error("Action not allowed during {0} phase")]
    WrongPhase(String),

    #[error("Player {0} is not the acting player")]
    NotActingPlayer(u32),

    #[error("Waiting for input: {0}")]
    AwaitingInput(String),

    #[error("No Burst opportunity pending for card {0}")]
    NoBurstOpportunity(u32),

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Game is over")]
    GameOver,

    #[error("Game has not been initialized")]
    NotInitialized,

    #[error("Invalid game setup: {0}")]
    InvalidSetup(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Engine error: {0}")]
    Internal(String),

    #[error("AI provider failed: {0}")]
    ProviderFailed(String),

    #[error("AI provider timed out after {0} ms")]
    ProviderTimeout(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl EngineError {
    /// Errors a player can fix by choosing a different action.
    ///
    /// These are reported through the game log and a `false` result; the
    /// rest indicate a broken caller or engine and are logged as engine errors.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            EngineError::CardNotInHand(_)
                | EngineError::CostUnpayable(_)
                | EngineError::UnknownAbility { .. }
                | EngineError::WrongPhase(_)
                | EngineError::NotActingPlayer(_)
                | EngineError::AwaitingInput(_)
                | EngineError::NoBurstOpportunity(_)
                | EngineError::InvalidDeclaration(_)
                | EngineError::GameOver
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
