//! Deterministic "first choice" provider
//!
//! Always takes the first legal action. Action lists put real plays
//! before passing, so two of these play a game to completion without any
//! randomness. The driver also uses it as the fallback whenever another
//! provider fails, times out, or picks something illegal.
//!
//! Useful for:
//! - Automated testing
//! - Benchmarking the engine
//! - Standing in for an unavailable AI

use crate::core::PlayerId;
use crate::game::controller::{AiDecision, AvailableAction, DecisionFuture, DecisionProvider, DecisionRequest};

pub struct ZeroController {
    player_id: PlayerId,
}

impl ZeroController {
    pub fn new(player_id: PlayerId) -> Self {
        ZeroController { player_id }
    }

    /// The fallback choice for any action list; `Pass` when it is empty
    pub fn choose(actions: &[AvailableAction]) -> AvailableAction {
        actions.first().cloned().unwrap_or(AvailableAction::Pass)
    }
}

impl DecisionProvider for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        "zero"
    }

    fn decide<'a>(&'a mut self, request: DecisionRequest) -> DecisionFuture<'a> {
        let action = Self::choose(&request.actions);
        Box::pin(async move { Ok(AiDecision::immediate(action)) })
    }
}
