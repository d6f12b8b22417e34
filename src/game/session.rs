//! Per-game bookkeeping for AI collaboration
//!
//! One `SessionContext` belongs to one game, so several games can run
//! side by side without sharing thinking flags or decision caches.

use crate::core::PlayerId;
use crate::game::controller::{AiDecision, AvailableAction, PlayerBehaviorSignal};
use crate::game::GameState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How many of the human's recent actions feed the behavior signal
const BEHAVIOR_WINDOW: usize = 10;

/// Cost above which a play counts as risky
const RISKY_COST: u32 = 5;

/// Strength above which a play counts as aggressive
const AGGRESSIVE_STRENGTH: u8 = 5;

/// Response time (ms) treated as "fast"
const FAST_DECISION_MS: f64 = 2_000.0;

/// One executed action, with the facts the behavior signal needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub turn: u32,
    pub action: AvailableAction,
    /// Time the player took to decide
    pub elapsed_ms: u64,
    /// Printed total cost of the played card (0 for non-plays)
    pub card_cost: u32,
    /// Base strength of the played card (0 for non-plays)
    pub card_strength: u8,
}

impl ActionRecord {
    /// Describe `action` using the state it is about to be applied to
    pub fn new(state: &GameState, player: PlayerId, action: AvailableAction, elapsed_ms: u64) -> Self {
        let (card_cost, card_strength) = match &action {
            AvailableAction::PlayCard { card, .. } => state
                .cards
                .get(*card)
                .map(|c| (c.definition.cost.total(), c.definition.strength))
                .unwrap_or((0, 0)),
            _ => (0, 0),
        };
        ActionRecord {
            player,
            turn: state.turn.turn_number,
            action,
            elapsed_ms,
            card_cost,
            card_strength,
        }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self.action, AvailableAction::DeclareAttackers(_))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    /// A provider is currently deciding
    pub ai_thinking: bool,
    pub last_decision: Option<AiDecision>,
    /// Decisions requested from providers
    pub decisions: u64,
    /// Decisions replaced by the fallback
    pub fallbacks: u64,
    /// Most recent actions, at most `BEHAVIOR_WINDOW` per player, oldest first
    pub history: VecDeque<ActionRecord>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: ActionRecord) {
        let player = record.player;
        self.history.push_back(record);
        let kept = self.history.iter().filter(|r| r.player == player).count();
        if kept > BEHAVIOR_WINDOW {
            if let Some(oldest) = self.history.iter().position(|r| r.player == player) {
                self.history.remove(oldest);
            }
        }
    }

    /// Signal derived from `player`'s most recent actions
    ///
    /// Every metric is 0.5 when there is no player to observe or no history.
    pub fn behavior_signal(&self, player: Option<PlayerId>) -> PlayerBehaviorSignal {
        let Some(player) = player else {
            return PlayerBehaviorSignal::default();
        };
        let mut recent: Vec<&ActionRecord> = self
            .history
            .iter()
            .rev()
            .filter(|record| record.player == player)
            .take(BEHAVIOR_WINDOW)
            .collect();
        if recent.is_empty() {
            return PlayerBehaviorSignal::default();
        }
        recent.reverse();

        let count = recent.len() as f64;
        let avg_ms = recent.iter().map(|r| r.elapsed_ms as f64).sum::<f64>() / count;
        let avg_cost = recent.iter().map(|r| r.card_cost as f64).sum::<f64>() / count;
        let risky = recent
            .iter()
            .filter(|r| r.is_attack() || r.card_cost > RISKY_COST)
            .count() as f64;
        let aggressive = recent
            .iter()
            .filter(|r| r.is_attack() || r.card_strength > AGGRESSIVE_STRENGTH)
            .count() as f64;

        PlayerBehaviorSignal {
            decision_speed: (FAST_DECISION_MS / avg_ms.max(1.0)).clamp(0.1, 1.0),
            risk_taking: risky / count,
            aggressive_play: aggressive / count,
            resource_conservation: (1.0 - avg_cost / 10.0).clamp(0.1, 1.0),
        }
    }
}
