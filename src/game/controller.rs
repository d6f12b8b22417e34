//! Decision interface for AI (and scripted) players
//!
//! Every decision is reduced to "pick one of these legal actions". The
//! engine builds the list, a `DecisionProvider` picks from it
//! asynchronously, and the driver executes the pick through the same
//! operations a UI would call.
//!
//! Within the list the engine orders actions from most to least
//! committal, with the no-op (`Pass`, or declining a Burst) after every
//! real play. The deterministic fallback simply takes the first entry.

use crate::core::{CardId, CardType, ElementalCost, PlayerId};
use crate::game::life::BurstChoice;
use crate::game::{GameState, InputRequest, Phase, PlayMethod};
use crate::zones::Zone;
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// One legal thing a player can do right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailableAction {
    PlayCard {
        card: CardId,
        method: PlayMethod,
        spend: ElementalCost,
    },
    DeclareAttackers(Vec<CardId>),
    /// (blocker, attacker) pairs
    DeclareBlockers(Vec<(CardId, CardId)>),
    ResolveBurst(BurstChoice),
    /// Move on to the next phase (declining any optional prompt)
    Pass,
}

impl AvailableAction {
    pub fn is_pass(&self) -> bool {
        matches!(self, AvailableAction::Pass)
    }
}

impl fmt::Display for AvailableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailableAction::PlayCard { card, method, spend } => {
                write!(f, "play card {card} via {method} paying {spend}")
            }
            AvailableAction::DeclareAttackers(attackers) => write!(f, "attack with {attackers:?}"),
            AvailableAction::DeclareBlockers(pairs) => write!(f, "block {pairs:?}"),
            AvailableAction::ResolveBurst(choice) => write!(f, "burst {choice:?}"),
            AvailableAction::Pass => write!(f, "pass"),
        }
    }
}

/// Summary of how the human opponent has been playing
///
/// Every metric lies in [0, 1]; 0.5 means "no information".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBehaviorSignal {
    pub decision_speed: f64,
    pub risk_taking: f64,
    pub aggressive_play: f64,
    pub resource_conservation: f64,
}

impl Default for PlayerBehaviorSignal {
    fn default() -> Self {
        PlayerBehaviorSignal {
            decision_speed: 0.5,
            risk_taking: 0.5,
            aggressive_play: 0.5,
            resource_conservation: 0.5,
        }
    }
}

/// Everything a provider gets to look at
#[derive(Debug, Clone)]
pub struct DecisionRequest {
    /// Independent copy of the game; changing it affects nothing
    pub snapshot: GameState,
    pub player_id: PlayerId,
    pub actions: Vec<AvailableAction>,
    pub behavior: PlayerBehaviorSignal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDecision {
    pub action: AvailableAction,
    /// Cosmetic delay before the action is shown; never affects the result
    pub thinking_time_ms: u64,
}

impl AiDecision {
    pub fn immediate(action: AvailableAction) -> Self {
        AiDecision {
            action,
            thinking_time_ms: 0,
        }
    }
}

pub type DecisionFuture<'a> = Pin<Box<dyn Future<Output = Result<AiDecision>> + Send + 'a>>;

/// Chooses actions for one player
pub trait DecisionProvider: Send {
    /// Get the player ID this provider decides for
    fn player_id(&self) -> PlayerId;

    /// Short name used in the game log
    fn name(&self) -> &str;

    fn decide<'a>(&'a mut self, request: DecisionRequest) -> DecisionFuture<'a>;
}

impl GameState {
    /// Every legal action for `player_id` at this point
    ///
    /// Pass comes after the real plays; in the main phases Azoth placements
    /// follow it. Empty when the game is over or the player has nothing to
    /// decide.
    pub fn available_actions(&self, player_id: PlayerId) -> Vec<AvailableAction> {
        if self.game_over {
            return Vec::new();
        }
        if let Some(burst) = self.pending_burst() {
            if burst.player != player_id {
                return Vec::new();
            }
            return vec![
                AvailableAction::ResolveBurst(BurstChoice::PlayFree),
                AvailableAction::ResolveBurst(BurstChoice::ToHand),
                AvailableAction::ResolveBurst(BurstChoice::Decline),
            ];
        }
        if player_id != self.deciding_player() {
            return Vec::new();
        }

        let mut actions = match self.turn.current_phase {
            Phase::Start => self.start_azoth_actions(player_id),
            phase if phase.is_main() => return self.main_phase_actions(player_id),
            Phase::Combat => self.attack_actions(player_id),
            Phase::Defense => self.block_actions(player_id),
            _ => Vec::new(),
        };
        actions.push(AvailableAction::Pass);
        actions
    }

    fn hand_cards(&self, player_id: PlayerId) -> Vec<CardId> {
        self.zone_cards(player_id, Zone::Hand)
            .map(<[CardId]>::to_vec)
            .unwrap_or_default()
    }

    fn start_azoth_actions(&self, player_id: PlayerId) -> Vec<AvailableAction> {
        let can_place = self
            .get_player(player_id)
            .map(|p| p.can_place_start_azoth())
            .unwrap_or(false);
        if !can_place {
            return Vec::new();
        }
        self.hand_cards(player_id)
            .into_iter()
            .map(|card| AvailableAction::PlayCard {
                card,
                method: PlayMethod::Azoth,
                spend: ElementalCost::new(),
            })
            .collect()
    }

    fn main_phase_actions(&self, player_id: PlayerId) -> Vec<AvailableAction> {
        let hand = self.hand_cards(player_id);
        let field_familiars: Vec<CardId> = self
            .zone_cards(player_id, Zone::Field)
            .map(|field| {
                field
                    .iter()
                    .copied()
                    .filter(|&id| self.cards.get(id).map(|c| c.is_familiar()).unwrap_or(false))
                    .collect()
            })
            .unwrap_or_default();

        let mut plays = Vec::new();
        let mut azoth = Vec::new();
        for card_id in hand {
            let Ok(card) = self.cards.get(card_id) else {
                continue;
            };
            let definition = &card.definition;
            match definition.card_type {
                CardType::Familiar => {
                    if let Some(spend) = self.suggest_spend(player_id, &definition.cost) {
                        plays.push(AvailableAction::PlayCard {
                            card: card_id,
                            method: PlayMethod::Summon,
                            spend,
                        });
                    }
                    let tribute_count = (definition.cost.generic as usize).min(field_familiars.len());
                    if tribute_count > 0 {
                        let reduced = definition.cost.reduce_generic(tribute_count as u8);
                        if let Some(spend) = self.suggest_spend(player_id, &reduced) {
                            let tributes: SmallVec<[CardId; 4]> =
                                field_familiars.iter().copied().take(tribute_count).collect();
                            plays.push(AvailableAction::PlayCard {
                                card: card_id,
                                method: PlayMethod::Tribute { tributes },
                                spend,
                            });
                        }
                    }
                }
                CardType::Spell => {
                    if let Some(spend) = self.suggest_spend(player_id, &definition.cost) {
                        for ability_index in 0..definition.abilities.len() {
                            plays.push(AvailableAction::PlayCard {
                                card: card_id,
                                method: PlayMethod::Spell { ability_index },
                                spend,
                            });
                        }
                    }
                }
                CardType::Flag => continue,
            }
            azoth.push(AvailableAction::PlayCard {
                card: card_id,
                method: PlayMethod::Azoth,
                spend: ElementalCost::new(),
            });
        }

        // Azoth placement only after Pass, so taking the first offer never
        // empties the hand into the Azoth row
        plays.push(AvailableAction::Pass);
        plays.extend(azoth);
        plays
    }

    fn attack_actions(&self, player_id: PlayerId) -> Vec<AvailableAction> {
        if self.combat.combat_active {
            return Vec::new();
        }
        let eligible = self.eligible_attackers(player_id).unwrap_or_default();
        if eligible.is_empty() {
            return Vec::new();
        }
        let mut actions = vec![AvailableAction::DeclareAttackers(eligible.clone())];
        if eligible.len() > 1 {
            actions.extend(eligible.into_iter().map(|card| AvailableAction::DeclareAttackers(vec![card])));
        }
        actions
    }

    fn block_actions(&self, player_id: PlayerId) -> Vec<AvailableAction> {
        if !matches!(self.prompt, Some(InputRequest::BlockerDeclaration { player }) if player == player_id) {
            return Vec::new();
        }
        let blockers = self.eligible_blockers(player_id).unwrap_or_default();
        let pairs: Vec<(CardId, CardId)> = blockers
            .into_iter()
            .zip(self.combat.attackers.keys().copied())
            .collect();
        if pairs.is_empty() {
            return Vec::new();
        }
        vec![AvailableAction::DeclareBlockers(pairs)]
    }

    /// Carry out an action on behalf of `player_id`
    pub fn apply_action(&mut self, player_id: PlayerId, action: &AvailableAction) -> Result<()> {
        match action {
            AvailableAction::PlayCard { card, method, spend } => self.play_card(player_id, *card, method, spend),
            AvailableAction::DeclareAttackers(attackers) => self.declare_attackers(player_id, attackers),
            AvailableAction::DeclareBlockers(pairs) => self.declare_blockers(player_id, pairs),
            AvailableAction::ResolveBurst(choice) => self.resolve_burst(player_id, *choice),
            AvailableAction::Pass => {
                self.ensure_in_progress()?;
                if player_id != self.deciding_player() {
                    return Err(EngineError::NotActingPlayer(player_id.as_u32()));
                }
                self.advance_phase()
            }
        }
    }
}
