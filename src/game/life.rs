//! Life Cards: the only way a player takes damage or loses
//!
//! Damage reveals cards from the top of the Life Cards stack straight into
//! the discard pile. Every revealed card opens a Burst opportunity for its
//! owner; opportunities are offered one at a time, oldest first.

use crate::core::{CardId, PlayerId};
use crate::game::{BurstOpportunity, GameEndReason, GameEvent, GameState};
use crate::zones::Zone;
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Answer to a Burst opportunity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BurstChoice {
    /// Put the revealed card onto the field for free
    PlayFree,
    /// Return the revealed card to hand
    ToHand,
    /// Leave it in the discard pile
    Decline,
}

impl GameState {
    /// Reveal `amount` Life Cards from `target`, most recently added first
    ///
    /// Returns the revealed cards (now in the discard pile). Damage of zero,
    /// or against an empty stack, changes nothing.
    pub fn damage_player(
        &mut self,
        target: PlayerId,
        amount: u32,
        source_player: Option<PlayerId>,
        source_card: Option<CardId>,
    ) -> Result<Vec<CardId>> {
        if amount == 0 {
            return Ok(Vec::new());
        }
        self.ensure_in_progress()?;

        let target_name = self.player_name(target);
        let remaining = self.life_card_count(target)?;
        if remaining == 0 {
            self.logger.normal(format!("{target_name} has no Life Cards remaining"));
            return Ok(Vec::new());
        }

        let to_reveal = remaining.min(amount as usize);
        let mut revealed = Vec::with_capacity(to_reveal);
        for _ in 0..to_reveal {
            let zones = self.get_player_zones_mut(target)?;
            let Some(card_id) = zones.life_cards.take_top() else {
                break;
            };
            zones.discard.add(card_id);
            self.cards.get_mut(card_id)?.zone = Zone::Discard;
            self.burst_queue.push_back(BurstOpportunity {
                player: target,
                card: card_id,
            });
            let card_name = self.card_name(card_id);
            self.logger.normal(format!("{target_name} revealed {card_name} as a Life Card"));
            revealed.push(card_id);
        }

        if let Some(source) = source_card {
            let source_name = self.card_name(source);
            self.logger
                .verbose(format!("{source_name} dealt {amount} damage to {target_name}"));
        }
        self.emit(GameEvent::LifeCardsRevealed {
            player: target,
            cards: revealed.clone(),
        });

        if self.life_card_count(target)? == 0 {
            let winner = match source_player {
                Some(source) if source != target => source,
                _ => self.opponent_of(target)?,
            };
            self.end_game(winner, GameEndReason::LifeCardsExhausted(target));
        }

        Ok(revealed)
    }

    /// The Burst opportunity currently offered, if any
    pub fn pending_burst(&self) -> Option<BurstOpportunity> {
        self.burst_queue.front().copied()
    }

    /// Answer the oldest Burst opportunity
    pub fn resolve_burst(&mut self, player_id: PlayerId, choice: BurstChoice) -> Result<()> {
        self.ensure_in_progress()?;
        let opportunity = self
            .pending_burst()
            .ok_or(EngineError::NoBurstOpportunity(player_id.as_u32()))?;
        if opportunity.player != player_id {
            return Err(EngineError::NotActingPlayer(player_id.as_u32()));
        }
        self.burst_queue.pop_front();

        let card_id = opportunity.card;
        let player_name = self.player_name(player_id);
        let card_name = self.card_name(card_id);
        match choice {
            BurstChoice::PlayFree => {
                let counters = self.life_card_count(player_id)? as u32;
                self.move_card(card_id, Zone::Discard, Zone::Field, player_id)?;
                let card = self.cards.get_mut(card_id)?;
                card.counters = counters;
                card.burst_play = true;
                card.controller = player_id;
                self.logger.normal(format!(
                    "{player_name} played {card_name} via Burst with {counters} +1 counters"
                ));
            }
            BurstChoice::ToHand => {
                self.move_card(card_id, Zone::Discard, Zone::Hand, player_id)?;
                self.logger
                    .normal(format!("{player_name} put {card_name} in their hand via Burst"));
            }
            BurstChoice::Decline => {
                self.logger
                    .verbose(format!("{player_name} left {card_name} in the discard pile"));
            }
        }

        self.emit(GameEvent::BurstResolved {
            player: player_id,
            card: card_id,
            choice,
        });
        Ok(())
    }

    /// End the game with the opponent as winner
    pub fn concede(&mut self, player_id: PlayerId) -> Result<()> {
        self.ensure_in_progress()?;
        let winner = self.opponent_of(player_id)?;
        let name = self.player_name(player_id);
        self.logger.minimal(format!("{name} concedes"));
        self.end_game(winner, GameEndReason::Concession(player_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, ElementalCost, PlayerKind};
    use std::sync::Arc;

    fn game_with_life(count: usize) -> (GameState, PlayerId, PlayerId, Vec<CardId>) {
        let mut game = GameState::new_two_player(("Alice", PlayerKind::Human), ("Bob", PlayerKind::Ai));
        let p1 = PlayerId::new(0);
        let p2 = PlayerId::new(1);
        let def = Arc::new(CardDefinition::familiar("Tidecaller", ElementalCost::generic(2), 2, Some(3)));
        let mut life = Vec::new();
        for _ in 0..count {
            let card = game.add_card_to_deck(p2, def.clone()).unwrap();
            game.move_card(card, Zone::Deck, Zone::LifeCards, p2).unwrap();
            life.push(card);
        }
        (game, p1, p2, life)
    }

    #[test]
    fn test_zero_damage_is_a_no_op() {
        let (mut game, p1, p2, _) = game_with_life(4);
        let before = serde_json::to_string(&game).unwrap();

        let revealed = game.damage_player(p2, 0, Some(p1), None).unwrap();
        assert!(revealed.is_empty());
        assert_eq!(serde_json::to_string(&game).unwrap(), before);
    }

    #[test]
    fn test_reveals_in_stack_order() {
        let (mut game, p1, p2, life) = game_with_life(4);

        let revealed = game.damage_player(p2, 2, Some(p1), None).unwrap();
        assert_eq!(revealed, vec![life[3], life[2]]);
        assert_eq!(game.life_card_count(p2).unwrap(), 2);
        assert_eq!(game.zone_cards(p2, Zone::Discard).unwrap(), &[life[3], life[2]]);
        assert_eq!(game.burst_queue.len(), 2);
        assert_eq!(game.pending_burst().map(|b| b.card), Some(life[3]));
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_lethal_damage_ends_game() {
        let (mut game, p1, p2, _) = game_with_life(2);

        let revealed = game.damage_player(p2, 5, Some(p1), None).unwrap();
        assert_eq!(revealed.len(), 2);
        assert!(game.is_game_over());
        assert_eq!(game.get_winner(), Some(p1));
        assert!(game.burst_queue.is_empty());
        assert!(game.damage_player(p2, 1, Some(p1), None).is_err());
    }

    #[test]
    fn test_winner_defaults_to_opponent() {
        let (mut game, _, p2, _) = game_with_life(1);
        game.damage_player(p2, 1, None, None).unwrap();
        assert_eq!(game.get_winner(), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_self_inflicted_loss_goes_to_opponent() {
        let (mut game, p1, p2, _) = game_with_life(1);
        game.damage_player(p2, 1, Some(p2), None).unwrap();
        assert_eq!(game.get_winner(), Some(p1));
        assert_eq!(game.end_reason, Some(GameEndReason::LifeCardsExhausted(p2)));
    }

    #[test]
    fn test_burst_play_free_uses_remaining_life() {
        let (mut game, p1, p2, life) = game_with_life(4);
        game.damage_player(p2, 1, Some(p1), None).unwrap();

        assert!(game.resolve_burst(p1, BurstChoice::PlayFree).is_err());
        game.resolve_burst(p2, BurstChoice::PlayFree).unwrap();

        let card = game.cards.get(life[3]).unwrap();
        assert_eq!(card.zone, Zone::Field);
        assert_eq!(card.counters, 3);
        assert!(card.burst_play);
        assert!(game.pending_burst().is_none());
        game.check_zone_integrity().unwrap();
    }

    #[test]
    fn test_burst_queue_resolves_in_order() {
        let (mut game, p1, p2, life) = game_with_life(4);
        game.damage_player(p2, 2, Some(p1), None).unwrap();

        game.resolve_burst(p2, BurstChoice::ToHand).unwrap();
        assert_eq!(game.zone_cards(p2, Zone::Hand).unwrap(), &[life[3]]);

        game.resolve_burst(p2, BurstChoice::Decline).unwrap();
        assert_eq!(game.zone_cards(p2, Zone::Discard).unwrap(), &[life[2]]);
        assert!(matches!(
            game.resolve_burst(p2, BurstChoice::Decline),
            Err(EngineError::NoBurstOpportunity(_))
        ));
    }

    #[test]
    fn test_concede() {
        let (mut game, p1, p2, _) = game_with_life(4);
        game.concede(p1).unwrap();
        assert_eq!(game.get_winner(), Some(p2));
        assert_eq!(game.end_reason, Some(GameEndReason::Concession(p1)));
        assert!(game.concede(p2).is_err());
    }
}
