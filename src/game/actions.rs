//! Card play: Summon, Tribute, Azoth, Spell and Burst
//!
//! Every method takes a card from the acting player's hand; only Burst
//! works on a revealed Life Card instead. Hand plays draw one replacement
//! card on success.

use crate::core::{AbilityEffect, CardId, CardType, ElementalCost, PlayerId};
use crate::game::life::BurstChoice;
use crate::game::{GameEvent, GameState, InputRequest, Phase};
use crate::zones::Zone;
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// How a card is played, with the parameters each protocol needs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMethod {
    /// Pay the full cost; the card enters the field
    Summon,
    /// Remove field Familiars from play to lower the Generic cost by one each
    Tribute { tributes: SmallVec<[CardId; 4]> },
    /// Place the card un-rested in the Azoth row, free
    Azoth,
    /// Pay the full cost, resolve one ability, then put the card on the bottom of the deck
    Spell { ability_index: usize },
    /// Answer the pending Burst opportunity for this card
    Burst { put_in_hand: bool },
}

impl PlayMethod {
    pub fn name(&self) -> &'static str {
        match self {
            PlayMethod::Summon => "Summon",
            PlayMethod::Tribute { .. } => "Tribute",
            PlayMethod::Azoth => "Azoth",
            PlayMethod::Spell { .. } => "Spell",
            PlayMethod::Burst { .. } => "Burst",
        }
    }
}

impl fmt::Display for PlayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Put the card's name in front of a ledger rejection
fn name_cost_error(card_name: &str, err: EngineError) -> EngineError {
    match err {
        EngineError::CostUnpayable(reason) => EngineError::CostUnpayable(format!("{card_name}: {reason}")),
        other => other,
    }
}

impl GameState {
    /// Play a card by the given method, spending `spend` Azoth
    ///
    /// Either the play succeeds completely or nothing changes.
    pub fn play_card(&mut self, player_id: PlayerId, card_id: CardId, method: &PlayMethod, spend: &ElementalCost) -> Result<()> {
        self.ensure_in_progress()?;

        if let PlayMethod::Burst { put_in_hand } = method {
            return self.play_burst(player_id, card_id, *put_in_hand);
        }

        self.ensure_not_blocked()?;
        if player_id != self.turn.active_player {
            return Err(EngineError::NotActingPlayer(player_id.as_u32()));
        }
        if !self.get_player_zones(player_id)?.hand.contains(card_id) {
            return Err(EngineError::CardNotInHand(card_id.as_u32()));
        }
        self.check_play_timing(player_id, method)?;
        let card_type = self.cards.get(card_id)?.card_type();
        if card_type == CardType::Flag {
            return Err(EngineError::Internal(format!("Flag card {card_id} found in hand")));
        }

        match method {
            PlayMethod::Summon => {
                let cost = self.cards.get(card_id)?.definition.cost;
                self.summon(player_id, card_id, &cost, spend)?;
            }
            PlayMethod::Tribute { tributes } => self.play_tribute(player_id, card_id, tributes, spend)?,
            PlayMethod::Azoth => self.play_azoth(player_id, card_id)?,
            PlayMethod::Spell { ability_index } => self.play_spell(player_id, card_id, *ability_index, spend)?,
            PlayMethod::Burst { .. } => {
                return Err(EngineError::Internal("Burst reached the hand-play path".to_string()));
            }
        }

        self.emit(GameEvent::CardPlayed {
            player: player_id,
            card: card_id,
            method: method.clone(),
        });
        if !self.game_over {
            self.draw_cards(player_id, 1)?;
        }
        Ok(())
    }

    /// Hand plays happen in the main phases; Start allows a single Azoth placement
    fn check_play_timing(&self, player_id: PlayerId, method: &PlayMethod) -> Result<()> {
        let phase = self.turn.current_phase;
        match (phase, method) {
            (Phase::Start, PlayMethod::Azoth) => {
                if self.get_player(player_id)?.can_place_start_azoth() {
                    Ok(())
                } else {
                    Err(EngineError::WrongPhase(
                        "Start (Azoth already placed this phase)".to_string(),
                    ))
                }
            }
            (phase, _) if phase.is_main() => Ok(()),
            (phase, _) => Err(EngineError::WrongPhase(phase.to_string())),
        }
    }

    /// Pay `cost` and put the card onto the field with counters for the excess Generic
    fn summon(&mut self, player_id: PlayerId, card_id: CardId, cost: &ElementalCost, spend: &ElementalCost) -> Result<()> {
        let name = self.card_name(card_id);
        let generic_paid = self
            .pay_cost(player_id, cost, spend)
            .map_err(|err| name_cost_error(&name, err))?;
        let counters = generic_paid.saturating_sub(cost.generic as u32);

        self.move_card(card_id, Zone::Hand, Zone::Field, player_id)?;
        let card = self.cards.get_mut(card_id)?;
        card.counters = counters;
        card.summoning_sick = true;
        card.controller = player_id;

        let player_name = self.player_name(player_id);
        self.logger
            .normal(format!("{player_name} summoned {name} with {counters} +1 counters"));
        Ok(())
    }

    fn play_tribute(
        &mut self,
        player_id: PlayerId,
        card_id: CardId,
        tributes: &[CardId],
        spend: &ElementalCost,
    ) -> Result<()> {
        let field = self.zone_cards(player_id, Zone::Field)?;
        for (i, &tribute) in tributes.iter().enumerate() {
            let valid = tribute != card_id
                && field.contains(&tribute)
                && !tributes[..i].contains(&tribute)
                && self.cards.get(tribute)?.is_familiar();
            if !valid {
                return Err(EngineError::InvalidDeclaration(format!(
                    "{} cannot be tributed",
                    self.card_name(tribute)
                )));
            }
        }

        let reduction = u8::try_from(tributes.len()).unwrap_or(u8::MAX);
        let reduced = self.cards.get(card_id)?.definition.cost.reduce_generic(reduction);
        if !self.can_pay_cost(player_id, &reduced, spend) {
            return Err(EngineError::CostUnpayable(format!(
                "{} (reduced cost {reduced})",
                self.card_name(card_id)
            )));
        }

        let player_name = self.player_name(player_id);
        for &tribute in tributes {
            self.move_card(tribute, Zone::Field, Zone::RemovedFromPlay, player_id)?;
            self.cards.get_mut(tribute)?.reset_battle_state();
            let tribute_name = self.card_name(tribute);
            self.logger
                .normal(format!("{player_name} tributed {tribute_name}"));
        }
        self.summon(player_id, card_id, &reduced, spend)
    }

    fn play_azoth(&mut self, player_id: PlayerId, card_id: CardId) -> Result<()> {
        self.move_card(card_id, Zone::Hand, Zone::AzothRow, player_id)?;
        let card = self.cards.get_mut(card_id)?;
        card.rested = false;
        card.controller = player_id;

        if self.turn.current_phase == Phase::Start {
            self.get_player_mut(player_id)?.record_start_azoth();
            if matches!(self.prompt, Some(InputRequest::OptionalAzothPlacement { .. })) {
                self.prompt = None;
            }
        }

        let (player_name, card_name) = (self.player_name(player_id), self.card_name(card_id));
        self.logger
            .normal(format!("{player_name} placed {card_name} in their Azoth Row"));
        Ok(())
    }

    fn play_spell(&mut self, player_id: PlayerId, card_id: CardId, ability_index: usize, spend: &ElementalCost) -> Result<()> {
        let definition = self.cards.get(card_id)?.definition.clone();
        let ability = definition
            .abilities
            .get(ability_index)
            .cloned()
            .ok_or_else(|| EngineError::UnknownAbility {
                card: definition.name.to_string(),
                index: ability_index,
            })?;

        let generic_paid = self
            .pay_cost(player_id, &definition.cost, spend)
            .map_err(|err| name_cost_error(definition.name.as_str(), err))?;
        self.move_card_to_deck_bottom(card_id, Zone::Hand, player_id)?;

        let player_name = self.player_name(player_id);
        self.logger.normal(format!(
            "{player_name} cast {} as a Spell ({})",
            definition.name, ability.name
        ));

        let magnitude = ability.magnitude(generic_paid);
        match ability.effect {
            AbilityEffect::None => {}
            AbilityEffect::DrawCards => {
                self.draw_cards(player_id, magnitude as usize)?;
            }
            AbilityEffect::DamageOpponent => {
                let opponent = self.opponent_of(player_id)?;
                self.damage_player(opponent, magnitude, Some(player_id), Some(card_id))?;
            }
            AbilityEffect::CountersOnFamiliars => {
                let field = self.zone_cards(player_id, Zone::Field)?.to_vec();
                for target in field {
                    let card = self.cards.get_mut(target)?;
                    if card.is_familiar() {
                        card.counters += magnitude;
                    }
                }
                self.logger
                    .verbose(format!("{player_name}'s Familiars gained {magnitude} +1 counters"));
            }
        }
        Ok(())
    }

    /// Resolve the pending Burst opportunity for `card_id` through the play API
    fn play_burst(&mut self, player_id: PlayerId, card_id: CardId, put_in_hand: bool) -> Result<()> {
        match self.pending_burst() {
            Some(opportunity) if opportunity.card == card_id => {}
            _ => return Err(EngineError::NoBurstOpportunity(card_id.as_u32())),
        }
        let choice = if put_in_hand {
            BurstChoice::ToHand
        } else {
            BurstChoice::PlayFree
        };
        self.resolve_burst(player_id, choice)
    }
}
