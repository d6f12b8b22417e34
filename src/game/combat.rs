//! Combat: declaring attackers and blockers, then resolving damage

use crate::core::{CardId, PlayerId};
use crate::game::{GameEvent, GameState, InputRequest, Phase};
use crate::zones::Zone;
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Combat state for the current turn
///
/// Uses BTreeMap for deterministic iteration order. Reset after resolution.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CombatState {
    /// Attacking Familiars, mapped to the player they attack
    pub attackers: BTreeMap<CardId, PlayerId>,

    /// Blocker -> the single attacker it blocks
    pub blockers: BTreeMap<CardId, CardId>,

    /// Reverse mapping: attacker -> its blocker
    pub attacker_blockers: BTreeMap<CardId, CardId>,

    /// Whether attackers were declared this turn
    pub combat_active: bool,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_attacker(&mut self, attacker: CardId, defending_player: PlayerId) {
        self.attackers.insert(attacker, defending_player);
        self.combat_active = true;
    }

    pub fn declare_blocker(&mut self, blocker: CardId, attacker: CardId) {
        self.blockers.insert(blocker, attacker);
        self.attacker_blockers.insert(attacker, blocker);
    }

    pub fn is_attacking(&self, card_id: CardId) -> bool {
        self.attackers.contains_key(&card_id)
    }

    pub fn is_blocking(&self, card_id: CardId) -> bool {
        self.blockers.contains_key(&card_id)
    }

    pub fn is_blocked(&self, attacker: CardId) -> bool {
        self.attacker_blockers.contains_key(&attacker)
    }

    pub fn get_blocker(&self, attacker: CardId) -> Option<CardId> {
        self.attacker_blockers.get(&attacker).copied()
    }

    /// Clear all combat state (called after resolution)
    pub fn clear(&mut self) {
        self.attackers.clear();
        self.blockers.clear();
        self.attacker_blockers.clear();
        self.combat_active = false;
    }
}

/// What happened when combat resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Damage dealt to the defending player by unblocked attackers
    pub player_damage: u32,
    /// Life Cards revealed by that damage
    pub revealed: Vec<CardId>,
    /// Familiars destroyed in blocked fights
    pub destroyed: Vec<CardId>,
}

impl GameState {
    fn ensure_phase(&self, phase: Phase) -> Result<()> {
        if self.turn.current_phase != phase {
            return Err(EngineError::WrongPhase(self.turn.current_phase.to_string()));
        }
        Ok(())
    }

    /// Field Familiars the active player could attack with
    pub fn eligible_attackers(&self, player_id: PlayerId) -> Result<Vec<CardId>> {
        let field = self.zone_cards(player_id, Zone::Field)?;
        let mut eligible = Vec::new();
        for &card_id in field {
            let card = self.cards.get(card_id)?;
            if card.is_familiar() && !card.summoning_sick {
                eligible.push(card_id);
            }
        }
        Ok(eligible)
    }

    /// Declare attackers for the active player (Combat phase)
    ///
    /// All declarations are validated before any card moves.
    pub fn declare_attackers(&mut self, player_id: PlayerId, attackers: &[CardId]) -> Result<()> {
        self.ensure_in_progress()?;
        self.ensure_not_blocked()?;
        self.ensure_phase(Phase::Combat)?;
        if player_id != self.turn.active_player {
            return Err(EngineError::NotActingPlayer(player_id.as_u32()));
        }

        let eligible = self.eligible_attackers(player_id)?;
        for (i, card_id) in attackers.iter().enumerate() {
            if attackers[..i].contains(card_id) {
                return Err(EngineError::InvalidDeclaration(format!(
                    "{} declared twice",
                    self.card_name(*card_id)
                )));
            }
            if !eligible.contains(card_id) {
                return Err(EngineError::InvalidDeclaration(format!(
                    "{} cannot attack",
                    self.card_name(*card_id)
                )));
            }
        }

        let defender = self.opponent_of(player_id)?;
        for &card_id in attackers {
            self.move_card(card_id, Zone::Field, Zone::CombatRow, player_id)?;
            self.combat.declare_attacker(card_id, defender);
        }

        if !attackers.is_empty() {
            let name = self.player_name(player_id);
            let names: Vec<String> = attackers.iter().map(|&id| self.card_name(id)).collect();
            self.logger
                .normal(format!("{name} attacks with {}", names.join(", ")));
        }
        self.emit(GameEvent::AttackersDeclared {
            player: player_id,
            attackers: attackers.to_vec(),
        });
        Ok(())
    }

    /// Field Familiars the defending player could block with
    pub fn eligible_blockers(&self, player_id: PlayerId) -> Result<Vec<CardId>> {
        let field = self.zone_cards(player_id, Zone::Field)?;
        let mut eligible = Vec::new();
        for &card_id in field {
            if self.cards.get(card_id)?.is_familiar() {
                eligible.push(card_id);
            }
        }
        Ok(eligible)
    }

    /// Declare blockers for the defending player (Defense phase)
    ///
    /// Each pair is (blocker, attacker). An attacker takes at most one blocker.
    pub fn declare_blockers(&mut self, player_id: PlayerId, pairs: &[(CardId, CardId)]) -> Result<()> {
        self.ensure_in_progress()?;
        self.ensure_not_blocked()?;
        self.ensure_phase(Phase::Defense)?;
        let defender = self.opponent_of(self.turn.active_player)?;
        if player_id != defender {
            return Err(EngineError::NotActingPlayer(player_id.as_u32()));
        }

        let eligible = self.eligible_blockers(player_id)?;
        for (i, &(blocker, attacker)) in pairs.iter().enumerate() {
            let earlier = &pairs[..i];
            if !eligible.contains(&blocker) || earlier.iter().any(|&(b, _)| b == blocker) {
                return Err(EngineError::InvalidDeclaration(format!(
                    "{} cannot block",
                    self.card_name(blocker)
                )));
            }
            if !self.combat.is_attacking(attacker)
                || self.combat.is_blocked(attacker)
                || earlier.iter().any(|&(_, a)| a == attacker)
            {
                return Err(EngineError::InvalidDeclaration(format!(
                    "{} is not an unblocked attacker",
                    self.card_name(attacker)
                )));
            }
        }

        for &(blocker, attacker) in pairs {
            self.move_card(blocker, Zone::Field, Zone::CombatRow, player_id)?;
            self.combat.declare_blocker(blocker, attacker);
            let (blocker_name, attacker_name) = (self.card_name(blocker), self.card_name(attacker));
            self.logger
                .normal(format!("{blocker_name} blocks {attacker_name}"));
        }

        if matches!(self.prompt, Some(InputRequest::BlockerDeclaration { .. })) {
            self.prompt = None;
        }
        self.emit(GameEvent::BlockersDeclared {
            player: player_id,
            pairs: pairs.to_vec(),
        });
        Ok(())
    }

    /// Resolve combat damage for the current attack
    ///
    /// Blocked pairs mark damage on each other; unblocked attackers damage
    /// the defending player through the Life Cards. Both combat rows are
    /// emptied afterwards in every case.
    pub fn resolve_combat(&mut self) -> Result<CombatOutcome> {
        let attacker_id = self.turn.active_player;
        let defender_id = self.opponent_of(attacker_id)?;
        let attackers = self.zone_cards(attacker_id, Zone::CombatRow)?.to_vec();
        let mut outcome = CombatOutcome::default();

        for attacker in attackers {
            if self.game_over {
                break;
            }
            let attack_damage = self.cards.get(attacker)?.combat_damage();
            match self.combat.get_blocker(attacker) {
                Some(blocker) => {
                    let block_damage = self.cards.get(blocker)?.combat_damage();
                    self.cards.get_mut(attacker)?.damage += block_damage;
                    self.cards.get_mut(blocker)?.damage += attack_damage;
                    self.logger.verbose(format!(
                        "{} and {} trade {attack_damage}/{block_damage} damage",
                        self.card_name(attacker),
                        self.card_name(blocker)
                    ));
                }
                None => {
                    outcome.player_damage += attack_damage;
                    let revealed = self.damage_player(defender_id, attack_damage, Some(attacker_id), Some(attacker))?;
                    outcome.revealed.extend(revealed);
                }
            }
        }

        outcome.destroyed = self.clear_combat_rows()?;
        self.emit(GameEvent::CombatResolved {
            attacker: attacker_id,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }

    /// Send survivors back to the field and destroyed Familiars to the discard pile
    pub(crate) fn clear_combat_rows(&mut self) -> Result<Vec<CardId>> {
        let mut destroyed = Vec::new();
        let player_ids: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        for player_id in player_ids {
            let row = self.zone_cards(player_id, Zone::CombatRow)?.to_vec();
            for card_id in row {
                if self.cards.get(card_id)?.is_destroyed() {
                    self.move_card(card_id, Zone::CombatRow, Zone::Discard, player_id)?;
                    self.cards.get_mut(card_id)?.reset_battle_state();
                    let name = self.card_name(card_id);
                    self.logger.normal(format!("{name} was destroyed"));
                    destroyed.push(card_id);
                } else {
                    self.move_card(card_id, Zone::CombatRow, Zone::Field, player_id)?;
                }
            }
        }
        self.combat.clear();
        Ok(destroyed)
    }
}
