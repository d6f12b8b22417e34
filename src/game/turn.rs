//! Phase transitions
//!
//! START -> MAIN -> COMBAT -> DEFENSE -> RESOLUTION -> POST_COMBAT -> REFRESH,
//! after which the other player's START begins. Every transition refuses to
//! run once the game is over or while a Burst decision is outstanding.

use crate::game::{GameEvent, GameState, InputRequest, Phase};
use crate::zones::Zone;
use crate::Result;

impl GameState {
    fn begin_phase(&mut self, phase: Phase) -> Result<()> {
        self.ensure_in_progress()?;
        self.ensure_not_blocked()?;

        self.turn.current_phase = phase;
        self.prompt = None;
        let name = self.player_name(self.turn.active_player);
        self.logger.normal(format!("{name} enters {phase} Phase"));
        self.emit(GameEvent::PhaseEntered {
            phase,
            active_player: self.turn.active_player,
            turn: self.turn.turn_number,
        });
        Ok(())
    }

    /// Start of turn: the active player's Familiars shake off summoning
    /// sickness, and they may place one card as Azoth
    pub fn enter_start(&mut self) -> Result<()> {
        self.begin_phase(Phase::Start)?;
        let active = self.turn.active_player;

        for card_id in self.zone_cards(active, Zone::Field)?.to_vec() {
            self.cards.get_mut(card_id)?.summoning_sick = false;
        }
        self.get_player_mut(active)?.reset_turn_flags();
        self.prompt = Some(InputRequest::OptionalAzothPlacement { player: active });
        Ok(())
    }

    pub fn enter_main(&mut self) -> Result<()> {
        self.begin_phase(Phase::Main)
    }

    pub fn enter_combat(&mut self) -> Result<()> {
        self.begin_phase(Phase::Combat)
    }

    /// The defending player may now declare blockers
    pub fn enter_defense(&mut self) -> Result<()> {
        self.begin_phase(Phase::Defense)?;
        let defender = self.opponent_of(self.turn.active_player)?;
        if self.combat.combat_active {
            let name = self.player_name(defender);
            self.logger.normal(format!("{name} may declare blockers"));
            self.prompt = Some(InputRequest::BlockerDeclaration { player: defender });
        }
        Ok(())
    }

    pub fn enter_resolution(&mut self) -> Result<()> {
        self.begin_phase(Phase::Resolution)?;
        self.logger.normal("Resolving combat damage");
        self.resolve_combat()?;
        Ok(())
    }

    pub fn enter_post_combat(&mut self) -> Result<()> {
        self.begin_phase(Phase::PostCombat)
    }

    /// Refresh Azoth, clear marked damage, then hand the turn over
    pub fn enter_refresh(&mut self) -> Result<()> {
        self.begin_phase(Phase::Refresh)?;
        let active = self.turn.active_player;

        // Turn ended early with combatants still out
        if self.player_zones.iter().any(|(_, zones)| !zones.combat_row.is_empty()) {
            self.clear_combat_rows()?;
        }

        self.refresh_azoth(active)?;
        let player_ids: Vec<_> = self.players.iter().map(|p| p.id).collect();
        for player_id in player_ids {
            for card_id in self.zone_cards(player_id, Zone::Field)?.to_vec() {
                self.cards.get_mut(card_id)?.damage = 0;
            }
        }

        self.end_turn()
    }

    fn end_turn(&mut self) -> Result<()> {
        let finished = self.turn.active_player;
        let next = self.opponent_of(finished)?;
        self.emit(GameEvent::TurnEnded {
            player: finished,
            next_player: next,
        });
        self.turn.next_turn(next);

        let name = self.player_name(next);
        self.logger
            .normal(format!("Turn {} begins: {name}'s turn", self.turn.turn_number));
        self.enter_start()
    }

    /// Enter whichever phase follows the current one
    pub fn advance_phase(&mut self) -> Result<()> {
        match self.turn.current_phase.next() {
            Some(Phase::Start) | None => self.enter_start(),
            Some(Phase::Main) => self.enter_main(),
            Some(Phase::Combat) => self.enter_combat(),
            Some(Phase::Defense) => self.enter_defense(),
            Some(Phase::Resolution) => self.enter_resolution(),
            Some(Phase::PostCombat) => self.enter_post_combat(),
            Some(Phase::Refresh) => self.enter_refresh(),
        }
    }

    /// End the turn from any phase; Azoth still refreshes on the way out
    pub fn end_current_turn(&mut self) -> Result<()> {
        self.enter_refresh()
    }
}
