//! The engine facade UIs and drivers talk to
//!
//! `GameEngine` owns the game, runs each operation against it, and
//! afterwards publishes whatever events the operation produced. Operations
//! a player can get wrong (an unpayable cost, a card that is not in hand)
//! are written to the game log and reported as a failure; nothing is
//! changed by a failed operation.

use crate::config::EngineConfig;
use crate::core::{CardId, ElementalCost, PlayerId};
use crate::game::controller::AvailableAction;
use crate::game::life::BurstChoice;
use crate::game::notify::{Notifier, Subscriber, SubscriptionId};
use crate::game::{GameState, InputRequest, PlayMethod};
use crate::loader::{GameInitializer, PlayerSetup};
use crate::{EngineError, Result};

#[derive(Debug, Default)]
pub struct GameEngine {
    state: Option<GameState>,
    notifier: Notifier,
    config: EngineConfig,
}

impl GameEngine {
    pub fn new(config: EngineConfig) -> Self {
        GameEngine {
            state: None,
            notifier: Notifier::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Deal a new game, replacing any game in progress
    pub fn initialize_game(&mut self, setups: &[PlayerSetup]) -> Result<&GameState> {
        let mut state = GameInitializer::new(&self.config).init_game(setups)?;
        let events = state.take_events();
        self.notifier.publish(&events, &state);
        Ok(self.state.insert(state))
    }

    /// Adopt an existing game (for example one restored from JSON)
    pub fn load_state(&mut self, mut state: GameState) {
        // Events belong to the session that produced them
        state.take_events();
        self.state = Some(state);
    }

    /// Read-only view of the game
    pub fn get_state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub(crate) fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    /// Independent copy of the game
    pub fn snapshot(&self) -> Result<GameState> {
        self.state.clone().ok_or(EngineError::NotInitialized)
    }

    /// The game as pretty-printed JSON
    pub fn export_json(&self) -> Result<String> {
        let state = self.state.as_ref().ok_or(EngineError::NotInitialized)?;
        Ok(serde_json::to_string_pretty(state)?)
    }

    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) -> SubscriptionId {
        self.notifier.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Run one operation, log a failure, then publish its events
    fn run<T>(&mut self, op: impl FnOnce(&mut GameState) -> Result<T>) -> Result<T> {
        let state = self.state.as_mut().ok_or(EngineError::NotInitialized)?;
        let result = op(state);
        if let Err(err) = &result {
            if err.is_user_correctable() {
                state.logger.normal(format!("Error: {err}"));
            } else {
                state.logger.engine_error(err.to_string());
            }
        }
        let events = state.take_events();
        self.notifier.publish(&events, state);
        result
    }

    fn active_player(&self) -> Result<PlayerId> {
        self.state
            .as_ref()
            .map(GameState::active_player)
            .ok_or(EngineError::NotInitialized)
    }

    /// Play a card for whoever may act; the failure reason goes to the log
    ///
    /// Hand plays are made by the active player, Burst by the owner of the
    /// pending opportunity.
    pub fn play_card(&mut self, card_id: CardId, method: PlayMethod, spend: ElementalCost) -> bool {
        let player = match (&method, self.state.as_ref()) {
            (_, None) => return false,
            (PlayMethod::Burst { .. }, Some(state)) => match state.pending_burst() {
                Some(burst) => burst.player,
                None => state.active_player(),
            },
            (_, Some(state)) => state.active_player(),
        };
        self.play_card_as(player, card_id, &method, &spend).is_ok()
    }

    pub fn play_card_as(
        &mut self,
        player_id: PlayerId,
        card_id: CardId,
        method: &PlayMethod,
        spend: &ElementalCost,
    ) -> Result<()> {
        self.run(|state| state.play_card(player_id, card_id, method, spend))
    }

    pub fn can_pay_cost(&self, player_id: PlayerId, cost: &ElementalCost, spend: &ElementalCost) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.can_pay_cost(player_id, cost, spend))
    }

    pub fn available_azoth(&self, player_id: PlayerId) -> Result<ElementalCost> {
        self.state
            .as_ref()
            .ok_or(EngineError::NotInitialized)?
            .available_azoth(player_id)
    }

    pub fn enter_start(&mut self) -> Result<()> {
        self.run(GameState::enter_start)
    }

    pub fn enter_main(&mut self) -> Result<()> {
        self.run(GameState::enter_main)
    }

    pub fn enter_combat(&mut self) -> Result<()> {
        self.run(GameState::enter_combat)
    }

    pub fn enter_defense(&mut self) -> Result<()> {
        self.run(GameState::enter_defense)
    }

    pub fn enter_resolution(&mut self) -> Result<()> {
        self.run(GameState::enter_resolution)
    }

    pub fn enter_post_combat(&mut self) -> Result<()> {
        self.run(GameState::enter_post_combat)
    }

    pub fn enter_refresh(&mut self) -> Result<()> {
        self.run(GameState::enter_refresh)
    }

    pub fn advance_phase(&mut self) -> Result<()> {
        self.run(GameState::advance_phase)
    }

    pub fn end_current_turn(&mut self) -> Result<()> {
        self.run(GameState::end_current_turn)
    }

    /// Attack with the active player's Familiars
    pub fn declare_attackers(&mut self, attackers: &[CardId]) -> Result<()> {
        let player = self.active_player()?;
        self.run(|state| state.declare_attackers(player, attackers))
    }

    /// Block for the defending player with (blocker, attacker) pairs
    pub fn declare_blockers(&mut self, pairs: &[(CardId, CardId)]) -> Result<()> {
        let player = self.active_player()?;
        self.run(|state| {
            let defender = state.opponent_of(player)?;
            state.declare_blockers(defender, pairs)
        })
    }

    /// Answer the pending Burst opportunity for its owner
    pub fn resolve_burst(&mut self, choice: BurstChoice) -> Result<()> {
        self.run(|state| {
            let burst = state
                .pending_burst()
                .ok_or(EngineError::NoBurstOpportunity(state.active_player().as_u32()))?;
            state.resolve_burst(burst.player, choice)
        })
    }

    pub fn damage_player(
        &mut self,
        target: PlayerId,
        amount: u32,
        source_player: Option<PlayerId>,
        source_card: Option<CardId>,
    ) -> Result<Vec<CardId>> {
        self.run(|state| state.damage_player(target, amount, source_player, source_card))
    }

    pub fn concede(&mut self, player_id: PlayerId) -> Result<()> {
        self.run(|state| state.concede(player_id))
    }

    pub fn awaiting_input(&self) -> Option<InputRequest> {
        self.state.as_ref().and_then(GameState::awaiting_input)
    }

    pub fn is_game_over(&self) -> bool {
        self.state.as_ref().is_some_and(GameState::is_game_over)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state.as_ref().and_then(GameState::get_winner)
    }

    /// Player the game is waiting on, if a game is running
    pub fn deciding_player(&self) -> Option<PlayerId> {
        self.state
            .as_ref()
            .filter(|state| !state.is_game_over())
            .map(GameState::deciding_player)
    }

    pub fn available_actions(&self, player_id: PlayerId) -> Vec<AvailableAction> {
        self.state
            .as_ref()
            .map(|state| state.available_actions(player_id))
            .unwrap_or_default()
    }

    pub fn apply_action(&mut self, player_id: PlayerId, action: &AvailableAction) -> Result<()> {
        self.run(|state| state.apply_action(player_id, action))
    }
}
