//! Async game driver
//!
//! Asks each AI seat's `DecisionProvider` what to do whenever the game is
//! waiting on that seat, and applies the answer through the engine.
//! When a provider fails to produce a legal action within its time limit,
//! the Zero choice is used for that one decision instead. Human seats have no provider;
//! their actions come in through `submit_human_action`.

use crate::config::DriverConfig;
use crate::core::PlayerId;
use crate::game::controller::{AiDecision, AvailableAction, DecisionProvider, DecisionRequest};
use crate::game::session::{ActionRecord, SessionContext};
use crate::game::zero_controller::ZeroController;
use crate::game::{GameEndReason, GameEngine, GameState};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How a driven game stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<PlayerId>,
    pub turns_played: u32,
    pub end_reason: Option<GameEndReason>,
    pub turn_limit_reached: bool,
    /// Human player the game is waiting on, if it stopped for input
    pub waiting_on: Option<PlayerId>,
}

pub struct GameDriver {
    engine: GameEngine,
    providers: Vec<Box<dyn DecisionProvider>>,
    session: SessionContext,
    config: DriverConfig,
    /// When the game last changed hands, for timing human decisions
    last_action_at: Instant,
}

impl GameDriver {
    pub fn new(engine: GameEngine, config: DriverConfig) -> Self {
        GameDriver {
            engine,
            providers: Vec::new(),
            session: SessionContext::new(),
            config,
            last_action_at: Instant::now(),
        }
    }

    /// Let `provider` decide for the player it names, replacing any earlier one
    pub fn with_provider(mut self, provider: Box<dyn DecisionProvider>) -> Self {
        self.set_provider(provider);
        self
    }

    pub fn set_provider(&mut self, provider: Box<dyn DecisionProvider>) {
        let player = provider.player_id();
        self.providers.retain(|p| p.player_id() != player);
        self.providers.push(provider);
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn into_engine(self) -> GameEngine {
        self.engine
    }

    fn state(&self) -> Result<&GameState> {
        self.engine.get_state().ok_or(EngineError::NotInitialized)
    }

    fn human_player(state: &GameState) -> Option<PlayerId> {
        state.players.iter().find(|p| p.is_human()).map(|p| p.id)
    }

    /// Apply an action chosen by a human and record it
    pub fn submit_human_action(&mut self, player_id: PlayerId, action: AvailableAction) -> Result<()> {
        let elapsed_ms = self.last_action_at.elapsed().as_millis() as u64;
        let record = ActionRecord::new(self.state()?, player_id, action.clone(), elapsed_ms);
        self.engine.apply_action(player_id, &action)?;
        self.session.record(record);
        self.last_action_at = Instant::now();
        Ok(())
    }

    /// Make one AI decision, if an AI seat is up
    ///
    /// Returns `false` when there is nothing for the driver to do: the game
    /// is over or a human must act.
    pub async fn step(&mut self) -> Result<bool> {
        let state = self.state()?;
        if state.is_game_over() {
            return Ok(false);
        }
        let player = state.deciding_player();
        let actions = state.available_actions(player);
        if actions.is_empty() {
            return Ok(false);
        }
        let Some(index) = self.providers.iter().position(|p| p.player_id() == player) else {
            return Ok(false);
        };

        let request = DecisionRequest {
            snapshot: state.clone(),
            player_id: player,
            actions: actions.clone(),
            behavior: self.session.behavior_signal(Self::human_player(state)),
        };

        self.session.ai_thinking = true;
        self.session.decisions += 1;
        let started = Instant::now();
        let limit = self.config.decision_timeout_ms;
        let provider = &mut self.providers[index];
        let name = provider.name().to_string();
        let outcome = tokio::time::timeout(Duration::from_millis(limit), provider.decide(request)).await;
        self.session.ai_thinking = false;

        let failure = match outcome {
            Ok(Ok(decision)) if actions.contains(&decision.action) => Ok(decision),
            Ok(Ok(decision)) => Err(format!("illegal action ({})", decision.action)),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(EngineError::ProviderTimeout(limit).to_string()),
        };
        let decision = match failure {
            Ok(decision) => decision,
            Err(reason) => {
                self.session.fallbacks += 1;
                self.note(format!("{name} failed: {reason}; using the default action"));
                AiDecision::immediate(ZeroController::choose(&actions))
            }
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if self.config.honor_thinking_time && decision.thinking_time_ms > 0 {
            let delay = decision.thinking_time_ms.min(self.config.max_thinking_time_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        self.apply_decision(player, &name, &decision.action, &actions, elapsed_ms)?;
        self.session.last_decision = Some(decision);
        self.last_action_at = Instant::now();
        Ok(true)
    }

    /// Apply a provider's action; should it still fail, apply the default instead
    fn apply_decision(
        &mut self,
        player: PlayerId,
        name: &str,
        action: &AvailableAction,
        actions: &[AvailableAction],
        elapsed_ms: u64,
    ) -> Result<()> {
        let record = ActionRecord::new(self.state()?, player, action.clone(), elapsed_ms);
        if let Some(state) = self.engine.state_mut() {
            state.logger.controller_choice(name, &action.to_string());
        }
        match self.engine.apply_action(player, action) {
            Ok(()) => {
                self.session.record(record);
                Ok(())
            }
            Err(err) => {
                let fallback = ZeroController::choose(actions);
                if &fallback == action {
                    return Err(err);
                }
                self.session.fallbacks += 1;
                let record = ActionRecord::new(self.state()?, player, fallback.clone(), elapsed_ms);
                self.engine.apply_action(player, &fallback)?;
                self.session.record(record);
                Ok(())
            }
        }
    }

    fn note(&mut self, message: String) {
        if let Some(state) = self.engine.state_mut() {
            state.logger.normal(message);
        }
    }

    /// Drive AI decisions until the game ends, a human must act, or the turn limit is hit
    pub async fn run_to_completion(&mut self) -> Result<GameResult> {
        let mut turn_limit_reached = false;
        loop {
            let state = self.state()?;
            if state.is_game_over() {
                break;
            }
            if self.config.max_turns > 0 && state.turn.turn_number > self.config.max_turns {
                turn_limit_reached = true;
                break;
            }
            if !self.step().await? {
                break;
            }
        }

        let state = self.state()?;
        let waiting_on = if state.is_game_over() || turn_limit_reached {
            None
        } else {
            Some(state.deciding_player())
        };
        Ok(GameResult {
            winner: state.get_winner(),
            turns_played: state.turn.turn_number,
            end_reason: state.end_reason,
            turn_limit_reached,
            waiting_on,
        })
    }
}
