//! Core game state, rules, and turn structure

pub mod actions;
pub mod combat;
pub mod controller;
pub mod engine;
pub mod game_loop;
pub mod ledger;
pub mod life;
pub mod logger;
pub mod notify;
pub mod phase;
pub mod random_controller;
pub mod session;
pub mod state;
pub mod turn;
pub mod zero_controller;

pub use actions::PlayMethod;
pub use combat::{CombatOutcome, CombatState};
pub use controller::{AiDecision, AvailableAction, DecisionFuture, DecisionProvider, DecisionRequest, PlayerBehaviorSignal};
pub use engine::GameEngine;
pub use game_loop::{GameDriver, GameResult};
pub use ledger::generic_paid;
pub use life::BurstChoice;
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use notify::{GameEvent, Notifier, Subscriber, SubscriptionId};
pub use phase::{Phase, TurnStructure};
pub use random_controller::RandomController;
pub use session::{ActionRecord, SessionContext};
pub use state::{BurstOpportunity, GameEndReason, GameState, InputRequest};
pub use zero_controller::ZeroController;
