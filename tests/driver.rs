//! Async driver behavior with misbehaving and slow decision providers

use konivrer_rs::config::{DriverConfig, EngineConfig};
use konivrer_rs::core::{CardDefinition, Element, ElementalCost, PlayerId, PlayerKind};
use konivrer_rs::game::{
    AiDecision, AvailableAction, DecisionFuture, DecisionProvider, DecisionRequest, GameDriver, GameEngine,
    PlayerBehaviorSignal, ZeroController,
};
use konivrer_rs::loader::PlayerSetup;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const P1: PlayerId = PlayerId::new(0);
const P2: PlayerId = PlayerId::new(1);

fn deck() -> Vec<CardDefinition> {
    let mut cards = vec![CardDefinition::flag("Banner of the Deep")];
    for _ in 0..15 {
        cards.push(CardDefinition::familiar(
            "Reef Sentinel",
            ElementalCost::new().with(Element::Water, 1),
            2,
            Some(3),
        ));
    }
    cards
}

fn engine(p1: PlayerKind) -> GameEngine {
    let mut engine = GameEngine::new(EngineConfig::default());
    engine
        .initialize_game(&[
            PlayerSetup::new("Alice", p1, deck()),
            PlayerSetup::new("Bob", PlayerKind::Ai, deck()),
        ])
        .unwrap();
    engine
}

/// Never answers within any reasonable budget
struct Sleepy(PlayerId);

impl DecisionProvider for Sleepy {
    fn player_id(&self) -> PlayerId {
        self.0
    }

    fn name(&self) -> &str {
        "sleepy"
    }

    fn decide<'a>(&'a mut self, request: DecisionRequest) -> DecisionFuture<'a> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(AiDecision::immediate(ZeroController::choose(&request.actions)))
        })
    }
}

/// Always answers with something that is not on offer
struct Cheater(PlayerId);

impl DecisionProvider for Cheater {
    fn player_id(&self) -> PlayerId {
        self.0
    }

    fn name(&self) -> &str {
        "cheater"
    }

    fn decide<'a>(&'a mut self, _request: DecisionRequest) -> DecisionFuture<'a> {
        Box::pin(async { Ok(AiDecision::immediate(AvailableAction::DeclareAttackers(vec![]))) })
    }
}

/// Passes every time, asks for a long think, and remembers what it was shown
struct Observer {
    player: PlayerId,
    seen: Arc<Mutex<Vec<PlayerBehaviorSignal>>>,
}

impl DecisionProvider for Observer {
    fn player_id(&self) -> PlayerId {
        self.player
    }

    fn name(&self) -> &str {
        "observer"
    }

    fn decide<'a>(&'a mut self, request: DecisionRequest) -> DecisionFuture<'a> {
        self.seen.lock().unwrap().push(request.behavior);
        let action = if request.actions.contains(&AvailableAction::Pass) {
            AvailableAction::Pass
        } else {
            ZeroController::choose(&request.actions)
        };
        Box::pin(async move {
            Ok(AiDecision {
                action,
                thinking_time_ms: 60_000,
            })
        })
    }
}

#[tokio::test]
async fn timed_out_provider_falls_back_to_default() {
    let config = DriverConfig::default().with_timeout_ms(20);
    let mut driver = GameDriver::new(engine(PlayerKind::Ai), config).with_provider(Box::new(Sleepy(P1)));

    let started = Instant::now();
    assert!(driver.step().await.unwrap());
    assert!(started.elapsed() < Duration::from_secs(10));

    let session = driver.session();
    assert_eq!(session.decisions, 1);
    assert_eq!(session.fallbacks, 1);
    assert!(!session.ai_thinking);
    let last = session.last_decision.as_ref().unwrap();
    assert!(matches!(last.action, AvailableAction::PlayCard { .. }));
    let log = &driver.engine().get_state().unwrap().logger;
    assert!(log.messages().any(|m| m.contains("timed out")));
}

#[tokio::test]
async fn illegal_action_is_replaced() {
    let mut driver =
        GameDriver::new(engine(PlayerKind::Ai), DriverConfig::default()).with_provider(Box::new(Cheater(P1)));

    assert!(driver.step().await.unwrap());
    assert_eq!(driver.session().fallbacks, 1);
    let state = driver.engine().get_state().unwrap();
    assert!(state.logger.messages().any(|m| m.contains("illegal action")));
    assert_eq!(state.zone_cards(P1, konivrer_rs::zones::Zone::AzothRow).unwrap().len(), 1);
}

#[tokio::test]
async fn thinking_time_is_capped() {
    let seen = Arc::default();
    let config = DriverConfig::default().with_thinking_time(true);
    let config = DriverConfig {
        max_thinking_time_ms: 30,
        ..config
    };
    let mut driver = GameDriver::new(engine(PlayerKind::Ai), config).with_provider(Box::new(Observer {
        player: P1,
        seen: Arc::clone(&seen),
    }));

    let started = Instant::now();
    assert!(driver.step().await.unwrap());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(30));
    assert!(elapsed < Duration::from_secs(10));
    assert_eq!(driver.session().fallbacks, 0);
    assert_eq!(driver.session().last_decision.as_ref().unwrap().thinking_time_ms, 60_000);
}

#[tokio::test]
async fn providers_see_the_human_behavior_signal() {
    let seen: Arc<Mutex<Vec<PlayerBehaviorSignal>>> = Arc::default();
    let mut driver = GameDriver::new(engine(PlayerKind::Human), DriverConfig::default()).with_provider(Box::new(
        Observer {
            player: P2,
            seen: Arc::clone(&seen),
        },
    ));

    // Alice (human) passes up to Defense, where Bob decides
    for _ in 0..3 {
        driver.submit_human_action(P1, AvailableAction::Pass).unwrap();
    }
    assert!(driver.step().await.unwrap());
    for _ in 0..2 {
        driver.submit_human_action(P1, AvailableAction::Pass).unwrap();
    }
    assert_eq!(driver.engine().get_state().unwrap().active_player(), P2);
    assert_eq!(driver.session().history.len(), 6);

    assert!(driver.step().await.unwrap());
    let signal = *seen.lock().unwrap().last().unwrap();
    assert_eq!(signal.risk_taking, 0.0);
    assert_eq!(signal.aggressive_play, 0.0);
    assert_eq!(signal.resource_conservation, 1.0);
}

#[tokio::test]
async fn zero_versus_zero_runs_to_a_result() {
    let mut driver = GameDriver::new(engine(PlayerKind::Ai), DriverConfig::default().with_max_turns(100))
        .with_provider(Box::new(ZeroController::new(P1)))
        .with_provider(Box::new(ZeroController::new(P2)));

    let result = driver.run_to_completion().await.unwrap();
    let state = driver.engine().get_state().unwrap();
    assert_eq!(result.winner, state.get_winner());
    assert_eq!(result.turns_played, state.turn.turn_number);
    if !result.turn_limit_reached {
        assert!(state.is_game_over());
        assert!(result.end_reason.is_some());
    }
}
