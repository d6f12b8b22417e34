//! State-change notifications
//!
//! Mechanics record typed events while they mutate the game; once an
//! operation finishes the engine hands each event, together with the
//! resulting state, to every subscriber. Subscribers only ever see the
//! state between operations.

use crate::core::{CardId, PlayerId};
use crate::game::actions::PlayMethod;
use crate::game::combat::CombatOutcome;
use crate::game::life::BurstChoice;
use crate::game::{GameEndReason, GameState, Phase};
use serde::{Deserialize, Serialize};

/// Something that happened in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted {
        first_player: PlayerId,
    },
    PhaseEntered {
        phase: Phase,
        active_player: PlayerId,
        turn: u32,
    },
    CardPlayed {
        player: PlayerId,
        card: CardId,
        method: PlayMethod,
    },
    LifeCardsRevealed {
        player: PlayerId,
        cards: Vec<CardId>,
    },
    BurstResolved {
        player: PlayerId,
        card: CardId,
        choice: BurstChoice,
    },
    AttackersDeclared {
        player: PlayerId,
        attackers: Vec<CardId>,
    },
    BlockersDeclared {
        player: PlayerId,
        pairs: Vec<(CardId, CardId)>,
    },
    CombatResolved {
        attacker: PlayerId,
        outcome: CombatOutcome,
    },
    AzothRefreshed {
        player: PlayerId,
    },
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },
    GameOver {
        winner: PlayerId,
        reason: GameEndReason,
    },
}

/// Receives every event with the full state after the mutation that caused it
pub trait Subscriber: Send {
    fn on_event(&mut self, event: &GameEvent, state: &GameState);
}

impl<F> Subscriber for F
where
    F: FnMut(&GameEvent, &GameState) + Send,
{
    fn on_event(&mut self, event: &GameEvent, state: &GameState) {
        self(event, state)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Registered subscribers, called in subscription order
#[derive(Default)]
pub struct Notifier {
    subscribers: Vec<(SubscriptionId, Box<dyn Subscriber>)>,
    next_id: u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false when the id was not (or no longer) registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn publish(&mut self, events: &[GameEvent], state: &GameState) {
        for event in events {
            for (_, subscriber) in self.subscribers.iter_mut() {
                subscriber.on_event(event, state);
            }
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerKind;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_subscribe_and_publish() {
        let state = GameState::new_two_player(("Alice", PlayerKind::Human), ("Bob", PlayerKind::Ai));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut notifier = Notifier::new();
        let id = notifier.subscribe(move |event: &GameEvent, state: &GameState| {
            sink.lock().unwrap().push((event.clone(), state.turn.turn_number));
        });

        let event = GameEvent::AzothRefreshed {
            player: PlayerId::new(0),
        };
        notifier.publish(std::slice::from_ref(&event), &state);
        assert_eq!(seen.lock().unwrap().as_slice(), &[(event.clone(), 1)]);

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.publish(&[event], &state);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
