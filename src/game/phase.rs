//! Turn phases

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phases of a turn, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Start,
    Main,
    Combat,
    Defense,
    Resolution,
    PostCombat,
    Refresh,
}

impl Phase {
    /// Get the next phase in turn order
    ///
    /// Returns None after Refresh; the turn ends there.
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Start => Some(Phase::Main),
            Phase::Main => Some(Phase::Combat),
            Phase::Combat => Some(Phase::Defense),
            Phase::Defense => Some(Phase::Resolution),
            Phase::Resolution => Some(Phase::PostCombat),
            Phase::PostCombat => Some(Phase::Refresh),
            Phase::Refresh => None,
        }
    }

    /// Can cards be played from hand (other than the Start Azoth) in this phase?
    pub fn is_main(&self) -> bool {
        matches!(self, Phase::Main | Phase::PostCombat)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Start => "Start",
            Phase::Main => "Main",
            Phase::Combat => "Combat",
            Phase::Defense => "Defense",
            Phase::Resolution => "Resolution",
            Phase::PostCombat => "Post-Combat",
            Phase::Refresh => "Refresh",
        };
        write!(f, "{name}")
    }
}

/// Represents the current turn structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStructure {
    /// Current turn number (starts at 1)
    pub turn_number: u32,

    pub current_phase: Phase,

    /// Active player (whose turn it is)
    pub active_player: PlayerId,

    /// Player who took the first turn of the game
    pub first_player: PlayerId,
}

impl TurnStructure {
    pub fn new(starting_player: PlayerId) -> Self {
        TurnStructure {
            turn_number: 1,
            current_phase: Phase::Start,
            active_player: starting_player,
            first_player: starting_player,
        }
    }

    /// Hand the turn to `next_player`
    ///
    /// The turn number only moves when control returns to the first player,
    /// so both players' turns share a number.
    pub fn next_turn(&mut self, next_player: PlayerId) {
        self.active_player = next_player;
        if next_player == self.first_player {
            self.turn_number += 1;
        }
        self.current_phase = Phase::Start;
    }
}
