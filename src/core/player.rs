//! Player representation

use crate::core::{CardId, EntityId, GameEntity, PlayerName};
use serde::{Deserialize, Serialize};

pub type PlayerId = EntityId<Player>;

/// Who makes this player's decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Ai,
}

/// Represents a player in the game
///
/// Card zones live in `PlayerZones`; this holds identity and per-turn flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    pub name: PlayerName,

    pub kind: PlayerKind,

    /// The deck's Flag card, set aside before play
    pub flag: Option<CardId>,

    pub has_lost: bool,

    /// Azoth placements made during the current Start phase
    pub start_azoth_placed: u8,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, kind: PlayerKind) -> Self {
        Player {
            id,
            name: name.into(),
            kind,
            flag: None,
            has_lost: false,
            start_azoth_placed: 0,
        }
    }

    pub fn is_human(&self) -> bool {
        self.kind == PlayerKind::Human
    }

    /// Only one card may be placed as Azoth during the Start phase
    pub fn can_place_start_azoth(&self) -> bool {
        self.start_azoth_placed == 0
    }

    pub fn record_start_azoth(&mut self) {
        self.start_azoth_placed += 1;
    }

    pub fn reset_turn_flags(&mut self) {
        self.start_azoth_placed = 0;
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let id = PlayerId::new(1);
        let player = Player::new(id, "Alice", PlayerKind::Human);

        assert_eq!(player.id, id);
        assert_eq!(player.name.as_str(), "Alice");
        assert!(player.is_human());
        assert!(player.flag.is_none());
        assert!(!player.has_lost);
    }

    #[test]
    fn test_start_azoth_limit() {
        let mut player = Player::new(PlayerId::new(1), "Bot", PlayerKind::Ai);

        assert!(player.can_place_start_azoth());
        player.record_start_azoth();
        assert!(!player.can_place_start_azoth());

        player.reset_turn_flags();
        assert!(player.can_place_start_azoth());
    }
}
