//! Game initialization from decks
//!
//! Deals a fresh two-player game: each deck is shuffled, its Flag is set
//! aside, the top cards become Life Cards, and opening hands are drawn
//! before the first Start phase.

use crate::config::EngineConfig;
use crate::core::{CardDefinition, PlayerId, PlayerKind};
use crate::game::{GameEvent, GameState};
use crate::loader::DeckList;
use crate::zones::Zone;
use crate::{EngineError, Result};
use std::sync::Arc;

/// One seat at the table
#[derive(Debug, Clone)]
pub struct PlayerSetup {
    pub name: String,
    pub kind: PlayerKind,
    /// Full deck including its Flag
    pub deck: Vec<CardDefinition>,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>, kind: PlayerKind, deck: Vec<CardDefinition>) -> Self {
        PlayerSetup {
            name: name.into(),
            kind,
            deck,
        }
    }

    pub fn from_deck_list(name: impl Into<String>, kind: PlayerKind, deck: &DeckList) -> Self {
        Self::new(name, kind, deck.to_cards())
    }
}

/// Game builder for initializing games from decks
pub struct GameInitializer<'a> {
    config: &'a EngineConfig,
}

impl<'a> GameInitializer<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        GameInitializer { config }
    }

    /// Initialize a two-player game; the first setup takes the first turn
    pub fn init_game(&self, setups: &[PlayerSetup]) -> Result<GameState> {
        let [first, second] = setups else {
            return Err(EngineError::InvalidSetup(format!(
                "expected 2 players, got {}",
                setups.len()
            )));
        };
        for setup in setups {
            self.check_deck(setup)?;
        }

        let mut game = GameState::new_two_player(
            (first.name.clone(), first.kind),
            (second.name.clone(), second.kind),
        );
        game.seed_rng(self.config.seed);
        game.logger.set_verbosity(self.config.verbosity);
        game.logger.set_output_mode(self.config.output_mode);

        let player_ids: Vec<PlayerId> = game.players.iter().map(|p| p.id).collect();
        for (&player_id, setup) in player_ids.iter().zip(setups) {
            self.load_deck_into_game(&mut game, player_id, setup)?;
        }

        game.logger.normal("Game started");
        for &player_id in &player_ids {
            game.draw_cards(player_id, self.config.opening_hand)?;
        }
        game.logger.normal("Players drew starting hands");

        let first_player = game.turn.first_player;
        game.emit(GameEvent::GameStarted { first_player });
        let name = game.player_name(first_player);
        game.logger
            .normal(format!("Turn {} begins: {name}'s turn", game.turn.turn_number));
        game.enter_start()?;
        Ok(game)
    }

    fn check_deck(&self, setup: &PlayerSetup) -> Result<()> {
        let flags = setup.deck.iter().filter(|card| card.is_flag()).count();
        if flags != 1 {
            return Err(EngineError::InvalidSetup(format!(
                "{}'s deck must contain exactly one Flag card, found {flags}",
                setup.name
            )));
        }
        let playable = setup.deck.len() - flags;
        if playable < self.config.life_cards {
            return Err(EngineError::InvalidSetup(format!(
                "{}'s deck has {playable} cards, fewer than the {} Life Cards needed",
                setup.name, self.config.life_cards
            )));
        }
        Ok(())
    }

    /// Shuffle the deck in, set the Flag aside, and deal Life Cards
    fn load_deck_into_game(&self, game: &mut GameState, player_id: PlayerId, setup: &PlayerSetup) -> Result<()> {
        for definition in &setup.deck {
            game.add_card_to_deck(player_id, Arc::new(definition.clone()))?;
        }
        game.shuffle_deck(player_id)?;

        let flag = game
            .zone_cards(player_id, Zone::Deck)?
            .iter()
            .copied()
            .find(|&id| game.cards.get(id).map(|c| c.definition.is_flag()).unwrap_or(false))
            .ok_or_else(|| EngineError::InvalidSetup(format!("{} has no Flag card", setup.name)))?;
        game.move_card(flag, Zone::Deck, Zone::Flag, player_id)?;
        game.get_player_mut(player_id)?.flag = Some(flag);

        for _ in 0..self.config.life_cards {
            let Some(card_id) = game.get_player_zones(player_id)?.deck.peek_top() else {
                break;
            };
            game.move_card(card_id, Zone::Deck, Zone::LifeCards, player_id)?;
        }

        let flag_name = game.card_name(flag);
        game.logger
            .verbose(format!("{} plays under {flag_name}", setup.name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ElementalCost;
    use crate::game::Phase;

    fn deck(size: usize) -> Vec<CardDefinition> {
        let mut cards = vec![CardDefinition::flag("Banner")];
        for i in 0..size {
            cards.push(CardDefinition::familiar(
                format!("Pup {i}"),
                ElementalCost::generic(1),
                1,
                Some(1),
            ));
        }
        cards
    }

    #[test]
    fn test_deal() {
        let config = EngineConfig::default();
        let setups = [
            PlayerSetup::new("Alice", PlayerKind::Human, deck(10)),
            PlayerSetup::new("Bob", PlayerKind::Ai, deck(10)),
        ];
        let game = GameInitializer::new(&config).init_game(&setups).unwrap();

        for player in &game.players {
            let zones = game.get_player_zones(player.id).unwrap();
            assert_eq!(zones.hand.len(), 2);
            assert_eq!(zones.life_cards.len(), 4);
            assert_eq!(zones.flag.len(), 1);
            assert_eq!(zones.deck.len(), 4);
            assert!(player.flag.is_some());
        }
        assert_eq!(game.current_phase(), Phase::Start);
        assert_eq!(game.turn.turn_number, 1);
        game.check_zone_integrity().unwrap();
    }

    #[test]
    fn test_same_seed_same_deal() {
        let config = EngineConfig::default().with_seed(9);
        let setups = [
            PlayerSetup::new("Alice", PlayerKind::Ai, deck(20)),
            PlayerSetup::new("Bob", PlayerKind::Ai, deck(20)),
        ];
        let a = GameInitializer::new(&config).init_game(&setups).unwrap();
        let b = GameInitializer::new(&config).init_game(&setups).unwrap();
        let p1 = PlayerId::new(0);
        assert_eq!(
            a.zone_cards(p1, Zone::Hand).unwrap(),
            b.zone_cards(p1, Zone::Hand).unwrap()
        );
        assert_eq!(
            a.zone_cards(p1, Zone::LifeCards).unwrap(),
            b.zone_cards(p1, Zone::LifeCards).unwrap()
        );
    }

    #[test]
    fn test_rejects_bad_setups() {
        let config = EngineConfig::default();
        let init = GameInitializer::new(&config);

        let one = [PlayerSetup::new("Alice", PlayerKind::Human, deck(10))];
        assert!(matches!(init.init_game(&one), Err(EngineError::InvalidSetup(_))));

        let mut flagless = deck(10);
        flagless.remove(0);
        let setups = [
            PlayerSetup::new("Alice", PlayerKind::Human, flagless),
            PlayerSetup::new("Bob", PlayerKind::Ai, deck(10)),
        ];
        assert!(matches!(init.init_game(&setups), Err(EngineError::InvalidSetup(_))));

        let setups = [
            PlayerSetup::new("Alice", PlayerKind::Human, deck(3)),
            PlayerSetup::new("Bob", PlayerKind::Ai, deck(10)),
        ];
        assert!(matches!(init.init_game(&setups), Err(EngineError::InvalidSetup(_))));
    }
}
