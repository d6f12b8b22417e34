//! Deck list loader (JSON)
//!
//! A deck file names the deck and lists card definitions with copy counts:
//!
//! ```json
//! {
//!   "name": "Ember Rush",
//!   "cards": [
//!     { "count": 1, "card": { "name": "Banner of Flame", "type": "flag" } },
//!     { "count": 3, "card": { "name": "Ember Imp", "type": "familiar",
//!                            "cost": { "fire": 1, "generic": 1 },
//!                            "strength": 2, "health": 2 } }
//!   ]
//! }
//! ```

use crate::config::DEFAULT_LIFE_CARDS;
use crate::core::{CardDefinition, CardType};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Deck loader for JSON deck lists
pub struct DeckLoader;

impl DeckLoader {
    /// Load and validate a deck from a file
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Async variant used by the binary
    pub async fn load_from_file_async(path: &Path) -> Result<DeckList> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse and validate a deck from its JSON content
    pub fn parse(content: &str) -> Result<DeckList> {
        let deck: DeckList = serde_json::from_str(content)?;
        deck.validate()?;
        Ok(deck)
    }
}

/// A card definition and how many copies the deck runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub count: u8,
    pub card: CardDefinition,
}

/// Represents a complete deck list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    pub name: String,
    pub cards: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards including the Flag
    pub fn total_cards(&self) -> usize {
        self.cards.iter().map(|e| e.count as usize).sum()
    }

    pub fn flag_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|e| e.card.card_type == CardType::Flag)
            .map(|e| e.count as usize)
            .sum()
    }

    /// Cards other than the Flag
    pub fn playable_cards(&self) -> usize {
        self.total_cards() - self.flag_count()
    }

    /// A deck needs exactly one Flag and enough other cards to deal the Life Cards
    pub fn validate(&self) -> Result<()> {
        if self.cards.iter().any(|e| e.count == 0) {
            return Err(EngineError::InvalidDeckFormat(format!(
                "{}: entries must have a count of at least 1",
                self.name
            )));
        }
        match self.flag_count() {
            1 => {}
            n => {
                return Err(EngineError::InvalidDeckFormat(format!(
                    "{}: expected exactly one Flag card, found {n}",
                    self.name
                )))
            }
        }
        if self.playable_cards() < DEFAULT_LIFE_CARDS {
            return Err(EngineError::InvalidDeckFormat(format!(
                "{}: {} cards besides the Flag, fewer than the {DEFAULT_LIFE_CARDS} Life Cards needed",
                self.name,
                self.playable_cards()
            )));
        }
        Ok(())
    }

    /// One definition per physical card, in list order
    pub fn to_cards(&self) -> Vec<CardDefinition> {
        self.cards
            .iter()
            .flat_map(|entry| std::iter::repeat(&entry.card).take(entry.count as usize))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AbilityEffect, Element};

    const EMBER_RUSH: &str = r#"
{
  "name": "Ember Rush",
  "cards": [
    { "count": 1, "card": { "name": "Banner of Flame", "type": "flag" } },
    { "count": 3, "card": { "name": "Ember Imp", "type": "familiar",
                           "cost": { "fire": 1, "generic": 1 },
                           "strength": 2, "health": 2 } },
    { "count": 2, "card": { "name": "Flame Lance", "type": "spell",
                           "cost": { "fire": 1 },
                           "abilities": [ { "name": "Lance", "effect": "damage_opponent",
                                            "amount": 1, "scales_with_generic": true } ] } }
  ]
}
"#;

    #[test]
    fn test_parse_deck() {
        let deck = DeckLoader::parse(EMBER_RUSH).unwrap();
        assert_eq!(deck.name, "Ember Rush");
        assert_eq!(deck.total_cards(), 6);
        assert_eq!(deck.flag_count(), 1);

        let imp = &deck.cards[1].card;
        assert_eq!(imp.cost.get(Element::Fire), 1);
        assert_eq!(imp.cost.generic, 1);
        assert_eq!(imp.health, Some(2));

        let lance = &deck.cards[2].card;
        assert_eq!(lance.abilities[0].effect, AbilityEffect::DamageOpponent);
        assert!(lance.abilities[0].scales_with_generic);
    }

    #[test]
    fn test_to_cards_expands_counts() {
        let deck = DeckLoader::parse(EMBER_RUSH).unwrap();
        let cards = deck.to_cards();
        assert_eq!(cards.len(), 6);
        assert_eq!(cards.iter().filter(|c| c.name.as_str() == "Ember Imp").count(), 3);
    }

    #[test]
    fn test_requires_one_flag() {
        let no_flag = r#"{ "name": "Flagless", "cards": [
            { "count": 2, "card": { "name": "Pup", "type": "familiar", "strength": 1 } } ] }"#;
        assert!(matches!(DeckLoader::parse(no_flag), Err(EngineError::InvalidDeckFormat(_))));

        let two_flags = r#"{ "name": "Twin", "cards": [
            { "count": 2, "card": { "name": "Banner", "type": "flag" } },
            { "count": 2, "card": { "name": "Pup", "type": "familiar", "strength": 1 } } ] }"#;
        assert!(matches!(DeckLoader::parse(two_flags), Err(EngineError::InvalidDeckFormat(_))));
    }

    #[test]
    fn test_requires_enough_cards_for_life_stack() {
        let thin = r#"{ "name": "Thin", "cards": [
            { "count": 1, "card": { "name": "Banner", "type": "flag" } },
            { "count": 3, "card": { "name": "Pup", "type": "familiar", "strength": 1 } } ] }"#;
        let err = DeckLoader::parse(thin).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDeckFormat(ref msg) if msg.contains("Life Cards")));

        let enough = thin.replace("\"count\": 3", "\"count\": 4");
        let deck = DeckLoader::parse(&enough).unwrap();
        assert_eq!(deck.playable_cards(), 4);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            DeckLoader::parse("{ not json"),
            Err(EngineError::SerializationError(_))
        ));
    }
}
