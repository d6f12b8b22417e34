//! Card definitions and card instances

use crate::core::{CardName, Element, ElementalCost, EntityId, GameEntity, PlayerId};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

pub type CardId = EntityId<Card>;

/// Card types in KONIVRER
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Familiar,
    Spell,
    /// Deck identity card; set aside before play and never playable
    Flag,
}

/// What a spell ability does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AbilityEffect {
    /// Text-only ability with no mechanical effect
    #[default]
    None,
    DrawCards,
    /// Damage goes through the opponent's Life Cards
    DamageOpponent,
    /// Adds counters to each of the caster's field cards
    CountersOnFamiliars,
}

/// A spell ability, selected by index when a card is played as a Spell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub effect: AbilityEffect,
    #[serde(default)]
    pub amount: u8,
    /// Add the Generic Azoth paid to `amount`
    #[serde(default)]
    pub scales_with_generic: bool,
}

impl Ability {
    pub fn new(name: impl Into<String>, effect: AbilityEffect, amount: u8) -> Self {
        Ability {
            name: name.into(),
            text: String::new(),
            effect,
            amount,
            scales_with_generic: false,
        }
    }

    pub fn scaling(mut self) -> Self {
        self.scales_with_generic = true;
        self
    }

    /// Effective amount once the Generic paid is known
    pub fn magnitude(&self, generic_paid: u32) -> u32 {
        let bonus = if self.scales_with_generic { generic_paid } else { 0 };
        self.amount as u32 + bonus
    }
}

/// Static card data shared by every copy of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub name: CardName,

    #[serde(rename = "type")]
    pub card_type: CardType,

    #[serde(default)]
    pub cost: ElementalCost,

    /// Elements this card yields while in the Azoth row. When empty, the
    /// non-generic elements of the cost are used (Generic if there are none).
    #[serde(default)]
    pub azoth_elements: SmallVec<[Element; 2]>,

    #[serde(default)]
    pub strength: u8,

    /// Marked damage at or above health (+ counters) destroys the card
    #[serde(default)]
    pub health: Option<u8>,

    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl CardDefinition {
    pub fn new(name: impl Into<CardName>, card_type: CardType) -> Self {
        CardDefinition {
            name: name.into(),
            card_type,
            cost: ElementalCost::new(),
            azoth_elements: SmallVec::new(),
            strength: 0,
            health: None,
            abilities: Vec::new(),
        }
    }

    /// Shorthand for a Familiar with a cost and combat stats
    pub fn familiar(name: impl Into<CardName>, cost: ElementalCost, strength: u8, health: Option<u8>) -> Self {
        CardDefinition {
            cost,
            strength,
            health,
            ..CardDefinition::new(name, CardType::Familiar)
        }
    }

    pub fn spell(name: impl Into<CardName>, cost: ElementalCost, abilities: Vec<Ability>) -> Self {
        CardDefinition {
            cost,
            abilities,
            ..CardDefinition::new(name, CardType::Spell)
        }
    }

    pub fn flag(name: impl Into<CardName>) -> Self {
        CardDefinition::new(name, CardType::Flag)
    }

    pub fn with_azoth_elements(mut self, elements: &[Element]) -> Self {
        self.azoth_elements = elements.iter().copied().collect();
        self
    }

    pub fn is_flag(&self) -> bool {
        self.card_type == CardType::Flag
    }

    /// Elements produced when resting this card for Azoth
    pub fn provided_elements(&self) -> SmallVec<[Element; 2]> {
        if !self.azoth_elements.is_empty() {
            return self.azoth_elements.clone();
        }
        let from_cost: SmallVec<[Element; 2]> = self
            .cost
            .entries()
            .map(|(element, _)| element)
            .filter(|element| !element.is_generic())
            .collect();
        if from_cost.is_empty() {
            smallvec::smallvec![Element::Generic]
        } else {
            from_cost
        }
    }
}

/// A card instance during gameplay
///
/// Each instance is created once when a deck is loaded into a game and
/// afterwards only moves between zones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,

    pub definition: Arc<CardDefinition>,

    /// Zone the card currently sits in (kept in sync by `GameState::move_card`)
    pub zone: Zone,

    pub owner: PlayerId,

    pub controller: PlayerId,

    /// +1 counters
    pub counters: u32,

    /// Rested Azoth can't be spent until refreshed
    pub rested: bool,

    pub damage: u32,

    pub summoning_sick: bool,

    /// Entered the field through Burst
    pub burst_play: bool,
}

impl Card {
    pub fn new(id: CardId, definition: Arc<CardDefinition>, owner: PlayerId) -> Self {
        Card {
            id,
            definition,
            zone: Zone::Deck,
            owner,
            controller: owner,
            counters: 0,
            rested: false,
            damage: 0,
            summoning_sick: false,
            burst_play: false,
        }
    }

    pub fn card_type(&self) -> CardType {
        self.definition.card_type
    }

    pub fn is_familiar(&self) -> bool {
        self.card_type() == CardType::Familiar
    }

    /// Combat damage this card deals: base strength plus counters
    ///
    /// Elemental advantage against the opposing Flag would modify this;
    /// no advantage table exists yet, so the base value is returned.
    pub fn combat_damage(&self) -> u32 {
        self.definition.strength as u32 + self.counters
    }

    /// Has marked damage reached this card's toughness?
    pub fn is_destroyed(&self) -> bool {
        match self.definition.health {
            Some(health) => self.damage >= health as u32 + self.counters,
            None => false,
        }
    }

    /// Put the card back into its untouched state (used when it leaves play)
    pub fn reset_battle_state(&mut self) {
        self.counters = 0;
        self.rested = false;
        self.damage = 0;
        self.summoning_sick = false;
        self.burst_play = false;
        self.controller = self.owner;
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.definition.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imp() -> Arc<CardDefinition> {
        Arc::new(CardDefinition::familiar(
            "Ember Imp",
            ElementalCost::generic(1).with(Element::Fire, 1),
            3,
            Some(2),
        ))
    }

    #[test]
    fn test_card_creation() {
        let card = Card::new(CardId::new(5), imp(), PlayerId::new(0));
        assert_eq!(card.name(), "Ember Imp");
        assert_eq!(card.zone, Zone::Deck);
        assert_eq!(card.controller, PlayerId::new(0));
        assert!(!card.rested);
    }

    #[test]
    fn test_combat_damage_includes_counters() {
        let mut card = Card::new(CardId::new(5), imp(), PlayerId::new(0));
        assert_eq!(card.combat_damage(), 3);
        card.counters = 2;
        assert_eq!(card.combat_damage(), 5);
    }

    #[test]
    fn test_destruction_threshold() {
        let mut card = Card::new(CardId::new(5), imp(), PlayerId::new(0));
        card.damage = 1;
        assert!(!card.is_destroyed());
        card.damage = 2;
        assert!(card.is_destroyed());
        card.counters = 1;
        assert!(!card.is_destroyed());
    }

    #[test]
    fn test_provided_elements() {
        assert_eq!(imp().provided_elements().as_slice(), &[Element::Fire]);

        let colorless = CardDefinition::spell("Study", ElementalCost::generic(2), vec![]);
        assert_eq!(colorless.provided_elements().as_slice(), &[Element::Generic]);

        let dual = CardDefinition::flag("Prism").with_azoth_elements(&[Element::Air, Element::Aether]);
        assert_eq!(dual.provided_elements().len(), 2);
    }

    #[test]
    fn test_ability_magnitude() {
        let flat = Ability::new("Singe", AbilityEffect::DamageOpponent, 1);
        assert_eq!(flat.magnitude(3), 1);
        let scaling = Ability::new("Inferno", AbilityEffect::DamageOpponent, 1).scaling();
        assert_eq!(scaling.magnitude(3), 4);
    }
}
