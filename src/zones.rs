//! Game zones (Deck, Hand, Field, Azoth row, Life Cards, etc.)

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Different zones where cards can exist
///
/// Every zone belongs to exactly one player; nothing is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Field,
    CombatRow,
    AzothRow,
    LifeCards,
    Discard,
    RemovedFromPlay,
    /// Holds the deck's Flag card for the whole game
    Flag,
}

impl Zone {
    pub const ALL: [Zone; 9] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Field,
        Zone::CombatRow,
        Zone::AzothRow,
        Zone::LifeCards,
        Zone::Discard,
        Zone::RemovedFromPlay,
        Zone::Flag,
    ];
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::Deck => "deck",
            Zone::Hand => "hand",
            Zone::Field => "field",
            Zone::CombatRow => "combat row",
            Zone::AzothRow => "Azoth row",
            Zone::LifeCards => "Life Cards",
            Zone::Discard => "discard pile",
            Zone::RemovedFromPlay => "removed from play",
            Zone::Flag => "flag",
        };
        write!(f, "{name}")
    }
}

/// An ordered list of cards
///
/// For Deck and Life Cards the end of the Vec is the top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub zone_type: Zone,

    pub owner: PlayerId,

    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(zone_type: Zone, owner: PlayerId) -> Self {
        CardZone {
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // remove() rather than swap_remove(): iteration order feeds
            // controller choices and must stay deterministic.
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Take the top card (Deck draws, Life Card reveals)
    pub fn take_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    pub fn add_to_bottom(&mut self, card_id: CardId) {
        self.cards.insert(0, card_id);
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }
}

/// Collection of all zones for a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub deck: CardZone,
    pub hand: CardZone,
    pub field: CardZone,
    pub combat_row: CardZone,
    pub azoth_row: CardZone,
    pub life_cards: CardZone,
    pub discard: CardZone,
    pub removed: CardZone,
    pub flag: CardZone,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        PlayerZones {
            deck: CardZone::new(Zone::Deck, player_id),
            hand: CardZone::new(Zone::Hand, player_id),
            field: CardZone::new(Zone::Field, player_id),
            combat_row: CardZone::new(Zone::CombatRow, player_id),
            azoth_row: CardZone::new(Zone::AzothRow, player_id),
            life_cards: CardZone::new(Zone::LifeCards, player_id),
            discard: CardZone::new(Zone::Discard, player_id),
            removed: CardZone::new(Zone::RemovedFromPlay, player_id),
            flag: CardZone::new(Zone::Flag, player_id),
        }
    }

    pub fn get_zone(&self, zone: Zone) -> &CardZone {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Field => &self.field,
            Zone::CombatRow => &self.combat_row,
            Zone::AzothRow => &self.azoth_row,
            Zone::LifeCards => &self.life_cards,
            Zone::Discard => &self.discard,
            Zone::RemovedFromPlay => &self.removed,
            Zone::Flag => &self.flag,
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> &mut CardZone {
        match zone {
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::Field => &mut self.field,
            Zone::CombatRow => &mut self.combat_row,
            Zone::AzothRow => &mut self.azoth_row,
            Zone::LifeCards => &mut self.life_cards,
            Zone::Discard => &mut self.discard,
            Zone::RemovedFromPlay => &mut self.removed,
            Zone::Flag => &mut self.flag,
        }
    }

    /// Which zone holds this card, if any
    pub fn locate(&self, card_id: CardId) -> Option<Zone> {
        Zone::ALL
            .iter()
            .copied()
            .find(|&zone| self.get_zone(zone).contains(card_id))
    }

    /// Every card across every zone (a card appearing twice is a bug)
    pub fn all_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        Zone::ALL
            .iter()
            .flat_map(move |&zone| self.get_zone(zone).cards.iter().copied())
    }
}
