//! Core game types and entities

pub mod card;
pub mod element;
pub mod entity;
pub mod player;
pub mod types;

pub use card::{Ability, AbilityEffect, Card, CardDefinition, CardId, CardType};
pub use element::{Element, ElementalCost};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use player::{Player, PlayerId, PlayerKind};
pub use types::{CardName, PlayerName};
