//! Main game state structure

use crate::core::{Card, CardDefinition, CardId, EntityId, EntityStore, Player, PlayerId, PlayerKind};
use crate::game::{CombatState, GameEvent, GameLogger, Phase, TurnStructure};
use crate::zones::{PlayerZones, Zone};
use crate::{EngineError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    /// The named player's Life Cards ran out
    LifeCardsExhausted(PlayerId),
    /// The named player conceded
    Concession(PlayerId),
}

/// A revealed Life Card its owner may Burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstOpportunity {
    pub player: PlayerId,
    pub card: CardId,
}

/// A decision the engine is waiting on before play continues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputRequest {
    /// Start phase: the active player may place one card as Azoth.
    /// Advancing the phase declines it.
    OptionalAzothPlacement { player: PlayerId },
    /// Defense phase: the defending player may declare blockers
    BlockerDeclaration { player: PlayerId },
    /// A Life Card was revealed; its owner must resolve it before play continues
    BurstOpportunity(BurstOpportunity),
}

impl InputRequest {
    /// Player expected to answer
    pub fn player(&self) -> PlayerId {
        match self {
            InputRequest::OptionalAzothPlacement { player } | InputRequest::BlockerDeclaration { player } => *player,
            InputRequest::BurstOpportunity(opportunity) => opportunity.player,
        }
    }

    /// Input-kind tag shown to UIs and in the log
    pub fn kind(&self) -> &'static str {
        match self {
            InputRequest::OptionalAzothPlacement { .. } => "optionalAzothPlacement",
            InputRequest::BlockerDeclaration { .. } => "blockerDeclaration",
            InputRequest::BurstOpportunity(_) => "burstOpportunity",
        }
    }

    /// Does this request stop phase progression until answered?
    pub fn blocks_progress(&self) -> bool {
        matches!(self, InputRequest::BurstOpportunity(_))
    }
}

/// Complete game state
///
/// Cloning gives an independent snapshot; decision providers receive one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// All cards in the game
    pub cards: EntityStore<Card>,

    /// Both players, in seating order
    pub players: Vec<Player>,

    /// Zones for each player
    pub player_zones: Vec<(PlayerId, PlayerZones)>,

    pub turn: TurnStructure,

    /// Combat state (active during combat phases)
    pub combat: CombatState,

    /// Non-blocking prompt for the current phase
    pub prompt: Option<InputRequest>,

    /// Revealed Life Cards waiting for a Burst decision, oldest first
    pub burst_queue: VecDeque<BurstOpportunity>,

    pub game_over: bool,

    pub winner: Option<PlayerId>,

    pub end_reason: Option<GameEndReason>,

    /// Shuffling RNG (serializable for deterministic replay)
    pub rng: ChaCha12Rng,

    /// Unified entity ID generator (shared across all entity types)
    next_entity_id: u32,

    /// Append-only game log
    pub logger: GameLogger,

    /// Events produced by the current mutation, drained by the engine
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create an empty two-player game (no cards yet)
    pub fn new_two_player(
        player1: (impl Into<String>, PlayerKind),
        player2: (impl Into<String>, PlayerKind),
    ) -> Self {
        let p1_id = PlayerId::new(0);
        let p2_id = PlayerId::new(1);

        let players = vec![
            Player::new(p1_id, player1.0.into(), player1.1),
            Player::new(p2_id, player2.0.into(), player2.1),
        ];
        let player_zones = vec![(p1_id, PlayerZones::new(p1_id)), (p2_id, PlayerZones::new(p2_id))];

        GameState {
            cards: EntityStore::new(),
            players,
            player_zones,
            turn: TurnStructure::new(p1_id),
            combat: CombatState::new(),
            prompt: None,
            burst_queue: VecDeque::new(),
            game_over: false,
            winner: None,
            end_reason: None,
            rng: ChaCha12Rng::seed_from_u64(0),
            next_entity_id: 2,
            logger: GameLogger::new(),
            pending_events: Vec::new(),
        }
    }

    /// Set the RNG seed for deterministic shuffling
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Get next entity ID (unified across all entity types)
    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn next_card_id(&mut self) -> CardId {
        self.next_id()
    }

    /// Create a card instance on top of `owner`'s deck
    pub fn add_card_to_deck(&mut self, owner: PlayerId, definition: Arc<CardDefinition>) -> Result<CardId> {
        let card_id = self.next_card_id();
        self.get_player_zones_mut(owner)?.deck.add(card_id);
        self.cards.insert(card_id, Card::new(card_id, definition, owner));
        Ok(card_id)
    }

    /// Shuffle a player's deck using the game's RNG
    pub fn shuffle_deck(&mut self, player_id: PlayerId) -> Result<()> {
        let GameState { player_zones, rng, .. } = self;
        let zones = player_zones
            .iter_mut()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
            .ok_or(EngineError::EntityNotFound(player_id.as_u32()))?;
        zones.deck.shuffle(rng);
        Ok(())
    }

    pub fn get_player_zones(&self, player_id: PlayerId) -> Result<&PlayerZones> {
        self.player_zones
            .iter()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
            .ok_or(EngineError::EntityNotFound(player_id.as_u32()))
    }

    pub fn get_player_zones_mut(&mut self, player_id: PlayerId) -> Result<&mut PlayerZones> {
        self.player_zones
            .iter_mut()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
            .ok_or(EngineError::EntityNotFound(player_id.as_u32()))
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(EngineError::EntityNotFound(id.as_u32()))
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(EngineError::EntityNotFound(id.as_u32()))
    }

    /// The other player in this two-player game
    pub fn opponent_of(&self, player_id: PlayerId) -> Result<PlayerId> {
        self.players
            .iter()
            .find(|p| p.id != player_id)
            .map(|p| p.id)
            .ok_or(EngineError::EntityNotFound(player_id.as_u32()))
    }

    pub fn player_name(&self, player_id: PlayerId) -> String {
        self.get_player(player_id)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|_| format!("player {player_id}"))
    }

    pub fn card_name(&self, card_id: CardId) -> String {
        self.cards
            .get(card_id)
            .map(|c| c.definition.name.to_string())
            .unwrap_or_else(|_| format!("card {card_id}"))
    }

    pub fn active_player(&self) -> PlayerId {
        self.turn.active_player
    }

    pub fn current_phase(&self) -> Phase {
        self.turn.current_phase
    }

    /// Cards in one of a player's zones, in zone order
    pub fn zone_cards(&self, player_id: PlayerId, zone: Zone) -> Result<&[CardId]> {
        Ok(&self.get_player_zones(player_id)?.get_zone(zone).cards)
    }

    pub fn life_card_count(&self, player_id: PlayerId) -> Result<usize> {
        Ok(self.get_player_zones(player_id)?.life_cards.len())
    }

    /// Move a card from one of `owner`'s zones to another (on top/end)
    pub fn move_card(&mut self, card_id: CardId, from: Zone, to: Zone, owner: PlayerId) -> Result<()> {
        self.detach(card_id, from, owner)?;
        self.get_player_zones_mut(owner)?.get_zone_mut(to).add(card_id);
        self.cards.get_mut(card_id)?.zone = to;
        Ok(())
    }

    /// Move a card to the bottom of its owner's deck
    pub fn move_card_to_deck_bottom(&mut self, card_id: CardId, from: Zone, owner: PlayerId) -> Result<()> {
        self.detach(card_id, from, owner)?;
        self.get_player_zones_mut(owner)?.deck.add_to_bottom(card_id);
        self.cards.get_mut(card_id)?.zone = Zone::Deck;
        Ok(())
    }

    fn detach(&mut self, card_id: CardId, from: Zone, owner: PlayerId) -> Result<()> {
        if !self.get_player_zones_mut(owner)?.get_zone_mut(from).remove(card_id) {
            return Err(EngineError::Internal(format!("card {card_id} not found in {from}")));
        }
        Ok(())
    }

    /// Draw up to `count` cards; an empty deck simply stops the draw
    pub fn draw_cards(&mut self, player_id: PlayerId, count: usize) -> Result<Vec<CardId>> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(card_id) = self.get_player_zones_mut(player_id)?.deck.take_top() else {
                break;
            };
            self.get_player_zones_mut(player_id)?.hand.add(card_id);
            self.cards.get_mut(card_id)?.zone = Zone::Hand;
            drawn.push(card_id);
        }

        if !drawn.is_empty() {
            let plural = if drawn.len() > 1 { "s" } else { "" };
            let name = self.player_name(player_id);
            self.logger.normal(format!("{name} drew {} card{plural}", drawn.len()));
        }
        Ok(drawn)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn get_winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Refuse further mutation once the game has ended
    pub fn ensure_in_progress(&self) -> Result<()> {
        if self.game_over {
            Err(EngineError::GameOver)
        } else {
            Ok(())
        }
    }

    /// Record the end of the game; the first call wins and later calls are ignored
    pub fn end_game(&mut self, winner: PlayerId, reason: GameEndReason) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.winner = Some(winner);
        self.end_reason = Some(reason);
        self.burst_queue.clear();
        self.prompt = None;

        let loser = match reason {
            GameEndReason::LifeCardsExhausted(loser) | GameEndReason::Concession(loser) => loser,
        };
        if let Ok(player) = self.get_player_mut(loser) {
            player.has_lost = true;
        }
        let name = self.player_name(winner);
        self.logger.minimal(format!("Game over: {name} wins"));
        self.emit(GameEvent::GameOver { winner, reason });
    }

    /// What the engine is waiting on, if anything
    ///
    /// A pending Burst always comes first.
    pub fn awaiting_input(&self) -> Option<InputRequest> {
        self.burst_queue
            .front()
            .map(|opportunity| InputRequest::BurstOpportunity(*opportunity))
            .or(self.prompt)
    }

    pub fn waiting_for_input(&self) -> bool {
        self.awaiting_input().is_some()
    }

    /// Error out if a blocking decision is outstanding
    pub fn ensure_not_blocked(&self) -> Result<()> {
        match self.awaiting_input() {
            Some(request) if request.blocks_progress() => Err(EngineError::AwaitingInput(request.kind().to_string())),
            _ => Ok(()),
        }
    }

    /// The player whose decision the game needs next
    pub fn deciding_player(&self) -> PlayerId {
        if let Some(opportunity) = self.burst_queue.front() {
            return opportunity.player;
        }
        if self.turn.current_phase == Phase::Defense {
            if let Ok(defender) = self.opponent_of(self.turn.active_player) {
                return defender;
            }
        }
        self.turn.active_player
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    pub(crate) fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check that every card sits in exactly one zone and knows which
    pub fn check_zone_integrity(&self) -> Result<()> {
        let mut seen = rustc_hash::FxHashSet::default();
        for (player_id, zones) in &self.player_zones {
            for zone in Zone::ALL {
                for &card_id in &zones.get_zone(zone).cards {
                    if !seen.insert(card_id) {
                        return Err(EngineError::Internal(format!("card {card_id} appears in more than one zone")));
                    }
                    let card = self.cards.get(card_id)?;
                    if card.zone != zone || card.owner != *player_id {
                        return Err(EngineError::Internal(format!(
                            "card {card_id} is listed in {zone} but records {}",
                            card.zone
                        )));
                    }
                }
            }
        }
        if seen.len() != self.cards.len() {
            return Err(EngineError::Internal(format!(
                "{} cards exist but {} are in zones",
                self.cards.len(),
                seen.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ElementalCost;

    fn new_game() -> GameState {
        GameState::new_two_player(("Alice", PlayerKind::Human), ("Bob", PlayerKind::Ai))
    }

    fn imp() -> Arc<CardDefinition> {
        Arc::new(CardDefinition::familiar("Ember Imp", ElementalCost::generic(1), 2, Some(2)))
    }

    #[test]
    fn test_new_game_ids() {
        let game = new_game();
        assert_eq!(game.players.len(), 2);
        assert_eq!(game.players[0].id, PlayerId::new(0));
        assert_eq!(game.opponent_of(PlayerId::new(0)).unwrap(), PlayerId::new(1));
        assert_eq!(game.turn.turn_number, 1);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_draw_cards_stops_at_empty_deck() {
        let mut game = new_game();
        let p1 = PlayerId::new(0);
        let bottom = game.add_card_to_deck(p1, imp()).unwrap();
        let top = game.add_card_to_deck(p1, imp()).unwrap();

        let drawn = game.draw_cards(p1, 3).unwrap();
        assert_eq!(drawn, vec![top, bottom]);
        assert_eq!(game.zone_cards(p1, Zone::Hand).unwrap().len(), 2);
        assert_eq!(game.cards.get(top).unwrap().zone, Zone::Hand);
        game.check_zone_integrity().unwrap();
    }

    #[test]
    fn test_move_card_updates_zone() {
        let mut game = new_game();
        let p1 = PlayerId::new(0);
        let card = game.add_card_to_deck(p1, imp()).unwrap();

        game.move_card(card, Zone::Deck, Zone::Field, p1).unwrap();
        assert_eq!(game.cards.get(card).unwrap().zone, Zone::Field);
        assert!(game.move_card(card, Zone::Deck, Zone::Hand, p1).is_err());
        game.check_zone_integrity().unwrap();
    }

    #[test]
    fn test_deck_bottom() {
        let mut game = new_game();
        let p1 = PlayerId::new(0);
        let first = game.add_card_to_deck(p1, imp()).unwrap();
        let second = game.add_card_to_deck(p1, imp()).unwrap();
        game.move_card(second, Zone::Deck, Zone::Hand, p1).unwrap();

        game.move_card_to_deck_bottom(second, Zone::Hand, p1).unwrap();
        assert_eq!(game.zone_cards(p1, Zone::Deck).unwrap(), &[second, first]);
    }

    #[test]
    fn test_end_game_is_permanent() {
        let mut game = new_game();
        let p1 = PlayerId::new(0);
        let p2 = PlayerId::new(1);

        game.end_game(p1, GameEndReason::LifeCardsExhausted(p2));
        game.end_game(p2, GameEndReason::Concession(p1));

        assert_eq!(game.get_winner(), Some(p1));
        assert_eq!(game.end_reason, Some(GameEndReason::LifeCardsExhausted(p2)));
        assert!(game.get_player(p2).unwrap().has_lost);
        assert!(game.ensure_in_progress().is_err());
    }

    #[test]
    fn test_burst_takes_priority_over_prompt() {
        let mut game = new_game();
        let p1 = PlayerId::new(0);
        let p2 = PlayerId::new(1);
        game.prompt = Some(InputRequest::OptionalAzothPlacement { player: p1 });
        assert!(game.ensure_not_blocked().is_ok());

        let card = game.add_card_to_deck(p2, imp()).unwrap();
        game.burst_queue.push_back(BurstOpportunity { player: p2, card });

        assert_eq!(game.awaiting_input().map(|r| r.kind()), Some("burstOpportunity"));
        assert_eq!(game.deciding_player(), p2);
        assert!(game.ensure_not_blocked().is_err());
    }
}
