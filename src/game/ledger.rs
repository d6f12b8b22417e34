//! Azoth resource ledger
//!
//! Azoth is whatever un-rested cards sit in a player's Azoth row; each card
//! yields one unit of every element it provides, but resting it spends the
//! whole card. A proposed spend names how many cards to rest per element.

use crate::core::{CardId, Element, ElementalCost, PlayerId};
use crate::game::{GameEvent, GameState};
use crate::{EngineError, Result};
use smallvec::SmallVec;

/// Generic Azoth paid by `spend` against `cost`
///
/// Everything spent beyond the exact-element requirements counts as
/// Generic, whatever element it came from.
pub fn generic_paid(cost: &ElementalCost, spend: &ElementalCost) -> u32 {
    spend.total().saturating_sub(cost.non_generic_total())
}

impl GameState {
    /// Un-rested Azoth cards in a player's Azoth row, with what each provides
    fn untapped_azoth(&self, player_id: PlayerId) -> Result<Vec<(CardId, SmallVec<[Element; 2]>)>> {
        let zones = self.get_player_zones(player_id)?;
        let mut sources = Vec::with_capacity(zones.azoth_row.len());
        for &card_id in &zones.azoth_row.cards {
            let card = self.cards.get(card_id)?;
            if !card.rested {
                sources.push((card_id, card.definition.provided_elements()));
            }
        }
        Ok(sources)
    }

    /// Units of each element the player could spend right now
    pub fn available_azoth(&self, player_id: PlayerId) -> Result<ElementalCost> {
        let mut pool = ElementalCost::new();
        for (_, elements) in self.untapped_azoth(player_id)? {
            for element in elements {
                pool.add(element, 1);
            }
        }
        Ok(pool)
    }

    /// Number of un-rested Azoth cards (the most that can be spent in total)
    pub fn total_available_azoth(&self, player_id: PlayerId) -> Result<u32> {
        Ok(self.untapped_azoth(player_id)?.len() as u32)
    }

    /// Would `spend` pay `cost` for this player? Never mutates anything.
    pub fn can_pay_cost(&self, player_id: PlayerId, cost: &ElementalCost, spend: &ElementalCost) -> bool {
        self.plan_payment(player_id, cost, spend).is_ok()
    }

    /// Validate a spend and choose which Azoth cards to rest for it
    fn plan_payment(&self, player_id: PlayerId, cost: &ElementalCost, spend: &ElementalCost) -> Result<Vec<CardId>> {
        let available = self.available_azoth(player_id)?;
        let sources = self.untapped_azoth(player_id)?;

        for element in Element::ALL {
            let offered = spend.get(element);
            if !element.is_generic() && offered < cost.get(element) {
                return Err(EngineError::CostUnpayable(format!(
                    "{element} requires {} but {offered} offered",
                    cost.get(element)
                )));
            }
            if offered > available.get(element) {
                return Err(EngineError::CostUnpayable(format!(
                    "{offered} {element} offered but only {} available",
                    available.get(element)
                )));
            }
        }
        if spend.total() < cost.total() {
            return Err(EngineError::CostUnpayable(format!(
                "{} Azoth offered for a cost of {}",
                spend.total(),
                cost.total()
            )));
        }
        if spend.total() > sources.len() as u32 {
            return Err(EngineError::CostUnpayable(format!(
                "{} Azoth offered but only {} cards are untapped",
                spend.total(),
                sources.len()
            )));
        }

        assign_sources(&sources, spend).ok_or_else(|| {
            EngineError::CostUnpayable("no way to rest distinct Azoth cards for that spend".to_string())
        })
    }

    /// Check and apply a payment in one step
    ///
    /// Rests exactly the cards the spend names and returns the Generic paid.
    /// On failure nothing is rested.
    pub fn pay_cost(&mut self, player_id: PlayerId, cost: &ElementalCost, spend: &ElementalCost) -> Result<u32> {
        let to_rest = self.plan_payment(player_id, cost, spend)?;
        for &card_id in &to_rest {
            self.cards.get_mut(card_id)?.rested = true;
        }
        if !to_rest.is_empty() {
            let name = self.player_name(player_id);
            self.logger.verbose(format!("{name} rested {} Azoth ({spend})", to_rest.len()));
        }
        Ok(generic_paid(cost, spend))
    }

    /// Un-rest every card in the player's Azoth row
    pub fn refresh_azoth(&mut self, player_id: PlayerId) -> Result<usize> {
        let row = self.get_player_zones(player_id)?.azoth_row.cards.clone();
        let mut refreshed = 0;
        for card_id in row {
            let card = self.cards.get_mut(card_id)?;
            if card.rested {
                card.rested = false;
                refreshed += 1;
            }
        }
        let name = self.player_name(player_id);
        self.logger.normal(format!("{name} refreshed all Azoth"));
        self.emit(GameEvent::AzothRefreshed { player: player_id });
        Ok(refreshed)
    }

    /// A spend that pays `cost` exactly, if the player can afford it
    ///
    /// Exact elements are covered first; Generic is then filled from
    /// whatever elements are left over, in canonical order.
    pub fn suggest_spend(&self, player_id: PlayerId, cost: &ElementalCost) -> Option<ElementalCost> {
        let available = self.available_azoth(player_id).ok()?;
        let mut spend = ElementalCost::new();
        for element in Element::ALL.iter().filter(|e| !e.is_generic()) {
            spend.set(*element, cost.get(*element));
        }

        let mut generic_left = cost.generic;
        for element in Element::ALL {
            if generic_left == 0 {
                break;
            }
            let spare = available.get(element).saturating_sub(spend.get(element));
            let used = spare.min(generic_left);
            spend.add(element, used);
            generic_left -= used;
        }

        if generic_left > 0 || !self.can_pay_cost(player_id, cost, &spend) {
            return None;
        }
        Some(spend)
    }
}

/// Match each unit of the spend to a distinct card that provides its element
///
/// Augmenting-path bipartite matching, so a dual-element card is never
/// claimed for one element when another card could have covered it.
fn assign_sources(sources: &[(CardId, SmallVec<[Element; 2]>)], spend: &ElementalCost) -> Option<Vec<CardId>> {
    let slots: Vec<Element> = spend
        .entries()
        .flat_map(|(element, amount)| std::iter::repeat(element).take(amount as usize))
        .collect();

    // matched[card index] = slot index
    let mut matched: Vec<Option<usize>> = vec![None; sources.len()];

    fn try_assign(
        slot: usize,
        slots: &[Element],
        sources: &[(CardId, SmallVec<[Element; 2]>)],
        visited: &mut [bool],
        matched: &mut [Option<usize>],
    ) -> bool {
        for (card_idx, (_, elements)) in sources.iter().enumerate() {
            if visited[card_idx] || !elements.contains(&slots[slot]) {
                continue;
            }
            visited[card_idx] = true;
            let free = match matched[card_idx] {
                None => true,
                Some(other) => try_assign(other, slots, sources, visited, matched),
            };
            if free {
                matched[card_idx] = Some(slot);
                return true;
            }
        }
        false
    }

    for slot in 0..slots.len() {
        let mut visited = vec![false; sources.len()];
        if !try_assign(slot, &slots, sources, &mut visited, &mut matched) {
            return None;
        }
    }

    Some(
        sources
            .iter()
            .zip(&matched)
            .filter(|(_, slot)| slot.is_some())
            .map(|((card_id, _), _)| *card_id)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, PlayerKind};
    use crate::zones::Zone;
    use std::sync::Arc;

    fn game_with_azoth(elements: &[&[Element]]) -> (GameState, PlayerId) {
        let mut game = GameState::new_two_player(("Alice", PlayerKind::Human), ("Bob", PlayerKind::Ai));
        let p1 = PlayerId::new(0);
        for provided in elements {
            let def = Arc::new(CardDefinition::flag("Shard").with_azoth_elements(provided));
            let card = game.add_card_to_deck(p1, def).unwrap();
            game.move_card(card, Zone::Deck, Zone::AzothRow, p1).unwrap();
        }
        (game, p1)
    }

    #[test]
    fn test_available_azoth_counts_each_element() {
        let (game, p1) = game_with_azoth(&[&[Element::Fire], &[Element::Fire, Element::Water]]);
        let pool = game.available_azoth(p1).unwrap();
        assert_eq!(pool.fire, 2);
        assert_eq!(pool.water, 1);
        assert_eq!(game.total_available_azoth(p1).unwrap(), 2);
    }

    #[test]
    fn test_generic_paid_by_any_element() {
        let (mut game, p1) = game_with_azoth(&[&[Element::Fire][..]; 3]);
        let cost = ElementalCost::generic(2);
        let spend = ElementalCost::new().with(Element::Fire, 3);

        assert!(game.can_pay_cost(p1, &cost, &spend));
        assert_eq!(game.pay_cost(p1, &cost, &spend).unwrap(), 3);
        assert_eq!(game.total_available_azoth(p1).unwrap(), 0);
    }

    #[test]
    fn test_exact_element_required() {
        let (game, p1) = game_with_azoth(&[&[Element::Fire], &[Element::Fire]]);
        let cost = ElementalCost::new().with(Element::Water, 1);
        let spend = ElementalCost::new().with(Element::Fire, 2);
        assert!(!game.can_pay_cost(p1, &cost, &spend));
    }

    #[test]
    fn test_underpaying_total_fails() {
        let (game, p1) = game_with_azoth(&[&[Element::Fire][..]; 3]);
        let cost = ElementalCost::generic(2).with(Element::Fire, 1);
        let spend = ElementalCost::new().with(Element::Fire, 2);
        assert!(!game.can_pay_cost(p1, &cost, &spend));
    }

    #[test]
    fn test_dual_card_cannot_pay_twice() {
        let (game, p1) = game_with_azoth(&[&[Element::Fire, Element::Water]]);
        let cost = ElementalCost::new().with(Element::Fire, 1).with(Element::Water, 1);
        let spend = cost;
        assert!(!game.can_pay_cost(p1, &cost, &spend));
    }

    #[test]
    fn test_matching_reassigns_dual_cards() {
        // The dual card must go to Water, leaving the Fire card for Fire.
        let (mut game, p1) = game_with_azoth(&[&[Element::Fire, Element::Water], &[Element::Fire]]);
        let cost = ElementalCost::new().with(Element::Fire, 1).with(Element::Water, 1);
        assert!(game.pay_cost(p1, &cost, &cost).is_ok());
        assert_eq!(game.total_available_azoth(p1).unwrap(), 0);
    }

    #[test]
    fn test_failed_payment_changes_nothing() {
        let (mut game, p1) = game_with_azoth(&[&[Element::Earth][..]; 2]);
        let before = serde_json::to_string(&game.cards).unwrap();
        let cost = ElementalCost::generic(3);
        let spend = ElementalCost::new().with(Element::Earth, 3);

        assert!(!game.can_pay_cost(p1, &cost, &spend));
        assert!(game.pay_cost(p1, &cost, &spend).is_err());
        assert_eq!(serde_json::to_string(&game.cards).unwrap(), before);
    }

    #[test]
    fn test_refresh_and_suggest() {
        let (mut game, p1) = game_with_azoth(&[&[Element::Fire], &[Element::Air]]);
        let cost = ElementalCost::generic(1).with(Element::Air, 1);

        let spend = game.suggest_spend(p1, &cost).unwrap();
        assert_eq!(spend.air, 1);
        assert_eq!(spend.fire, 1);
        game.pay_cost(p1, &cost, &spend).unwrap();
        assert!(game.suggest_spend(p1, &cost).is_none());

        assert_eq!(game.refresh_azoth(p1).unwrap(), 2);
        assert_eq!(game.total_available_azoth(p1).unwrap(), 2);
    }
}
