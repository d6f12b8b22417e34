//! Elemental Azoth types and costs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Azoth elements
///
/// Generic is a cost-side element: it can be paid with any element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Aether,
    Nether,
    Generic,
}

impl Element {
    /// Every element, in canonical order (Generic last)
    pub const ALL: [Element; 7] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Aether,
        Element::Nether,
        Element::Generic,
    ];

    pub fn is_generic(&self) -> bool {
        matches!(self, Element::Generic)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Air => "air",
            Element::Aether => "aether",
            Element::Nether => "nether",
            Element::Generic => "generic",
        };
        write!(f, "{name}")
    }
}

/// Element -> amount mapping, used both for card costs and proposed spends
///
/// Copy-eligible since it's just 7 u8 fields. Missing JSON keys default to 0,
/// so `{"fire": 1, "generic": 2}` is a complete cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementalCost {
    pub fire: u8,
    pub water: u8,
    pub earth: u8,
    pub air: u8,
    pub aether: u8,
    pub nether: u8,
    pub generic: u8,
}

impl ElementalCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cost made only of Generic
    pub fn generic(amount: u8) -> Self {
        ElementalCost {
            generic: amount,
            ..Self::default()
        }
    }

    /// Builder-style setter
    pub fn with(mut self, element: Element, amount: u8) -> Self {
        self.set(element, amount);
        self
    }

    pub fn get(&self, element: Element) -> u8 {
        match element {
            Element::Fire => self.fire,
            Element::Water => self.water,
            Element::Earth => self.earth,
            Element::Air => self.air,
            Element::Aether => self.aether,
            Element::Nether => self.nether,
            Element::Generic => self.generic,
        }
    }

    pub fn set(&mut self, element: Element, amount: u8) {
        *self.slot_mut(element) = amount;
    }

    pub fn add(&mut self, element: Element, amount: u8) {
        let slot = self.slot_mut(element);
        *slot = slot.saturating_add(amount);
    }

    fn slot_mut(&mut self, element: Element) -> &mut u8 {
        match element {
            Element::Fire => &mut self.fire,
            Element::Water => &mut self.water,
            Element::Earth => &mut self.earth,
            Element::Air => &mut self.air,
            Element::Aether => &mut self.aether,
            Element::Nether => &mut self.nether,
            Element::Generic => &mut self.generic,
        }
    }

    /// Sum over all elements, Generic included
    pub fn total(&self) -> u32 {
        Element::ALL.iter().map(|&e| self.get(e) as u32).sum()
    }

    /// Sum over the exact-element requirements (everything but Generic)
    pub fn non_generic_total(&self) -> u32 {
        self.total() - self.generic as u32
    }

    /// Non-zero entries in canonical order
    pub fn entries(&self) -> impl Iterator<Item = (Element, u8)> + '_ {
        Element::ALL
            .iter()
            .map(move |&e| (e, self.get(e)))
            .filter(|&(_, amount)| amount > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Copy of this cost with the Generic requirement lowered (floor at 0)
    pub fn reduce_generic(&self, by: u8) -> Self {
        ElementalCost {
            generic: self.generic.saturating_sub(by),
            ..*self
        }
    }
}

impl fmt::Display for ElementalCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "free");
        }
        let parts: Vec<String> = self
            .entries()
            .map(|(element, amount)| format!("{amount} {element}"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
