//! Physical inventory and named card sets.
//!
//! An `AbstractCard` says a card exists; a `PhysicalCard` says you own a
//! copy of it. Card sets (decks, crates, want-lists) are named, ordered
//! collections of physical cards.

use serde::{Deserialize, Serialize};

use super::ids::{CardId, CardSetId, ExpansionId, PhysicalCardId};

/// One physical copy of an abstract card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalCard {
    /// Unique identifier for this copy.
    pub id: PhysicalCardId,

    /// The abstract card this is a copy of.
    pub card: CardId,

    /// Which printing this copy is from, when known.
    pub expansion: Option<ExpansionId>,
}

/// A named collection of physical cards.
///
/// A physical card may appear in several sets; membership is by reference,
/// not ownership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    /// Unique identifier for this set.
    pub id: CardSetId,

    /// Display name, unique among card sets.
    pub name: String,

    /// Member cards, in insertion order.
    pub cards: Vec<PhysicalCardId>,
}

impl CardSet {
    /// Create a new empty card set.
    #[must_use]
    pub fn new(id: CardSetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Check whether the set contains the given physical card.
    #[must_use]
    pub fn contains(&self, card: PhysicalCardId) -> bool {
        self.cards.contains(&card)
    }

    /// Number of cards in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_set_membership() {
        let mut set = CardSet::new(CardSetId::new(0), "My Deck");
        assert!(set.is_empty());

        set.cards.push(PhysicalCardId::new(3));
        assert!(set.contains(PhysicalCardId::new(3)));
        assert!(!set.contains(PhysicalCardId::new(4)));
        assert_eq!(set.len(), 1);
    }
}
