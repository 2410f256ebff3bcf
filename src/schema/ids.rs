//! Identifier newtypes for the card schema.
//!
//! Every row kind in the schema has its own ID type, so a `ClanId` can
//! never be handed to an API expecting a `DisciplineId`. IDs are allocated
//! by the `CardStore` and are opaque to callers.

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident, $display:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create an ID from a raw value.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw ID value.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($display, "({})"), self.0)
            }
        }
    };
}

id_type!(
    /// Identifier for an abstract card definition.
    ///
    /// Identifies the card as a named entity in the database, not a
    /// physical copy in anyone's collection.
    CardId,
    "Card"
);

id_type!(
    /// Identifier for a clan.
    ClanId,
    "Clan"
);

id_type!(
    /// Identifier for a discipline.
    DisciplineId,
    "Discipline"
);

id_type!(
    /// Identifier for a card type (Vampire, Action, Master, ...).
    CardTypeId,
    "CardType"
);

id_type!(
    /// Identifier for an expansion (a published set).
    ExpansionId,
    "Expansion"
);

id_type!(
    /// Identifier for a rarity class within an expansion.
    RarityId,
    "Rarity"
);

id_type!(
    /// Identifier for one physical copy of a card.
    PhysicalCardId,
    "PhysicalCard"
);

id_type!(
    /// Identifier for a named collection of physical cards.
    CardSetId,
    "CardSet"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Compiles only because each wrapper is its own type.
        let clan = ClanId::new(1);
        let dis = DisciplineId::new(1);
        assert_eq!(clan.raw(), dis.raw());
        assert_eq!(format!("{}", dis), "Discipline(1)");
    }

    #[test]
    fn test_from_u32() {
        let id: ExpansionId = 7u32.into();
        assert_eq!(id, ExpansionId::new(7));
    }
}
