//! The abstract card model.
//!
//! `AbstractCard` is the database's notion of a card: one row per distinct
//! card name, carrying the card's rules text, numeric attributes, and its
//! attachments to trait rows (clans, disciplines, card types) and to
//! expansion/rarity pairings. Physical copies in a collection are tracked
//! separately as `PhysicalCard`s in the store.
//!
//! Every field other than `name` is optional: the ingestion source omits
//! fields freely, and a partially described card is still a card.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attributes::Attributes;
use super::ids::{CardId, CardTypeId, ClanId, DisciplineId, ExpansionId, RarityId};

/// Sentinel cost for cards whose cost is printed as "X".
pub const VARIABLE_COST: i32 = -1;

/// The level at which a card carries a discipline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisciplineLevel {
    /// Lower-case discipline symbol. Ingestion always attaches at this
    /// level; the source list does not distinguish.
    Inferior,
    /// Upper-case discipline symbol.
    Superior,
}

/// An abstract card definition.
///
/// Created with just a name and empty text; ingestion fills in the rest
/// field by field, each field independently best-effort.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbstractCard {
    /// Unique identifier for this card.
    pub id: CardId,

    /// Card name. Lookup is by exact name only; two source records whose
    /// names differ in formatting produce two cards.
    pub name: String,

    /// Rules text, verbatim from the source.
    pub text: String,

    /// Crypt group number.
    pub group: Option<i32>,

    /// Blood capacity (crypt cards).
    pub capacity: Option<i32>,

    /// Cost amount; `VARIABLE_COST` for an "X" cost.
    pub cost: Option<i32>,

    /// Cost currency ("blood", "pool", ...), lower-cased.
    pub cost_type: Option<String>,

    /// Clans this card belongs to.
    pub clans: SmallVec<[ClanId; 2]>,

    /// Disciplines this card carries, with their level.
    pub disciplines: SmallVec<[(DisciplineId, DisciplineLevel); 4]>,

    /// Card types.
    pub card_types: SmallVec<[CardTypeId; 2]>,

    /// Expansion/rarity pairings this card was printed in.
    pub expansions: Vec<(ExpansionId, RarityId)>,

    /// Extension attributes for source fields the model does not name.
    #[serde(default)]
    pub extras: Attributes,
}

impl AbstractCard {
    /// Create a new card with the given ID and name and no other data.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            text: String::new(),
            group: None,
            capacity: None,
            cost: None,
            cost_type: None,
            clans: SmallVec::new(),
            disciplines: SmallVec::new(),
            card_types: SmallVec::new(),
            expansions: Vec::new(),
            extras: Attributes::default(),
        }
    }

    /// Check whether this card belongs to the given clan.
    #[must_use]
    pub fn has_clan(&self, clan: ClanId) -> bool {
        self.clans.contains(&clan)
    }

    /// Check whether this card carries the given discipline at any level.
    #[must_use]
    pub fn has_discipline(&self, discipline: DisciplineId) -> bool {
        self.disciplines.iter().any(|(d, _)| *d == discipline)
    }

    /// Check whether this card has the given card type.
    #[must_use]
    pub fn has_card_type(&self, card_type: CardTypeId) -> bool {
        self.card_types.contains(&card_type)
    }

    /// Check whether this card was printed in the given expansion/rarity
    /// pairing.
    #[must_use]
    pub fn has_expansion_pairing(&self, expansion: ExpansionId, rarity: RarityId) -> bool {
        self.expansions.contains(&(expansion, rarity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_empty() {
        let card = AbstractCard::new(CardId::new(1), "Alexandra");
        assert_eq!(card.name, "Alexandra");
        assert_eq!(card.text, "");
        assert_eq!(card.group, None);
        assert!(card.clans.is_empty());
        assert!(card.expansions.is_empty());
    }

    #[test]
    fn test_trait_checks() {
        let mut card = AbstractCard::new(CardId::new(1), "Alexandra");
        card.clans.push(ClanId::new(3));
        card.disciplines
            .push((DisciplineId::new(5), DisciplineLevel::Inferior));

        assert!(card.has_clan(ClanId::new(3)));
        assert!(!card.has_clan(ClanId::new(4)));
        assert!(card.has_discipline(DisciplineId::new(5)));
        assert!(!card.has_discipline(DisciplineId::new(6)));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut card = AbstractCard::new(CardId::new(9), "Govern the Unaligned");
        card.cost = Some(1);
        card.cost_type = Some("blood".to_string());
        card.disciplines
            .push((DisciplineId::new(2), DisciplineLevel::Inferior));

        let json = serde_json::to_string(&card).unwrap();
        let back: AbstractCard = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
