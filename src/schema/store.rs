//! The entity store: trait registries, card lookup, and query execution.
//!
//! `CardStore` is the in-memory stand-in for the relational backend. It
//! owns every row kind in the schema and exposes the narrow contract the
//! rest of the crate relies on: find-by-exact-name, create-with-name,
//! attach-trait, record-expansion-pairing, resolve-name-to-identifier, and
//! `select` for executing a lowered filter expression.
//!
//! Card lookup is by exact name only. Two source records whose names
//! differ by formatting create two cards; this matches the ingestion
//! source's behavior and is a known limitation, not a bug to paper over
//! with fuzzy matching.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::filter::QueryExpr;

use super::card::{AbstractCard, DisciplineLevel};
use super::ids::{
    CardId, CardSetId, CardTypeId, ClanId, DisciplineId, ExpansionId, PhysicalCardId, RarityId,
};
use super::inventory::{CardSet, PhysicalCard};

/// Error raised when a human-supplied name does not resolve to a row.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The named value does not exist in the given category.
    #[error("no such {category}: {name:?}")]
    UnknownName {
        /// Row category ("clan", "discipline", ...).
        category: &'static str,
        /// The name that failed to resolve.
        name: String,
    },
}

impl SchemaError {
    fn unknown(category: &'static str, name: &str) -> Self {
        Self::UnknownName {
            category,
            name: name.to_string(),
        }
    }
}

/// Resolution handle for filter construction.
///
/// Filters resolve names to identifiers eagerly when they are built, and
/// they do it through this trait rather than a concrete store, so the
/// filter model carries no hidden global state and tests can supply a fake.
pub trait SchemaResolver {
    /// Resolve a clan name.
    fn resolve_clan(&self, name: &str) -> Result<ClanId, SchemaError>;
    /// Resolve a discipline name.
    fn resolve_discipline(&self, name: &str) -> Result<DisciplineId, SchemaError>;
    /// Resolve a card type name.
    fn resolve_card_type(&self, name: &str) -> Result<CardTypeId, SchemaError>;
    /// Resolve a card set name.
    fn resolve_card_set(&self, name: &str) -> Result<CardSetId, SchemaError>;
}

/// Name <-> ID table for one row category.
#[derive(Clone, Debug)]
struct NameTable<I> {
    by_id: FxHashMap<I, String>,
    by_name: FxHashMap<String, I>,
    next: u32,
}

impl<I> Default for NameTable<I> {
    fn default() -> Self {
        Self {
            by_id: FxHashMap::default(),
            by_name: FxHashMap::default(),
            next: 0,
        }
    }
}

impl<I: Copy + Eq + std::hash::Hash + From<u32>> NameTable<I> {
    /// Register a name, returning the existing ID if already present.
    fn register(&mut self, name: &str) -> I {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = I::from(self.next);
        self.next += 1;
        self.by_id.insert(id, name.to_string());
        self.by_name.insert(name.to_string(), id);
        id
    }

    fn resolve(&self, name: &str) -> Option<I> {
        self.by_name.get(name).copied()
    }

    fn name_of(&self, id: I) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }
}

/// The card database.
#[derive(Clone, Debug, Default)]
pub struct CardStore {
    cards: FxHashMap<CardId, AbstractCard>,
    card_names: FxHashMap<String, CardId>,
    next_card: u32,

    clans: NameTable<ClanId>,
    disciplines: NameTable<DisciplineId>,
    card_types: NameTable<CardTypeId>,
    expansions: NameTable<ExpansionId>,
    rarities: NameTable<RarityId>,

    physical: FxHashMap<PhysicalCardId, PhysicalCard>,
    next_physical: u32,

    card_sets: FxHashMap<CardSetId, CardSet>,
    card_set_names: FxHashMap<String, CardSetId>,
    next_card_set: u32,
}

impl CardStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Trait registries ===

    /// Register a clan, returning its ID. Idempotent per exact name.
    pub fn register_clan(&mut self, name: &str) -> ClanId {
        self.clans.register(name)
    }

    /// Register a discipline, returning its ID. Idempotent per exact name.
    pub fn register_discipline(&mut self, name: &str) -> DisciplineId {
        self.disciplines.register(name)
    }

    /// Register a card type, returning its ID. Idempotent per exact name.
    pub fn register_card_type(&mut self, name: &str) -> CardTypeId {
        self.card_types.register(name)
    }

    /// Register an expansion, returning its ID. Idempotent per exact name.
    pub fn register_expansion(&mut self, name: &str) -> ExpansionId {
        self.expansions.register(name)
    }

    /// Register a rarity class, returning its ID. Idempotent per exact name.
    pub fn register_rarity(&mut self, name: &str) -> RarityId {
        self.rarities.register(name)
    }

    /// Resolve a clan name to its ID.
    pub fn clan_id(&self, name: &str) -> Result<ClanId, SchemaError> {
        self.clans
            .resolve(name)
            .ok_or_else(|| SchemaError::unknown("clan", name))
    }

    /// Resolve a discipline name to its ID.
    pub fn discipline_id(&self, name: &str) -> Result<DisciplineId, SchemaError> {
        self.disciplines
            .resolve(name)
            .ok_or_else(|| SchemaError::unknown("discipline", name))
    }

    /// Resolve a card type name to its ID.
    pub fn card_type_id(&self, name: &str) -> Result<CardTypeId, SchemaError> {
        self.card_types
            .resolve(name)
            .ok_or_else(|| SchemaError::unknown("card type", name))
    }

    /// Resolve an expansion name to its ID.
    pub fn expansion_id(&self, name: &str) -> Result<ExpansionId, SchemaError> {
        self.expansions
            .resolve(name)
            .ok_or_else(|| SchemaError::unknown("expansion", name))
    }

    /// Get a clan's display name.
    #[must_use]
    pub fn clan_name(&self, id: ClanId) -> Option<&str> {
        self.clans.name_of(id)
    }

    /// Get a discipline's display name.
    #[must_use]
    pub fn discipline_name(&self, id: DisciplineId) -> Option<&str> {
        self.disciplines.name_of(id)
    }

    /// Get an expansion's display name.
    #[must_use]
    pub fn expansion_name(&self, id: ExpansionId) -> Option<&str> {
        self.expansions.name_of(id)
    }

    /// Get a rarity's display name.
    #[must_use]
    pub fn rarity_name(&self, id: RarityId) -> Option<&str> {
        self.rarities.name_of(id)
    }

    /// Number of registered clans.
    #[must_use]
    pub fn clan_count(&self) -> usize {
        self.clans.len()
    }

    // === Cards ===

    /// Look up a card by exact name.
    #[must_use]
    pub fn find_card_by_name(&self, name: &str) -> Option<CardId> {
        self.card_names.get(name).copied()
    }

    /// Look up a card by exact name, creating it with empty text if absent.
    pub fn find_or_create_card(&mut self, name: &str) -> CardId {
        if let Some(id) = self.find_card_by_name(name) {
            return id;
        }
        let id = CardId::new(self.next_card);
        self.next_card += 1;
        self.cards.insert(id, AbstractCard::new(id, name));
        self.card_names.insert(name.to_string(), id);
        id
    }

    /// Get a card by ID.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&AbstractCard> {
        self.cards.get(&id)
    }

    /// Get a card by ID, panicking if not found.
    ///
    /// Use when you're certain the card exists.
    #[must_use]
    pub fn card_unchecked(&self, id: CardId) -> &AbstractCard {
        self.cards.get(&id).expect("card not found in store")
    }

    /// Get a mutable card by ID.
    pub fn card_mut(&mut self, id: CardId) -> Option<&mut AbstractCard> {
        self.cards.get_mut(&id)
    }

    /// Number of cards in the store.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Iterate over all cards.
    pub fn iter_cards(&self) -> impl Iterator<Item = &AbstractCard> {
        self.cards.values()
    }

    // === Trait attachment ===

    /// Attach a clan to a card. Attaching twice is harmless.
    pub fn attach_clan(&mut self, card: CardId, clan: ClanId) {
        if let Some(card) = self.cards.get_mut(&card) {
            if !card.clans.contains(&clan) {
                card.clans.push(clan);
            }
        }
    }

    /// Attach a discipline at the given level, reusing an existing
    /// (discipline, level) pairing rather than duplicating it.
    pub fn attach_discipline(
        &mut self,
        card: CardId,
        discipline: DisciplineId,
        level: DisciplineLevel,
    ) {
        if let Some(card) = self.cards.get_mut(&card) {
            if !card.disciplines.contains(&(discipline, level)) {
                card.disciplines.push((discipline, level));
            }
        }
    }

    /// Attach a card type to a card. Attaching twice is harmless.
    pub fn attach_card_type(&mut self, card: CardId, card_type: CardTypeId) {
        if let Some(card) = self.cards.get_mut(&card) {
            if !card.card_types.contains(&card_type) {
                card.card_types.push(card_type);
            }
        }
    }

    /// Record that a card was printed in the given expansion at the given
    /// rarity. Recording the same pairing twice is harmless.
    pub fn record_expansion_pairing(
        &mut self,
        card: CardId,
        expansion: ExpansionId,
        rarity: RarityId,
    ) {
        if let Some(card) = self.cards.get_mut(&card) {
            if !card.expansions.contains(&(expansion, rarity)) {
                card.expansions.push((expansion, rarity));
            }
        }
    }

    // === Physical inventory ===

    /// Add a physical copy of a card to the inventory.
    pub fn add_physical_card(
        &mut self,
        card: CardId,
        expansion: Option<ExpansionId>,
    ) -> PhysicalCardId {
        let id = PhysicalCardId::new(self.next_physical);
        self.next_physical += 1;
        self.physical.insert(
            id,
            PhysicalCard {
                id,
                card,
                expansion,
            },
        );
        id
    }

    /// Get a physical card by ID.
    #[must_use]
    pub fn physical_card(&self, id: PhysicalCardId) -> Option<&PhysicalCard> {
        self.physical.get(&id)
    }

    /// Number of physical cards in the inventory.
    #[must_use]
    pub fn physical_count(&self) -> usize {
        self.physical.len()
    }

    /// Check whether at least one physical copy of the card exists.
    #[must_use]
    pub fn has_physical_copy(&self, card: CardId) -> bool {
        self.physical.values().any(|p| p.card == card)
    }

    // === Card sets ===

    /// Create a named card set, returning the existing one's ID if the
    /// name is already taken.
    pub fn create_card_set(&mut self, name: &str) -> CardSetId {
        if let Some(&id) = self.card_set_names.get(name) {
            return id;
        }
        let id = CardSetId::new(self.next_card_set);
        self.next_card_set += 1;
        self.card_sets.insert(id, CardSet::new(id, name));
        self.card_set_names.insert(name.to_string(), id);
        id
    }

    /// Resolve a card set name to its ID.
    pub fn card_set_id(&self, name: &str) -> Result<CardSetId, SchemaError> {
        self.card_set_names
            .get(name)
            .copied()
            .ok_or_else(|| SchemaError::unknown("card set", name))
    }

    /// Get a card set by ID.
    #[must_use]
    pub fn card_set(&self, id: CardSetId) -> Option<&CardSet> {
        self.card_sets.get(&id)
    }

    /// Add a physical card to a set.
    pub fn add_to_card_set(&mut self, set: CardSetId, physical: PhysicalCardId) {
        if let Some(set) = self.card_sets.get_mut(&set) {
            if !set.cards.contains(&physical) {
                set.cards.push(physical);
            }
        }
    }

    /// Check whether a set contains any physical copy of the given
    /// abstract card.
    #[must_use]
    pub fn set_contains_card(&self, set: CardSetId, card: CardId) -> bool {
        self.card_sets.get(&set).is_some_and(|s| {
            s.cards
                .iter()
                .any(|p| self.physical.get(p).is_some_and(|p| p.card == card))
        })
    }

    // === Query execution ===

    /// Execute a lowered filter expression, returning matching card IDs
    /// in ascending ID order.
    #[must_use]
    pub fn select(&self, expr: &QueryExpr) -> Vec<CardId> {
        let mut hits: Vec<CardId> = self
            .cards
            .keys()
            .copied()
            .filter(|&id| expr.matches(self, id))
            .collect();
        hits.sort_unstable();
        hits
    }
}

impl SchemaResolver for CardStore {
    fn resolve_clan(&self, name: &str) -> Result<ClanId, SchemaError> {
        self.clan_id(name)
    }

    fn resolve_discipline(&self, name: &str) -> Result<DisciplineId, SchemaError> {
        self.discipline_id(name)
    }

    fn resolve_card_type(&self, name: &str) -> Result<CardTypeId, SchemaError> {
        self.card_type_id(name)
    }

    fn resolve_card_set(&self, name: &str) -> Result<CardSetId, SchemaError> {
        self.card_set_id(name)
    }
}
