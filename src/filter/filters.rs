//! Composable card filters.
//!
//! Every filter exposes exactly one operation: `expression()`, which
//! lowers it to a `QueryExpr`. Lowering is pure and idempotent — all the
//! fallible work (resolving human-readable names to identifiers) happens
//! eagerly at construction, against an explicit `SchemaResolver` handle,
//! and fails fast with `SchemaError::UnknownName`.
//!
//! Multi-valued trait filters lower to a single set-membership atom, not
//! a disjunction of per-value equality joins: inside a larger AND tree
//! that is one join, not N.

use crate::schema::{
    CardId, CardSetId, CardTypeId, ClanId, DisciplineId, SchemaError, SchemaResolver,
};

use super::expr::QueryExpr;

/// A predicate over cards.
///
/// Implementors are immutable once constructed; `expression()` may be
/// called repeatedly and from multiple threads.
pub trait Filter {
    /// Lower this filter to a boolean query expression.
    fn expression(&self) -> QueryExpr;
}

// === Leaf filters ===

/// Cards belonging to one clan.
#[derive(Clone, Debug)]
pub struct ClanFilter {
    clan: ClanId,
}

impl ClanFilter {
    /// Resolve `name` and build the filter; unknown names fail here.
    pub fn new(resolver: &impl SchemaResolver, name: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            clan: resolver.resolve_clan(name)?,
        })
    }
}

impl Filter for ClanFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::ClanIn(vec![self.clan])
    }
}

/// Cards belonging to any of several clans.
#[derive(Clone, Debug)]
pub struct MultiClanFilter {
    clans: Vec<ClanId>,
}

impl MultiClanFilter {
    /// Resolve every name in `names`; any unknown name fails the whole
    /// construction.
    pub fn new(resolver: &impl SchemaResolver, names: &[&str]) -> Result<Self, SchemaError> {
        Ok(Self {
            clans: names
                .iter()
                .map(|n| resolver.resolve_clan(n))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl Filter for MultiClanFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::ClanIn(self.clans.clone())
    }
}

/// Cards carrying one discipline, at any level.
#[derive(Clone, Debug)]
pub struct DisciplineFilter {
    discipline: DisciplineId,
}

impl DisciplineFilter {
    /// Resolve `name` and build the filter; unknown names fail here.
    pub fn new(resolver: &impl SchemaResolver, name: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            discipline: resolver.resolve_discipline(name)?,
        })
    }
}

impl Filter for DisciplineFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::DisciplineIn(vec![self.discipline])
    }
}

/// Cards carrying any of several disciplines.
#[derive(Clone, Debug)]
pub struct MultiDisciplineFilter {
    disciplines: Vec<DisciplineId>,
}

impl MultiDisciplineFilter {
    /// Resolve every name in `names`; any unknown name fails the whole
    /// construction.
    pub fn new(resolver: &impl SchemaResolver, names: &[&str]) -> Result<Self, SchemaError> {
        Ok(Self {
            disciplines: names
                .iter()
                .map(|n| resolver.resolve_discipline(n))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl Filter for MultiDisciplineFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::DisciplineIn(self.disciplines.clone())
    }
}

/// Cards of one card type.
#[derive(Clone, Debug)]
pub struct CardTypeFilter {
    card_type: CardTypeId,
}

impl CardTypeFilter {
    /// Resolve `name` and build the filter; unknown names fail here.
    pub fn new(resolver: &impl SchemaResolver, name: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            card_type: resolver.resolve_card_type(name)?,
        })
    }
}

impl Filter for CardTypeFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::CardTypeIn(vec![self.card_type])
    }
}

/// Cards of any of several card types.
#[derive(Clone, Debug)]
pub struct MultiCardTypeFilter {
    card_types: Vec<CardTypeId>,
}

impl MultiCardTypeFilter {
    /// Resolve every name in `names`; any unknown name fails the whole
    /// construction.
    pub fn new(resolver: &impl SchemaResolver, names: &[&str]) -> Result<Self, SchemaError> {
        Ok(Self {
            card_types: names
                .iter()
                .map(|n| resolver.resolve_card_type(n))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl Filter for MultiCardTypeFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::CardTypeIn(self.card_types.clone())
    }
}

/// Cards with a specific crypt group.
#[derive(Clone, Debug)]
pub struct GroupFilter {
    group: i32,
}

impl GroupFilter {
    /// Build the filter. Groups are plain integers; nothing to resolve.
    #[must_use]
    pub fn new(group: i32) -> Self {
        Self { group }
    }
}

impl Filter for GroupFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::GroupIn(vec![self.group])
    }
}

/// Cards whose crypt group is in a set.
#[derive(Clone, Debug)]
pub struct MultiGroupFilter {
    groups: Vec<i32>,
}

impl MultiGroupFilter {
    /// Build the filter from a set of group numbers.
    #[must_use]
    pub fn new(groups: &[i32]) -> Self {
        Self {
            groups: groups.to_vec(),
        }
    }
}

impl Filter for MultiGroupFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::GroupIn(self.groups.clone())
    }
}

/// Cards whose rules text contains a substring (case-insensitive).
#[derive(Clone, Debug)]
pub struct CardTextFilter {
    pattern: String,
}

impl CardTextFilter {
    /// Build the filter from a search pattern.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
        }
    }
}

impl Filter for CardTextFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::TextLike(self.pattern.clone())
    }
}

/// Cards with at least one physical copy in the inventory.
///
/// Intended to be AND-ed with other filters.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhysicalCardFilter;

impl PhysicalCardFilter {
    /// Build the filter; it takes no parameters.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Filter for PhysicalCardFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::InInventory
    }
}

/// Cards present in a named card set.
#[derive(Clone, Debug)]
pub struct CardSetFilter {
    set: CardSetId,
}

impl CardSetFilter {
    /// Resolve the set name and build the filter; unknown names fail here.
    pub fn new(resolver: &impl SchemaResolver, name: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            set: resolver.resolve_card_set(name)?,
        })
    }
}

impl Filter for CardSetFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::InCardSet(self.set)
    }
}

/// Exactly one specific card.
#[derive(Clone, Copy, Debug)]
pub struct SpecificCardFilter {
    card: CardId,
}

impl SpecificCardFilter {
    /// Build the filter from a card identity.
    #[must_use]
    pub fn new(card: CardId) -> Self {
        Self { card }
    }
}

impl Filter for SpecificCardFilter {
    fn expression(&self) -> QueryExpr {
        QueryExpr::CardIs(self.card)
    }
}

// === Composite filters ===

/// Conjunction of child filters.
///
/// Children are kept in insertion order (for display; evaluation order is
/// irrelevant) and are not deduplicated. An empty box lowers to the AND
/// identity: always-true.
#[derive(Default)]
pub struct FilterAndBox {
    children: Vec<Box<dyn Filter>>,
}

impl FilterAndBox {
    /// Create an empty AND box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child filter (builder pattern).
    #[must_use]
    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.children.push(Box::new(filter));
        self
    }

    /// Add a boxed child filter.
    pub fn push(&mut self, filter: Box<dyn Filter>) {
        self.children.push(filter);
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the box has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Filter for FilterAndBox {
    fn expression(&self) -> QueryExpr {
        QueryExpr::And(self.children.iter().map(|c| c.expression()).collect())
    }
}

/// Disjunction of child filters.
///
/// An empty box lowers to the OR identity: always-false.
#[derive(Default)]
pub struct FilterOrBox {
    children: Vec<Box<dyn Filter>>,
}

impl FilterOrBox {
    /// Create an empty OR box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child filter (builder pattern).
    #[must_use]
    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.children.push(Box::new(filter));
        self
    }

    /// Add a boxed child filter.
    pub fn push(&mut self, filter: Box<dyn Filter>) {
        self.children.push(filter);
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the box has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Filter for FilterOrBox {
    fn expression(&self) -> QueryExpr {
        QueryExpr::Or(self.children.iter().map(|c| c.expression()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CardStore;

    /// Resolver backed by fixed tables, independent of any store.
    struct FakeResolver;

    impl SchemaResolver for FakeResolver {
        fn resolve_clan(&self, name: &str) -> Result<ClanId, SchemaError> {
            match name {
                "Ventrue" => Ok(ClanId::new(0)),
                "Toreador" => Ok(ClanId::new(1)),
                _ => Err(SchemaError::UnknownName {
                    category: "clan",
                    name: name.to_string(),
                }),
            }
        }

        fn resolve_discipline(&self, name: &str) -> Result<DisciplineId, SchemaError> {
            match name {
                "dom" => Ok(DisciplineId::new(0)),
                _ => Err(SchemaError::UnknownName {
                    category: "discipline",
                    name: name.to_string(),
                }),
            }
        }

        fn resolve_card_type(&self, name: &str) -> Result<CardTypeId, SchemaError> {
            match name {
                "Vampire" => Ok(CardTypeId::new(0)),
                _ => Err(SchemaError::UnknownName {
                    category: "card type",
                    name: name.to_string(),
                }),
            }
        }

        fn resolve_card_set(&self, name: &str) -> Result<CardSetId, SchemaError> {
            match name {
                "My Deck" => Ok(CardSetId::new(0)),
                _ => Err(SchemaError::UnknownName {
                    category: "card set",
                    name: name.to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_construction_resolves_eagerly() {
        let filter = ClanFilter::new(&FakeResolver, "Ventrue").unwrap();
        assert_eq!(filter.expression(), QueryExpr::ClanIn(vec![ClanId::new(0)]));
    }

    #[test]
    fn test_unknown_name_fails_fast() {
        let err = ClanFilter::new(&FakeResolver, "Giovanni").unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownName {
                category: "clan",
                name: "Giovanni".to_string(),
            }
        );

        // One bad element fails the whole multi filter.
        assert!(MultiClanFilter::new(&FakeResolver, &["Ventrue", "Giovanni"]).is_err());
        assert!(CardSetFilter::new(&FakeResolver, "No Such Deck").is_err());
    }

    #[test]
    fn test_expression_is_idempotent() {
        let filter = MultiClanFilter::new(&FakeResolver, &["Ventrue", "Toreador"]).unwrap();
        assert_eq!(filter.expression(), filter.expression());

        let boxed = FilterAndBox::new()
            .with(filter)
            .with(CardTextFilter::new("stealth"));
        assert_eq!(boxed.expression(), boxed.expression());
    }

    #[test]
    fn test_multi_lowers_to_single_membership() {
        let filter = MultiClanFilter::new(&FakeResolver, &["Ventrue", "Toreador"]).unwrap();
        assert_eq!(
            filter.expression(),
            QueryExpr::ClanIn(vec![ClanId::new(0), ClanId::new(1)])
        );
    }

    #[test]
    fn test_empty_boxes_lower_to_identities() {
        assert_eq!(FilterAndBox::new().expression(), QueryExpr::And(vec![]));
        assert_eq!(FilterOrBox::new().expression(), QueryExpr::Or(vec![]));

        // And of nothing matches everything; or of nothing matches nothing.
        let mut store = CardStore::new();
        let card = store.find_or_create_card("Anything");
        assert!(FilterAndBox::new().expression().matches(&store, card));
        assert!(!FilterOrBox::new().expression().matches(&store, card));
    }

    #[test]
    fn test_boxes_nest() {
        let expr = FilterOrBox::new()
            .with(
                FilterAndBox::new()
                    .with(GroupFilter::new(2))
                    .with(CardTextFilter::new("stealth")),
            )
            .with(PhysicalCardFilter::new())
            .expression();

        assert_eq!(
            expr,
            QueryExpr::Or(vec![
                QueryExpr::And(vec![
                    QueryExpr::GroupIn(vec![2]),
                    QueryExpr::TextLike("stealth".to_string()),
                ]),
                QueryExpr::InInventory,
            ])
        );
    }
}
