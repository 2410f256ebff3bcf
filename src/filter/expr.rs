//! The boolean query expression algebra.
//!
//! Filters lower to `QueryExpr` trees; the store's query executor
//! evaluates them card by card. The algebra mirrors what a relational
//! backend would be handed: AND/OR combinators over join-shaped atoms
//! (trait membership through the association tables, substring match on
//! text, inventory and card-set joins, identity equality).
//!
//! Evaluation is pure: an expression can be matched repeatedly, against
//! any store, from any thread.

use serde::{Deserialize, Serialize};

use crate::schema::{CardId, CardSetId, CardStore, CardTypeId, ClanId, DisciplineId};

/// A lowered boolean query expression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum QueryExpr {
    /// Matches every card.
    True,
    /// Matches no card.
    False,
    /// Conjunction of sub-expressions. `And` of nothing is `True`.
    And(Vec<QueryExpr>),
    /// Disjunction of sub-expressions. `Or` of nothing is `False`.
    Or(Vec<QueryExpr>),
    /// Card belongs to any of these clans.
    ClanIn(Vec<ClanId>),
    /// Card carries any of these disciplines, at any level.
    DisciplineIn(Vec<DisciplineId>),
    /// Card has any of these card types.
    CardTypeIn(Vec<CardTypeId>),
    /// Card's group number is in this set.
    GroupIn(Vec<i32>),
    /// Card text contains this substring, case-insensitively.
    TextLike(String),
    /// At least one physical copy of the card exists.
    InInventory,
    /// Some physical copy of the card is in the given card set.
    InCardSet(CardSetId),
    /// The card is exactly this card.
    CardIs(CardId),
}

impl QueryExpr {
    /// Evaluate this expression against one card.
    ///
    /// A card ID not present in the store matches nothing.
    #[must_use]
    pub fn matches(&self, store: &CardStore, id: CardId) -> bool {
        match self {
            QueryExpr::True => store.card(id).is_some(),
            QueryExpr::False => false,
            QueryExpr::And(children) => children.iter().all(|c| c.matches(store, id)),
            QueryExpr::Or(children) => children.iter().any(|c| c.matches(store, id)),
            QueryExpr::ClanIn(clans) => store
                .card(id)
                .is_some_and(|card| clans.iter().any(|&c| card.has_clan(c))),
            QueryExpr::DisciplineIn(disciplines) => store
                .card(id)
                .is_some_and(|card| disciplines.iter().any(|&d| card.has_discipline(d))),
            QueryExpr::CardTypeIn(types) => store
                .card(id)
                .is_some_and(|card| types.iter().any(|&t| card.has_card_type(t))),
            QueryExpr::GroupIn(groups) => store
                .card(id)
                .and_then(|card| card.group)
                .is_some_and(|g| groups.contains(&g)),
            QueryExpr::TextLike(pattern) => store.card(id).is_some_and(|card| {
                card.text
                    .to_lowercase()
                    .contains(&pattern.to_lowercase())
            }),
            QueryExpr::InInventory => store.has_physical_copy(id),
            QueryExpr::InCardSet(set) => store.set_contains_card(*set, id),
            QueryExpr::CardIs(card) => *card == id && store.card(id).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_cards() -> (CardStore, CardId, CardId) {
        let mut store = CardStore::new();
        let a = store.find_or_create_card("Aching Beauty");
        let b = store.find_or_create_card("Bum's Rush");
        if let Some(card) = store.card_mut(a) {
            card.text = "Requires a ready Toreador.".to_string();
            card.group = Some(2);
        }
        (store, a, b)
    }

    #[test]
    fn test_constants() {
        let (store, a, _) = store_with_cards();
        assert!(QueryExpr::True.matches(&store, a));
        assert!(!QueryExpr::False.matches(&store, a));
        // True still requires the card to exist.
        assert!(!QueryExpr::True.matches(&store, CardId::new(99)));
    }

    #[test]
    fn test_empty_combinators_are_identities() {
        let (store, a, _) = store_with_cards();
        assert!(QueryExpr::And(vec![]).matches(&store, a));
        assert!(!QueryExpr::Or(vec![]).matches(&store, a));
    }

    #[test]
    fn test_text_like_is_case_insensitive() {
        let (store, a, b) = store_with_cards();
        let expr = QueryExpr::TextLike("toreador".to_string());
        assert!(expr.matches(&store, a));
        assert!(!expr.matches(&store, b));
    }

    #[test]
    fn test_group_in() {
        let (store, a, b) = store_with_cards();
        let expr = QueryExpr::GroupIn(vec![1, 2]);
        assert!(expr.matches(&store, a));
        // Card without a group never matches a group test.
        assert!(!expr.matches(&store, b));
    }

    #[test]
    fn test_nested_combinators() {
        let (store, a, b) = store_with_cards();
        let expr = QueryExpr::Or(vec![
            QueryExpr::And(vec![
                QueryExpr::GroupIn(vec![2]),
                QueryExpr::TextLike("toreador".to_string()),
            ]),
            QueryExpr::CardIs(b),
        ]);
        assert!(expr.matches(&store, a));
        assert!(expr.matches(&store, b));
    }
}
