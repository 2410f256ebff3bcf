//! Composable filter/query model.
//!
//! Filters are small predicate objects that compose into trees via
//! `FilterAndBox`/`FilterOrBox` and lower to `QueryExpr`, the boolean
//! algebra the store's `select` executor evaluates. Names are resolved to
//! identifiers at construction time, so lowering never fails.

pub mod expr;
pub mod filters;

pub use expr::QueryExpr;
pub use filters::{
    CardSetFilter, CardTextFilter, CardTypeFilter, ClanFilter, DisciplineFilter, Filter,
    FilterAndBox, FilterOrBox, GroupFilter, MultiCardTypeFilter, MultiClanFilter,
    MultiDisciplineFilter, MultiGroupFilter, PhysicalCardFilter, SpecificCardFilter,
};
