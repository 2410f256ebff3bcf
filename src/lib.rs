//! # cardbase
//!
//! The data core of a trading-card collection manager: a streaming
//! card-list ingestion pipeline and a composable filter/query model over
//! the resulting card database.
//!
//! ## Architecture
//!
//! - **Streaming ingestion**: published card lists arrive as
//!   semi-structured HTML. A tokenizer turns the text into a flat stream of
//!   markup tokens, and a finite state machine (`CardListParser`) folds that
//!   stream into one card record at a time, with no lookahead and no
//!   whole-document buffering. Completed records are normalized and handed
//!   to a sink (usually the `CardStore`).
//!
//! - **Composable filters**: searches are built as trees of predicate
//!   objects (`ClanFilter`, `FilterAndBox`, ...). Every filter lowers to a
//!   `QueryExpr`, a boolean expression the store's query executor
//!   evaluates. Filters resolve names to identifiers eagerly at
//!   construction, so a built tree cannot fail when lowered.
//!
//! ## Modules
//!
//! - `schema`: card/trait identifiers, the `AbstractCard` model, physical
//!   inventory, named card sets, and the `CardStore` entity store
//! - `ingest`: markup tokens, the HTML tokenizer, raw card records and
//!   their field normalizers, and the parser state machine
//! - `filter`: the `Filter` trait, leaf and composite filters, and the
//!   `QueryExpr` boolean algebra

pub mod schema;
pub mod ingest;
pub mod filter;

// Re-export commonly used types
pub use crate::schema::{
    CardId, ClanId, DisciplineId, CardTypeId, ExpansionId, RarityId,
    PhysicalCardId, CardSetId,
    AbstractCard, DisciplineLevel, PhysicalCard, CardSet, VARIABLE_COST,
    CardStore, SchemaError, SchemaResolver,
    AttributeKey, AttributeValue, Attributes,
};

pub use crate::ingest::{
    MarkupToken, Attrs, Tokenizer,
    RawRecord, RawValue,
    CardListParser, CardSink, ParseError,
};

pub use crate::filter::{
    Filter, QueryExpr,
    ClanFilter, MultiClanFilter,
    DisciplineFilter, MultiDisciplineFilter,
    CardTypeFilter, MultiCardTypeFilter,
    GroupFilter, MultiGroupFilter,
    CardTextFilter, PhysicalCardFilter, CardSetFilter, SpecificCardFilter,
    FilterAndBox, FilterOrBox,
};
