//! Card schema and entity store.
//!
//! ## Key Types
//!
//! - ID newtypes: `CardId`, `ClanId`, `DisciplineId`, `CardTypeId`,
//!   `ExpansionId`, `RarityId`, `PhysicalCardId`, `CardSetId`
//! - `AbstractCard`: one row per distinct card name
//! - `PhysicalCard` / `CardSet`: the owned-copies side of the schema
//! - `CardStore`: registries, lookup-or-create, trait attachment, and the
//!   query executor
//! - `SchemaResolver`: the name-resolution handle filters are built against

pub mod attributes;
pub mod card;
pub mod ids;
pub mod inventory;
pub mod store;

pub use attributes::{AttributeKey, AttributeValue, Attributes};
pub use card::{AbstractCard, DisciplineLevel, VARIABLE_COST};
pub use ids::{
    CardId, CardSetId, CardTypeId, ClanId, DisciplineId, ExpansionId, PhysicalCardId, RarityId,
};
pub use inventory::{CardSet, PhysicalCard};
pub use store::{CardStore, SchemaError, SchemaResolver};
