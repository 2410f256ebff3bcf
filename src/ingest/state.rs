//! Parser states and structural errors.
//!
//! The machine is a tagged union of state kinds with one explicit
//! transition function (in `parser.rs`), not a class per state. Exactly
//! one state is current at any time; the in-progress record moves between
//! states by ownership transfer as the machine advances.

use thiserror::Error;

use crate::schema::SchemaError;

use super::record::RawRecord;

/// Error raised while feeding tokens to the parser.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token was invalid for the current state. Carries the offending
    /// tag (end tags `/`-prefixed) and the character data accumulated at
    /// the point of failure. The machine must be reset before further use.
    #[error("unexpected tag '{tag}' (buffered text: {buffer:?})")]
    UnexpectedTag {
        /// The tag that triggered the error.
        tag: String,
        /// Character data accumulated when the error was raised.
        buffer: String,
    },

    /// A token was fed after a structural error without an intervening
    /// `reset()`.
    #[error("parser must be reset after a structural error")]
    NotReset,

    /// The record sink rejected a finalized record.
    #[error(transparent)]
    Sink(#[from] SchemaError),
}

/// Where the machine currently is in a record block.
///
/// `NoCard` is both the initial state and the state the machine returns
/// to after each record; there is no terminal state. `Failed` marks the
/// machine unusable until `reset()`.
#[derive(Debug)]
pub(super) enum ParserState {
    /// No record in progress.
    NoCard,
    /// Inside a record block, not inside any field.
    InCard(RawRecord),
    /// Capturing the card name span.
    InCardName(RawRecord),
    /// Capturing the expansion list span.
    InExpansion(RawRecord),
    /// Capturing the rules text cell.
    InCardText(RawRecord),
    /// Capturing a key label span naming the next value.
    InKeyValue(RawRecord),
    /// Key captured; waiting for the value cell (or the end of the row).
    WaitingForValue {
        /// Normalized field key the value belongs to.
        key: String,
        /// Whether the value cell has been opened.
        got_cell: bool,
        /// The record under construction.
        record: RawRecord,
    },
    /// A structural error occurred; only `reset()` leaves this state.
    Failed,
}
