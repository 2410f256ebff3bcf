//! Streaming card-list ingestion.
//!
//! Raw markup text flows through a pipeline: `Tokenizer` produces
//! `MarkupToken`s, `CardListParser` folds them into `RawRecord`s one
//! record block at a time, and each finalized record is normalized into
//! the store through the `CardSink` seam. No stage buffers the document;
//! a structural error aborts the current parse and nothing else.

pub mod parser;
pub mod record;
pub mod state;
pub mod token;
pub mod tokenizer;

pub use parser::{CardListParser, CardSink};
pub use record::{RawRecord, RawValue};
pub use state::ParseError;
pub use token::{Attrs, MarkupToken};
pub use tokenizer::Tokenizer;
