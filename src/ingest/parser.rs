//! The card-list parser: a streaming state machine over markup tokens.
//!
//! `CardListParser` consumes tokens one at a time and accumulates one
//! record per record block (`<p>...</p>` in the source format). Completed
//! records go to the configured `CardSink`; a record without a name is
//! discarded silently. Structurally invalid nesting raises
//! `ParseError::UnexpectedTag` and poisons the machine until `reset()`.
//!
//! The recognized sub-markers inside a record block are:
//! - `<span class="cardname">` — the card name
//! - `<span class="exp">` — the bracketed expansion list
//! - `<span class="key">` — a key label naming the next table value
//! - `<td colspan="2">` — the rules text cell
//!
//! Everything else is ignored, which is what makes the machine tolerant
//! of the surrounding page furniture.

use std::mem;

use tracing::debug;

use crate::schema::{CardStore, SchemaError};

use super::record::{parse_expansion_list, RawRecord, RawValue};
use super::state::{ParseError, ParserState};
use super::token::{Attrs, MarkupToken};
use super::tokenizer::Tokenizer;

/// Receiver for finalized records.
///
/// The store implements this by normalizing the record into the database;
/// tests can implement it to capture records as-is.
pub trait CardSink {
    /// Receive one finalized record.
    fn save(&mut self, record: &RawRecord) -> Result<(), SchemaError>;
}

impl CardSink for CardStore {
    fn save(&mut self, record: &RawRecord) -> Result<(), SchemaError> {
        record.apply_to(self)
    }
}

impl<S: CardSink + ?Sized> CardSink for &mut S {
    fn save(&mut self, record: &RawRecord) -> Result<(), SchemaError> {
        (**self).save(record)
    }
}

/// Streaming card-list parser.
///
/// Feed it tokens in arrival order; one instance handles one document at
/// a time. `reset()` makes it reusable for the next document, including
/// after an error.
#[derive(Debug)]
pub struct CardListParser<S> {
    sink: S,
    state: ParserState,
    buf: String,
    saved: usize,
}

impl<S: CardSink> CardListParser<S> {
    /// Create a parser feeding finalized records to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            state: ParserState::NoCard,
            buf: String::new(),
            saved: 0,
        }
    }

    /// Advance the machine by one token.
    ///
    /// On a structural error the machine must be `reset()` before further
    /// tokens are accepted; records finalized earlier are not rolled back.
    pub fn feed(&mut self, token: &MarkupToken) -> Result<(), ParseError> {
        if matches!(self.state, ParserState::Failed) {
            return Err(ParseError::NotReset);
        }
        match token {
            MarkupToken::Text(data) => {
                self.buf.push_str(data);
                Ok(())
            }
            MarkupToken::StartTag { name, attrs } => self.open_tag(name, attrs),
            MarkupToken::EndTag { name } => self.close_tag(name),
        }
    }

    /// Discard any in-progress record and return to the initial state.
    ///
    /// Callable at any time, including after a failure.
    pub fn reset(&mut self) {
        self.state = ParserState::NoCard;
        self.buf.clear();
    }

    /// Tokenize `input` and feed every token, stopping at the first error.
    pub fn parse_str(&mut self, input: &str) -> Result<(), ParseError> {
        for token in Tokenizer::new(input) {
            self.feed(&token)?;
        }
        Ok(())
    }

    /// Number of records finalized into the sink so far.
    #[must_use]
    pub fn cards_saved(&self) -> usize {
        self.saved
    }

    /// Borrow the sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the parser, returning the sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Build the structural error for the current buffer. The state has
    /// already been poisoned by the caller.
    fn fail(&mut self, tag: String) -> ParseError {
        ParseError::UnexpectedTag {
            tag,
            buffer: mem::take(&mut self.buf),
        }
    }

    fn open_tag(&mut self, tag: &str, attrs: &Attrs) -> Result<(), ParseError> {
        let class = attrs.get("class").map(String::as_str);
        let state = mem::replace(&mut self.state, ParserState::Failed);
        let next = match state {
            ParserState::NoCard => match tag {
                "p" => {
                    self.buf.clear();
                    ParserState::InCard(RawRecord::new())
                }
                _ => ParserState::NoCard,
            },
            ParserState::InCard(record) => match (tag, class) {
                ("p", _) => return Err(self.fail(tag.to_string())),
                ("span", Some("cardname")) => {
                    self.buf.clear();
                    ParserState::InCardName(record)
                }
                ("span", Some("exp")) => {
                    self.buf.clear();
                    ParserState::InExpansion(record)
                }
                ("span", Some("key")) => {
                    self.buf.clear();
                    ParserState::InKeyValue(record)
                }
                ("td", _) if attrs.get("colspan").map(String::as_str) == Some("2") => {
                    self.buf.clear();
                    ParserState::InCardText(record)
                }
                _ => ParserState::InCard(record),
            },
            ParserState::InCardName(record) => match tag {
                // Name spans do not nest.
                "span" => return Err(self.fail(tag.to_string())),
                _ => ParserState::InCardName(record),
            },
            ParserState::InExpansion(record) => match tag {
                "span" => return Err(self.fail(tag.to_string())),
                _ => ParserState::InExpansion(record),
            },
            ParserState::InCardText(record) => match tag {
                "td" => return Err(self.fail(tag.to_string())),
                _ => ParserState::InCardText(record),
            },
            ParserState::InKeyValue(record) => match tag {
                "span" => return Err(self.fail(tag.to_string())),
                _ => ParserState::InKeyValue(record),
            },
            ParserState::WaitingForValue {
                key,
                got_cell,
                record,
            } => match tag {
                "td" if got_cell => return Err(self.fail(tag.to_string())),
                "td" => {
                    self.buf.clear();
                    ParserState::WaitingForValue {
                        key,
                        got_cell: true,
                        record,
                    }
                }
                "tr" => return Err(self.fail(tag.to_string())),
                _ => ParserState::WaitingForValue {
                    key,
                    got_cell,
                    record,
                },
            },
            ParserState::Failed => return Err(ParseError::NotReset),
        };
        self.state = next;
        Ok(())
    }

    fn close_tag(&mut self, tag: &str) -> Result<(), ParseError> {
        let state = mem::replace(&mut self.state, ParserState::Failed);
        let next = match state {
            ParserState::NoCard => match tag {
                "p" => return Err(self.fail(format!("/{tag}"))),
                _ => ParserState::NoCard,
            },
            ParserState::InCard(record) => match tag {
                "p" => {
                    self.finalize(record)?;
                    self.buf.clear();
                    ParserState::NoCard
                }
                _ => ParserState::InCard(record),
            },
            ParserState::InCardName(mut record) => match tag {
                "span" => {
                    record.name = Some(self.buf.trim().to_string());
                    self.buf.clear();
                    ParserState::InCard(record)
                }
                _ => ParserState::InCardName(record),
            },
            ParserState::InExpansion(mut record) => match tag {
                "span" => {
                    record.expansions = parse_expansion_list(self.buf.trim());
                    self.buf.clear();
                    ParserState::InCard(record)
                }
                _ => ParserState::InExpansion(record),
            },
            ParserState::InCardText(mut record) => match tag {
                "td" => {
                    record.text = Some(self.buf.trim().to_string());
                    self.buf.clear();
                    ParserState::InCard(record)
                }
                _ => ParserState::InCardText(record),
            },
            ParserState::InKeyValue(record) => match tag {
                "span" => {
                    let key = self
                        .buf
                        .trim()
                        .trim_end_matches(':')
                        .trim_end()
                        .to_lowercase();
                    self.buf.clear();
                    ParserState::WaitingForValue {
                        key,
                        got_cell: false,
                        record,
                    }
                }
                _ => ParserState::InKeyValue(record),
            },
            ParserState::WaitingForValue {
                key,
                got_cell,
                mut record,
            } => match tag {
                "td" if got_cell => {
                    record.set_field(&key, RawValue::Text(self.buf.trim().to_string()));
                    self.buf.clear();
                    ParserState::InCard(record)
                }
                // Row ended before any value cell: record the key with an
                // explicit no-value marker.
                "tr" => {
                    record.set_field(&key, RawValue::Missing);
                    self.buf.clear();
                    ParserState::InCard(record)
                }
                _ => ParserState::WaitingForValue {
                    key,
                    got_cell,
                    record,
                },
            },
            ParserState::Failed => return Err(ParseError::NotReset),
        };
        self.state = next;
        Ok(())
    }

    /// Hand a completed record to the sink; nameless records are dropped
    /// without a sink call.
    fn finalize(&mut self, record: RawRecord) -> Result<(), ParseError> {
        if record.name.is_none() {
            debug!("discarding nameless record");
            return Ok(());
        }
        self.sink.save(&record)?;
        self.saved += 1;
        Ok(())
    }
}
