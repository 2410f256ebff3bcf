//! Markup tokens consumed by the parser state machine.
//!
//! The machine sees exactly three token kinds: tag open, tag close, and
//! character data. Tag and attribute names are lower-cased before they
//! reach the machine; the tokenizer in this crate does that, and any
//! external token source must do the same.

use rustc_hash::FxHashMap;

/// Attribute map of a start tag, keyed by lower-cased attribute name.
pub type Attrs = FxHashMap<String, String>;

/// One markup token.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkupToken {
    /// An opening tag with its attributes.
    StartTag {
        /// Lower-cased tag name.
        name: String,
        /// Attributes, keyed by lower-cased name.
        attrs: Attrs,
    },
    /// A closing tag.
    EndTag {
        /// Lower-cased tag name.
        name: String,
    },
    /// Character data between tags, verbatim.
    Text(String),
}

impl MarkupToken {
    /// Build a start tag token. Names are lower-cased here so hand-built
    /// token streams behave like tokenizer output.
    #[must_use]
    pub fn open(name: &str, attrs: &[(&str, &str)]) -> Self {
        Self::StartTag {
            name: name.to_ascii_lowercase(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), (*v).to_string()))
                .collect(),
        }
    }

    /// Build an end tag token.
    #[must_use]
    pub fn close(name: &str) -> Self {
        Self::EndTag {
            name: name.to_ascii_lowercase(),
        }
    }

    /// Build a character data token.
    #[must_use]
    pub fn text(data: &str) -> Self {
        Self::Text(data.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_lowercases() {
        let tok = MarkupToken::open("SPAN", &[("CLASS", "CardName")]);
        match tok {
            MarkupToken::StartTag { name, attrs } => {
                assert_eq!(name, "span");
                // Attribute names lower-cased, values untouched.
                assert_eq!(attrs.get("class").map(String::as_str), Some("CardName"));
            }
            _ => panic!("expected start tag"),
        }
    }

    #[test]
    fn test_close_lowercases() {
        assert_eq!(
            MarkupToken::close("P"),
            MarkupToken::EndTag {
                name: "p".to_string()
            }
        );
    }
}
