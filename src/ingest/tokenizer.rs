//! Minimal HTML tokenizer.
//!
//! Splits markup text into the flat token stream the parser state machine
//! consumes. This is deliberately not a conforming HTML parser: the source
//! card lists use a small, regular subset of HTML, and the machine ignores
//! every tag it does not recognize anyway.
//!
//! Handled: start/end tags, single-, double- and unquoted attribute
//! values, self-closing tags (emitted as a start tag followed by an end
//! tag), comments and `<!...>`/`<?...>` declarations (skipped). Character
//! and entity references are passed through undecoded. Markup truncated
//! mid-tag at end of input is dropped.

use super::token::{Attrs, MarkupToken};

/// Iterator producing `MarkupToken`s from markup text.
///
/// Tag and attribute names are lower-cased; text is passed through
/// verbatim.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    rest: &'a str,
    pending: Option<MarkupToken>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            pending: None,
        }
    }
}

/// Find the byte offset of the `>` closing a tag body, skipping over
/// quoted attribute values.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in s.bytes().enumerate() {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

/// Parse the inside of a start tag (`name attr="value" ...`) into a name
/// and attribute map. Returns `None` for an empty tag body.
fn parse_start_tag(body: &str) -> Option<(String, Attrs)> {
    let body = body.trim();
    let name_end = body
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }

    let mut attrs = Attrs::default();
    let mut rest = body[name_end..].trim_start();
    while !rest.is_empty() {
        if let Some(r) = rest.strip_prefix('/') {
            rest = r.trim_start();
            continue;
        }
        let key_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let value = if let Some(r) = rest.strip_prefix('=') {
            let r = r.trim_start();
            if let Some(quoted) = r.strip_prefix('"').or_else(|| r.strip_prefix('\'')) {
                let quote = r.as_bytes()[0] as char;
                match quoted.find(quote) {
                    Some(end) => {
                        rest = quoted[end + 1..].trim_start();
                        quoted[..end].to_string()
                    }
                    None => {
                        rest = "";
                        quoted.to_string()
                    }
                }
            } else {
                let end = r
                    .find(|c: char| c.is_ascii_whitespace())
                    .unwrap_or(r.len());
                let value = r[..end].to_string();
                rest = r[end..].trim_start();
                value
            }
        } else {
            String::new()
        };

        if !key.is_empty() {
            attrs.insert(key, value);
        }
    }

    Some((name, attrs))
}

impl Iterator for Tokenizer<'_> {
    type Item = MarkupToken;

    fn next(&mut self) -> Option<MarkupToken> {
        if let Some(tok) = self.pending.take() {
            return Some(tok);
        }

        loop {
            if self.rest.is_empty() {
                return None;
            }

            let Some(markup) = self.rest.strip_prefix('<') else {
                let end = self.rest.find('<').unwrap_or(self.rest.len());
                let text = &self.rest[..end];
                self.rest = &self.rest[end..];
                return Some(MarkupToken::Text(text.to_string()));
            };

            if let Some(comment) = markup.strip_prefix("!--") {
                match comment.find("-->") {
                    Some(i) => {
                        self.rest = &comment[i + 3..];
                        continue;
                    }
                    None => {
                        self.rest = "";
                        return None;
                    }
                }
            }

            if markup.starts_with('!') || markup.starts_with('?') {
                match markup.find('>') {
                    Some(i) => {
                        self.rest = &markup[i + 1..];
                        continue;
                    }
                    None => {
                        self.rest = "";
                        return None;
                    }
                }
            }

            if let Some(end_tag) = markup.strip_prefix('/') {
                match end_tag.find('>') {
                    Some(i) => {
                        let name = end_tag[..i].trim().to_ascii_lowercase();
                        self.rest = &end_tag[i + 1..];
                        if name.is_empty() {
                            continue;
                        }
                        return Some(MarkupToken::EndTag { name });
                    }
                    None => {
                        self.rest = "";
                        return None;
                    }
                }
            }

            match find_tag_end(markup) {
                Some(i) => {
                    let body = &markup[..i];
                    self.rest = &markup[i + 1..];
                    let self_closing = body.trim_end().ends_with('/');
                    match parse_start_tag(body) {
                        Some((name, attrs)) => {
                            if self_closing {
                                self.pending = Some(MarkupToken::EndTag { name: name.clone() });
                            }
                            return Some(MarkupToken::StartTag { name, attrs });
                        }
                        None => continue,
                    }
                }
                None => {
                    self.rest = "";
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(input: &str) -> Vec<MarkupToken> {
        Tokenizer::new(input).collect()
    }

    #[test]
    fn test_simple_tags_and_text() {
        let toks = all("<p>Hello</p>");
        assert_eq!(
            toks,
            vec![
                MarkupToken::open("p", &[]),
                MarkupToken::text("Hello"),
                MarkupToken::close("p"),
            ]
        );
    }

    #[test]
    fn test_attributes_quoted_and_unquoted() {
        let toks = all(r#"<span class="cardname"><td COLSPAN=2><a href='x'>"#);
        match &toks[0] {
            MarkupToken::StartTag { name, attrs } => {
                assert_eq!(name, "span");
                assert_eq!(attrs.get("class").map(String::as_str), Some("cardname"));
            }
            other => panic!("unexpected token: {:?}", other),
        }
        match &toks[1] {
            MarkupToken::StartTag { name, attrs } => {
                assert_eq!(name, "td");
                assert_eq!(attrs.get("colspan").map(String::as_str), Some("2"));
            }
            other => panic!("unexpected token: {:?}", other),
        }
        match &toks[2] {
            MarkupToken::StartTag { attrs, .. } => {
                assert_eq!(attrs.get("href").map(String::as_str), Some("x"));
            }
            other => panic!("unexpected token: {:?}", other),
        }
    }

    #[test]
    fn test_names_lowercased() {
        let toks = all("<SPAN CLASS=\"exp\"></SPAN>");
        assert_eq!(toks[0], MarkupToken::open("span", &[("class", "exp")]));
        assert_eq!(toks[1], MarkupToken::close("span"));
    }

    #[test]
    fn test_self_closing() {
        let toks = all("a<br/>b");
        assert_eq!(
            toks,
            vec![
                MarkupToken::text("a"),
                MarkupToken::open("br", &[]),
                MarkupToken::close("br"),
                MarkupToken::text("b"),
            ]
        );
    }

    #[test]
    fn test_comments_and_declarations_skipped() {
        let toks = all("<!DOCTYPE html><!-- a <p> in a comment -->x<?pi?>");
        assert_eq!(toks, vec![MarkupToken::text("x")]);
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let toks = all(r#"<td title="a>b">v</td>"#);
        match &toks[0] {
            MarkupToken::StartTag { attrs, .. } => {
                assert_eq!(attrs.get("title").map(String::as_str), Some("a>b"));
            }
            other => panic!("unexpected token: {:?}", other),
        }
        assert_eq!(toks[1], MarkupToken::text("v"));
    }

    #[test]
    fn test_truncated_tag_dropped() {
        let toks = all("ok<td class=");
        assert_eq!(toks, vec![MarkupToken::text("ok")]);
    }

    #[test]
    fn test_valueless_attribute() {
        let toks = all("<td nowrap>");
        match &toks[0] {
            MarkupToken::StartTag { attrs, .. } => {
                assert_eq!(attrs.get("nowrap").map(String::as_str), Some(""));
            }
            other => panic!("unexpected token: {:?}", other),
        }
    }
}
