//! Raw card records and field normalization.
//!
//! `RawRecord` is what the state machine accumulates while walking one
//! record block: named optional fields for everything the source is known
//! to emit, plus an extras map for key/value rows with unanticipated
//! labels. Finalization (`apply_to`) normalizes each field and writes the
//! result into the store.
//!
//! Normalization is best-effort throughout: the source markup is produced
//! externally and known to contain irregularities, so a malformed or
//! unresolvable field is skipped rather than failing the whole record.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::schema::{CardStore, DisciplineLevel, SchemaError, VARIABLE_COST};

/// A captured field value.
///
/// Key/value table rows can close before any value cell appears; that is
/// recorded as `Missing`, which every normalizer treats as "skip".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawValue {
    /// Captured text, trimmed.
    Text(String),
    /// The row ended before a value cell was seen.
    Missing,
}

impl RawValue {
    /// Get the captured text, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Missing => None,
        }
    }
}

/// One card record as accumulated from the markup, before normalization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Card name. A record without one is silently discarded.
    pub name: Option<String>,
    /// Rules text.
    pub text: Option<String>,
    /// Crypt group, raw.
    pub group: Option<RawValue>,
    /// Capacity, raw.
    pub capacity: Option<RawValue>,
    /// Cost ("amount type"), raw.
    pub cost: Option<RawValue>,
    /// Discipline list, raw.
    pub discipline: Option<RawValue>,
    /// Clan list, raw.
    pub clan: Option<RawValue>,
    /// Expansion/rarity pairs, already split per rarity.
    pub expansions: Vec<(String, String)>,
    /// Key/value rows with labels the model does not name.
    #[serde(default)]
    pub extras: FxHashMap<String, RawValue>,
}

impl RawRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a key/value row under its derived key.
    ///
    /// Known keys land in their named field; anything else goes to
    /// `extras` verbatim.
    pub fn set_field(&mut self, key: &str, value: RawValue) {
        match key {
            "group" => self.group = Some(value),
            "capacity" => self.capacity = Some(value),
            "cost" => self.cost = Some(value),
            "discipline" => self.discipline = Some(value),
            "clan" => self.clan = Some(value),
            _ => {
                self.extras.insert(key.to_string(), value);
            }
        }
    }

    /// Normalize this record and write it into the store.
    ///
    /// Looks the card up by exact name, creating it if absent, then applies
    /// each field normalizer independently. Unknown discipline and clan
    /// names are skipped with a warning; they never fail the record.
    ///
    /// A record with no name is dropped without touching the store.
    pub fn apply_to(&self, store: &mut CardStore) -> Result<(), SchemaError> {
        let Some(name) = self.name.as_deref() else {
            return Ok(());
        };

        let id = store.find_or_create_card(name);

        if let Some(card) = store.card_mut(id) {
            if let Some(text) = &self.text {
                card.text = text.clone();
            }
            if let Some(group) = self.group.as_ref().and_then(RawValue::as_text) {
                if let Some(group) = parse_group(group) {
                    card.group = Some(group);
                }
            }
            if let Some(capacity) = self.capacity.as_ref().and_then(RawValue::as_text) {
                if let Some(capacity) = parse_capacity(capacity) {
                    card.capacity = Some(capacity);
                }
            }
            if let Some(cost) = self.cost.as_ref().and_then(RawValue::as_text) {
                if let Some((amount, cost_type)) = parse_cost(cost) {
                    card.cost = Some(amount);
                    card.cost_type = Some(cost_type);
                }
            }
            for (key, value) in &self.extras {
                if let RawValue::Text(text) = value {
                    card.extras
                        .insert(key.as_str().into(), text.as_str().into());
                }
            }
        }

        for (expansion, rarity) in &self.expansions {
            let expansion = store.register_expansion(expansion);
            let rarity = store.register_rarity(rarity);
            store.record_expansion_pairing(id, expansion, rarity);
        }

        if let Some(disciplines) = self.discipline.as_ref().and_then(RawValue::as_text) {
            for token in split_disciplines(disciplines) {
                match store.discipline_id(&token) {
                    Ok(discipline) => {
                        store.attach_discipline(id, discipline, DisciplineLevel::Inferior);
                    }
                    Err(err) => warn!(card = name, %err, "skipping unknown discipline"),
                }
            }
        }

        if let Some(clans) = self.clan.as_ref().and_then(RawValue::as_text) {
            for token in split_clans(clans) {
                match store.clan_id(&token) {
                    Ok(clan) => store.attach_clan(id, clan),
                    Err(err) => warn!(card = name, %err, "skipping unknown clan"),
                }
            }
        }

        debug!(card = name, "record ingested");
        Ok(())
    }
}

/// Is this character markup filler (whitespace or template braces)?
fn is_gap(c: char) -> bool {
    c.is_whitespace() || c == '{' || c == '}'
}

/// Collapse runs of gap characters to single spaces and trim.
fn squash_gaps(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_gap = false;
    for c in s.chars() {
        if is_gap(c) {
            pending_gap = !out.is_empty();
        } else {
            if pending_gap {
                out.push(' ');
            }
            pending_gap = false;
            out.push(c);
        }
    }
    out
}

/// Parse a group number, tolerating embedded whitespace and braces.
#[must_use]
pub fn parse_group(s: &str) -> Option<i32> {
    let digits: String = s.chars().filter(|&c| !is_gap(c)).collect();
    digits.parse().ok()
}

/// Parse a capacity: leading integer token, trailing annotations ignored.
#[must_use]
pub fn parse_capacity(s: &str) -> Option<i32> {
    squash_gaps(s).split_whitespace().next()?.parse().ok()
}

/// Parse a cost string of the form `"<amount> <type>"`.
///
/// The amount `"X"` (case-insensitive) maps to `VARIABLE_COST`; the type
/// is lower-cased. Anything else malformed yields `None`.
#[must_use]
pub fn parse_cost(s: &str) -> Option<(i32, String)> {
    let squashed = squash_gaps(s);
    let mut tokens = squashed.split_whitespace();
    let amount = tokens.next()?;
    let cost_type = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let amount = if amount.eq_ignore_ascii_case("x") {
        VARIABLE_COST
    } else {
        amount.parse().ok()?
    };
    Some((amount, cost_type.to_lowercase()))
}

/// Parse a bracketed expansion list: `[Name[:Rarity], ...]`.
///
/// Rarity defaults to `"NA"` when omitted; a rarity like `"C2/U"` is split
/// on `/` into one pair per rarity.
#[must_use]
pub fn parse_expansion_list(s: &str) -> Vec<(String, String)> {
    let s = s.trim().trim_start_matches('[').trim_end_matches(']');
    let mut pairs = Vec::new();
    for entry in s.split(',') {
        let mut parts = entry.splitn(2, ':');
        let name = parts.next().unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let rarities = parts.next().map(str::trim).filter(|r| !r.is_empty());
        for rarity in rarities.unwrap_or("NA").split('/') {
            let rarity = rarity.trim();
            if !rarity.is_empty() {
                pairs.push((name.to_string(), rarity.to_string()));
            }
        }
    }
    pairs
}

/// Split a discipline list into name tokens.
///
/// Separators are whitespace, slashes, backslashes and braces. The
/// literal `-none-` (or an empty list) yields no tokens.
#[must_use]
pub fn split_disciplines(s: &str) -> Vec<String> {
    let cleaned: String = s
        .chars()
        .map(|c| if is_gap(c) || c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let tokens: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
    if tokens.len() == 1 && tokens[0] == "-none-" {
        return Vec::new();
    }
    tokens
}

/// Split a clan list into name tokens.
///
/// Clans are `/`-separated; `-none-` (or an empty list) yields no tokens.
#[must_use]
pub fn split_clans(s: &str) -> Vec<String> {
    let squashed = squash_gaps(s);
    if squashed.is_empty() || squashed == "-none-" {
        return Vec::new();
    }
    squashed
        .split('/')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group() {
        assert_eq!(parse_group("2"), Some(2));
        assert_eq!(parse_group(" {2} "), Some(2));
        assert_eq!(parse_group("two"), None);
        assert_eq!(parse_group(""), None);
    }

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity("7"), Some(7));
        assert_eq!(parse_capacity("4 (7 with grafted arm)"), Some(4));
        assert_eq!(parse_capacity("-"), None);
    }

    #[test]
    fn test_parse_cost() {
        assert_eq!(parse_cost("3 pool"), Some((3, "pool".to_string())));
        assert_eq!(parse_cost("X blood"), Some((VARIABLE_COST, "blood".to_string())));
        assert_eq!(parse_cost("x Blood"), Some((VARIABLE_COST, "blood".to_string())));
        assert_eq!(parse_cost("3"), None);
        assert_eq!(parse_cost("three pool"), None);
        assert_eq!(parse_cost("3 pool extra"), None);
    }

    #[test]
    fn test_parse_expansion_list() {
        assert_eq!(
            parse_expansion_list("[Jyhad:C, VTES:C2/U]"),
            vec![
                ("Jyhad".to_string(), "C".to_string()),
                ("VTES".to_string(), "C2".to_string()),
                ("VTES".to_string(), "U".to_string()),
            ]
        );
        assert_eq!(
            parse_expansion_list("[Sabbat]"),
            vec![("Sabbat".to_string(), "NA".to_string())]
        );
        assert_eq!(parse_expansion_list("[]"), Vec::<(String, String)>::new());
    }

    #[test]
    fn test_split_disciplines() {
        assert_eq!(split_disciplines("aus cel dom"), vec!["aus", "cel", "dom"]);
        assert_eq!(split_disciplines("aus/cel\\dom"), vec!["aus", "cel", "dom"]);
        assert_eq!(split_disciplines("-none-"), Vec::<String>::new());
        assert_eq!(split_disciplines("  -none-  "), Vec::<String>::new());
        assert_eq!(split_disciplines(""), Vec::<String>::new());
    }

    #[test]
    fn test_split_clans() {
        assert_eq!(
            split_clans("Ventrue / Toreador"),
            vec!["Ventrue", "Toreador"]
        );
        assert_eq!(split_clans("{-none-}"), Vec::<String>::new());
        assert_eq!(split_clans(""), Vec::<String>::new());
    }

    #[test]
    fn test_set_field_routing() {
        let mut rec = RawRecord::new();
        rec.set_field("group", RawValue::Text("2".to_string()));
        rec.set_field("artist", RawValue::Text("K. LeQuire".to_string()));
        rec.set_field("burn option", RawValue::Missing);

        assert_eq!(rec.group, Some(RawValue::Text("2".to_string())));
        assert_eq!(
            rec.extras.get("artist"),
            Some(&RawValue::Text("K. LeQuire".to_string()))
        );
        assert_eq!(rec.extras.get("burn option"), Some(&RawValue::Missing));
    }

    #[test]
    fn test_apply_nameless_record_is_dropped() {
        let mut store = CardStore::new();
        let mut rec = RawRecord::new();
        rec.text = Some("orphan text".to_string());

        rec.apply_to(&mut store).unwrap();
        assert_eq!(store.card_count(), 0);
    }

    #[test]
    fn test_apply_full_record() {
        let mut store = CardStore::new();
        store.register_clan("Toreador");
        store.register_discipline("aus");
        store.register_discipline("cel");

        let mut rec = RawRecord::new();
        rec.name = Some("Alexandra".to_string());
        rec.text = Some("Camarilla Inner Circle.".to_string());
        rec.group = Some(RawValue::Text("2".to_string()));
        rec.capacity = Some(RawValue::Text("11".to_string()));
        rec.clan = Some(RawValue::Text("Toreador".to_string()));
        rec.discipline = Some(RawValue::Text("aus cel".to_string()));
        rec.expansions
            .push(("Crypt of Blood".to_string(), "R".to_string()));

        rec.apply_to(&mut store).unwrap();

        let id = store.find_card_by_name("Alexandra").unwrap();
        let card = store.card_unchecked(id);
        assert_eq!(card.text, "Camarilla Inner Circle.");
        assert_eq!(card.group, Some(2));
        assert_eq!(card.capacity, Some(11));
        assert_eq!(card.clans.len(), 1);
        assert_eq!(card.disciplines.len(), 2);
        assert_eq!(card.expansions.len(), 1);
    }

    #[test]
    fn test_apply_unknown_discipline_is_skipped() {
        let mut store = CardStore::new();
        store.register_discipline("aus");

        let mut rec = RawRecord::new();
        rec.name = Some("Test Card".to_string());
        rec.discipline = Some(RawValue::Text("aus nec".to_string()));

        rec.apply_to(&mut store).unwrap();

        let id = store.find_card_by_name("Test Card").unwrap();
        assert_eq!(store.card_unchecked(id).disciplines.len(), 1);
    }

    #[test]
    fn test_apply_malformed_fields_are_swallowed() {
        let mut store = CardStore::new();

        let mut rec = RawRecord::new();
        rec.name = Some("Oddball".to_string());
        rec.group = Some(RawValue::Text("not a number".to_string()));
        rec.cost = Some(RawValue::Text("banana".to_string()));
        rec.capacity = Some(RawValue::Missing);

        rec.apply_to(&mut store).unwrap();

        let id = store.find_card_by_name("Oddball").unwrap();
        let card = store.card_unchecked(id);
        assert_eq!(card.group, None);
        assert_eq!(card.cost, None);
        assert_eq!(card.capacity, None);
    }
}
