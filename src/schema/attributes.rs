//! Extension attributes for card records.
//!
//! The card model has named fields for everything the ingestion source is
//! known to produce. Attributes exist for the leftovers: key/value rows
//! with labels the model does not anticipate are kept here verbatim rather
//! than dropped, so no source data is lost.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Key for accessing extension attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeKey(pub String);

impl AttributeKey {
    /// Create a new attribute key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl From<&str> for AttributeKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AttributeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Value of an extension attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Integer value.
    Int(i64),
    /// Text value, stored verbatim from the source.
    Text(String),
}

impl AttributeValue {
    /// Get as integer if this is an Int value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(v) => Some(*v),
            AttributeValue::Text(_) => None,
        }
    }

    /// Get as string reference if this is a Text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Int(_) => None,
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// Collection of extension attributes.
pub type Attributes = FxHashMap<AttributeKey, AttributeValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_key() {
        let key1 = AttributeKey::new("artist");
        let key2: AttributeKey = "artist".into();
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_attribute_value_accessors() {
        let text = AttributeValue::Text("Ventrue".to_string());
        assert_eq!(text.as_text(), Some("Ventrue"));
        assert_eq!(text.as_int(), None);

        let int = AttributeValue::Int(4);
        assert_eq!(int.as_int(), Some(4));
        assert_eq!(int.as_text(), None);
    }

    #[test]
    fn test_attributes_map() {
        let mut attrs = Attributes::default();
        attrs.insert("artist".into(), "K. LeQuire".into());
        assert_eq!(
            attrs.get(&"artist".into()).and_then(|v| v.as_text()),
            Some("K. LeQuire")
        );
    }
}
