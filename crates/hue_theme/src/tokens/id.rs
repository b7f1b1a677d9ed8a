//! Token identifiers

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentifierError;

/// Check a dotted identifier: non-empty segments of `[A-Za-z0-9_-]`
pub(crate) fn validate_dotted(value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty);
    }
    for segment in value.split('.') {
        if segment.is_empty() {
            return Err(IdentifierError::EmptySegment(value.to_string()));
        }
        if let Some(ch) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(IdentifierError::InvalidChar {
                value: value.to_string(),
                ch,
            });
        }
    }
    Ok(())
}

/// Hierarchical dotted token key, e.g. `color.button.bg`.
///
/// Ordering is lexicographic on the full key, which keeps every map keyed by
/// `TokenId` iterating deterministically.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate_dotted(&value)?;
        Ok(Self(value))
    }

    /// Built-in id known to be valid
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(validate_dotted(value).is_ok(), "invalid built-in id {value}");
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dot-separated path segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Leading segment, used as the default token group
    pub fn root(&self) -> &str {
        self.segments().next().unwrap_or_default()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Borrow<str> for TokenId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TokenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        for raw in ["a", "color.bg", "button.primary-hover", "space_4.x"] {
            assert!(TokenId::new(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn test_invalid_ids() {
        assert_eq!(TokenId::new(""), Err(IdentifierError::Empty));
        assert!(matches!(
            TokenId::new("color..bg"),
            Err(IdentifierError::EmptySegment(_))
        ));
        assert!(matches!(
            TokenId::new(".color"),
            Err(IdentifierError::EmptySegment(_))
        ));
        assert!(matches!(
            TokenId::new("color bg"),
            Err(IdentifierError::InvalidChar { ch: ' ', .. })
        ));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids: Vec<TokenId> = ["color.fg", "border.width", "color.bg"]
            .into_iter()
            .map(|s| TokenId::new(s).unwrap())
            .collect();
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(TokenId::as_str).collect();
        assert_eq!(sorted, vec!["border.width", "color.bg", "color.fg"]);
    }

    #[test]
    fn test_root_segment() {
        assert_eq!(TokenId::new("color.button.bg").unwrap().root(), "color");
    }
}
