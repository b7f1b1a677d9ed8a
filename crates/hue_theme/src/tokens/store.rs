//! Raw token definitions and the merged token store

use std::collections::btree_map::{self, BTreeMap};

use super::{TokenId, TokenValue};

/// A token as defined in a source, before any resolution
#[derive(Clone, Debug, PartialEq)]
pub struct RawToken {
    pub id: TokenId,
    pub value: TokenValue,
    pub description: Option<String>,
    pub group: Option<String>,
}

impl RawToken {
    pub fn new(id: TokenId, value: TokenValue) -> Self {
        Self {
            id,
            value,
            description: None,
            group: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Explicit group, or the id's leading segment
    pub fn group_or_root(&self) -> &str {
        self.group.as_deref().unwrap_or_else(|| self.id.root())
    }
}

/// Ordered map of token id to raw token
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenSet {
    tokens: BTreeMap<TokenId, RawToken>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, returning the one it displaced
    pub fn insert(&mut self, token: RawToken) -> Option<RawToken> {
        self.tokens.insert(token.id.clone(), token)
    }

    pub fn get(&self, id: &str) -> Option<&RawToken> {
        self.tokens.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tokens.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &TokenId> {
        self.tokens.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawToken> {
        self.tokens.values()
    }

    /// Merge `other` over `self`; on id collision the incoming token wins.
    ///
    /// Returns the ids that were overwritten.
    pub fn merge(&mut self, other: TokenSet) -> Vec<TokenId> {
        let mut replaced = Vec::new();
        for (id, token) in other.tokens {
            if self.tokens.insert(id.clone(), token).is_some() {
                replaced.push(id);
            }
        }
        replaced
    }

    /// Flatten to an id -> value layer
    pub fn to_layer(&self) -> BTreeMap<TokenId, TokenValue> {
        self.tokens
            .iter()
            .map(|(id, token)| (id.clone(), token.value.clone()))
            .collect()
    }
}

impl FromIterator<RawToken> for TokenSet {
    fn from_iter<I: IntoIterator<Item = RawToken>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl IntoIterator for TokenSet {
    type Item = RawToken;
    type IntoIter = btree_map::IntoValues<TokenId, RawToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_values()
    }
}
