//! Applied theme state
//!
//! The fully resolved output of one resolution run. Consumers only ever get
//! cloned snapshots, so nothing they do can reach engine-internal state.

use std::collections::BTreeMap;

use crate::theme::{AccentColor, ColorScheme, ThemeId};
use crate::tokens::TokenId;

/// Resolved token values plus the configuration that produced them
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedThemeState {
    pub theme_id: ThemeId,
    pub scheme: ColorScheme,
    pub accent: Option<AccentColor>,
    /// Final renderable strings; never contains an unresolved reference
    pub resolved: BTreeMap<TokenId, String>,
}

impl AppliedThemeState {
    /// Resolved value of a token
    pub fn get(&self, id: &str) -> Option<&str> {
        self.resolved.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TokenId, &str)> {
        self.resolved.iter().map(|(id, value)| (id, value.as_str()))
    }

    /// Tokens under a dotted prefix, e.g. `color` matches `color.bg`
    pub fn group<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a TokenId, &'a str)> {
        self.iter().filter(move |(id, _)| {
            id.as_str()
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }

    /// CSS custom property map: `color.bg` becomes `color-bg`
    pub fn to_css_variable_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(id, value)| (id.as_str().replace('.', "-"), value.to_string()))
            .collect()
    }

    /// Whether the resolved values differ from `other`'s
    pub fn values_differ(&self, other: &AppliedThemeState) -> bool {
        self.resolved != other.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppliedThemeState {
        AppliedThemeState {
            theme_id: ThemeId::new("t").unwrap(),
            scheme: ColorScheme::Light,
            accent: None,
            resolved: [
                ("color.bg", "#ffffff"),
                ("color.fg", "#000000"),
                ("colors.x", "red"),
                ("space.4", "16px"),
            ]
            .into_iter()
            .map(|(k, v)| (TokenId::new(k).unwrap(), v.to_string()))
            .collect(),
        }
    }

    #[test]
    fn test_group_matches_whole_segments() {
        let state = state();
        let ids: Vec<&str> = state.group("color").map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["color.bg", "color.fg"]);
    }

    #[test]
    fn test_css_variable_map() {
        let vars = state().to_css_variable_map();
        assert_eq!(vars["color-bg"], "#ffffff");
        assert_eq!(vars["space-4"], "16px");
    }
}
