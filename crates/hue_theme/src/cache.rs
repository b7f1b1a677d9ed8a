//! Resolution cache
//!
//! Entries are only valid for the token store and catalog they were computed
//! from, so the engine clears the whole cache on every reload.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};

use crate::config::ThemingConfiguration;
use crate::state::AppliedThemeState;
use crate::theme::{ColorScheme, ThemeId};
use crate::tokens::{TokenId, TokenValue};

/// Composite key derived from the effective content of a configuration
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub theme: ThemeId,
    pub scheme: ColorScheme,
    /// Canonical accent value (`#rrggbb`), if any
    pub accent: Option<String>,
    /// Order-independent fingerprint of the ad hoc overrides
    pub overrides: u64,
}

impl CacheKey {
    pub fn for_config(config: &ThemingConfiguration) -> Self {
        Self {
            theme: config.selected_theme.clone(),
            scheme: config.preferred_scheme,
            accent: config.accent.as_ref().map(|a| a.canonical_value()),
            overrides: overrides_fingerprint(&config.ad_hoc_overrides),
        }
    }
}

/// Hash overrides by id order and canonical form.
///
/// Two override maps that would stringify identically hash identically.
pub fn overrides_fingerprint(overrides: &BTreeMap<TokenId, TokenValue>) -> u64 {
    let mut hasher = FxHasher::default();
    overrides.len().hash(&mut hasher);
    for (id, value) in overrides {
        id.hash(&mut hasher);
        value.kind().hash(&mut hasher);
        match value.as_reference() {
            Some(target) => target.hash(&mut hasher),
            None => value.canonical_string().hash(&mut hasher),
        }
    }
    hasher.finish()
}

/// Memoized pipeline outputs
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: FxHashMap<CacheKey, AppliedThemeState>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cloned entry for `key`
    pub fn get(&self, key: &CacheKey) -> Option<AppliedThemeState> {
        self.entries.get(key).cloned()
    }

    pub fn put(&mut self, key: CacheKey, state: AppliedThemeState) {
        self.entries.insert(key, state);
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TokenId {
        TokenId::new(s).unwrap()
    }

    fn base_config() -> ThemingConfiguration {
        ThemingConfiguration::new(ThemeId::new("basic").unwrap(), ColorScheme::Light)
    }

    #[test]
    fn test_fingerprint_ignores_insertion_order() {
        let a = base_config()
            .with_override(id("x"), TokenValue::color("red"))
            .with_override(id("y"), TokenValue::ZIndex(3));
        let b = base_config()
            .with_override(id("y"), TokenValue::ZIndex(3))
            .with_override(id("x"), TokenValue::color("red"));
        assert_eq!(CacheKey::for_config(&a), CacheKey::for_config(&b));
    }

    #[test]
    fn test_fingerprint_distinguishes_kinds() {
        let text = base_config().with_override(id("x"), TokenValue::Text("y".into()));
        let reference = base_config().with_override(id("x"), TokenValue::Reference(id("y")));
        assert_ne!(
            CacheKey::for_config(&text),
            CacheKey::for_config(&reference)
        );
    }

    #[test]
    fn test_accent_uses_canonical_value() {
        let upper = base_config().with_accent(crate::AccentColor::parse("#FF0000").unwrap());
        let short = base_config().with_accent(crate::AccentColor::parse("#f00").unwrap());
        assert_eq!(CacheKey::for_config(&upper), CacheKey::for_config(&short));
    }

    #[test]
    fn test_put_get_clear() {
        let mut cache = ResolutionCache::new();
        let key = CacheKey::for_config(&base_config());
        let state = AppliedThemeState {
            theme_id: ThemeId::new("basic").unwrap(),
            scheme: ColorScheme::Light,
            accent: None,
            resolved: BTreeMap::new(),
        };

        assert!(cache.get(&key).is_none());
        cache.put(key.clone(), state.clone());
        assert_eq!(cache.get(&key), Some(state));
        assert_eq!(cache.len(), 1);

        cache.clear_all();
        assert!(cache.is_empty());
    }
}
