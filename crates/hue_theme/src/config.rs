//! User theming intent and source locations
//!
//! Both types can be read from TOML:
//!
//! ```toml
//! theme = "light-basic"
//! scheme = "dark"
//!
//! [accent]
//! name = "crimson"
//! value = "#dc143c"
//!
//! [overrides."color.bg"]
//! type = "color"
//! value = "#101010"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::theme::{AccentColor, ColorScheme, ThemeId};
use crate::tokens::{TokenId, TokenValue};

/// What the user asked for: theme, scheme, accent, and ad hoc overrides
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemingConfiguration {
    #[serde(rename = "theme")]
    pub selected_theme: ThemeId,
    #[serde(rename = "scheme", default)]
    pub preferred_scheme: ColorScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<AccentColor>,
    /// Highest-precedence token values; an empty map means no overrides
    #[serde(rename = "overrides", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ad_hoc_overrides: BTreeMap<TokenId, TokenValue>,
}

impl ThemingConfiguration {
    pub fn new(selected_theme: ThemeId, preferred_scheme: ColorScheme) -> Self {
        Self {
            selected_theme,
            preferred_scheme,
            accent: None,
            ad_hoc_overrides: BTreeMap::new(),
        }
    }

    pub fn with_accent(mut self, accent: AccentColor) -> Self {
        self.accent = Some(accent);
        self
    }

    pub fn with_override(mut self, id: TokenId, value: TokenValue) -> Self {
        self.ad_hoc_overrides.insert(id, value);
        self
    }

    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.preferred_scheme = scheme;
        self
    }

    /// Parse a configuration document
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Serialize to a TOML document
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Ordered token and theme source paths
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocations {
    #[serde(default)]
    pub tokens: Vec<PathBuf>,
    #[serde(default)]
    pub themes: Vec<PathBuf>,
}

impl SourceLocations {
    pub fn new(
        tokens: impl IntoIterator<Item = impl Into<PathBuf>>,
        themes: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            themes: themes.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_toml() {
        let config = ThemingConfiguration::from_toml_str(
            r##"
            theme = "light-basic"
            scheme = "dark"

            [accent]
            name = "crimson"
            value = "#DC143C"

            [overrides."color.bg"]
            type = "color"
            value = "#101010"

            [overrides."link.fg"]
            type = "reference"
            value = "color.bg"
            "##,
        )
        .unwrap();

        assert_eq!(config.selected_theme.as_str(), "light-basic");
        assert_eq!(config.preferred_scheme, ColorScheme::Dark);
        let accent = config.accent.as_ref().unwrap();
        assert_eq!(accent.name.as_deref(), Some("crimson"));
        assert_eq!(accent.canonical_value(), "#dc143c");
        assert_eq!(config.ad_hoc_overrides.len(), 2);
        assert!(config.ad_hoc_overrides[&TokenId::new("link.fg").unwrap()].is_reference());
    }

    #[test]
    fn test_defaults() {
        let config = ThemingConfiguration::from_toml_str("theme = \"basic\"").unwrap();
        assert_eq!(config.preferred_scheme, ColorScheme::Light);
        assert!(config.accent.is_none());
        assert!(config.ad_hoc_overrides.is_empty());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = ThemingConfiguration::new(ThemeId::new("basic").unwrap(), ColorScheme::Dark)
            .with_override(TokenId::new("layer.top").unwrap(), TokenValue::ZIndex(9));
        let text = config.to_toml().unwrap();
        assert_eq!(ThemingConfiguration::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_theme_id_rejected() {
        assert!(ThemingConfiguration::from_toml_str("theme = \"\"").is_err());
    }
}
