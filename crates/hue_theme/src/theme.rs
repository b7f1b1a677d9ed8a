//! Theme definitions and the theme catalog

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hue_core::Color;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentifierError;
use crate::tokens::{validate_dotted, TokenId, TokenSet};

/// Light/dark presentation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The opposite scheme
    pub fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated theme key, e.g. `light-basic`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThemeId(String);

impl ThemeId {
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
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ThemeId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::borrow::Borrow<str> for ThemeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for ThemeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ThemeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A user-chosen accent color
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAccent", into = "RawAccent")]
pub struct AccentColor {
    pub name: Option<String>,
    pub color: Color,
}

impl AccentColor {
    pub fn new(color: Color) -> Self {
        Self { name: None, color }
    }

    pub fn named(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: Some(name.into()),
            color,
        }
    }

    /// Parse the color part from CSS-like notation
    pub fn parse(value: &str) -> Result<Self, hue_core::ColorParseError> {
        Ok(Self::new(Color::parse(value)?))
    }

    /// Canonical value used for cache keys and output, e.g. `#ff0000`
    pub fn canonical_value(&self) -> String {
        self.color.to_hex()
    }
}

/// Serialized form of an accent: `{ name = "...", value = "#rrggbb" }`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawAccent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: String,
}

impl TryFrom<RawAccent> for AccentColor {
    type Error = hue_core::ColorParseError;

    fn try_from(raw: RawAccent) -> Result<Self, Self::Error> {
        Ok(AccentColor {
            name: raw.name,
            color: Color::parse(&raw.value)?,
        })
    }
}

impl From<AccentColor> for RawAccent {
    fn from(accent: AccentColor) -> Self {
        RawAccent {
            value: accent.canonical_value(),
            name: accent.name,
        }
    }
}

/// How an accent-modifiable token is re-derived from the accent color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccentModification {
    /// Use the accent color as-is
    DirectReplace,
    /// Mix the accent toward white by the factor (`0.0..=1.0`)
    Lighten(f32),
    /// Mix the accent toward black by the factor (`0.0..=1.0`)
    Darken(f32),
}

impl AccentModification {
    pub fn factor(self) -> Option<f32> {
        match self {
            Self::DirectReplace => None,
            Self::Lighten(f) | Self::Darken(f) => Some(f),
        }
    }
}

/// Scheme-specific overrides layered over a theme's base tokens
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeVariant {
    pub applies_to_scheme: ColorScheme,
    pub tokens: TokenSet,
}

/// Descriptive theme metadata
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThemeMetadata {
    pub description: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
}

/// A parsed, validated theme
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeDefinition {
    pub id: ThemeId,
    pub name: String,
    pub base_tokens: TokenSet,
    pub variants: Vec<ThemeVariant>,
    pub supported_accent_colors: Vec<AccentColor>,
    pub accent_modifiable_tokens: BTreeMap<TokenId, AccentModification>,
    pub metadata: ThemeMetadata,
}

impl ThemeDefinition {
    pub fn new(id: ThemeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            base_tokens: TokenSet::new(),
            variants: Vec::new(),
            supported_accent_colors: Vec::new(),
            accent_modifiable_tokens: BTreeMap::new(),
            metadata: ThemeMetadata::default(),
        }
    }

    /// Variant matching `scheme`, if the theme defines one
    pub fn variant_for(&self, scheme: ColorScheme) -> Option<&ThemeVariant> {
        self.variants
            .iter()
            .find(|variant| variant.applies_to_scheme == scheme)
    }

    /// Schemes with a dedicated variant, in declaration order
    pub fn supported_schemes(&self) -> Vec<ColorScheme> {
        self.variants.iter().map(|v| v.applies_to_scheme).collect()
    }

    pub fn summary(&self) -> ThemeSummary {
        ThemeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.metadata.description.clone(),
            author: self.metadata.author.clone(),
            version: self.metadata.version.clone(),
            schemes: self.supported_schemes(),
            accents: self.supported_accent_colors.clone(),
        }
    }
}

/// Read-only description of an available theme
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeSummary {
    pub id: ThemeId,
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
    pub schemes: Vec<ColorScheme>,
    pub accents: Vec<AccentColor>,
}

/// Loaded themes, kept in load order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeCatalog {
    themes: IndexMap<ThemeId, ThemeDefinition>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a theme, returning the one it displaced
    pub fn insert(&mut self, theme: ThemeDefinition) -> Option<ThemeDefinition> {
        self.themes.insert(theme.id.clone(), theme)
    }

    pub fn get(&self, id: &str) -> Option<&ThemeDefinition> {
        self.themes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeDefinition> {
        self.themes.values()
    }

    pub fn summaries(&self) -> Vec<ThemeSummary> {
        self.iter().map(ThemeDefinition::summary).collect()
    }
}

impl FromIterator<ThemeDefinition> for ThemeCatalog {
    fn from_iter<I: IntoIterator<Item = ThemeDefinition>>(iter: I) -> Self {
        let mut catalog = ThemeCatalog::new();
        for theme in iter {
            catalog.insert(theme);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{RawToken, TokenValue};

    #[test]
    fn test_scheme_toggle() {
        assert_eq!(ColorScheme::Light.toggle(), ColorScheme::Dark);
        assert_eq!(ColorScheme::Dark.toggle(), ColorScheme::Light);
    }

    #[test]
    fn test_accent_canonical_value() {
        let accent = AccentColor::parse("#F00").unwrap();
        assert_eq!(accent.canonical_value(), "#ff0000");
    }

    #[test]
    fn test_accent_modification_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            kinds: BTreeMap<String, AccentModification>,
        }
        let doc: Doc = toml::from_str(
            r#"
            [kinds]
            a = "direct-replace"
            b = { lighten = 0.2 }
            c = { darken = 0.4 }
            "#,
        )
        .unwrap();
        assert_eq!(doc.kinds["a"], AccentModification::DirectReplace);
        assert_eq!(doc.kinds["b"], AccentModification::Lighten(0.2));
        assert_eq!(doc.kinds["c"], AccentModification::Darken(0.4));
    }

    #[test]
    fn test_variant_lookup_and_summary() {
        let mut theme = ThemeDefinition::new(ThemeId::new("light-basic").unwrap(), "Light Basic");
        theme.variants.push(ThemeVariant {
            applies_to_scheme: ColorScheme::Dark,
            tokens: [RawToken::new(
                TokenId::new("color.bg").unwrap(),
                TokenValue::color("black"),
            )]
            .into_iter()
            .collect(),
        });

        assert!(theme.variant_for(ColorScheme::Dark).is_some());
        assert!(theme.variant_for(ColorScheme::Light).is_none());
        assert_eq!(theme.summary().schemes, vec![ColorScheme::Dark]);
    }

    #[test]
    fn test_catalog_keeps_load_order() {
        let catalog: ThemeCatalog = ["zeta", "alpha", "mid"]
            .into_iter()
            .map(|id| ThemeDefinition::new(ThemeId::new(id).unwrap(), id))
            .collect();
        let ids: Vec<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }
}
