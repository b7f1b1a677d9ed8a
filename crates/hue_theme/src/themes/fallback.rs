//! Built-in fallback theme
//!
//! A small, self-contained theme used when sources cannot be loaded or the
//! configured theme cannot be resolved. It holds no references, so building
//! its applied state cannot fail.
//!
//! Colors follow Catppuccin: Latte for light mode, Mocha for dark mode.

use std::collections::BTreeMap;

use crate::resolve::apply_accent;
use crate::state::AppliedThemeState;
use crate::theme::{
    AccentColor, AccentModification, ColorScheme, ThemeDefinition, ThemeId, ThemeMetadata,
    ThemeVariant,
};
use crate::tokens::{RawToken, TokenId, TokenSet, TokenValue};

/// Id of the built-in fallback theme
pub const FALLBACK_THEME_ID: &str = "fallback";

/// Catppuccin Latte subset (light)
pub mod latte {
    use hue_core::Color;

    pub const BASE: Color = Color::rgb(239.0 / 255.0, 241.0 / 255.0, 245.0 / 255.0);
    pub const SURFACE0: Color = Color::rgb(204.0 / 255.0, 208.0 / 255.0, 218.0 / 255.0);
    pub const TEXT: Color = Color::rgb(76.0 / 255.0, 79.0 / 255.0, 105.0 / 255.0);
    pub const SUBTEXT0: Color = Color::rgb(108.0 / 255.0, 111.0 / 255.0, 133.0 / 255.0);
    pub const BLUE: Color = Color::rgb(30.0 / 255.0, 102.0 / 255.0, 245.0 / 255.0);
    pub const RED: Color = Color::rgb(210.0 / 255.0, 15.0 / 255.0, 57.0 / 255.0);
}

/// Catppuccin Mocha subset (dark)
pub mod mocha {
    use hue_core::Color;

    pub const BASE: Color = Color::rgb(30.0 / 255.0, 30.0 / 255.0, 46.0 / 255.0);
    pub const SURFACE0: Color = Color::rgb(49.0 / 255.0, 50.0 / 255.0, 68.0 / 255.0);
    pub const TEXT: Color = Color::rgb(205.0 / 255.0, 214.0 / 255.0, 244.0 / 255.0);
    pub const SUBTEXT0: Color = Color::rgb(166.0 / 255.0, 173.0 / 255.0, 200.0 / 255.0);
    pub const BLUE: Color = Color::rgb(137.0 / 255.0, 180.0 / 255.0, 250.0 / 255.0);
    pub const RED: Color = Color::rgb(243.0 / 255.0, 139.0 / 255.0, 168.0 / 255.0);
}

fn token(id: &'static str, value: TokenValue) -> RawToken {
    RawToken::new(TokenId::from_static(id), value)
}

fn colors(
    base: hue_core::Color,
    surface: hue_core::Color,
    text: hue_core::Color,
    muted: hue_core::Color,
    accent: hue_core::Color,
    error: hue_core::Color,
) -> TokenSet {
    [
        ("color.background", base),
        ("color.surface", surface),
        ("color.text", text),
        ("color.text-muted", muted),
        ("color.border", surface),
        ("color.accent", accent),
        ("color.accent-hover", accent),
        ("color.error", error),
    ]
    .into_iter()
    .map(|(id, color)| token(id, TokenValue::Color(color.to_hex())))
    .collect()
}

/// Global tokens shipped with the fallback theme
pub fn tokens() -> TokenSet {
    [
        token("font.family", TokenValue::FontFamily("system-ui, sans-serif".into())),
        token("font.size.body", TokenValue::FontSize("14px".into())),
        token("font.weight.regular", TokenValue::FontWeight("400".into())),
        token("font.line-height", TokenValue::LineHeight("1.5".into())),
        token("space.2", TokenValue::Spacing("8px".into())),
        token("space.4", TokenValue::Spacing("16px".into())),
        token("radius.md", TokenValue::Radius("6px".into())),
        token("opacity.disabled", TokenValue::Opacity(0.6)),
        token("layer.overlay", TokenValue::ZIndex(100)),
    ]
    .into_iter()
    .collect()
}

/// The fallback theme definition (light base, dark variant)
pub fn theme() -> ThemeDefinition {
    let mut accent_modifiable_tokens = BTreeMap::new();
    accent_modifiable_tokens.insert(
        TokenId::from_static("color.accent"),
        AccentModification::DirectReplace,
    );
    accent_modifiable_tokens.insert(
        TokenId::from_static("color.accent-hover"),
        AccentModification::Lighten(0.15),
    );

    ThemeDefinition {
        id: ThemeId::from_static(FALLBACK_THEME_ID),
        name: "Fallback".to_string(),
        base_tokens: colors(
            latte::BASE,
            latte::SURFACE0,
            latte::TEXT,
            latte::SUBTEXT0,
            latte::BLUE,
            latte::RED,
        ),
        variants: vec![ThemeVariant {
            applies_to_scheme: ColorScheme::Dark,
            tokens: colors(
                mocha::BASE,
                mocha::SURFACE0,
                mocha::TEXT,
                mocha::SUBTEXT0,
                mocha::BLUE,
                mocha::RED,
            ),
        }],
        supported_accent_colors: Vec::new(),
        accent_modifiable_tokens,
        metadata: ThemeMetadata {
            description: Some("Built-in theme used when no other theme is usable".into()),
            author: None,
            version: None,
        },
    }
}

/// Applied state of the fallback theme, built without reference resolution
pub fn applied_state(scheme: ColorScheme, accent: Option<&AccentColor>) -> AppliedThemeState {
    let theme = theme();
    let mut layer = tokens();
    layer.merge(theme.base_tokens.clone());
    if let Some(variant) = theme.variant_for(scheme) {
        layer.merge(variant.tokens.clone());
    }

    let mut resolved: BTreeMap<TokenId, String> = layer
        .iter()
        .filter_map(|token| {
            token
                .value
                .canonical_string()
                .map(|text| (token.id.clone(), text))
        })
        .collect();

    if let Some(accent) = accent {
        for (id, modification) in &theme.accent_modifiable_tokens {
            resolved.insert(id.clone(), apply_accent(accent.color, *modification).to_hex());
        }
    }

    AppliedThemeState {
        theme_id: theme.id,
        scheme,
        accent: accent.cloned(),
        resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use crate::config::ThemingConfiguration;
    use crate::theme::ThemeCatalog;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fallback_has_no_references() {
        let theme = theme();
        let all = tokens()
            .iter()
            .chain(theme.base_tokens.iter())
            .chain(theme.variants.iter().flat_map(|v| v.tokens.iter()))
            .all(|t| !t.value.is_reference());
        assert!(all);
    }

    #[test]
    fn test_direct_build_matches_pipeline() {
        let catalog: ThemeCatalog = [theme()].into_iter().collect();
        for scheme in [ColorScheme::Light, ColorScheme::Dark] {
            for accent in [None, Some(AccentColor::parse("#ff0000").unwrap())] {
                let mut config =
                    ThemingConfiguration::new(ThemeId::from_static(FALLBACK_THEME_ID), scheme);
                config.accent = accent.clone();
                let piped = resolve(&tokens(), &catalog, &config).unwrap();
                assert_eq!(applied_state(scheme, accent.as_ref()), piped);
            }
        }
    }

    #[test]
    fn test_schemes_differ() {
        let light = applied_state(ColorScheme::Light, None);
        let dark = applied_state(ColorScheme::Dark, None);
        assert!(!light.is_empty());
        assert_ne!(light.get("color.background"), dark.get("color.background"));
        assert_eq!(light.get("opacity.disabled"), Some("0.60"));
    }
}
