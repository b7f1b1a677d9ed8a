//! Resolution pipeline
//!
//! Turns (token store, theme catalog, configuration) into an
//! [`AppliedThemeState`]. Stages run in order, each overwriting matching ids
//! from the previous one:
//!
//! 1. global token store
//! 2. theme base tokens
//! 3. variant for the preferred scheme
//! 4. accent-derived colors
//! 5. ad hoc overrides
//! 6. reference substitution
//! 7. stringification
//!
//! The pipeline is pure and deterministic. Any failing stage aborts the run.

mod accent;
mod references;

pub use accent::apply_accent;
pub use references::{Layer, ReferenceResolver, MAX_REFERENCE_DEPTH};

use std::collections::BTreeMap;

use tracing::trace;

use crate::config::ThemingConfiguration;
use crate::error::ResolveError;
use crate::state::AppliedThemeState;
use crate::theme::{AccentColor, ThemeCatalog, ThemeDefinition};
use crate::tokens::{TokenId, TokenKind, TokenSet, TokenValue};

/// Run the full pipeline for `config`
pub fn resolve(
    store: &TokenSet,
    catalog: &ThemeCatalog,
    config: &ThemingConfiguration,
) -> Result<AppliedThemeState, ResolveError> {
    let theme = catalog
        .get(config.selected_theme.as_str())
        .ok_or_else(|| ResolveError::UnknownTheme(config.selected_theme.clone()))?;

    let mut layer = store.to_layer();
    merge(&mut layer, &theme.base_tokens);

    if let Some(variant) = theme.variant_for(config.preferred_scheme) {
        merge(&mut layer, &variant.tokens);
    }

    if let Some(accent) = &config.accent {
        let derived = accent_layer(&layer, theme, accent)?;
        layer.extend(derived);
    }

    layer.extend(
        config
            .ad_hoc_overrides
            .iter()
            .map(|(id, value)| (id.clone(), value.clone())),
    );

    let resolved = ReferenceResolver::new(&layer).resolve_all()?;
    trace!(
        "resolved {} tokens for theme `{}` ({})",
        resolved.len(),
        theme.id,
        config.preferred_scheme
    );

    Ok(AppliedThemeState {
        theme_id: theme.id.clone(),
        scheme: config.preferred_scheme,
        accent: config.accent.clone(),
        resolved: stringify(resolved)?,
    })
}

fn merge(layer: &mut Layer, tokens: &TokenSet) {
    for token in tokens.iter() {
        layer.insert(token.id.clone(), token.value.clone());
    }
}

/// Recompute every accent-modifiable token from the accent color.
///
/// Targets are checked against the layer as it stands before accents apply,
/// so derived values never feed each other.
fn accent_layer(
    layer: &Layer,
    theme: &ThemeDefinition,
    accent: &AccentColor,
) -> Result<Layer, ResolveError> {
    let mut resolver = ReferenceResolver::new(layer);
    let mut derived = Layer::new();

    for (id, modification) in &theme.accent_modifiable_tokens {
        let failure = |reason: String| ResolveError::AccentApplication {
            token: id.clone(),
            theme: theme.id.clone(),
            reason,
        };

        if !layer.contains_key(id) {
            return Err(failure("token is not defined".to_string()));
        }
        let current = resolver.resolve(id)?;
        if current.kind() != TokenKind::Color {
            return Err(failure(format!("expected a color, found {}", current.kind())));
        }

        let color = apply_accent(accent.color, *modification);
        derived.insert(id.clone(), TokenValue::Color(color.to_hex()));
    }
    Ok(derived)
}

fn stringify(resolved: Layer) -> Result<BTreeMap<TokenId, String>, ResolveError> {
    resolved
        .into_iter()
        .map(|(id, value)| match value.canonical_string() {
            Some(text) => Ok((id, text)),
            None => {
                let target = value.as_reference().cloned().unwrap_or_else(|| id.clone());
                Err(ResolveError::MissingReference { token: id, target })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{AccentModification, ColorScheme, ThemeId, ThemeVariant};
    use crate::tokens::RawToken;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> TokenId {
        TokenId::new(s).unwrap()
    }

    fn set(tokens: &[(&str, TokenValue)]) -> TokenSet {
        tokens
            .iter()
            .map(|(k, v)| RawToken::new(id(k), v.clone()))
            .collect()
    }

    fn light_basic() -> ThemeDefinition {
        let mut theme = ThemeDefinition::new(ThemeId::new("light-basic").unwrap(), "Light Basic");
        theme.base_tokens = set(&[
            ("color.bg", TokenValue::color("white")),
            ("button.bg", TokenValue::color("#0000ff")),
            ("button.hover", TokenValue::Reference(id("button.bg"))),
            ("button.label", TokenValue::Text("OK".into())),
        ]);
        theme.variants.push(ThemeVariant {
            applies_to_scheme: ColorScheme::Dark,
            tokens: set(&[("color.bg", TokenValue::color("black"))]),
        });
        theme
    }

    fn config(scheme: ColorScheme) -> ThemingConfiguration {
        ThemingConfiguration::new(ThemeId::new("light-basic").unwrap(), scheme)
    }

    fn catalog(theme: ThemeDefinition) -> ThemeCatalog {
        [theme].into_iter().collect()
    }

    #[test]
    fn test_dark_variant_overrides_base() {
        let catalog = catalog(light_basic());
        let light = resolve(&TokenSet::new(), &catalog, &config(ColorScheme::Light)).unwrap();
        let dark = resolve(&TokenSet::new(), &catalog, &config(ColorScheme::Dark)).unwrap();

        assert_eq!(light.get("color.bg"), Some("white"));
        assert_eq!(dark.get("color.bg"), Some("black"));
    }

    #[test]
    fn test_theme_overrides_global_store() {
        let store = set(&[
            ("color.bg", TokenValue::color("gray")),
            ("space.4", TokenValue::Spacing("16px".into())),
        ]);
        let state = resolve(&store, &catalog(light_basic()), &config(ColorScheme::Light)).unwrap();
        assert_eq!(state.get("color.bg"), Some("white"));
        assert_eq!(state.get("space.4"), Some("16px"));
    }

    #[test]
    fn test_accent_direct_replace_and_derivatives() {
        let mut theme = light_basic();
        theme
            .accent_modifiable_tokens
            .insert(id("button.bg"), AccentModification::DirectReplace);
        theme
            .accent_modifiable_tokens
            .insert(id("button.hover"), AccentModification::Lighten(0.5));

        let cfg = config(ColorScheme::Light)
            .with_accent(AccentColor::parse("#ff0000").unwrap());
        let state = resolve(&TokenSet::new(), &catalog(theme), &cfg).unwrap();

        assert_eq!(state.get("button.bg"), Some("#ff0000"));
        assert_eq!(state.get("button.hover"), Some("#ff8080"));
    }

    #[test]
    fn test_accent_on_non_color_fails() {
        let mut theme = light_basic();
        theme
            .accent_modifiable_tokens
            .insert(id("button.label"), AccentModification::DirectReplace);

        let cfg = config(ColorScheme::Light)
            .with_accent(AccentColor::parse("#ff0000").unwrap());
        let err = resolve(&TokenSet::new(), &catalog(theme), &cfg).unwrap_err();

        match err {
            ResolveError::AccentApplication { token, theme, .. } => {
                assert_eq!(token.as_str(), "button.label");
                assert_eq!(theme.as_str(), "light-basic");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_accent_ignored_without_configured_accent() {
        let mut theme = light_basic();
        theme
            .accent_modifiable_tokens
            .insert(id("button.label"), AccentModification::DirectReplace);
        let state = resolve(&TokenSet::new(), &catalog(theme), &config(ColorScheme::Light)).unwrap();
        assert_eq!(state.get("button.label"), Some("OK"));
    }

    #[test]
    fn test_overrides_take_precedence_and_resolve() {
        let cfg = config(ColorScheme::Dark)
            .with_override(id("color.bg"), TokenValue::color("#101010"))
            .with_override(id("color.fg"), TokenValue::Reference(id("color.bg")))
            .with_override(id("overlay.alpha"), TokenValue::Opacity(0.333));
        let state = resolve(&TokenSet::new(), &catalog(light_basic()), &cfg).unwrap();

        assert_eq!(state.get("color.bg"), Some("#101010"));
        assert_eq!(state.get("color.fg"), Some("#101010"));
        assert_eq!(state.get("overlay.alpha"), Some("0.33"));
    }

    #[test]
    fn test_override_introducing_cycle_fails() {
        let cfg = config(ColorScheme::Light)
            .with_override(id("button.bg"), TokenValue::Reference(id("button.hover")));
        let err = resolve(&TokenSet::new(), &catalog(light_basic()), &cfg).unwrap_err();
        assert!(matches!(err, ResolveError::CyclicReference { .. }));
    }

    #[test]
    fn test_unknown_theme() {
        let cfg = ThemingConfiguration::new(ThemeId::new("nope").unwrap(), ColorScheme::Light);
        let err = resolve(&TokenSet::new(), &catalog(light_basic()), &cfg).unwrap_err();
        assert_eq!(err, ResolveError::UnknownTheme(ThemeId::new("nope").unwrap()));
    }

    #[test]
    fn test_output_is_deterministic_and_reference_free() {
        let catalog = catalog(light_basic());
        let cfg = config(ColorScheme::Dark);
        let a = resolve(&TokenSet::new(), &catalog, &cfg).unwrap();
        let b = resolve(&TokenSet::new(), &catalog, &cfg).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.get("button.hover"), Some("#0000ff"));
    }
}
