//! Accent color derivation
//!
//! Lighten and darken mix the accent toward white or black in sRGB space,
//! keeping alpha. All color math lives in [`apply_accent`].

use hue_core::Color;

use crate::theme::AccentModification;

/// Derive a token color from the accent according to `modification`
pub fn apply_accent(accent: Color, modification: AccentModification) -> Color {
    match modification {
        AccentModification::DirectReplace => accent,
        AccentModification::Lighten(factor) => mix(accent, Color::WHITE, factor),
        AccentModification::Darken(factor) => mix(accent, Color::BLACK, factor),
    }
}

fn mix(color: Color, toward: Color, factor: f32) -> Color {
    Color::lerp(&color, &toward.with_alpha(color.a), factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_replace() {
        let accent = Color::parse("#3366cc").unwrap();
        assert_eq!(
            apply_accent(accent, AccentModification::DirectReplace),
            accent
        );
    }

    #[test]
    fn test_lighten_and_darken() {
        let accent = Color::parse("#ff0000").unwrap();
        assert_eq!(
            apply_accent(accent, AccentModification::Lighten(0.5)).to_hex(),
            "#ff8080"
        );
        assert_eq!(
            apply_accent(accent, AccentModification::Darken(0.5)).to_hex(),
            "#800000"
        );
        assert_eq!(
            apply_accent(accent, AccentModification::Lighten(1.0)).to_hex(),
            "#ffffff"
        );
        assert_eq!(
            apply_accent(accent, AccentModification::Darken(0.0)).to_hex(),
            "#ff0000"
        );
    }

    #[test]
    fn test_alpha_is_preserved() {
        let accent = Color::parse("#ff000080").unwrap();
        let lighter = apply_accent(accent, AccentModification::Lighten(0.5));
        assert_eq!(lighter.a, accent.a);
    }
}
