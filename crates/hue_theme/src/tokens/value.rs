//! Typed token values

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TokenId;

/// Token kind tag as written in definition sources
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Color,
    Dimension,
    FontSize,
    FontFamily,
    FontWeight,
    LineHeight,
    LetterSpacing,
    Border,
    Shadow,
    Radius,
    Spacing,
    ZIndex,
    Opacity,
    Text,
    Reference,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Dimension => "dimension",
            Self::FontSize => "font-size",
            Self::FontFamily => "font-family",
            Self::FontWeight => "font-weight",
            Self::LineHeight => "line-height",
            Self::LetterSpacing => "letter-spacing",
            Self::Border => "border",
            Self::Shadow => "shadow",
            Self::Radius => "radius",
            Self::Spacing => "spacing",
            Self::ZIndex => "z-index",
            Self::Opacity => "opacity",
            Self::Text => "text",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed design token value.
///
/// Most kinds are string-like and pass through resolution untouched.
/// `Reference` points at another token and is substituted during resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenValue", into = "RawTokenValue")]
pub enum TokenValue {
    Color(String),
    Dimension(String),
    FontSize(String),
    FontFamily(String),
    FontWeight(String),
    LineHeight(String),
    LetterSpacing(String),
    Border(String),
    Shadow(String),
    Radius(String),
    Spacing(String),
    ZIndex(i64),
    /// Always within `0.0..=1.0`; construct through [`TokenValue::opacity`]
    Opacity(f32),
    Text(String),
    Reference(TokenId),
}

impl TokenValue {
    pub fn color(value: impl Into<String>) -> Self {
        Self::Color(value.into())
    }

    pub fn reference(target: TokenId) -> Self {
        Self::Reference(target)
    }

    /// Opacity value, rejecting anything outside `0.0..=1.0`
    pub fn opacity(value: f32) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("opacity {value} is outside 0..=1"));
        }
        Ok(Self::Opacity(value))
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Color(_) => TokenKind::Color,
            Self::Dimension(_) => TokenKind::Dimension,
            Self::FontSize(_) => TokenKind::FontSize,
            Self::FontFamily(_) => TokenKind::FontFamily,
            Self::FontWeight(_) => TokenKind::FontWeight,
            Self::LineHeight(_) => TokenKind::LineHeight,
            Self::LetterSpacing(_) => TokenKind::LetterSpacing,
            Self::Border(_) => TokenKind::Border,
            Self::Shadow(_) => TokenKind::Shadow,
            Self::Radius(_) => TokenKind::Radius,
            Self::Spacing(_) => TokenKind::Spacing,
            Self::ZIndex(_) => TokenKind::ZIndex,
            Self::Opacity(_) => TokenKind::Opacity,
            Self::Text(_) => TokenKind::Text,
            Self::Reference(_) => TokenKind::Reference,
        }
    }

    pub fn as_reference(&self) -> Option<&TokenId> {
        match self {
            Self::Reference(target) => Some(target),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Final renderable string, `None` for an unresolved reference.
    ///
    /// Opacity is clamped and printed with two decimals, z-index as a plain
    /// integer, everything else passes through.
    pub fn canonical_string(&self) -> Option<String> {
        let text = match self {
            Self::Color(s)
            | Self::Dimension(s)
            | Self::FontSize(s)
            | Self::FontFamily(s)
            | Self::FontWeight(s)
            | Self::LineHeight(s)
            | Self::LetterSpacing(s)
            | Self::Border(s)
            | Self::Shadow(s)
            | Self::Radius(s)
            | Self::Spacing(s)
            | Self::Text(s) => s.clone(),
            Self::ZIndex(z) => z.to_string(),
            Self::Opacity(o) => format!("{:.2}", o.clamp(0.0, 1.0)),
            Self::Reference(_) => return None,
        };
        Some(text)
    }

    /// Build a value of `kind` from a raw TOML scalar.
    ///
    /// Strings are kept verbatim, except colors which are trimmed and must not
    /// be empty. Numbers use their shortest round-trip form, so `1.0` becomes
    /// `"1"`; quote the value to keep another spelling.
    pub fn from_toml(kind: TokenKind, raw: &toml::Value) -> Result<Self, String> {
        let text = || -> Result<String, String> {
            match raw {
                toml::Value::String(s) => Ok(s.clone()),
                toml::Value::Integer(i) => Ok(i.to_string()),
                toml::Value::Float(f) => Ok(f.to_string()),
                other => Err(format!(
                    "{kind} expects a string or number, found {}",
                    other.type_str()
                )),
            }
        };

        let value = match kind {
            TokenKind::Color => {
                let color = text()?.trim().to_string();
                if color.is_empty() {
                    return Err("color value is empty".to_string());
                }
                Self::Color(color)
            }
            TokenKind::Dimension => Self::Dimension(text()?),
            TokenKind::FontSize => Self::FontSize(text()?),
            TokenKind::FontFamily => Self::FontFamily(text()?),
            TokenKind::FontWeight => Self::FontWeight(text()?),
            TokenKind::LineHeight => Self::LineHeight(text()?),
            TokenKind::LetterSpacing => Self::LetterSpacing(text()?),
            TokenKind::Border => Self::Border(text()?),
            TokenKind::Shadow => Self::Shadow(text()?),
            TokenKind::Radius => Self::Radius(text()?),
            TokenKind::Spacing => Self::Spacing(text()?),
            TokenKind::Text => Self::Text(text()?),
            TokenKind::ZIndex => match raw {
                toml::Value::Integer(i) => Self::ZIndex(*i),
                other => {
                    return Err(format!(
                        "z-index expects an integer, found {}",
                        other.type_str()
                    ))
                }
            },
            TokenKind::Opacity => {
                let v = match raw {
                    toml::Value::Float(f) => *f,
                    toml::Value::Integer(i) => *i as f64,
                    other => {
                        return Err(format!(
                            "opacity expects a number, found {}",
                            other.type_str()
                        ))
                    }
                };
                Self::opacity(v as f32)?
            }
            TokenKind::Reference => match raw {
                toml::Value::String(s) => {
                    Self::Reference(TokenId::new(s.trim()).map_err(|e| e.to_string())?)
                }
                other => {
                    return Err(format!(
                        "reference expects a token id, found {}",
                        other.type_str()
                    ))
                }
            },
        };
        Ok(value)
    }

    fn to_toml(&self) -> toml::Value {
        match self {
            Self::ZIndex(z) => toml::Value::Integer(*z),
            Self::Opacity(o) => toml::Value::Float(f64::from(*o)),
            Self::Reference(target) => toml::Value::String(target.to_string()),
            other => toml::Value::String(other.canonical_string().unwrap_or_default()),
        }
    }
}

/// Serialized form of a token value: `{ type = "...", value = ... }`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawTokenValue {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: toml::Value,
}

impl TryFrom<RawTokenValue> for TokenValue {
    type Error = String;

    fn try_from(raw: RawTokenValue) -> Result<Self, Self::Error> {
        TokenValue::from_toml(raw.kind, &raw.value)
    }
}

impl From<TokenValue> for RawTokenValue {
    fn from(value: TokenValue) -> Self {
        RawTokenValue {
            kind: value.kind(),
            value: value.to_toml(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_is_validated_and_formatted() {
        assert!(TokenValue::opacity(1.5).is_err());
        assert!(TokenValue::opacity(-0.1).is_err());
        assert_eq!(
            TokenValue::opacity(0.5).unwrap().canonical_string().as_deref(),
            Some("0.50")
        );
        assert_eq!(
            TokenValue::Opacity(1.7).canonical_string().as_deref(),
            Some("1.00")
        );
    }

    #[test]
    fn test_z_index_formats_as_decimal() {
        assert_eq!(
            TokenValue::ZIndex(-20).canonical_string().as_deref(),
            Some("-20")
        );
    }

    #[test]
    fn test_reference_has_no_canonical_string() {
        let value = TokenValue::reference(TokenId::new("color.bg").unwrap());
        assert_eq!(value.canonical_string(), None);
    }

    #[test]
    fn test_from_toml_kinds() {
        let weight = TokenValue::from_toml(TokenKind::FontWeight, &toml::Value::Integer(600));
        assert_eq!(weight, Ok(TokenValue::FontWeight("600".into())));

        let z = TokenValue::from_toml(TokenKind::ZIndex, &toml::Value::String("10".into()));
        assert!(z.is_err());

        let opacity = TokenValue::from_toml(TokenKind::Opacity, &toml::Value::Integer(1));
        assert_eq!(opacity, Ok(TokenValue::Opacity(1.0)));

        let empty = TokenValue::from_toml(TokenKind::Color, &toml::Value::String("  ".into()));
        assert!(empty.is_err());

        let bad_ref =
            TokenValue::from_toml(TokenKind::Reference, &toml::Value::String("a..b".into()));
        assert!(bad_ref.is_err());
    }

    #[test]
    fn test_string_values_are_kept_verbatim() {
        let empty = TokenValue::from_toml(TokenKind::Text, &toml::Value::String(String::new()));
        assert_eq!(empty, Ok(TokenValue::Text(String::new())));

        let padded = TokenValue::from_toml(TokenKind::Text, &toml::Value::String("  OK  ".into()));
        assert_eq!(padded, Ok(TokenValue::Text("  OK  ".into())));

        let color = TokenValue::from_toml(TokenKind::Color, &toml::Value::String(" #fff ".into()));
        assert_eq!(color, Ok(TokenValue::color("#fff")));
    }

    #[test]
    fn test_float_uses_shortest_form() {
        let bare = TokenValue::from_toml(TokenKind::LineHeight, &toml::Value::Float(1.0));
        assert_eq!(bare, Ok(TokenValue::LineHeight("1".into())));

        let quoted = TokenValue::from_toml(TokenKind::LineHeight, &toml::Value::String("1.0".into()));
        assert_eq!(quoted, Ok(TokenValue::LineHeight("1.0".into())));

        let fraction = TokenValue::from_toml(TokenKind::LineHeight, &toml::Value::Float(1.25));
        assert_eq!(fraction, Ok(TokenValue::LineHeight("1.25".into())));
    }

    #[test]
    fn test_deserialize_from_table() {
        let value: TokenValue = toml::from_str("type = \"reference\"\nvalue = \"color.bg\"").unwrap();
        assert_eq!(
            value,
            TokenValue::Reference(TokenId::new("color.bg").unwrap())
        );
    }
}
