//! Color primitive

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing a color string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,

    #[error("invalid hex color `{0}`")]
    InvalidHex(String),

    #[error("invalid color function `{0}`")]
    InvalidFunction(String),

    #[error("unknown color `{0}`")]
    Unknown(String),
}

/// RGBA color (sRGB, components in `0.0..=1.0`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation between two colors, `t` clamped to `0.0..=1.0`
    pub fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: from.r + (to.r - from.r) * t,
            g: from.g + (to.g - from.g) * t,
            b: from.b + (to.b - from.b) * t,
            a: from.a + (to.a - from.a) * t,
        }
    }

    /// Parse a color from CSS-like notation.
    ///
    /// Accepted forms:
    /// - `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
    /// - `rgb(r, g, b)` with 0-255 channels
    /// - `rgba(r, g, b, a)` with 0-255 channels and alpha in `0.0..=1.0`
    /// - a handful of CSS named colors (`white`, `black`, `transparent`, ...)
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            return parse_rgb_function(&lower)
                .ok_or_else(|| ColorParseError::InvalidFunction(s.to_string()));
        }

        named_color(&lower).ok_or_else(|| ColorParseError::Unknown(s.to_string()))
    }

    /// Canonical lowercase hex form.
    ///
    /// Opaque colors format as `#rrggbb`, translucent ones as `#rrggbbaa`.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_array().map(channel_to_u8);
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let [r, g, b, a] = match hex.len() {
        3 => [nibble(0)?, nibble(1)?, nibble(2)?, 255],
        4 => [nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?],
        6 => [byte(0)?, byte(2)?, byte(4)?, 255],
        8 => [byte(0)?, byte(2)?, byte(4)?, byte(6)?],
        _ => return None,
    };

    Some(Color::rgba(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ))
}

fn parse_rgb_function(s: &str) -> Option<Color> {
    let (name, rest) = s.split_once('(')?;
    let args = rest.strip_suffix(')')?;
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();

    let channel = |p: &str| -> Option<f32> {
        let v: f32 = p.parse().ok()?;
        (0.0..=255.0).contains(&v).then_some(v / 255.0)
    };

    match (name.trim(), parts.as_slice()) {
        ("rgb", [r, g, b]) => Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
        ("rgba", [r, g, b, a]) => {
            let alpha: f32 = a.parse().ok()?;
            if !(0.0..=1.0).contains(&alpha) {
                return None;
            }
            Some(Color::rgba(channel(r)?, channel(g)?, channel(b)?, alpha))
        }
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let hex = match name {
        "transparent" => return Some(Color::TRANSPARENT),
        "white" => 0xFFFFFF,
        "black" => 0x000000,
        "red" => 0xFF0000,
        "green" => 0x008000,
        "lime" => 0x00FF00,
        "blue" => 0x0000FF,
        "yellow" => 0xFFFF00,
        "orange" => 0xFFA500,
        "purple" => 0x800080,
        "gray" | "grey" => 0x808080,
        "silver" => 0xC0C0C0,
        "navy" => 0x000080,
        "teal" => 0x008080,
        _ => return None,
    };
    Some(Color::from_hex(hex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::parse("#ff0000").unwrap(), Color::RED);
        assert_eq!(Color::parse("#f00").unwrap(), Color::RED);
        assert_eq!(Color::parse("#FF0000FF").unwrap(), Color::RED);
        assert_eq!(Color::parse("#0000").unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Color::parse(""), Err(ColorParseError::Empty));
        assert!(matches!(
            Color::parse("#12345"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            Color::parse("#gg0000"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            Color::parse("rgb(300, 0, 0)"),
            Err(ColorParseError::InvalidFunction(_))
        ));
        assert!(matches!(
            Color::parse("chartreuse-ish"),
            Err(ColorParseError::Unknown(_))
        ));
    }

    #[test]
    fn test_parse_functions_and_names() {
        assert_eq!(Color::parse("rgb(255, 0, 0)").unwrap(), Color::RED);
        assert_eq!(
            Color::parse("rgba(0, 0, 0, 0.5)").unwrap(),
            Color::BLACK.with_alpha(0.5)
        );
        assert_eq!(Color::parse("White").unwrap(), Color::WHITE);
    }

    #[test]
    fn test_to_hex_round_trips_canonical_form() {
        assert_eq!(Color::parse("#112233").unwrap().to_hex(), "#112233");
        assert_eq!(Color::parse("#ABC").unwrap().to_hex(), "#aabbcc");
        assert_eq!(Color::BLACK.with_alpha(0.5).to_hex(), "#00000080");
    }

    #[test]
    fn test_lerp_clamps_factor() {
        assert_eq!(Color::lerp(&Color::BLACK, &Color::WHITE, 2.0), Color::WHITE);
        assert_eq!(Color::lerp(&Color::BLACK, &Color::WHITE, -1.0), Color::BLACK);
        assert_eq!(
            Color::lerp(&Color::RED, &Color::WHITE, 0.5).to_hex(),
            "#ff8080"
        );
    }
}
