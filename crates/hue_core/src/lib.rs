//! Hue Core
//!
//! Foundational primitives shared by the Hue crates:
//!
//! - **Color**: RGBA color with parsing from CSS-like notations and
//!   canonical hex formatting
//!
//! # Example
//!
//! ```rust
//! use hue_core::Color;
//!
//! let accent = Color::parse("#ff0000").unwrap();
//! let hover = Color::lerp(&accent, &Color::WHITE, 0.5);
//! assert_eq!(hover.to_hex(), "#ff8080");
//! ```

pub mod color;

pub use color::{Color, ColorParseError};
