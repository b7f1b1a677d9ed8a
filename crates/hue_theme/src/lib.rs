//! Hue Theme Engine
//!
//! A design token resolution engine: typed tokens, layered themes with
//! light/dark variants, accent colors, ad hoc overrides, and cached
//! resolution into a flat map of final string values.
//!
//! # Overview
//!
//! The engine provides:
//! - **Design tokens**: Typed values keyed by dotted ids, loaded from TOML sources
//! - **Themes**: Base tokens plus per-scheme variants
//! - **Accents**: User accent colors re-derive accent-modifiable tokens
//! - **Overrides**: Per-configuration token replacements
//! - **References**: Tokens may alias other tokens; cycles and runaway chains
//!   are rejected
//! - **Fallback**: A built-in theme keeps the engine usable when sources are
//!   broken
//!
//! # Quick Start
//!
//! ```rust
//! use hue_theme::{
//!     loader::MemoryReader, ColorScheme, SourceLocations, ThemeEngine, ThemeId,
//!     ThemingConfiguration,
//! };
//!
//! let reader = MemoryReader::new().with_source(
//!     "basic.toml",
//!     r#"
//!         id = "basic"
//!         name = "Basic"
//!         [base_tokens."color.bg"]
//!         type = "color"
//!         value = "white"
//!         [[variants]]
//!         applies_to_scheme = "dark"
//!         [variants.tokens."color.bg"]
//!         type = "color"
//!         value = "black"
//!     "#,
//! );
//!
//! let engine = ThemeEngine::new(reader);
//! let config = ThemingConfiguration::new(ThemeId::new("basic").unwrap(), ColorScheme::Light);
//! let state = engine.initialize(config.clone(), SourceLocations::new(Vec::<&str>::new(), ["basic.toml"]));
//! assert_eq!(state.get("color.bg"), Some("white"));
//!
//! let dark = engine.update_configuration(config.with_scheme(ColorScheme::Dark)).unwrap();
//! assert_eq!(dark.get("color.bg"), Some("black"));
//! ```
//!
//! # Resolution order
//!
//! Later layers win: global tokens, theme base, scheme variant, accent
//! derivations, overrides. References are substituted last and the result is
//! stringified. See [`resolve`].

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod resolve;
pub mod state;
pub mod theme;
pub mod themes;
pub mod tokens;

// Re-export commonly used types
pub use config::{SourceLocations, ThemingConfiguration};
pub use engine::{EngineBuilder, EnginePhase, ThemeEngine};
pub use error::{EngineError, IdentifierError, LoadError, ResolveError, Result};
pub use hue_core::Color;
pub use loader::{FsReader, MemoryReader, SourceReader};
pub use state::AppliedThemeState;
pub use theme::{
    AccentColor, AccentModification, ColorScheme, ThemeCatalog, ThemeDefinition, ThemeId,
    ThemeSummary, ThemeVariant,
};
pub use themes::FALLBACK_THEME_ID;
pub use tokens::{RawToken, TokenId, TokenKind, TokenSet, TokenValue};
