//! Built-in themes

pub mod fallback;

pub use fallback::FALLBACK_THEME_ID;
