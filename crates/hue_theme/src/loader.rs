//! Token and theme source loading
//!
//! Sources are TOML documents read through a [`SourceReader`]. Every load
//! call is atomic: it either returns fully validated data or an error, and
//! never hands back a partially merged result.
//!
//! Token source:
//!
//! ```toml
//! [[tokens]]
//! id = "color.bg"
//! type = "color"
//! value = "#ffffff"
//! description = "Window background"
//! ```
//!
//! Theme source:
//!
//! ```toml
//! id = "light-basic"
//! name = "Light Basic"
//!
//! [base_tokens."color.bg"]
//! type = "color"
//! value = "white"
//!
//! [[variants]]
//! applies_to_scheme = "dark"
//! [variants.tokens."color.bg"]
//! type = "color"
//! value = "black"
//!
//! [accent_modifiable_tokens]
//! "button.bg" = "direct-replace"
//! "button.bg-hover" = { lighten = 0.2 }
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::theme::{
    AccentColor, AccentModification, ColorScheme, RawAccent, ThemeDefinition, ThemeId,
    ThemeMetadata, ThemeVariant,
};
use crate::tokens::{RawToken, TokenId, TokenKind, TokenSet, TokenValue};

/// Generic "read source to text" capability
pub trait SourceReader: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Reads sources from the local filesystem
#[derive(Clone, Copy, Debug, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory sources keyed by path; contents can be replaced between reloads
#[derive(Debug, Default)]
pub struct MemoryReader {
    sources: RwLock<FxHashMap<PathBuf, String>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace a source
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: &Path) -> Option<String> {
        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
    }
}

impl SourceReader for MemoryReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no source registered for {}", path.display()),
                )
            })
    }
}

// ========== Raw documents ==========

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TokenDocument {
    #[serde(default)]
    tokens: Vec<TokenRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TokenRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: TokenKind,
    value: toml::Value,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    group: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeDocument {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    base_tokens: BTreeMap<String, TokenRecord>,
    #[serde(default)]
    variants: Vec<VariantRecord>,
    #[serde(default)]
    supported_accent_colors: Vec<RawAccent>,
    #[serde(default)]
    accent_modifiable_tokens: BTreeMap<String, AccentModification>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VariantRecord {
    applies_to_scheme: ColorScheme,
    #[serde(default)]
    tokens: BTreeMap<String, TokenRecord>,
}

// ========== Token loading ==========

/// Load and merge token sources in order.
///
/// A later source overrides an earlier one on id collision; the same id twice
/// inside one source is a [`LoadError::DuplicateId`].
pub fn load_tokens(
    reader: &dyn SourceReader,
    paths: &[PathBuf],
) -> Result<TokenSet, LoadError> {
    let mut merged = TokenSet::new();
    for path in paths {
        let text = read_source(reader, path)?;
        let set = parse_token_source(path, &text)?;
        debug!("loaded {} tokens from {}", set.len(), path.display());
        for id in merged.merge(set) {
            info!("token `{}` redefined by {}, later source wins", id, path.display());
        }
    }
    Ok(merged)
}

/// Parse a single token source document
pub fn parse_token_source(path: &Path, text: &str) -> Result<TokenSet, LoadError> {
    let doc: TokenDocument = toml::from_str(text).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let mut set = TokenSet::new();
    for record in doc.tokens {
        let Some(raw_id) = record.id.clone() else {
            return Err(LoadError::MalformedStructure {
                path: path.to_path_buf(),
                reason: "token entry without an `id`".to_string(),
            });
        };
        let id = token_id(path, &raw_id)?;
        if set.contains(id.as_str()) {
            return Err(LoadError::DuplicateId {
                path: path.to_path_buf(),
                id: raw_id,
            });
        }
        set.insert(convert_record(path, id, record)?);
    }
    Ok(set)
}

fn read_source(reader: &dyn SourceReader, path: &Path) -> Result<String, LoadError> {
    reader.read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn token_id(path: &Path, raw: &str) -> Result<TokenId, LoadError> {
    TokenId::new(raw).map_err(|reason| LoadError::InvalidIdentifier {
        path: path.to_path_buf(),
        value: raw.to_string(),
        reason,
    })
}

fn convert_record(path: &Path, id: TokenId, record: TokenRecord) -> Result<RawToken, LoadError> {
    let value =
        TokenValue::from_toml(record.kind, &record.value).map_err(|reason| {
            LoadError::InvalidValue {
                path: path.to_path_buf(),
                id: id.to_string(),
                reason,
            }
        })?;
    Ok(RawToken {
        id,
        value,
        description: record.description,
        group: record.group,
    })
}

/// Convert a `key -> record` table; an inner `id` must agree with its key
fn convert_table(
    path: &Path,
    table: BTreeMap<String, TokenRecord>,
) -> Result<TokenSet, LoadError> {
    let mut set = TokenSet::new();
    for (key, record) in table {
        if let Some(inner) = record.id.as_deref() {
            if inner != key {
                return Err(LoadError::MalformedStructure {
                    path: path.to_path_buf(),
                    reason: format!("token `{key}` declares mismatched id `{inner}`"),
                });
            }
        }
        let id = token_id(path, &key)?;
        set.insert(convert_record(path, id, record)?);
    }
    Ok(set)
}

// ========== Theme loading ==========

/// Load theme sources and validate them against the global token set.
///
/// Every reference inside a theme's base or variant tokens must point at a
/// token in `global_tokens` or in the theme's own base tokens.
pub fn load_themes(
    reader: &dyn SourceReader,
    paths: &[PathBuf],
    global_tokens: &TokenSet,
) -> Result<Vec<ThemeDefinition>, LoadError> {
    let mut themes = Vec::with_capacity(paths.len());
    let mut seen = FxHashSet::default();

    for path in paths {
        let text = read_source(reader, path)?;
        let theme = parse_theme_source(path, &text)?;
        if !seen.insert(theme.id.clone()) {
            return Err(LoadError::DuplicateId {
                path: path.clone(),
                id: theme.id.to_string(),
            });
        }
        validate_theme(path, &theme, global_tokens)?;
        debug!(
            "loaded theme `{}` ({} base tokens, {} variants) from {}",
            theme.id,
            theme.base_tokens.len(),
            theme.variants.len(),
            path.display()
        );
        themes.push(theme);
    }
    Ok(themes)
}

/// Parse a single theme source document (structure only, no reference check)
pub fn parse_theme_source(path: &Path, text: &str) -> Result<ThemeDefinition, LoadError> {
    let doc: ThemeDocument = toml::from_str(text).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let malformed = |reason: String| LoadError::MalformedStructure {
        path: path.to_path_buf(),
        reason,
    };

    let id = ThemeId::new(doc.id.as_str()).map_err(|reason| LoadError::InvalidIdentifier {
        path: path.to_path_buf(),
        value: doc.id.clone(),
        reason,
    })?;
    if doc.name.trim().is_empty() {
        return Err(malformed(format!("theme `{id}` has an empty name")));
    }

    let base_tokens = convert_table(path, doc.base_tokens)?;

    let mut variants: Vec<ThemeVariant> = Vec::with_capacity(doc.variants.len());
    for variant in doc.variants {
        let scheme = variant.applies_to_scheme;
        if variants.iter().any(|v| v.applies_to_scheme == scheme) {
            return Err(malformed(format!(
                "theme `{id}` defines more than one `{scheme}` variant"
            )));
        }
        variants.push(ThemeVariant {
            applies_to_scheme: scheme,
            tokens: convert_table(path, variant.tokens)?,
        });
    }

    let mut supported_accent_colors = Vec::with_capacity(doc.supported_accent_colors.len());
    for raw in doc.supported_accent_colors {
        let value = raw.value.clone();
        let accent = AccentColor::try_from(raw)
            .map_err(|e| malformed(format!("supported accent `{value}`: {e}")))?;
        supported_accent_colors.push(accent);
    }

    let mut accent_modifiable_tokens = BTreeMap::new();
    for (key, modification) in doc.accent_modifiable_tokens {
        if let Some(factor) = modification.factor() {
            if !(0.0..=1.0).contains(&factor) {
                return Err(malformed(format!(
                    "accent factor {factor} for `{key}` is outside 0..=1"
                )));
            }
        }
        accent_modifiable_tokens.insert(token_id(path, &key)?, modification);
    }

    Ok(ThemeDefinition {
        id,
        name: doc.name,
        base_tokens,
        variants,
        supported_accent_colors,
        accent_modifiable_tokens,
        metadata: ThemeMetadata {
            description: doc.description,
            author: doc.author,
            version: doc.version,
        },
    })
}

/// Static reference and accent-target checks for one theme
pub fn validate_theme(
    path: &Path,
    theme: &ThemeDefinition,
    global_tokens: &TokenSet,
) -> Result<(), LoadError> {
    let known = |id: &str| global_tokens.contains(id) || theme.base_tokens.contains(id);

    let layers = std::iter::once(&theme.base_tokens)
        .chain(theme.variants.iter().map(|variant| &variant.tokens));
    for layer in layers {
        for token in layer.iter() {
            if let Some(target) = token.value.as_reference() {
                if !known(target.as_str()) {
                    return Err(LoadError::MissingReferencedToken {
                        theme: theme.id.clone(),
                        token: token.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }

    // Accent targets must exist under every scheme, so variants don't count.
    for target in theme.accent_modifiable_tokens.keys() {
        if !known(target.as_str()) {
            return Err(LoadError::MalformedStructure {
                path: path.to_path_buf(),
                reason: format!(
                    "theme `{}` marks undefined token `{}` as accent-modifiable",
                    theme.id, target
                ),
            });
        }
    }
    Ok(())
}
