//! Theme engine error types

use std::path::PathBuf;

use thiserror::Error;

use crate::theme::ThemeId;
use crate::tokens::TokenId;

/// Identifier validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier `{0}` has an empty segment")]
    EmptySegment(String),

    #[error("identifier `{value}` contains invalid character `{ch}`")]
    InvalidChar { value: String, ch: char },
}

/// Errors raised while loading token or theme sources.
///
/// A load call that fails leaves no partial state behind.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not a well-formed document
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The same id was defined twice within one source (or a theme id repeated)
    #[error("duplicate id `{id}` in {}", path.display())]
    DuplicateId { path: PathBuf, id: String },

    /// A token value does not satisfy its kind
    #[error("invalid value for `{id}` in {}: {reason}", path.display())]
    InvalidValue {
        path: PathBuf,
        id: String,
        reason: String,
    },

    /// An identifier failed validation
    #[error("invalid identifier `{value}` in {}: {reason}", path.display())]
    InvalidIdentifier {
        path: PathBuf,
        value: String,
        reason: IdentifierError,
    },

    /// A theme references a token that exists neither globally nor in the theme
    #[error("theme `{theme}`: token `{token}` references missing token `{target}`")]
    MissingReferencedToken {
        theme: ThemeId,
        token: TokenId,
        target: TokenId,
    },

    /// The document parsed but its structure is not a valid theme
    #[error("malformed theme in {}: {reason}", path.display())]
    MalformedStructure { path: PathBuf, reason: String },
}

/// Errors raised by a single resolution run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("unknown theme `{0}`")]
    UnknownTheme(ThemeId),

    #[error("token `{token}` references missing token `{target}`")]
    MissingReference { token: TokenId, target: TokenId },

    #[error("cyclic reference: {}", format_cycle(cycle))]
    CyclicReference { cycle: Vec<TokenId> },

    #[error("token `{token}` exceeds the maximum reference depth of {depth}")]
    MaxDepthExceeded { token: TokenId, depth: usize },

    #[error("cannot apply accent to `{token}` in theme `{theme}`: {reason}")]
    AccentApplication {
        token: TokenId,
        theme: ThemeId,
        reason: String,
    },
}

fn format_cycle(cycle: &[TokenId]) -> String {
    cycle
        .iter()
        .map(TokenId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors surfaced by the engine facade
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("theme engine has not been initialized")]
    NotInitialized,
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
