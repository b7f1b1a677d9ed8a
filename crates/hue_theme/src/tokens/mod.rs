//! Design tokens
//!
//! Tokens are the atomic values that make up a design system. Each token has
//! a dotted identifier and a typed value:
//! - Colors, borders, shadows
//! - Typography (families, sizes, weights, line heights, letter spacing)
//! - Dimensions, spacing, radii
//! - Opacity and z-index
//! - References to other tokens

mod id;
mod store;
mod value;

pub use id::TokenId;
pub(crate) use id::validate_dotted;
pub use store::{RawToken, TokenSet};
pub use value::{RawTokenValue, TokenKind, TokenValue};
