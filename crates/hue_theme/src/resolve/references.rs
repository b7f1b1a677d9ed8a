//! Reference substitution over a flattened token layer
//!
//! Chains are walked iteratively with an explicit visited path, so a cycle is
//! reported with its full path and a long chain stops at
//! [`MAX_REFERENCE_DEPTH`] hops instead of growing the call stack.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::error::ResolveError;
use crate::tokens::{TokenId, TokenValue};

/// Maximum number of reference hops from a token to its concrete value
pub const MAX_REFERENCE_DEPTH: usize = 16;

/// Flattened `id -> value` layer
pub type Layer = BTreeMap<TokenId, TokenValue>;

/// Resolves references within one layer, memoizing every token it walks.
///
/// The memo stores the remaining hop count alongside each value, so the depth
/// bound holds no matter which token of a chain is resolved first.
pub struct ReferenceResolver<'a> {
    layer: &'a Layer,
    memo: FxHashMap<TokenId, (TokenValue, usize)>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(layer: &'a Layer) -> Self {
        Self {
            layer,
            memo: FxHashMap::default(),
        }
    }

    /// Concrete (non-reference) value of `start`
    pub fn resolve(&mut self, start: &TokenId) -> Result<TokenValue, ResolveError> {
        if let Some((value, _)) = self.memo.get(start) {
            return Ok(value.clone());
        }

        let mut path: Vec<TokenId> = vec![start.clone()];
        let (value, tail_depth) = loop {
            let current = &path[path.len() - 1];

            if let Some((value, depth)) = self.memo.get(current) {
                break (value.clone(), *depth);
            }

            let Some(value) = self.layer.get(current) else {
                let token = if path.len() >= 2 {
                    path[path.len() - 2].clone()
                } else {
                    current.clone()
                };
                return Err(ResolveError::MissingReference {
                    token,
                    target: current.clone(),
                });
            };

            match value {
                TokenValue::Reference(target) => {
                    if let Some(pos) = path.iter().position(|id| id == target) {
                        let mut cycle = path[pos..].to_vec();
                        cycle.push(target.clone());
                        return Err(ResolveError::CyclicReference { cycle });
                    }
                    if path.len() > MAX_REFERENCE_DEPTH {
                        return Err(ResolveError::MaxDepthExceeded {
                            token: start.clone(),
                            depth: MAX_REFERENCE_DEPTH,
                        });
                    }
                    path.push(target.clone());
                }
                concrete => break (concrete.clone(), 0),
            }
        };

        let last = path.len() - 1;
        if last + tail_depth > MAX_REFERENCE_DEPTH {
            return Err(ResolveError::MaxDepthExceeded {
                token: start.clone(),
                depth: MAX_REFERENCE_DEPTH,
            });
        }

        for (i, id) in path.into_iter().enumerate() {
            self.memo
                .entry(id)
                .or_insert_with(|| (value.clone(), last - i + tail_depth));
        }
        tracing::trace!("resolved `{}` in {} hops", start, last + tail_depth);
        Ok(value)
    }

    /// Resolve every token of the layer, in id order
    pub fn resolve_all(mut self) -> Result<Layer, ResolveError> {
        let layer = self.layer;
        let mut out = Layer::new();
        for id in layer.keys() {
            let value = self.resolve(id)?;
            out.insert(id.clone(), value);
        }
        Ok(out)
    }
}
