//! # Merge Engine
//!
//! Two families of merges over YAML mappings:
//!
//! - **Strategy merges** (`with_strategy`): a per-key `Strategy` decides how a
//!   source value is folded into a destination mapping. Used to layer
//!   configuration files on top of each other.
//! - **Key-selection merges** (`merge`, `merge_selected`): a `KeySelection`
//!   decides which keys survive, and the right-hand side always wins for the
//!   keys that do. Used to normalize task definitions against their schema.

use crate::core::commons::untagged;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// How a single key is combined when merging `src` into `dst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `src` replaces `dst`.
    Override,
    /// Both sides are treated as mappings and unioned, `src` winning on
    /// collisions. Falls back to `Override` if either side is not a mapping.
    Shallow,
    /// The key is removed from `dst`.
    Discard,
}

impl Strategy {
    /// Computes the merged value for one key. `None` means the key must not
    /// appear in the result.
    pub fn apply(self, dst: Option<&Value>, src: &Value) -> Option<Value> {
        match self {
            Self::Override => Some(src.clone()),
            Self::Discard => None,
            Self::Shallow => match (dst.map(untagged), untagged(src)) {
                (Some(Value::Mapping(base)), Value::Mapping(overlay)) => {
                    let mut merged = base.clone();
                    for (k, v) in overlay {
                        merged.insert(k.clone(), v.clone());
                    }
                    Some(Value::Mapping(merged))
                }
                _ => Some(src.clone()),
            },
        }
    }
}

/// Per-key strategies plus the strategy applied to every unregistered key.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    strategies: HashMap<String, Strategy>,
    default: Strategy,
}

impl StrategyTable {
    /// Creates an empty table. `default` is applied to keys with no entry.
    pub fn new(default: Strategy) -> Self {
        Self {
            strategies: HashMap::new(),
            default,
        }
    }

    /// Registers `strategy` for `key`.
    pub fn with(mut self, key: &str, strategy: Strategy) -> Self {
        self.strategies.insert(key.to_string(), strategy);
        self
    }

    /// The strategy for `key`, falling back to the table default.
    pub fn strategy_for(&self, key: &Value) -> Strategy {
        key.as_str()
            .and_then(|k| self.strategies.get(k))
            .copied()
            .unwrap_or(self.default)
    }

    /// The strategy for keys with no entry.
    pub fn default_strategy(&self) -> Strategy {
        self.default
    }
}

/// Merges `src` into `dst` in place, key by key, according to `table`.
///
/// Only keys present in `src` are visited, so merging an empty source is a no-op.
pub fn with_strategy(table: &StrategyTable, dst: &mut Mapping, src: &Mapping) {
    for (k, src_value) in src {
        match table.strategy_for(k).apply(dst.get(k), src_value) {
            Some(merged) => {
                dst.insert(k.clone(), merged);
            }
            None => {
                dst.shift_remove(k);
            }
        }
    }
}

/// Which keys of two mappings survive a key-selection merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySelection {
    /// Keys present in both sides.
    Inner,
    /// Keys present in either side.
    Full,
    /// Keys present in exactly one side.
    Outermost,
    /// All keys of the left side.
    Left,
    /// Keys only in the left side.
    Leftmost,
    /// All keys of the right side.
    Right,
    /// Keys only in the right side.
    Rightmost,
}

impl KeySelection {
    /// Selects keys from `left` and `right`. Left keys come first in their own
    /// order, followed by right-only keys in theirs.
    pub fn select(self, left: &Mapping, right: &Mapping) -> Vec<Value> {
        let from_left = left.keys().filter(|k| {
            let in_right = right.contains_key(*k);
            match self {
                Self::Inner => in_right,
                Self::Full | Self::Left => true,
                Self::Outermost | Self::Leftmost => !in_right,
                Self::Right => in_right,
                Self::Rightmost => false,
            }
        });
        let from_right = right.keys().filter(|k| {
            let in_left = left.contains_key(*k);
            match self {
                Self::Full | Self::Outermost | Self::Right | Self::Rightmost => !in_left,
                Self::Inner | Self::Left | Self::Leftmost => false,
            }
        });
        from_left.chain(from_right).cloned().collect()
    }
}

/// Builds a new mapping over `keys`: `right[key]` if present, else
/// `left[key]`, else `default`.
pub fn merge<'a>(
    keys: impl IntoIterator<Item = &'a Value>,
    left: &Mapping,
    right: &Mapping,
    default: &Value,
) -> Mapping {
    keys.into_iter()
        .map(|k| {
            let value = right
                .get(k)
                .or_else(|| left.get(k))
                .unwrap_or(default)
                .clone();
            (k.clone(), value)
        })
        .collect()
}

/// Key-selection merge where the right side wins for every surviving key.
pub fn merge_selected(selection: KeySelection, left: &Mapping, right: &Mapping) -> Mapping {
    let keys = selection.select(left, right);
    merge(&keys, left, right, &Value::Null)
}
