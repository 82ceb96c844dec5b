use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::stable_hash;

/// Internal identifier of a stored record.
///
/// An `Identifier` is the pair of stable hashes of the payload's type name
/// (the namespace) and of the user-supplied key. The same `(type, key)` always
/// produces the same identifier in every process. Distinct keys may collide;
/// callers size their key space accordingly, the store does not detect it.
///
/// Ordering is by namespace first, then key hash, which is also the order in
/// which backends return records of one type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    namespace: Option<i32>,
    key: Option<i32>,
}

impl Identifier {
    /// Derive the identifier for `key` stored under the type `type_name`.
    pub fn derive(type_name: &str, key: &str) -> Result<Self, TypeError> {
        if type_name.is_empty() {
            return Err(TypeError::InvalidType("empty type name".into()));
        }
        if key.is_empty() {
            return Err(TypeError::InvalidKey("empty key".into()));
        }
        Ok(Self {
            namespace: Some(stable_hash(type_name)),
            key: Some(stable_hash(key)),
        })
    }

    /// Build an identifier from previously computed hashes.
    pub const fn from_parts(namespace: i32, key: i32) -> Self {
        Self {
            namespace: Some(namespace),
            key: Some(key),
        }
    }

    /// The unset identifier. Never valid for lookup.
    pub const fn unset() -> Self {
        Self {
            namespace: None,
            key: None,
        }
    }

    /// Returns `true` if this is the unset identifier.
    pub fn is_unset(&self) -> bool {
        self.namespace.is_none() || self.key.is_none()
    }

    /// Hash of the type name, `None` when unset.
    pub fn namespace(&self) -> Option<i32> {
        self.namespace
    }

    /// Hash of the user key, `None` when unset.
    pub fn key(&self) -> Option<i32> {
        self.key
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::unset()
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.namespace, self.key) {
            (Some(namespace), Some(key)) => {
                write!(f, "Identifier{{namespace={namespace}, key={key}}}")
            }
            _ => write!(f, "Identifier{{unset}}"),
        }
    }
}
