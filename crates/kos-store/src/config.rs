use serde::{Deserialize, Serialize};

/// Default maximum length of an encoded compact payload.
pub const DEFAULT_COMPACT_LIMIT: usize = 8000;

/// Configuration for a record backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Maximum length, in bytes, of the hex-encoded payload of a compact
    /// record. Writes above it are rejected by the backend.
    pub compact_limit: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            compact_limit: DEFAULT_COMPACT_LIMIT,
        }
    }
}
