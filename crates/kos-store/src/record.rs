use std::fmt;

use kos_types::{Identifier, IndexValues};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Storage class of a payload type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageClass {
    /// Inline, bounded, optimized for key lookups.
    Compact,
    /// Unbounded binary large object.
    Blob,
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Blob => write!(f, "blob"),
        }
    }
}

/// Payload of a stored record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordPayload {
    /// Lowercase hex text stored inline with the indexes.
    Compact(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl RecordPayload {
    /// Encode `bytes` for the given storage class.
    pub fn encode(class: StorageClass, bytes: &[u8]) -> Self {
        match class {
            StorageClass::Compact => Self::Compact(hex::encode(bytes)),
            StorageClass::Blob => Self::Blob(bytes.to_vec()),
        }
    }

    pub fn class(&self) -> StorageClass {
        match self {
            Self::Compact(_) => StorageClass::Compact,
            Self::Blob(_) => StorageClass::Blob,
        }
    }

    /// Size of the payload as stored.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Compact(text) => text.len(),
            Self::Blob(bytes) => bytes.len(),
        }
    }
}

/// A stored record: identifier + index hashes + payload + version.
///
/// The version is owned by the backend. A fresh record carries version `0`;
/// every successful merge increments it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Identifier,
    pub indexes: IndexValues,
    pub payload: RecordPayload,
    pub version: u64,
}

impl StoredRecord {
    /// Create an unversioned record holding `bytes` in the given class.
    pub fn new(class: StorageClass, id: Identifier, bytes: &[u8], indexes: IndexValues) -> Self {
        Self {
            id,
            indexes,
            payload: RecordPayload::encode(class, bytes),
            version: 0,
        }
    }

    pub fn class(&self) -> StorageClass {
        self.payload.class()
    }

    /// Decode the payload back into the bytes that were stored.
    pub fn value(&self) -> StoreResult<Vec<u8>> {
        match &self.payload {
            RecordPayload::Compact(text) => {
                hex::decode(text).map_err(|e| StoreError::CorruptRecord {
                    id: self.id,
                    reason: e.to_string(),
                })
            }
            RecordPayload::Blob(bytes) => Ok(bytes.clone()),
        }
    }

    /// Replace payload and indexes, keeping identifier, class, and version.
    pub fn replace(&mut self, bytes: &[u8], indexes: IndexValues) {
        self.payload = RecordPayload::encode(self.class(), bytes);
        self.indexes = indexes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> Identifier {
        Identifier::derive("app.Record", "key").unwrap()
    }

    #[test]
    fn compact_is_hex_encoded() {
        let record =
            StoredRecord::new(StorageClass::Compact, id(), b"\x01\xab", IndexValues::empty());
        assert_eq!(record.payload, RecordPayload::Compact("01ab".into()));
        assert_eq!(record.payload.encoded_len(), 4);
        assert_eq!(record.value().unwrap(), b"\x01\xab");
        assert_eq!(record.version, 0);
    }

    #[test]
    fn blob_is_raw() {
        let record =
            StoredRecord::new(StorageClass::Blob, id(), b"1234567890", IndexValues::empty());
        assert_eq!(record.class(), StorageClass::Blob);
        assert_eq!(record.payload.encoded_len(), 10);
        assert_eq!(record.value().unwrap(), b"1234567890");
    }

    #[test]
    fn corrupt_compact_text() {
        let record = StoredRecord {
            id: id(),
            indexes: IndexValues::empty(),
            payload: RecordPayload::Compact("not hex".into()),
            version: 0,
        };
        let err = record.value().unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord { .. }));
    }

    #[test]
    fn replace_keeps_class_and_version() {
        let mut record =
            StoredRecord::new(StorageClass::Compact, id(), b"old", IndexValues::empty());
        record.version = 3;
        let indexes = IndexValues::fill(&["x"]).unwrap();
        record.replace(b"new", indexes);
        assert_eq!(record.class(), StorageClass::Compact);
        assert_eq!(record.version, 3);
        assert_eq!(record.indexes, indexes);
        assert_eq!(record.value().unwrap(), b"new");
    }

    #[test]
    fn storage_class_display() {
        assert_eq!(StorageClass::Compact.to_string(), "compact");
        assert_eq!(StorageClass::Blob.to_string(), "blob");
    }
}
