//! Record storage for the keyed object store.
//!
//! A [`StoredRecord`] is the unit of storage: an [`Identifier`], six index
//! hashes, a version token, and the payload in one of two storage classes:
//!
//! - [`StorageClass::Compact`] -- inline hex text, bounded in size, fast to
//!   look up by key
//! - [`StorageClass::Blob`] -- unbounded raw bytes
//!
//! The two classes live in separate tables. A type is stored in exactly one
//! of them for its whole lifetime, since the identifier does not record which
//! class was used.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordBackend`] trait:
//!
//! - [`InMemoryRecordBackend`] -- `BTreeMap`-based backend for tests and embedding
//!
//! # Design Rules
//!
//! 1. The backend owns the version token; it is bumped on every merge.
//! 2. A merge carrying a stale version is rejected, never retried.
//! 3. The backend never interprets payload bytes.
//! 4. Records of one type are returned in key-hash order.
//!
//! [`Identifier`]: kos_types::Identifier

pub mod config;
pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::BackendConfig;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordBackend;
pub use record::{RecordPayload, StorageClass, StoredRecord};
pub use traits::RecordBackend;
