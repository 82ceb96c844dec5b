//! Foundation types for the keyed object store (KOS).
//!
//! Every other KOS crate depends on `kos-types`. The types here are the only
//! pieces with a cross-implementation contract: two processes (or two
//! implementations in different languages) must derive the same
//! [`Identifier`] and the same index hashes for the same strings, because
//! both are used as lookup keys by the storage backend.
//!
//! # Key Types
//!
//! - [`stable_hash`] -- Deterministic 32-bit polynomial string hash
//! - [`Identifier`] -- `(namespace, key)` hash pair addressing one record
//! - [`IndexSlot`] -- One of the six named index columns
//! - [`IndexValues`] -- The six optional index hashes attached to a record

pub mod error;
pub mod hash;
pub mod identifier;
pub mod index;

pub use error::TypeError;
pub use hash::stable_hash;
pub use identifier::Identifier;
pub use index::{IndexSlot, IndexValues, MAX_INDEXES};
