//! High-level API for the keyed object store.
//!
//! Applications store typed payloads by `(type, key)` and find them again by
//! key or by up to six index values. [`KeyedObjectStore`] is the main entry
//! point; it sits on top of any [`RecordBackend`].
//!
//! ```
//! use kos_sdk::{KeyedData, KeyedObjectStore, TypeDescriptor, TypeRegistry};
//! use kos_sdk::{IndexSlot, InMemoryRecordBackend, PredicateBuilder};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Employee {
//!     name: String,
//!     title: String,
//! }
//!
//! impl KeyedData for Employee {
//!     const TYPE_NAME: &'static str = "app.Employee";
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register(
//!         TypeDescriptor::<Employee>::compact()
//!             .searchable("name", IndexSlot::Index1, |e| Some(e.name.as_str()))
//!             .searchable("title", IndexSlot::Index2, |e| Some(e.title.as_str())),
//!     )
//!     .unwrap();
//!
//! let store = KeyedObjectStore::new(InMemoryRecordBackend::new(), registry);
//! let chen = Employee { name: "Chen".into(), title: "SW-Dev".into() };
//! store.put("e1", &chen, &[] as &[&str]).unwrap();
//!
//! let predicate = PredicateBuilder::new()
//!     .and(IndexSlot::Index1, "Chen")
//!     .build()
//!     .unwrap();
//! let found: Vec<Employee> = store.find(&predicate).unwrap();
//! assert_eq!(found, vec![chen]);
//! ```

pub mod codec;
pub mod config;
pub mod data;
pub mod error;
pub mod indexes;
pub mod registry;
pub mod store;

pub use codec::PayloadCodec;
pub use config::StoreConfig;
pub use data::KeyedData;
pub use error::{SdkError, SdkResult};
pub use registry::{FieldAccessor, SearchableField, TypeDescriptor, TypeRegistry};
pub use store::KeyedObjectStore;

// Re-export key types
pub use kos_query::{Connective, Predicate, PredicateBuilder};
pub use kos_store::{BackendConfig, InMemoryRecordBackend, RecordBackend, StorageClass};
pub use kos_types::{stable_hash, Identifier, IndexSlot, IndexValues};
