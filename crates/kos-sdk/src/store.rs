use kos_query::Predicate;
use kos_store::{InMemoryRecordBackend, RecordBackend, StorageClass, StoreError, StoredRecord};
use kos_types::{stable_hash, Identifier, IndexValues};
use tracing::{debug, warn};

use crate::codec::PayloadCodec;
use crate::config::StoreConfig;
use crate::data::KeyedData;
use crate::error::{SdkError, SdkResult};
use crate::indexes;
use crate::registry::TypeRegistry;

/// Typed facade over a [`RecordBackend`].
///
/// Each payload type is addressed by `(TYPE_NAME, key)`, stored in the
/// storage class it was registered with, and searchable through up to six
/// index slots. The store holds no mutable state of its own; it is
/// `Send + Sync` whenever the backend is.
pub struct KeyedObjectStore<B: RecordBackend> {
    backend: B,
    registry: TypeRegistry,
    config: StoreConfig,
}

impl KeyedObjectStore<InMemoryRecordBackend> {
    /// Store backed by an [`InMemoryRecordBackend`] built from `config`.
    pub fn in_memory(registry: TypeRegistry, config: StoreConfig) -> Self {
        let backend = InMemoryRecordBackend::with_config(config.backend.clone());
        Self::with_config(backend, registry, config)
    }
}

impl<B: RecordBackend> KeyedObjectStore<B> {
    pub fn new(backend: B, registry: TypeRegistry) -> Self {
        Self::with_config(backend, registry, StoreConfig::default())
    }

    pub fn with_config(backend: B, registry: TypeRegistry, config: StoreConfig) -> Self {
        Self {
            backend,
            registry,
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ---- Writes ----

    /// Store a new payload under `key`.
    ///
    /// `indexes` are hashed into `index1..` in order. When empty, the
    /// type's searchable fields are read from the payload instead. Fails if
    /// a record already exists for the key.
    pub fn put<T, S>(&self, key: &str, payload: &T, indexes: &[S]) -> SdkResult<bool>
    where
        T: KeyedData,
        S: AsRef<str>,
    {
        let prepared = self.prepare(key, payload, indexes)?;
        let record =
            StoredRecord::new(prepared.class, prepared.id, &prepared.bytes, prepared.indexes);
        let stored = self.backend.create_record(record)?;
        debug!(type_name = T::TYPE_NAME, id = %stored.id, class = %prepared.class, "stored");
        Ok(!stored.id.is_unset())
    }

    /// Replace the payload and indexes stored under `key`.
    ///
    /// Fails with `NotFound` if nothing is stored there. A concurrent update
    /// that wins the race surfaces as a version conflict from the backend.
    pub fn update<T, S>(&self, key: &str, payload: &T, indexes: &[S]) -> SdkResult<bool>
    where
        T: KeyedData,
        S: AsRef<str>,
    {
        let prepared = self.prepare(key, payload, indexes)?;
        let updated = self
            .backend
            .update_record(prepared.class, &prepared.id, &prepared.bytes, prepared.indexes)
            .map_err(|e| match e {
                StoreError::NotFound(id) => SdkError::NotFound(id),
                other => SdkError::Store(other),
            })?;
        debug!(type_name = T::TYPE_NAME, id = %updated.id, version = updated.version, "updated");
        Ok(!updated.id.is_unset())
    }

    /// Delete the payload stored under `key`. Deleting an absent key is a
    /// no-op; the return value tells whether something was removed.
    pub fn delete<T: KeyedData>(&self, key: &str) -> SdkResult<bool> {
        let id = Identifier::derive(T::TYPE_NAME, key)?;
        let class = self.registry.classify(T::TYPE_NAME)?;
        let removed = self.backend.delete_record(class, &id)?;
        if removed {
            debug!(type_name = T::TYPE_NAME, %id, "deleted");
        }
        Ok(removed)
    }

    // ---- Reads ----

    /// Payload stored under `key`, or `None`.
    pub fn get<T: KeyedData>(&self, key: &str) -> SdkResult<Option<T>> {
        let id = Identifier::derive(T::TYPE_NAME, key)?;
        let class = self.registry.classify(T::TYPE_NAME)?;
        let bytes = self.backend.get_raw_value(class, &id).map_err(|e| match e {
            StoreError::CorruptRecord { reason, .. } => SdkError::Deserialization(reason),
            other => SdkError::Store(other),
        })?;
        bytes.map(|bytes| PayloadCodec::decode(&bytes)).transpose()
    }

    /// Payloads of type `T` matching `predicate`, in key-hash order.
    ///
    /// A predicate with only pagination bounds selects every payload of the
    /// type. Records that fail to decode are skipped.
    pub fn find<T: KeyedData>(&self, predicate: &Predicate) -> SdkResult<Vec<T>> {
        if predicate.is_empty() {
            return Err(SdkError::InvalidPredicate(
                "Predicate is empty. No condition defined.".into(),
            ));
        }
        let class = self.registry.classify(T::TYPE_NAME)?;
        let condition = if predicate.has_conditions() {
            Some(predicate.to_query()?)
        } else {
            None
        };
        let max_results = predicate.max_results().or(self.config.default_max_results);
        debug!(
            type_name = T::TYPE_NAME,
            condition = condition.as_deref().unwrap_or(""),
            "searching"
        );
        let records = self.backend.search_by_condition(
            class,
            stable_hash(T::TYPE_NAME),
            condition.as_deref(),
            predicate.first_result(),
            max_results,
        )?;
        Ok(decode_all(records))
    }

    /// Up to `max` payloads of type `T` starting at position `start`, in
    /// key-hash order. Records that fail to decode are skipped.
    pub fn find_range<T: KeyedData>(&self, start: usize, max: usize) -> SdkResult<Vec<T>> {
        let class = self.registry.classify(T::TYPE_NAME)?;
        let records = self
            .backend
            .search_by_offset(class, stable_hash(T::TYPE_NAME), start, max)?;
        Ok(decode_all(records))
    }

    // ---- Internals ----

    fn prepare<T, S>(&self, key: &str, payload: &T, explicit: &[S]) -> SdkResult<Prepared>
    where
        T: KeyedData,
        S: AsRef<str>,
    {
        let id = Identifier::derive(T::TYPE_NAME, key)?;

        if PayloadCodec::is_null(payload) {
            return Err(SdkError::InvalidPayload(format!(
                "{} payload for key {key} is null",
                T::TYPE_NAME
            )));
        }

        let descriptor = self
            .registry
            .descriptor::<T>()
            .map_err(|_| SdkError::InvalidPayloadType(T::TYPE_NAME.into()))?;
        let indexes = indexes::resolve(explicit, descriptor, payload)?;
        let bytes = PayloadCodec::encode(payload)?;

        Ok(Prepared {
            id,
            class: descriptor.class(),
            indexes,
            bytes,
        })
    }
}

impl<B: RecordBackend + std::fmt::Debug> std::fmt::Debug for KeyedObjectStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedObjectStore")
            .field("backend", &self.backend)
            .field("registered_types", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}

/// A validated write, ready for the backend.
struct Prepared {
    id: Identifier,
    class: StorageClass,
    indexes: IndexValues,
    bytes: Vec<u8>,
}

fn decode_all<T: KeyedData>(records: Vec<StoredRecord>) -> Vec<T> {
    let total = records.len();
    let decoded: Vec<T> = records
        .into_iter()
        .filter_map(|record| {
            let result = record
                .value()
                .map_err(SdkError::from)
                .and_then(|bytes| PayloadCodec::decode(&bytes));
            match result {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(id = %record.id, error = %e, "undecodable record; skipping");
                    None
                }
            }
        })
        .collect();
    if decoded.len() < total {
        warn!(
            type_name = T::TYPE_NAME,
            skipped = total - decoded.len(),
            returned = decoded.len(),
            "partial search result"
        );
    }
    decoded
}
