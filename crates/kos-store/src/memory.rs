use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use kos_query::ConditionExpr;
use kos_types::Identifier;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{StoreError, StoreResult};
use crate::record::{StorageClass, StoredRecord};
use crate::traits::RecordBackend;

type Table = BTreeMap<Identifier, StoredRecord>;

#[derive(Default)]
struct Tables {
    compact: Table,
    blob: Table,
}

impl Tables {
    fn get(&self, class: StorageClass) -> &Table {
        match class {
            StorageClass::Compact => &self.compact,
            StorageClass::Blob => &self.blob,
        }
    }

    fn get_mut(&mut self, class: StorageClass) -> &mut Table {
        match class {
            StorageClass::Compact => &mut self.compact,
            StorageClass::Blob => &mut self.blob,
        }
    }
}

/// In-memory record backend with one ordered table per storage class.
///
/// Intended for tests and embedding. Tables sit behind a single `RwLock`, so
/// each operation is atomic with respect to the others. Records are cloned
/// on read and write.
pub struct InMemoryRecordBackend {
    config: BackendConfig,
    tables: RwLock<Tables>,
}

impl InMemoryRecordBackend {
    /// Create a new empty backend with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BackendConfig::default())
    }

    /// Create a new empty backend.
    pub fn with_config(config: BackendConfig) -> Self {
        Self {
            config,
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Number of records across both tables.
    pub fn len(&self) -> usize {
        self.read()
            .map(|tables| tables.compact.len() + tables.blob.len())
            .unwrap_or(0)
    }

    /// Number of records in one table.
    pub fn len_of(&self, class: StorageClass) -> usize {
        self.read()
            .map(|tables| tables.get(class).len())
            .unwrap_or(0)
    }

    /// Returns `true` if both tables are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn check_writable(&self, record: &StoredRecord) -> StoreResult<()> {
        if record.id.is_unset() {
            return Err(StoreError::UnsetIdentifier);
        }
        let len = record.payload.encoded_len();
        if record.class() == StorageClass::Compact && len > self.config.compact_limit {
            warn!(
                id = %record.id,
                len,
                limit = self.config.compact_limit,
                "compact payload over limit; rejecting write"
            );
            return Err(StoreError::CompactOverflow {
                id: record.id,
                len,
                limit: self.config.compact_limit,
            });
        }
        Ok(())
    }
}

impl Default for InMemoryRecordBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBackend for InMemoryRecordBackend {
    fn create_record(&self, record: StoredRecord) -> StoreResult<StoredRecord> {
        self.check_writable(&record)?;
        let mut tables = self.write()?;
        let table = tables.get_mut(record.class());
        if table.contains_key(&record.id) {
            return Err(StoreError::AlreadyExists(record.id));
        }
        debug!(id = %record.id, class = %record.class(), "record created");
        table.insert(record.id, record.clone());
        Ok(record)
    }

    fn get_record(
        &self,
        class: StorageClass,
        id: &Identifier,
    ) -> StoreResult<Option<StoredRecord>> {
        if id.is_unset() {
            return Err(StoreError::UnsetIdentifier);
        }
        Ok(self.read()?.get(class).get(id).cloned())
    }

    fn merge_record(&self, mut record: StoredRecord) -> StoreResult<StoredRecord> {
        self.check_writable(&record)?;
        let mut tables = self.write()?;
        let current = tables
            .get_mut(record.class())
            .get_mut(&record.id)
            .ok_or(StoreError::NotFound(record.id))?;
        if current.version != record.version {
            return Err(StoreError::VersionConflict {
                id: record.id,
                expected: record.version,
                actual: current.version,
            });
        }
        record.version += 1;
        debug!(id = %record.id, version = record.version, "record merged");
        *current = record.clone();
        Ok(record)
    }

    fn delete_record(&self, class: StorageClass, id: &Identifier) -> StoreResult<bool> {
        if id.is_unset() {
            return Err(StoreError::UnsetIdentifier);
        }
        let removed = self.write()?.get_mut(class).remove(id).is_some();
        if removed {
            debug!(id = %id, %class, "record removed");
        }
        Ok(removed)
    }

    fn search_by_condition(
        &self,
        class: StorageClass,
        namespace: i32,
        condition: Option<&str>,
        first_result: Option<usize>,
        max_results: Option<usize>,
    ) -> StoreResult<Vec<StoredRecord>> {
        let expr = condition.map(ConditionExpr::parse).transpose()?;
        let first = Identifier::from_parts(namespace, i32::MIN);
        let last = Identifier::from_parts(namespace, i32::MAX);
        let range = first..=last;

        let tables = self.read()?;
        let records = tables
            .get(class)
            .range(range)
            .map(|(_, record)| record)
            .filter(|record| expr.as_ref().map_or(true, |e| e.matches(&record.indexes)))
            .skip(first_result.unwrap_or(0))
            .take(max_results.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(records)
    }
}

impl std::fmt::Debug for InMemoryRecordBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordBackend")
            .field("compact_count", &self.len_of(StorageClass::Compact))
            .field("blob_count", &self.len_of(StorageClass::Blob))
            .field("compact_limit", &self.config.compact_limit)
            .finish()
    }
}
