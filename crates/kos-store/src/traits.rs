use kos_types::{Identifier, IndexValues};

use crate::error::{StoreError, StoreResult};
use crate::record::{StorageClass, StoredRecord};

/// Persistence backend for keyed records.
///
/// All implementations must satisfy these invariants:
/// - Records are addressed by `(class, identifier)`; the two classes are
///   separate tables.
/// - The unset identifier is rejected on every write.
/// - `create_record` never overwrites; `merge_record` never creates.
/// - The version token is owned by the backend and bumped on each merge.
///   A merge with a stale version fails with `VersionConflict`.
/// - Searches return records of one namespace ordered by key hash.
pub trait RecordBackend: Send + Sync {
    /// Persist a new record and return it as stored.
    ///
    /// Fails with `AlreadyExists` if the identifier is taken.
    fn create_record(&self, record: StoredRecord) -> StoreResult<StoredRecord>;

    /// Read a record. Returns `Ok(None)` if it does not exist.
    fn get_record(&self, class: StorageClass, id: &Identifier) -> StoreResult<Option<StoredRecord>>;

    /// Write back a modified record, checking and bumping its version.
    ///
    /// Fails with `NotFound` if the record does not exist.
    fn merge_record(&self, record: StoredRecord) -> StoreResult<StoredRecord>;

    /// Delete a record. Returns `true` if it existed.
    fn delete_record(&self, class: StorageClass, id: &Identifier) -> StoreResult<bool>;

    /// Records of `namespace` matching a rendered condition fragment.
    ///
    /// `condition = None` selects every record of the namespace. `first_result`
    /// and `max_results` apply after filtering; `None` means no offset or no
    /// limit.
    fn search_by_condition(
        &self,
        class: StorageClass,
        namespace: i32,
        condition: Option<&str>,
        first_result: Option<usize>,
        max_results: Option<usize>,
    ) -> StoreResult<Vec<StoredRecord>>;

    /// Replace payload and indexes of an existing record.
    ///
    /// Default implementation reads the record and merges it back. Backends
    /// with a native update statement may override.
    fn update_record(
        &self,
        class: StorageClass,
        id: &Identifier,
        value: &[u8],
        indexes: IndexValues,
    ) -> StoreResult<StoredRecord> {
        let mut record = self
            .get_record(class, id)?
            .ok_or(StoreError::NotFound(*id))?;
        record.replace(value, indexes);
        self.merge_record(record)
    }

    /// Only the payload bytes of a record. Returns `Ok(None)` if absent.
    fn get_raw_value(&self, class: StorageClass, id: &Identifier) -> StoreResult<Option<Vec<u8>>> {
        self.get_record(class, id)?
            .map(|record| record.value())
            .transpose()
    }

    /// Up to `max` records of `namespace` starting at `position`.
    fn search_by_offset(
        &self,
        class: StorageClass,
        namespace: i32,
        position: usize,
        max: usize,
    ) -> StoreResult<Vec<StoredRecord>> {
        self.search_by_condition(class, namespace, None, Some(position), Some(max))
    }
}
