//! Registration of storable types.
//!
//! A type becomes storable by registering a [`TypeDescriptor`] that fixes its
//! storage class and lists the fields whose string values populate index
//! slots. Classification is purely nominal: the declared class is used no
//! matter how large a serialized payload turns out to be.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use kos_store::StorageClass;
use kos_types::IndexSlot;

use crate::data::KeyedData;
use crate::error::{SdkError, SdkResult};

/// Reads the string value of one field. `None` means the field has no value.
pub type FieldAccessor<T> = fn(&T) -> Option<&str>;

/// A payload field whose string value fills an index slot.
pub struct SearchableField<T> {
    /// Field name, reported in index errors.
    pub field: &'static str,
    pub slot: IndexSlot,
    pub accessor: FieldAccessor<T>,
}

impl<T> SearchableField<T> {
    /// Value of the field in `payload`.
    pub fn read<'a>(&self, payload: &'a T) -> Option<&'a str> {
        (self.accessor)(payload)
    }
}

impl<T> Clone for SearchableField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SearchableField<T> {}

impl<T> fmt::Debug for SearchableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchableField")
            .field("field", &self.field)
            .field("slot", &self.slot)
            .finish()
    }
}

/// Static description of a storable type.
///
/// Searchable fields are declared with an accessor, so only string fields
/// can fill a slot:
///
/// ```compile_fail
/// use kos_sdk::{IndexSlot, KeyedData, TypeDescriptor};
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Employee {
///     age: u32,
/// }
///
/// impl KeyedData for Employee {
///     const TYPE_NAME: &'static str = "app.Employee";
/// }
///
/// let d = TypeDescriptor::<Employee>::compact()
///     .searchable("age", IndexSlot::Index1, |e| Some(&e.age));
/// ```
pub struct TypeDescriptor<T> {
    class: StorageClass,
    searchable: Vec<SearchableField<T>>,
}

impl<T: KeyedData> TypeDescriptor<T> {
    pub fn new(class: StorageClass) -> Self {
        Self {
            class,
            searchable: Vec::new(),
        }
    }

    /// Describe `T` as compact data.
    pub fn compact() -> Self {
        Self::new(StorageClass::Compact)
    }

    /// Describe `T` as blob data.
    pub fn blob() -> Self {
        Self::new(StorageClass::Blob)
    }

    /// Declare that the string read by `accessor` fills `slot`.
    ///
    /// Declarations are checked when a payload is stored, not here, so a
    /// conflicting declaration surfaces on the first `put`.
    pub fn searchable(
        mut self,
        field: &'static str,
        slot: IndexSlot,
        accessor: FieldAccessor<T>,
    ) -> Self {
        self.searchable.push(SearchableField {
            field,
            slot,
            accessor,
        });
        self
    }

    pub fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    pub fn class(&self) -> StorageClass {
        self.class
    }

    pub fn searchable_fields(&self) -> &[SearchableField<T>] {
        &self.searchable
    }
}

impl<T: KeyedData> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &T::TYPE_NAME)
            .field("class", &self.class)
            .field("searchable", &self.searchable)
            .finish()
    }
}

struct Registration {
    class: StorageClass,
    descriptor: Box<dyn Any + Send + Sync>,
}

/// Registry of storable types, keyed by type name.
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<&'static str, Registration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type.
    ///
    /// Registering the same type again with the same class replaces the
    /// descriptor. A different class is rejected: a type must stay in one
    /// storage class for its whole lifetime. So is a second Rust type
    /// claiming an existing type name.
    pub fn register<T: KeyedData>(
        &mut self,
        descriptor: TypeDescriptor<T>,
    ) -> SdkResult<&mut Self> {
        let type_name = T::TYPE_NAME;
        if type_name.is_empty() {
            return Err(SdkError::Classification(
                "cannot register a type with an empty name".into(),
            ));
        }
        if let Some(existing) = self.types.get(type_name) {
            if !existing.descriptor.is::<TypeDescriptor<T>>() {
                return Err(SdkError::Classification(format!(
                    "{type_name} is already registered by another type"
                )));
            }
            if existing.class != descriptor.class {
                return Err(SdkError::Classification(format!(
                    "{type_name} is already registered as {}, cannot register as {}",
                    existing.class, descriptor.class
                )));
            }
        }
        let registration = Registration {
            class: descriptor.class,
            descriptor: Box::new(descriptor),
        };
        self.types.insert(type_name, registration);
        Ok(self)
    }

    /// Storage class of a type name.
    pub fn classify(&self, type_name: &str) -> SdkResult<StorageClass> {
        self.registration(type_name).map(|r| r.class)
    }

    /// Descriptor of `T`.
    pub fn descriptor<T: KeyedData>(&self) -> SdkResult<&TypeDescriptor<T>> {
        self.registration(T::TYPE_NAME)?
            .descriptor
            .downcast_ref::<TypeDescriptor<T>>()
            .ok_or_else(|| {
                SdkError::Classification(format!(
                    "{} is registered by another type",
                    T::TYPE_NAME
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn registration(&self, type_name: &str) -> SdkResult<&Registration> {
        if type_name.is_empty() {
            return Err(SdkError::Classification(
                "an empty name is not a valid data type".into(),
            ));
        }
        self.types.get(type_name).ok_or_else(|| {
            SdkError::Classification(format!(
                "{type_name} must be registered as either compact or blob data"
            ))
        })
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.types.iter().map(|(name, r)| (name, r.class)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Note {
        text: String,
        other: String,
    }

    impl KeyedData for Note {
        const TYPE_NAME: &'static str = "test.Note";
    }

    #[derive(Serialize, Deserialize)]
    struct Archive(Vec<u8>);

    impl KeyedData for Archive {
        const TYPE_NAME: &'static str = "test.Archive";
    }

    #[derive(Serialize, Deserialize)]
    struct Impostor;

    impl KeyedData for Impostor {
        const TYPE_NAME: &'static str = "test.Note";
    }

    #[derive(Serialize, Deserialize)]
    struct Nameless;

    impl KeyedData for Nameless {
        const TYPE_NAME: &'static str = "";
    }

    #[test]
    fn classify_registered_types() {
        let mut registry = TypeRegistry::new();
        registry
            .register(TypeDescriptor::<Note>::compact())
            .unwrap()
            .register(TypeDescriptor::<Archive>::blob())
            .unwrap();

        assert_eq!(registry.classify("test.Note").unwrap(), StorageClass::Compact);
        assert_eq!(registry.classify("test.Archive").unwrap(), StorageClass::Blob);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unregistered_type_fails_classification() {
        let registry = TypeRegistry::new();
        let err = registry.classify("test.Unknown").unwrap_err();
        assert!(matches!(err, SdkError::Classification(_)));
        assert!(err.to_string().contains("test.Unknown"));
        assert!(matches!(
            registry.descriptor::<Note>(),
            Err(SdkError::Classification(_))
        ));
    }

    #[test]
    fn empty_name_fails_classification() {
        let mut registry = TypeRegistry::new();
        assert!(matches!(registry.classify(""), Err(SdkError::Classification(_))));
        assert!(registry.register(TypeDescriptor::<Nameless>::compact()).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn class_cannot_change() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::<Note>::compact()).unwrap();
        let err = registry.register(TypeDescriptor::<Note>::blob()).unwrap_err();
        assert!(matches!(err, SdkError::Classification(_)));
        assert_eq!(registry.classify(Note::TYPE_NAME).unwrap(), StorageClass::Compact);
    }

    #[test]
    fn type_name_cannot_be_shared() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::<Note>::compact()).unwrap();
        let err = registry.register(TypeDescriptor::<Impostor>::compact()).unwrap_err();
        assert!(err.to_string().contains("another type"));
        assert!(matches!(
            registry.descriptor::<Impostor>(),
            Err(SdkError::Classification(_))
        ));
        assert!(registry.descriptor::<Note>().is_ok());
    }

    #[test]
    fn searchable_fields_are_kept_in_declaration_order() {
        let descriptor = TypeDescriptor::<Note>::compact()
            .searchable("text", IndexSlot::Index2, |n| Some(n.text.as_str()))
            .searchable("other", IndexSlot::Index1, |n| Some(n.other.as_str()));
        let fields: Vec<_> = descriptor
            .searchable_fields()
            .iter()
            .map(|f| (f.field, f.slot))
            .collect();
        assert_eq!(fields, vec![("text", IndexSlot::Index2), ("other", IndexSlot::Index1)]);
    }

    #[test]
    fn accessor_reads_payload() {
        let descriptor = TypeDescriptor::<Note>::compact()
            .searchable("text", IndexSlot::Index1, |n| Some(n.text.as_str()));
        let note = Note {
            text: "hello".into(),
            other: "world".into(),
        };
        assert_eq!(descriptor.searchable_fields()[0].read(&note), Some("hello"));
    }

    #[test]
    fn registered_descriptor_is_returned() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDescriptor::<Note>::compact()
                    .searchable("text", IndexSlot::Index1, |n| Some(n.text.as_str())),
            )
            .unwrap();
        let descriptor = registry.descriptor::<Note>().unwrap();
        assert_eq!(descriptor.type_name(), "test.Note");
        assert_eq!(descriptor.searchable_fields().len(), 1);
    }

    #[test]
    fn debug_format() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::<Archive>::blob()).unwrap();
        assert_eq!(format!("{registry:?}"), "{\"test.Archive\": Blob}");
    }
}
