use serde::de::DeserializeOwned;
use serde::Serialize;

/// An application type that can be stored in a
/// [`KeyedObjectStore`](crate::KeyedObjectStore).
///
/// `TYPE_NAME` is hashed into the namespace of every identifier of this
/// type, so it must be stable across releases and unique across the types
/// sharing a backend. Renaming it orphans the stored records.
///
/// The storage class and searchable fields are not part of the trait; they
/// are declared once in a [`TypeDescriptor`](crate::TypeDescriptor) and
/// registered with the store.
pub trait KeyedData: Serialize + DeserializeOwned + 'static {
    const TYPE_NAME: &'static str;
}
