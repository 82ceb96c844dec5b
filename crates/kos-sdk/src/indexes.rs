//! Index resolution for a payload about to be stored.
//!
//! Explicit index values take total precedence: when any are given, the
//! type's searchable fields are not consulted at all. Otherwise each
//! declared field is read from the payload through its accessor.

use std::collections::BTreeMap;

use kos_types::{IndexSlot, IndexValues};

use crate::data::KeyedData;
use crate::error::{SdkError, SdkResult};
use crate::registry::TypeDescriptor;

/// Index hashes for a payload.
pub fn resolve<T, S>(
    explicit: &[S],
    descriptor: &TypeDescriptor<T>,
    payload: &T,
) -> SdkResult<IndexValues>
where
    T: KeyedData,
    S: AsRef<str>,
{
    if !explicit.is_empty() {
        return Ok(IndexValues::fill(explicit)?);
    }
    let values = extract(descriptor, payload)?;
    Ok(IndexValues::fill(&values)?)
}

/// Read the declared searchable fields of a payload, in slot order.
///
/// Fails on two fields claiming the same slot, and on a gap: with `n` slots
/// claimed, `index1..index{n}` must all have a value.
pub fn extract<'a, T: KeyedData>(
    descriptor: &TypeDescriptor<T>,
    payload: &'a T,
) -> SdkResult<Vec<&'a str>> {
    let mut claimed: BTreeMap<IndexSlot, Option<&'a str>> = BTreeMap::new();

    for searchable in descriptor.searchable_fields() {
        if claimed.contains_key(&searchable.slot) {
            return Err(SdkError::DuplicateIndex {
                slot: searchable.slot,
                field: searchable.field.into(),
            });
        }
        claimed.insert(searchable.slot, searchable.read(payload));
    }

    IndexSlot::ALL
        .iter()
        .take(claimed.len())
        .map(|slot| {
            claimed
                .get(slot)
                .copied()
                .flatten()
                .ok_or(SdkError::MissingIndex { slot: *slot })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kos_types::stable_hash;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Employee {
        name: String,
        title: String,
        nickname: Option<String>,
    }

    impl KeyedData for Employee {
        const TYPE_NAME: &'static str = "test.Employee";
    }

    fn employee() -> Employee {
        Employee {
            name: "Chen".into(),
            title: "SW-Dev".into(),
            nickname: None,
        }
    }

    fn by_name(d: TypeDescriptor<Employee>, slot: IndexSlot) -> TypeDescriptor<Employee> {
        d.searchable("name", slot, |e| Some(e.name.as_str()))
    }

    fn by_title(d: TypeDescriptor<Employee>, slot: IndexSlot) -> TypeDescriptor<Employee> {
        d.searchable("title", slot, |e| Some(e.title.as_str()))
    }

    #[test]
    fn extracts_in_slot_order() {
        let d = by_name(by_title(TypeDescriptor::compact(), IndexSlot::Index2), IndexSlot::Index1);
        assert_eq!(extract(&d, &employee()).unwrap(), vec!["Chen", "SW-Dev"]);
    }

    #[test]
    fn no_declarations_no_values() {
        let d = TypeDescriptor::<Employee>::compact();
        assert!(extract(&d, &employee()).unwrap().is_empty());
        assert!(resolve::<_, &str>(&[], &d, &employee()).unwrap().is_empty());
    }

    #[test]
    fn duplicate_slot_names_second_field() {
        let d = by_title(by_name(TypeDescriptor::compact(), IndexSlot::Index1), IndexSlot::Index1);
        let err = extract(&d, &employee()).unwrap_err();
        match err {
            SdkError::DuplicateIndex { slot, ref field } => {
                assert_eq!(slot, IndexSlot::Index1);
                assert_eq!(field, "title");
            }
            ref other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "duplicated declaration of index index1 on field title");
    }

    #[test]
    fn duplicate_detected_even_without_values() {
        let d = TypeDescriptor::<Employee>::compact()
            .searchable("nickname", IndexSlot::Index1, |e| e.nickname.as_deref())
            .searchable("alias", IndexSlot::Index1, |e| e.nickname.as_deref());
        assert!(matches!(
            extract(&d, &employee()),
            Err(SdkError::DuplicateIndex { .. })
        ));
    }

    #[test]
    fn gap_is_missing_index() {
        let d = by_title(TypeDescriptor::compact(), IndexSlot::Index2);
        let err = extract(&d, &employee()).unwrap_err();
        assert!(matches!(err, SdkError::MissingIndex { slot: IndexSlot::Index1 }));
        assert_eq!(err.to_string(), "index index1 declaration is missing");
    }

    #[test]
    fn absent_value_counts_as_missing() {
        let d = TypeDescriptor::<Employee>::compact()
            .searchable("nickname", IndexSlot::Index1, |e| e.nickname.as_deref());
        let err = extract(&d, &employee()).unwrap_err();
        assert!(matches!(err, SdkError::MissingIndex { slot: IndexSlot::Index1 }));

        let mut named = employee();
        named.nickname = Some("CC".into());
        assert_eq!(extract(&d, &named).unwrap(), vec!["CC"]);
    }

    #[test]
    fn explicit_values_override_declarations() {
        // The declaration would fail with a gap; explicit values skip it.
        let d = by_title(TypeDescriptor::compact(), IndexSlot::Index2);
        let indexes = resolve(&["x"], &d, &employee()).unwrap();
        assert_eq!(indexes.get(IndexSlot::Index1), Some(stable_hash("x")));
        assert_eq!(indexes.populated(), 1);
    }

    #[test]
    fn declarations_used_without_explicit_values() {
        let d = by_title(by_name(TypeDescriptor::compact(), IndexSlot::Index1), IndexSlot::Index2);
        let indexes = resolve::<_, &str>(&[], &d, &employee()).unwrap();
        assert_eq!(indexes, IndexValues::fill(&["Chen", "SW-Dev"]).unwrap());
    }

    #[test]
    fn explicit_overflow() {
        let d = TypeDescriptor::<Employee>::compact();
        let err = resolve(&["1", "2", "3", "4", "5", "6", "7"], &d, &employee()).unwrap_err();
        assert!(matches!(err, SdkError::IndexOverflow { actual: 7 }));
    }
}
