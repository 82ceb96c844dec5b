use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::stable_hash;

/// Number of index slots a record carries.
pub const MAX_INDEXES: usize = 6;

/// One of the six named index columns of a stored record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexSlot {
    Index1,
    Index2,
    Index3,
    Index4,
    Index5,
    Index6,
}

impl IndexSlot {
    /// All slots in ordinal order.
    pub const ALL: [IndexSlot; MAX_INDEXES] = [
        Self::Index1,
        Self::Index2,
        Self::Index3,
        Self::Index4,
        Self::Index5,
        Self::Index6,
    ];

    /// Zero-based position of the slot.
    pub const fn position(self) -> usize {
        self as usize
    }

    /// Slot at a zero-based position.
    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position).copied()
    }

    /// Column name, e.g. `index1`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Index1 => "index1",
            Self::Index2 => "index2",
            Self::Index3 => "index3",
            Self::Index4 => "index4",
            Self::Index5 => "index5",
            Self::Index6 => "index6",
        }
    }
}

impl fmt::Display for IndexSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndexSlot {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.name() == s)
            .ok_or_else(|| TypeError::UnknownSlot(s.to_string()))
    }
}

/// The six optional index hashes attached to a record.
///
/// Slot `n` holds `stable_hash` of the n-th index value. Slots are filled
/// from `index1` upward; an unused slot is `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexValues([Option<i32>; MAX_INDEXES]);

impl IndexValues {
    /// No slot populated.
    pub const fn empty() -> Self {
        Self([None; MAX_INDEXES])
    }

    /// Hash `values` into slots `index1..` in order.
    ///
    /// Fails with [`TypeError::IndexOverflow`] if more than six values are
    /// given; nothing is filled in that case.
    pub fn fill<S: AsRef<str>>(values: &[S]) -> Result<Self, TypeError> {
        if values.len() > MAX_INDEXES {
            return Err(TypeError::IndexOverflow {
                actual: values.len(),
            });
        }
        let mut slots = [None; MAX_INDEXES];
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = Some(stable_hash(value.as_ref()));
        }
        Ok(Self(slots))
    }

    /// Hash stored in `slot`.
    pub fn get(&self, slot: IndexSlot) -> Option<i32> {
        self.0[slot.position()]
    }

    /// Replace the hash stored in `slot`.
    pub fn set(&mut self, slot: IndexSlot, hash: Option<i32>) {
        self.0[slot.position()] = hash;
    }

    /// Number of populated slots.
    pub fn populated(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if no slot is populated.
    pub fn is_empty(&self) -> bool {
        self.populated() == 0
    }

    /// Iterate `(slot, hash)` pairs for every slot.
    pub fn iter(&self) -> impl Iterator<Item = (IndexSlot, Option<i32>)> + '_ {
        IndexSlot::ALL.into_iter().zip(self.0.iter().copied())
    }
}
