//! The stable string hash shared by identifiers and index values.
//!
//! The hash is the classic polynomial `h = 31 * h + unit`, seeded at zero and
//! folded over the UTF-16 code units of the string with wrapping signed 32-bit
//! arithmetic. It is bit-compatible with the JVM `String.hashCode`, so records
//! written by other implementations of the store resolve to the same keys.

const MULTIPLIER: i32 = 31;

/// Hash a string into a stable 32-bit value.
///
/// The empty string hashes to `0`. The result never depends on the process,
/// platform, or build, unlike `std::hash::Hash`.
pub fn stable_hash(value: &str) -> i32 {
    value.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_mul(MULTIPLIER).wrapping_add(i32::from(unit))
    })
}
