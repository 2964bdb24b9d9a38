//! Fingerprint arithmetic: the combination rule and the label hash.
//!
//! Both primitives are deterministic across runs and across independently
//! compiled builds, so a writer and a reader process always agree on the
//! fingerprint of a compatible type.

use xxhash_rust::const_xxh3::xxh3_64;

/// A format version summarizing a type's on-disk shape and declared
/// semantics.
///
/// The value has no meaning beyond equality comparison; it is not a
/// cryptographic digest. It is persisted as a little-endian `u64` (see
/// [`crate::header`]).
pub type FormatVersion = u64;

/// Odd multiplier for the combination rule.
const COMBINE_COEF: FormatVersion = 0x9E37_79B9_7F4A_7C15;

/// Fold two fingerprints into one, order-sensitively.
///
/// `combine(a, b)` is `a * K + b` (wrapping) for a fixed odd `K`, so
/// swapping operands changes the result. Reordering two fields of a record
/// therefore changes the record's fingerprint.
pub const fn combine(lhs: FormatVersion, rhs: FormatVersion) -> FormatVersion {
    lhs.wrapping_mul(COMBINE_COEF).wrapping_add(rhs)
}

/// Three-operand extension: `combine(a, combine(b, c))`.
pub const fn combine3(a: FormatVersion, b: FormatVersion, c: FormatVersion) -> FormatVersion {
    combine(a, combine(b, c))
}

/// Hash a label (a stable type name or a salt string) into fingerprint
/// space.
pub const fn hash_label(label: &str) -> FormatVersion {
    xxh3_64(label.as_bytes())
}
