//! # Imprint - Schema Fingerprinting for Memory-Mapped Storage
//!
//! `imprint` computes a stable integer fingerprint (a *format version*) for
//! record types persisted in memory-mapped binary formats. The fingerprint
//! is written alongside serialized data and checked on load, catching
//! format mismatches before any field is accessed by raw offset - the only
//! safety net available once data is read without a parser.
//!
//! - **Generic**: works over arbitrary user-defined record types; the
//!   common case needs one `versioned_record!` line, no hand-written
//!   hashing
//! - **Recursive**: nested and self-referential type graphs resolve to a
//!   finite fingerprint in bounded time
//! - **Sensitive**: reordering fields, resizing a leaf, or adding a field
//!   changes the fingerprint; renaming a field does not
//! - **Deterministic**: independently compiled writer and reader builds
//!   agree on the fingerprint of a compatible type
//!
//! ## Quick Start
//!
//! ```rust
//! use imprint::{check_format_version, format_version, versioned_record, Result};
//!
//! # fn main() -> Result<()> {
//! #[repr(C)]
//! struct Point {
//!     x: u32,
//!     y: u32,
//! }
//!
//! versioned_record!(Point, "Point", fields(u32, u32));
//!
//! // On write: embed the fingerprint next to the mapped data.
//! let fingerprint = format_version::<Point>();
//!
//! // On load: verify before touching any field by offset.
//! check_format_version::<Point>(fingerprint)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom versioning
//!
//! A type may opt out of structural fingerprinting by declaring one of
//! three hooks through its [`Versioned::Case`]: a fixed value
//! ([`StaticVersion`]), a value computed with the resolution context
//! ([`VersionWithContext`], typically via [`Versions::dependent`] for
//! container-like types), or field enumeration ([`EnumerateFields`]).
//! Hook values always augment a structural baseline, so unrelated types
//! declaring the same custom value still fingerprint differently.

pub mod error;
pub mod hash;
pub mod header;
pub mod hooks;
pub mod repr;
pub mod version;

pub use error::{ImprintError, Result};
pub use hash::{combine, combine3, hash_label, FormatVersion};
pub use header::{VersionFrame, FRAME_LEN, MAGIC};
pub use hooks::{
    structural_version, ContextHook, EnumerateFields, FieldVisitor, Neutral, Opaque, PerField,
    StaticHook, StaticVersion, VersionCase, VersionWithContext, Versioned, NEUTRAL,
};
pub use repr::{FixedLayout, Mapped, Repr, Standalone, Storable};
pub use version::{
    check_format_version, check_format_version_for, format_version, Versions, RECURSIVE,
};
