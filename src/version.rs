//! Recursive format-version resolution with cycle detection.
//!
//! A [`Versions`] context lives for one top-level [`format_version`] call.
//! It tracks which types are currently being resolved on the call stack;
//! a nested reference back to one of them short-circuits to the
//! [`RECURSIVE`] sentinel instead of recursing forever, so self-referential
//! and mutually-referential record types fingerprint in bounded time.
//!
//! The context is never shared: concurrent top-level calls each build their
//! own, so there is no shared mutable state by construction.

use std::any::TypeId;

use ahash::AHashSet;
use tracing::{debug, trace};

use crate::error::{ImprintError, Result};
use crate::hash::{combine, combine3, hash_label, FormatVersion};
use crate::hooks::{VersionCase, Versioned};
use crate::repr::Storable;

/// Fingerprint contributed by a cyclic back-reference to a type whose
/// resolution is already in progress.
pub const RECURSIVE: FormatVersion = hash_label("recursive");

/// Per-call resolution context.
///
/// Invariant: a `TypeId` is a member of the in-progress set exactly while
/// its resolution is on the current call stack.
#[derive(Default)]
pub struct Versions {
    in_progress: AHashSet<TypeId>,
}

impl Versions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the format version of `T` within this context.
    ///
    /// Identity is keyed on the mapped representation, so a graph entered
    /// through a standalone alias detects the same cycles as one entered
    /// through the mapped form.
    pub fn resolve<T: Storable>(&mut self) -> FormatVersion {
        let identity = TypeId::of::<T::Mapped>();
        match InProgress::enter(self, identity) {
            Some(mut slot) => {
                trace!(
                    "resolving format version for {}",
                    <T::Mapped as Versioned>::NAME
                );
                <<T::Mapped as Versioned>::Case as VersionCase<T::Mapped>>::version(
                    slot.versions(),
                )
            }
            None => {
                trace!(
                    "recursive reference to {}, folding sentinel",
                    <T::Mapped as Versioned>::NAME
                );
                RECURSIVE
            }
        }
    }

    /// Version derived from an auxiliary type plus a distinguishing label.
    ///
    /// Container-like types use this from a [`VersionWithContext`] hook to
    /// depend on an element type's version without enumerating fields.
    ///
    /// [`VersionWithContext`]: crate::hooks::VersionWithContext
    pub fn dependent<T: Storable>(&mut self, salt: &str) -> FormatVersion {
        combine(self.resolve::<T>(), hash_label(salt))
    }

    /// Two-type form of [`dependent`](Self::dependent).
    pub fn dependent_pair<T1: Storable, T2: Storable>(&mut self, salt: &str) -> FormatVersion {
        combine3(self.resolve::<T1>(), self.resolve::<T2>(), hash_label(salt))
    }
}

/// Scoped membership in the in-progress set.
///
/// Dropping releases the slot on every exit path, including unwinding, so
/// a failed resolution never leaves the context poisoned for a later
/// independent resolution of the same type.
struct InProgress<'a> {
    versions: &'a mut Versions,
    identity: TypeId,
}

impl<'a> InProgress<'a> {
    /// Enter `identity`, or `None` if it is already being resolved.
    fn enter(versions: &'a mut Versions, identity: TypeId) -> Option<Self> {
        versions
            .in_progress
            .insert(identity)
            .then(move || InProgress { versions, identity })
    }

    fn versions(&mut self) -> &mut Versions {
        self.versions
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.versions.in_progress.remove(&self.identity);
    }
}

/// Compute the format version of `T` with a fresh context.
///
/// Writers embed the result next to serialized data; readers verify it
/// with [`check_format_version`] before touching any field by offset.
pub fn format_version<T: Storable>() -> FormatVersion {
    Versions::new().resolve::<T>()
}

/// Check a stored fingerprint against the freshly computed one for `T`.
pub fn check_format_version<T: Storable>(stored: FormatVersion) -> Result<()> {
    let expected = format_version::<T>();
    if expected == stored {
        debug!(
            "format version {:#018x} verified for {}",
            stored,
            <T::Mapped as Versioned>::NAME
        );
        Ok(())
    } else {
        Err(ImprintError::VersionMismatch {
            type_name: <T::Mapped as Versioned>::NAME,
            expected,
            encountered: stored,
        })
    }
}

/// Same check, with the type inferred from the value being loaded.
pub fn check_format_version_for<T: Storable>(_value: &T, stored: FormatVersion) -> Result<()> {
    check_format_version::<T>(stored)
}
