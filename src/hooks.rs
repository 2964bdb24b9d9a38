//! Versioning capabilities and their dispatch.
//!
//! Every mapped type declares, through [`Versioned::Case`], exactly one of
//! five capability cases. The choice is a sealed marker type resolved at
//! compile time, so classification happens once per type and costs nothing
//! at run time. A type supplying more than one hook states which of them
//! governs its fingerprint by the case it picks; the conventional
//! precedence is context hook, then static hook, then field enumeration.
//!
//! The three hook cases *augment* a structural baseline rather than replace
//! it: two unrelated types declaring the same custom value still
//! fingerprint differently, because the baseline folds in the type's stable
//! name and mapped byte size.

use std::mem::size_of;

use crate::hash::{combine, hash_label, FormatVersion};
use crate::repr::{FixedLayout, Storable};
use crate::version::Versions;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ContextHook {}
    impl Sealed for super::StaticHook {}
    impl Sealed for super::PerField {}
    impl Sealed for super::Opaque {}
    impl Sealed for super::Neutral {}
}

/// A mapped type that participates in format versioning.
///
/// `NAME` is the type's stable textual identity. It is an input to the
/// fingerprint, so it must not change while data persisted under it exists;
/// compiler-derived names (`std::any::type_name`) are explicitly not used
/// because they are not guaranteed stable across toolchains.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no format-versioning capability",
    note = "give the type a `Versioned` impl choosing one of `ContextHook`, \
            `StaticHook`, `PerField`, `Opaque`, or `Neutral`"
)]
pub trait Versioned: Storable<Mapped = Self> + Sized + 'static {
    /// Stable textual identity of the type.
    const NAME: &'static str;

    /// The versioning capability this type supplies.
    type Case: VersionCase<Self>;
}

/// Hook: the type computes its own version with access to the resolution
/// context, typically to fold in element-type versions via
/// [`Versions::dependent`].
pub trait VersionWithContext: Versioned {
    fn format_version(versions: &mut Versions) -> FormatVersion;
}

/// Hook: the type supplies a fixed version value.
pub trait StaticVersion: Versioned {
    fn format_version() -> FormatVersion;
}

/// Hook: the type exposes its field types, in declaration order, to a
/// generic visitor. Field names are not part of the enumeration, so
/// renaming a field does not disturb the fingerprint; reordering or
/// retyping one does.
pub trait EnumerateFields {
    fn enumerate_fields<V: FieldVisitor>(fields: &mut V);
}

/// Visitor handed to [`EnumerateFields::enumerate_fields`]. Called once per
/// field, in declaration order.
pub trait FieldVisitor {
    fn field<F: Storable>(&mut self);
}

/// One dispatch case of the versioning engine. Sealed: the case set is
/// closed, so every type lands in exactly one known algorithm.
pub trait VersionCase<T: Versioned>: sealed::Sealed {
    fn version(versions: &mut Versions) -> FormatVersion;
}

/// Case marker: the type implements [`VersionWithContext`].
pub struct ContextHook;

/// Case marker: the type implements [`StaticVersion`].
pub struct StaticHook;

/// Case marker: the type implements [`EnumerateFields`].
pub struct PerField;

/// Case marker: the type is an opaque fixed-layout value ([`FixedLayout`]).
pub struct Opaque;

/// Case marker: compatibility escape hatch yielding [`NEUTRAL`].
///
/// Historically, types that were neither fixed layout nor hooked were given
/// a neutral fingerprint so that already-persisted data kept loading. New
/// code should pick a real case; this marker exists only to migrate such
/// data without a format break, and it makes the compromise visible at the
/// type rather than silent.
pub struct Neutral;

/// Fingerprint emitted by the [`Neutral`] escape hatch.
pub const NEUTRAL: FormatVersion = 0;

/// Structural baseline of a mapped type: its stable name combined with its
/// mapped byte size.
pub fn structural_version<T: Versioned>() -> FormatVersion {
    combine(hash_label(T::NAME), size_of::<T>() as FormatVersion)
}

impl<T: VersionWithContext> VersionCase<T> for ContextHook {
    fn version(versions: &mut Versions) -> FormatVersion {
        combine(T::format_version(versions), structural_version::<T>())
    }
}

impl<T: StaticVersion> VersionCase<T> for StaticHook {
    fn version(_versions: &mut Versions) -> FormatVersion {
        combine(T::format_version(), structural_version::<T>())
    }
}

impl<T: Versioned + EnumerateFields> VersionCase<T> for PerField {
    fn version(versions: &mut Versions) -> FormatVersion {
        struct Fold<'a> {
            versions: &'a mut Versions,
            acc: FormatVersion,
        }

        impl FieldVisitor for Fold<'_> {
            fn field<F: Storable>(&mut self) {
                self.acc = combine(self.acc, self.versions.resolve::<F>());
            }
        }

        let mut fold = Fold { versions, acc: 0 };
        T::enumerate_fields(&mut fold);
        // Fold the composite's own identity last, so both field order and
        // container identity are captured.
        combine(fold.acc, structural_version::<T>())
    }
}

impl<T: Versioned + FixedLayout> VersionCase<T> for Opaque {
    fn version(_versions: &mut Versions) -> FormatVersion {
        structural_version::<T>()
    }
}

impl<T: Versioned> VersionCase<T> for Neutral {
    fn version(_versions: &mut Versions) -> FormatVersion {
        NEUTRAL
    }
}

/// Declares a composite mapped record in one line: stable name, field types
/// in declaration order, and self-mapped storage.
#[macro_export]
macro_rules! versioned_record {
    ($ty:ty, $name:literal, fields($($field:ty),+ $(,)?)) => {
        impl $crate::Versioned for $ty {
            const NAME: &'static str = $name;
            type Case = $crate::PerField;
        }

        impl $crate::EnumerateFields for $ty {
            fn enumerate_fields<V: $crate::FieldVisitor>(fields: &mut V) {
                $(fields.field::<$field>();)+
            }
        }

        impl $crate::Storable for $ty {
            type Mapped = Self;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::format_version;

    #[test]
    fn test_structural_version_distinguishes_names() {
        #[repr(C)]
        struct A(u32);
        #[repr(C)]
        struct B(u32);

        impl Versioned for A {
            const NAME: &'static str = "A";
            type Case = Opaque;
        }
        impl Storable for A {
            type Mapped = Self;
        }
        unsafe impl FixedLayout for A {}

        impl Versioned for B {
            const NAME: &'static str = "B";
            type Case = Opaque;
        }
        impl Storable for B {
            type Mapped = Self;
        }
        unsafe impl FixedLayout for B {}

        assert_ne!(structural_version::<A>(), structural_version::<B>());
    }

    #[test]
    fn test_static_hook_augments_structural_baseline() {
        #[repr(C)]
        struct Epoch(u64);

        impl Versioned for Epoch {
            const NAME: &'static str = "Epoch";
            type Case = StaticHook;
        }
        impl Storable for Epoch {
            type Mapped = Self;
        }
        impl StaticVersion for Epoch {
            fn format_version() -> FormatVersion {
                7
            }
        }

        // The declared value is folded with the baseline, never returned
        // verbatim.
        assert_ne!(format_version::<Epoch>(), 7);
        assert_eq!(
            format_version::<Epoch>(),
            combine(7, structural_version::<Epoch>())
        );
    }

    #[test]
    fn test_same_custom_value_different_types_diverge() {
        #[repr(C)]
        struct Left(u32);
        #[repr(C)]
        struct Right(u32);

        impl Versioned for Left {
            const NAME: &'static str = "Left";
            type Case = StaticHook;
        }
        impl Storable for Left {
            type Mapped = Self;
        }
        impl StaticVersion for Left {
            fn format_version() -> FormatVersion {
                42
            }
        }

        impl Versioned for Right {
            const NAME: &'static str = "Right";
            type Case = StaticHook;
        }
        impl Storable for Right {
            type Mapped = Self;
        }
        impl StaticVersion for Right {
            fn format_version() -> FormatVersion {
                42
            }
        }

        assert_ne!(format_version::<Left>(), format_version::<Right>());
    }

    #[test]
    fn test_neutral_yields_neutral_value() {
        struct Legacy {
            _blob: Vec<u8>,
        }

        impl Versioned for Legacy {
            const NAME: &'static str = "Legacy";
            type Case = Neutral;
        }
        impl Storable for Legacy {
            type Mapped = Self;
        }

        assert_eq!(format_version::<Legacy>(), NEUTRAL);
    }
}
