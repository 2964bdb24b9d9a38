//! The persisted version frame.
//!
//! Writers embed a [`VersionFrame`] ahead of mapped data; readers parse and
//! [`check`](VersionFrame::check) it before any field is accessed by
//! offset. The frame fixes the compatibility contract between processes:
//! an 8-byte magic followed by the fingerprint as a little-endian `u64`.

use crate::error::{ImprintError, Result};
use crate::hash::FormatVersion;
use crate::repr::Storable;
use crate::version::{check_format_version, format_version};

/// Magic number: "IMPR" followed by the frame revision
pub const MAGIC: [u8; 8] = *b"IMPR\x00\x01\x00\x00";

/// Serialized frame length: magic plus a little-endian `u64` fingerprint
pub const FRAME_LEN: usize = 16;

/// Version frame embedded ahead of mapped data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionFrame {
    pub magic: [u8; 8],
    pub format_version: FormatVersion,
}

impl VersionFrame {
    /// Build the frame a writer embeds for values of type `T`.
    pub fn for_type<T: Storable>() -> Self {
        VersionFrame {
            magic: MAGIC,
            format_version: format_version::<T>(),
        }
    }

    /// Serialize the frame to its on-disk encoding.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[..8].copy_from_slice(&self.magic);
        bytes[8..].copy_from_slice(&self.format_version.to_le_bytes());
        bytes
    }

    /// Parse a frame from the head of a mapped buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FRAME_LEN {
            return Err(ImprintError::TruncatedFrame {
                need: FRAME_LEN,
                got: bytes.len(),
            });
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&bytes[..8]);
        if magic != MAGIC {
            return Err(ImprintError::InvalidMagic);
        }

        let mut version = [0u8; 8];
        version.copy_from_slice(&bytes[8..FRAME_LEN]);

        Ok(VersionFrame {
            magic,
            format_version: u64::from_le_bytes(version),
        })
    }

    /// Recompute `T`'s fingerprint and compare it against the frame.
    pub fn check<T: Storable>(&self) -> Result<()> {
        check_format_version::<T>(self.format_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_round_trip() {
        let frame = VersionFrame::for_type::<(u32, u32)>();
        let bytes = frame.to_bytes();
        assert_eq!(bytes.len(), FRAME_LEN);

        let parsed = VersionFrame::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, frame);
        assert!(parsed.check::<(u32, u32)>().is_ok());
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = VersionFrame::for_type::<u64>().to_bytes();
        bytes[0] = b'X';
        assert!(matches!(
            VersionFrame::from_bytes(&bytes),
            Err(ImprintError::InvalidMagic)
        ));
    }

    #[test]
    fn test_truncated_frame() {
        let bytes = VersionFrame::for_type::<u64>().to_bytes();
        assert!(matches!(
            VersionFrame::from_bytes(&bytes[..FRAME_LEN - 1]),
            Err(ImprintError::TruncatedFrame { need: 16, got: 15 })
        ));
    }

    #[test]
    fn test_check_rejects_different_type() {
        let frame = VersionFrame::for_type::<u32>();
        assert!(frame.check::<u32>().is_ok());
        assert!(matches!(
            frame.check::<u64>(),
            Err(ImprintError::VersionMismatch { .. })
        ));
    }
}
