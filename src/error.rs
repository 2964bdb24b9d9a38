//! Error types for fingerprint checks and version frames

use crate::hash::FormatVersion;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImprintError {
    /// Stored fingerprint does not match the freshly computed one
    #[error("wrong format version for type {type_name} (expected {expected}, encountered {encountered})")]
    VersionMismatch {
        type_name: &'static str,
        expected: FormatVersion,
        encountered: FormatVersion,
    },

    /// Version frame does not start with the expected magic
    #[error("invalid magic number in version frame")]
    InvalidMagic,

    /// Buffer too short to hold a version frame
    #[error("version frame truncated: need {need} bytes, got {got}")]
    TruncatedFrame { need: usize, got: usize },

    /// I/O error while a caller plumbed a frame through a reader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImprintError>;
