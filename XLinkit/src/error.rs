//! Error types for `XLinkit`

use thiserror::Error;

/// The error type for `XLinkit` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Header Errors ====================
    /// The file does not start with the XLNK magic.
    #[error("invalid XLNK magic: expected {expected:?}, found {found:?}")]
    SignatureMismatch {
        /// The expected signature bytes.
        expected: [u8; 4],
        /// The bytes found at the start of the file.
        found: [u8; 4],
    },

    /// The header variant name is not one of the four known layouts.
    #[error("unsupported header variant '{0}' (supported: elink, slink, elink-botw, slink-botw)")]
    UnsupportedHeaderVariant(String),

    // ==================== Layout Errors ====================
    /// A computed absolute address lies outside the stream.
    #[error("malformed offset {offset:#x} in {section} (stream length {len:#x})")]
    MalformedOffset {
        /// The section being decoded.
        section: &'static str,
        /// The absolute address that was requested.
        offset: u64,
        /// Total stream length.
        len: u64,
    },

    /// A primitive read ran past the end of the stream.
    #[error("unexpected end of file at {offset:#x} in {section}")]
    UnexpectedEof {
        /// The section being decoded.
        section: &'static str,
        /// Absolute position of the failed read.
        offset: u64,
    },

    /// An index or inclusive index range points outside the array it indexes.
    #[error("index range [{start}, {end}] out of bounds in {section} (length {len})")]
    InvalidIndexRange {
        /// The section that stores the range.
        section: &'static str,
        /// First index of the range.
        start: i64,
        /// Last index of the range (inclusive).
        end: i64,
        /// Length of the indexed array.
        len: usize,
    },

    /// A table count is inconsistent with another count.
    #[error("invalid count in {section}: {message}")]
    InvalidCount {
        /// The section holding the counts.
        section: &'static str,
        /// Description of the mismatch.
        message: String,
    },

    // ==================== Type Tag Errors ====================
    /// The parameter define table holds a type tag outside 0..=5.
    #[error("unknown parameter type {tag} at offset {offset:#x} in param define table")]
    UnknownParamType {
        /// The raw type tag.
        tag: u32,
        /// Absolute position of the tag.
        offset: u64,
    },

    /// A condition record names a container kind other than 0, 1 or 2.
    #[error("unknown container kind {kind} at offset {offset:#x} in condition table")]
    UnknownContainerKind {
        /// The raw container kind.
        kind: u32,
        /// Absolute position of the condition record.
        offset: u64,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for `XLinkit` operations.
pub type Result<T> = std::result::Result<T, Error>;
