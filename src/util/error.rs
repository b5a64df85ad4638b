//! Error types for the SPOC library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SPOC operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Bad signature, truncated preamble or out-of-range header field
    #[error("Malformed SPOC header: {0}")]
    MalformedHeader(String),

    /// File was written by a newer, incompatible major version
    #[error("Unsupported SPOC version {major}.{minor} (supported major version: {supported})")]
    UnsupportedVersion { major: u8, minor: u8, supported: u8 },

    /// Compressed point block could not be inflated
    #[error("Decompression failed: {0}")]
    Decompression(String),

    /// Point block does not match what the header declares
    #[error("Corrupt point data: {0}")]
    CorruptData(String),

    /// A record's extra field count differs from the file schema
    #[error("Point record {index} has {actual} extra fields, expected {expected}")]
    InconsistentExtraFields {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// Record or extra-field index out of bounds
    #[error("{what} index {index} out of bounds (count: {count})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        count: usize,
    },

    /// Columns passed to a row builder have different lengths
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Extra field count does not fit the on-disk width
    #[error("Too many extra fields: {0} (max 255)")]
    TooManyExtraFields(usize),

    /// WKT string does not fit the on-disk length prefix
    #[error("WKT string too long: {0} bytes")]
    WktTooLong(usize),

    /// Cursor ran past the end of a buffer
    #[error("Unexpected end of data at position {0}")]
    UnexpectedEof(u64),

    /// Text row could not be parsed as a point record
    #[error("Invalid point record text: {0}")]
    InvalidRecordText(String),

    /// Write operation failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed header error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedHeader(msg.into())
    }

    /// Create a corrupt data error.
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptData(msg.into())
    }

    /// Map a `NotFound` I/O error on `path` to [`Error::FileNotFound`].
    pub(crate) fn from_open(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(err)
        }
    }
}

/// Result type alias for SPOC operations.
pub type Result<T> = std::result::Result<T, Error>;
