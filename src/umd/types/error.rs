//! Custom error types for the umd-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum UmdError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The source does not start with the UMD magic signature.
    ///
    /// Parsing reports this as [`ParseOutcome::NotUmd`](crate::ParseOutcome::NotUmd);
    /// the error form only appears through `ParseOutcome::into_document`.
    #[error("Not a UMD file: magic signature mismatch")]
    NotUmdFormat,

    /// The stream ended before a record's declared length was satisfied.
    #[error("Truncated stream while reading {context}: {needed} more bytes required")]
    TruncatedStream { context: &'static str, needed: u64 },

    /// A length or count field produced a negative or otherwise invalid value.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A compressed content block could not be inflated.
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    /// A chapter index outside `0..len` was requested.
    #[error("Chapter index {index} out of range (document has {len} chapters)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A convenience `Result` type alias using the crate's `UmdError` type.
pub type Result<T> = std::result::Result<T, UmdError>;
