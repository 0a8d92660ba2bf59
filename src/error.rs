//! Error types for nerprep.

use thiserror::Error;

/// Result type for nerprep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for nerprep operations.
///
/// Only input-level failures are errors: an unreadable file or a malformed
/// JSONL line aborts the run. Everything the conversion itself cannot place
/// (unlocatable sentences, unmappable entities) is reported as a
/// [`Skip`](crate::align::Skip) value instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A corpus line that is not a valid document record.
    #[error("malformed record at line {line}: {source}")]
    Parse {
        /// 1-based line number in the input file.
        line: usize,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed while writing an artifact.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
