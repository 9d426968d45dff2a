//! Error types for snapshot encoding and decoding.

use thiserror::Error;

/// Errors that can occur while converting state to and from snapshots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The state holds a value that cannot be stored as plain data without
    /// losing information.
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// The snapshot bytes do not describe a value of the requested type.
    #[error("Malformed snapshot: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
