use thiserror::Error;

/// Errors decoding a stored turn record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed turn record: {0}")]
    Malformed(String),

    #[error("unrecognized turn role: '{0}'")]
    UnknownRole(String),
}

/// Errors from session store operations.
///
/// String payloads keep this crate free of any client dependency; the
/// infrastructure layer stringifies transport errors on the way in.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport or command failure from the backing engine.
    #[error("backend error: {0}")]
    Backend(String),

    /// A stored record failed to decode during a read.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The operation was cancelled by its caller before completing.
    #[error("operation cancelled")]
    Cancelled,
}
