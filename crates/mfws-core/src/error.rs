//! Errors raised while encoding conditions and paths.

/// Errors that can occur while building resource paths and queries.
///
/// All of these are raised synchronously, before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// A required identifier field is missing or out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The operator cannot be expressed on the wire
    #[error("not supported: {0}")]
    NotSupported(String),
    /// A value did not survive the external-identifier round trip
    #[error("encoding invariant violated for {value:?}: {reason}")]
    InvariantViolation {
        /// The offending encoded value
        value: String,
        /// What went wrong
        reason: String,
    },
}
