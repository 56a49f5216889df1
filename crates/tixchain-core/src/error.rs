use thiserror::Error;

/// Typed failures surfaced by the core.
///
/// Only lookups and startup checks fail this way. A tampered chain is
/// reported through [`crate::block_validation::IntegrityViolation`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Requested position is outside `[0, len)`.
    #[error("Block not found at index: {index}")]
    BlockNotFound { index: i64 },

    /// The hash primitive failed its self test. Fatal at startup.
    #[error("SHA-256 is not available")]
    DigestUnavailable,

    /// An update or delete was attempted on a committed block.
    #[error("{operation} is not possible: the blockchain is immutable")]
    ImmutableChain { operation: String },
}

impl CoreError {
    pub fn not_found(index: i64) -> Self {
        CoreError::BlockNotFound { index }
    }

    pub fn immutable(operation: impl Into<String>) -> Self {
        CoreError::ImmutableChain {
            operation: operation.into(),
        }
    }
}
