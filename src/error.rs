//! Error type shared by the keyed store and its backends

use thiserror::Error;

/// Errors returned by [`Store`](crate::Store) operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required parameter was missing or malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Neither the storage areas nor a cookie jar can be used
    #[error("storage is not possible, there is no storage medium available")]
    StorageUnavailable,

    /// A storage area or cookie jar rejected a write or delete
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The payload could not be encoded as JSON
    #[error("failed to encode payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        StoreError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = StoreError::invalid("validUntil must be a date");
        assert_eq!(err.to_string(), "invalid argument: validUntil must be a date");
        assert!(
            StoreError::StorageUnavailable
                .to_string()
                .contains("no storage medium")
        );
    }
}
