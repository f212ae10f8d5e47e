//! # Store Errors
//!
//! Error types for the resource store and its persistence adapters.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Resource store errors
///
/// Every variant is a server-side failure; client mistakes (missing fields,
/// unknown ids) are reported by the controllers, not the store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Reading or writing durable state failed
    #[error("Storage I/O failed for '{key}': {reason}")]
    Io { key: String, reason: String },

    /// Durable state exists but could not be decoded
    #[error("Stored state for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    /// Snapshot could not be encoded
    #[error("Failed to encode '{key}': {reason}")]
    Encode { key: String, reason: String },

    /// The collection's id counter cannot issue another id
    #[error("No ids left to allocate in '{key}'")]
    IdsExhausted { key: String },

    /// A lock guarding store state was poisoned by a panicking writer
    #[error("Lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn io(key: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Io {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn corrupt(key: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Corrupt {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn ids_exhausted(key: &str) -> Self {
        StoreError::IdsExhausted {
            key: key.to_string(),
        }
    }

    pub fn encode(key: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Encode {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_key() {
        let err = StoreError::io("companies", "permission denied");
        assert!(err.to_string().contains("companies"));
        assert!(err.to_string().contains("permission denied"));

        let err = StoreError::corrupt("vacancies", "expected value at line 1");
        assert!(err.to_string().contains("corrupt"));
    }
}
