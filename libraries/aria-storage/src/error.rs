/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend could not be reached (no `localStorage`, unwritable dir)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Writing would exceed the backend quota
    #[error("Storage quota exceeded writing {key}: {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// Key cannot be mapped onto the backend
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Record exists but does not match its schema
    #[error("Corrupt record {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// Record was written by a newer schema
    #[error("Unsupported version {version} for record {key}")]
    UnsupportedVersion { key: String, version: u64 },

    /// Serialization/deserialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a corrupt-record error
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Whether the record should be discarded rather than retried
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::Corrupt { .. } | Self::UnsupportedVersion { .. } | Self::Serialization(_)
        )
    }
}
