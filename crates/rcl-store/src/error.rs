/// Errors from ledger store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A key read or range scanned by the transaction changed before commit.
    #[error("commit conflict on key {key}")]
    Conflict { key: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
