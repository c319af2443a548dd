use frag_types::{FragmentId, OwnerId};

/// Errors from fragment storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No metadata exists for the `(owner, id)` pair.
    #[error("no fragment {id} for owner {owner}")]
    NoFragment { owner: OwnerId, id: FragmentId },

    /// No payload bytes exist for the `(owner, id)` pair.
    #[error("no data for fragment {id} of owner {owner}")]
    NoData { owner: OwnerId, id: FragmentId },

    /// Backend-specific failure (connection loss, serialization, ...).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
