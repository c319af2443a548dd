use frag_convert::ConvertError;
use frag_store::StoreError;
use frag_types::{FragmentId, OwnerId};

/// Errors from fragment entity operations.
///
/// Each variant identifies one failure kind so a boundary layer can map it
/// to a transport-level response without inspecting message text. All
/// failures are terminal for the single operation; the entity never retries.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Bad construction input: missing/unsupported content type or empty
    /// owner id. Caller error, never retried.
    #[error("invalid fragment: {0}")]
    Validation(String),

    /// No fragment exists for the exact `(owner, id)` pair.
    #[error("no fragment {id} for owner {owner}")]
    NotFound { owner: OwnerId, id: FragmentId },

    /// An update supplied a content type differing from the declared one.
    /// The declared type can never be changed after creation.
    #[error("fragment type cannot be changed: declared {declared:?}, supplied {supplied:?}")]
    TypeImmutable { declared: String, supplied: String },

    /// The payload read failed in the storage backend.
    #[error("unable to read fragment data")]
    DataUnavailable(#[source] StoreError),

    /// A conversion failed; see [`ConvertError`] for the precise kind.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// A metadata write, list, or delete failed in the storage backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for fragment entity operations.
pub type ModelResult<T> = Result<T, ModelError>;
