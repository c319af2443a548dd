use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unsupported content type: {0:?}")]
    Unsupported(String),

    #[error("owner id must not be empty")]
    EmptyOwnerId,

    #[error("invalid fragment id: {0}")]
    InvalidFragmentId(String),
}
