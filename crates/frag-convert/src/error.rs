use frag_types::MediaType;

/// Errors from conversion operations.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The requested extension or type token does not resolve to any
    /// supported media type.
    #[error("unknown conversion target: {0:?}")]
    UnknownTarget(String),

    /// The resolved target is not reachable from the declared type.
    #[error("cannot convert {from} to {to}")]
    UnsupportedConversion { from: MediaType, to: MediaType },

    /// The payload does not parse as JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The payload parsed as JSON but is not an object at the top level.
    #[error("payload is not a JSON object")]
    NotJsonObject,

    /// The image payload could not be decoded as the declared type, or the
    /// re-encode to the target container failed.
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Result alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
