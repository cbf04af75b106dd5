use thiserror::Error;

use crate::types::DataType;

pub type Result<T> = std::result::Result<T, TensorgateError>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TensorgateError {
    /// The resolved content type has no registered codec. `input` is `None`
    /// when resolution failed at the request level.
    #[error("No codec registered for content type '{content_type}'")]
    CodecNotFound {
        content_type: String,
        input: Option<String>,
    },

    #[error("Codec '{content_type}' does not support datatype {datatype} (input '{input}')")]
    UnsupportedDatatype {
        content_type: String,
        datatype: DataType,
        input: String,
    },

    #[error("Input '{input}': shape declares {expected} element(s) but data holds {actual}")]
    ShapeMismatch {
        input: String,
        expected: u64,
        actual: u64,
    },

    #[error("Input '{input}': malformed payload: {reason}")]
    MalformedPayload { input: String, reason: String },

    /// Opaque failure from the model's predict step, passed through unchanged
    #[error("Model reported error: {0}")]
    ModelExecutionError(String),

    #[error("Got an unknown datatype: {0}")]
    UnknownDataType(String),

    #[error("Error parsing model settings: {0}")]
    ConfigParsingError(#[from] toml::de::Error),
}
