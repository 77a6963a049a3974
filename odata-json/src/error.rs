//! Error types for the JSON codecs.

use crate::AnnotationOwner;
use odata_format::Encoding;
use thiserror::Error;

/// Result type for JSON codec operations.
pub type JsonResult<T> = Result<T, JsonError>;

/// Errors that can occur while reading or writing JSON payloads.
#[derive(Debug, Error)]
pub enum JsonError {
    /// The same annotation name appeared twice for one owner.
    #[error("duplicate instance annotation '{name}' on {owner}")]
    DuplicateAnnotation {
        name: String,
        owner: AnnotationOwner,
    },

    /// An annotation name that cannot be written as a custom annotation.
    #[error("invalid instance annotation name: '{0}'")]
    InvalidAnnotationName(String),

    /// The payload does not have the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Syntax or type error from the JSON parser.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error on the underlying stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload exceeded the configured size limit.
    #[error("payload too large: more than {0} bytes")]
    PayloadTooLarge(usize),

    /// An `odata.include-annotations` pattern could not be parsed.
    #[error("invalid annotation filter: {0}")]
    InvalidFilter(String),

    /// The negotiated format is not handled by the JSON codecs.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(Encoding),
}
