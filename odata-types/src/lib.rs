//! Core protocol types for OData payloads.
//!
//! This crate defines the leaf types shared by the format resolver and the
//! JSON codecs:
//! - [`PayloadKind`]: the logical shape of a protocol message
//! - [`MediaType`]: a `type/subtype` pair with ordered parameters
//! - [`ODataValue`] and [`InstanceAnnotation`]: typed out-of-band values
//! - [`EntityReferenceLink`] / [`EntityReferenceLinks`]: the `$ref` object model
//!
//! Nothing here knows how a payload is encoded on the wire; that belongs to
//! `odata-format` (which encoding) and `odata-json` (how JSON is written).

mod annotation;
mod kind;
mod link;
mod media_type;
mod value;

pub use annotation::InstanceAnnotation;
pub use kind::PayloadKind;
pub use link::{EntityReferenceLink, EntityReferenceLinks};
pub use media_type::MediaType;
pub use value::ODataValue;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing protocol types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
