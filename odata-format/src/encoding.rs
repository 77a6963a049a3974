use odata_types::MediaType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A wire serialization family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// The legacy Atom/XML encoding.
    Atom,
    /// The JSON encoding.
    Json,
    /// Raw values (`$value`, binary streams, async envelopes).
    RawValue,
    /// The CSDL metadata document.
    Metadata,
    /// Multipart batch.
    Batch,
    /// A deployment-registered encoding, identified by name.
    Custom(String),
}

impl Encoding {
    /// Creates a deployment-registered encoding.
    pub fn custom(name: impl Into<String>) -> Self {
        Encoding::Custom(name.into())
    }

    /// Returns the encoding's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Encoding::Atom => "Atom",
            Encoding::Json => "Json",
            Encoding::RawValue => "RawValue",
            Encoding::Metadata => "Metadata",
            Encoding::Batch => "Batch",
            Encoding::Custom(name) => name,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One negotiation candidate: a media type and the encoding it selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTypeFormat {
    pub media_type: MediaType,
    pub encoding: Encoding,
}

impl MediaTypeFormat {
    /// Creates a new candidate.
    #[must_use]
    pub fn new(media_type: MediaType, encoding: Encoding) -> Self {
        Self {
            media_type,
            encoding,
        }
    }
}

impl fmt::Display for MediaTypeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.media_type, self.encoding)
    }
}
