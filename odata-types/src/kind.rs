//! Payload kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical shape of a protocol message.
///
/// The discriminants are dense and start at zero; per-kind tables are
/// fixed-size arrays indexed by [`PayloadKind::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// A collection of resources (a feed).
    ResourceSet = 0,
    /// A single resource (an entry).
    Resource,
    /// A top-level property.
    Property,
    /// A single entity reference link (`$ref`).
    EntityReferenceLink,
    /// A collection of entity reference links (`Collection($ref)`).
    EntityReferenceLinks,
    /// A raw primitive value (`$value`).
    Value,
    /// A raw binary value.
    BinaryValue,
    /// A collection of primitive or complex values.
    Collection,
    /// The service document.
    ServiceDocument,
    /// The metadata document (`$metadata`).
    MetadataDocument,
    /// A top-level error.
    Error,
    /// A batch request or response.
    Batch,
    /// An action parameter payload.
    Parameter,
    /// An individual property.
    IndividualProperty,
    /// A delta response.
    Delta,
    /// An asynchronous response envelope.
    Asynchronous,
}

impl PayloadKind {
    /// Number of payload kinds.
    pub const COUNT: usize = 16;

    /// Every payload kind, in index order.
    pub const ALL: [PayloadKind; Self::COUNT] = [
        PayloadKind::ResourceSet,
        PayloadKind::Resource,
        PayloadKind::Property,
        PayloadKind::EntityReferenceLink,
        PayloadKind::EntityReferenceLinks,
        PayloadKind::Value,
        PayloadKind::BinaryValue,
        PayloadKind::Collection,
        PayloadKind::ServiceDocument,
        PayloadKind::MetadataDocument,
        PayloadKind::Error,
        PayloadKind::Batch,
        PayloadKind::Parameter,
        PayloadKind::IndividualProperty,
        PayloadKind::Delta,
        PayloadKind::Asynchronous,
    ];

    /// Returns the dense table index of this kind.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the protocol name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PayloadKind::ResourceSet => "ResourceSet",
            PayloadKind::Resource => "Resource",
            PayloadKind::Property => "Property",
            PayloadKind::EntityReferenceLink => "EntityReferenceLink",
            PayloadKind::EntityReferenceLinks => "EntityReferenceLinks",
            PayloadKind::Value => "Value",
            PayloadKind::BinaryValue => "BinaryValue",
            PayloadKind::Collection => "Collection",
            PayloadKind::ServiceDocument => "ServiceDocument",
            PayloadKind::MetadataDocument => "MetadataDocument",
            PayloadKind::Error => "Error",
            PayloadKind::Batch => "Batch",
            PayloadKind::Parameter => "Parameter",
            PayloadKind::IndividualProperty => "IndividualProperty",
            PayloadKind::Delta => "Delta",
            PayloadKind::Asynchronous => "Asynchronous",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
