//! Baseline media type tables.
//!
//! Each table has exactly one row per [`PayloadKind`], in index order; a row
//! may be empty. Rows are ordered by precedence, highest first.

use crate::{Encoding, MediaTypeFormat};
use odata_types::{MediaType, PayloadKind};

/// A table row entry: a media type with at most one parameter.
pub(crate) struct BaselineFormat {
    type_name: &'static str,
    subtype: &'static str,
    parameter: Option<(&'static str, &'static str)>,
    encoding: Encoding,
}

impl BaselineFormat {
    const fn new(type_name: &'static str, subtype: &'static str, encoding: Encoding) -> Self {
        Self {
            type_name,
            subtype,
            parameter: None,
            encoding,
        }
    }

    const fn with_type(subtype: &'static str, atom_type: &'static str) -> Self {
        Self {
            type_name: "application",
            subtype,
            parameter: Some(("type", atom_type)),
            encoding: Encoding::Atom,
        }
    }

    pub(crate) fn to_format(&self) -> MediaTypeFormat {
        let media_type = MediaType::new(self.type_name, self.subtype);
        let media_type = match self.parameter {
            Some((name, value)) => media_type.with_parameter(name, value),
            None => media_type,
        };
        MediaTypeFormat::new(media_type, self.encoding.clone())
    }
}

const ATOM_FEED: BaselineFormat = BaselineFormat::with_type("atom+xml", "feed");
const ATOM_ENTRY: BaselineFormat = BaselineFormat::with_type("atom+xml", "entry");
const ATOM: BaselineFormat = BaselineFormat::new("application", "atom+xml", Encoding::Atom);
const ATOM_SVC: BaselineFormat = BaselineFormat::new("application", "atomsvc+xml", Encoding::Atom);
const XML: BaselineFormat = BaselineFormat::new("application", "xml", Encoding::Atom);
const TEXT_XML: BaselineFormat = BaselineFormat::new("text", "xml", Encoding::Atom);
const TEXT_PLAIN: BaselineFormat = BaselineFormat::new("text", "plain", Encoding::RawValue);
const OCTET_STREAM: BaselineFormat =
    BaselineFormat::new("application", "octet-stream", Encoding::RawValue);
const METADATA_XML: BaselineFormat = BaselineFormat::new("application", "xml", Encoding::Metadata);
// The boundary parameter is generated per message, so it is not part of the table.
const MULTIPART_MIXED: BaselineFormat = BaselineFormat::new("multipart", "mixed", Encoding::Batch);
const HTTP: BaselineFormat = BaselineFormat::new("application", "http", Encoding::RawValue);

/// Baseline candidates with the legacy Atom/XML encoding enabled.
pub(crate) static LEGACY_FORMATS: [&[BaselineFormat]; PayloadKind::COUNT] = [
    // ResourceSet
    &[ATOM_FEED, ATOM],
    // Resource
    &[ATOM_ENTRY, ATOM],
    // Property
    &[XML, TEXT_XML],
    // EntityReferenceLink
    &[XML, TEXT_XML],
    // EntityReferenceLinks: reference collections are written as feeds
    &[ATOM_FEED, ATOM],
    // Value
    &[TEXT_PLAIN],
    // BinaryValue
    &[OCTET_STREAM],
    // Collection
    &[XML, TEXT_XML],
    // ServiceDocument
    &[XML, ATOM_SVC],
    // MetadataDocument
    &[METADATA_XML],
    // Error
    &[XML],
    // Batch
    &[MULTIPART_MIXED],
    // Parameter: JSON only
    &[],
    // IndividualProperty
    &[XML, TEXT_XML],
    // Delta
    &[ATOM_FEED, ATOM],
    // Asynchronous
    &[HTTP],
];

/// Baseline candidates without the legacy encoding.
pub(crate) static DEFAULT_FORMATS: [&[BaselineFormat]; PayloadKind::COUNT] = [
    // ResourceSet
    &[],
    // Resource
    &[],
    // Property
    &[],
    // EntityReferenceLink
    &[],
    // EntityReferenceLinks
    &[],
    // Value
    &[TEXT_PLAIN],
    // BinaryValue
    &[OCTET_STREAM],
    // Collection
    &[],
    // ServiceDocument
    &[],
    // MetadataDocument
    &[METADATA_XML],
    // Error
    &[],
    // Batch
    &[MULTIPART_MIXED],
    // Parameter
    &[],
    // IndividualProperty
    &[],
    // Delta
    &[],
    // Asynchronous
    &[HTTP],
];

/// The kinds that can be written as JSON.
pub const JSON_PAYLOAD_KINDS: [PayloadKind; 10] = [
    PayloadKind::ResourceSet,
    PayloadKind::Resource,
    PayloadKind::Property,
    PayloadKind::EntityReferenceLink,
    PayloadKind::EntityReferenceLinks,
    PayloadKind::Collection,
    PayloadKind::ServiceDocument,
    PayloadKind::Error,
    PayloadKind::Parameter,
    PayloadKind::IndividualProperty,
];

/// Optional `application/json` parameters and their value domains, in
/// expansion order.
pub const JSON_OPTIONAL_PARAMETERS: [(&str, &[&str]); 3] = [
    ("odata.metadata", &["minimal", "full", "none"]),
    ("odata.streaming", &["true", "false"]),
    ("IEEE754Compatible", &["false", "true"]),
];

/// Returns the JSON media types, most specific first.
///
/// Expansion is breadth-first over [`JSON_OPTIONAL_PARAMETERS`]: each pass
/// specializes every variant produced so far and places the specialized
/// variants directly before the variant they came from. Of the resulting
/// lattice, the variants carrying every parameter are kept in generation
/// order, followed by the bare `application/json`.
#[must_use]
pub fn json_media_types() -> Vec<MediaType> {
    let mut variants = vec![MediaType::new("application", "json")];
    for (name, values) in JSON_OPTIONAL_PARAMETERS {
        variants = variants
            .into_iter()
            .flat_map(|base| {
                values
                    .iter()
                    .map(|value| base.clone().with_parameter(name, *value))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .chain(std::iter::once(base))
            })
            .collect();
    }

    let full = JSON_OPTIONAL_PARAMETERS.len();
    variants.retain(|media_type| {
        let params = media_type.parameters().len();
        params == full || params == 0
    });
    variants
}
