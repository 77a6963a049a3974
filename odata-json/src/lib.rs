//! JSON reader and writer for OData entity reference links.
//!
//! Payload shape for a collection:
//!
//! ```json
//! {
//!   "@odata.context": "http://host/service/$metadata#Collection($ref)",
//!   "@odata.count": 2,
//!   "@Namespace.term": 321,
//!   "value": [
//!     { "@odata.id": "http://host/service/Customers(1)", "@Is.New": true },
//!     { "@odata.id": "http://host/service/Customers(2)" }
//!   ],
//!   "@odata.nextLink": "http://host/service/Customers?$skiptoken=2"
//! }
//! ```
//!
//! Instance annotation names must be unique per owning object (the
//! collection, or one link). [`AnnotationGuard`] enforces that on both
//! paths; a duplicate aborts the whole pass.
//!
//! # Example
//!
//! ```
//! use odata_json::{ReaderSettings, ReferenceLinksDeserializer, ReferenceLinksSerializer, WriterSettings};
//! use odata_types::{EntityReferenceLink, EntityReferenceLinks, InstanceAnnotation};
//!
//! let links = EntityReferenceLinks::with_links(vec![
//!     EntityReferenceLink::parse("http://host/Customers(1)")
//!         .unwrap()
//!         .with_annotation(InstanceAnnotation::new("Is.New", true)),
//! ]);
//!
//! let writer = ReferenceLinksSerializer::new(WriterSettings::new("http://host/$metadata#Collection($ref)"));
//! let bytes = writer.write_entity_reference_links(&links).unwrap();
//! assert_eq!(
//!     std::str::from_utf8(&bytes).unwrap(),
//!     r#"{"@odata.context":"http://host/$metadata#Collection($ref)","value":[{"@odata.id":"http://host/Customers(1)","@Is.New":true}]}"#
//! );
//!
//! let reader = ReferenceLinksDeserializer::new(ReaderSettings::default());
//! assert_eq!(reader.read_entity_reference_links(&bytes).unwrap(), links);
//! ```

pub mod context_url;
mod de;
mod error;
mod filter;
mod guard;
mod ser;
mod settings;
mod writer;

pub use de::ReferenceLinksDeserializer;
pub use error::{JsonError, JsonResult};
pub use filter::AnnotationFilter;
pub use guard::{AnnotationGuard, AnnotationOwner};
pub use ser::ReferenceLinksSerializer;
pub use settings::{ReaderSettings, WriterSettings, DEFAULT_MAX_PAYLOAD_SIZE};

const ODATA_CONTEXT: &str = "@odata.context";
const ODATA_COUNT: &str = "@odata.count";
const ODATA_ID: &str = "@odata.id";
const ODATA_NEXT_LINK: &str = "@odata.nextLink";
const VALUE: &str = "value";

/// Namespace reserved for protocol annotations; custom instance
/// annotations may not use it.
const ODATA_NAMESPACE: &str = "odata.";
