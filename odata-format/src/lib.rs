//! Media type resolution for OData payloads.
//!
//! For every [`PayloadKind`](odata_types::PayloadKind) this crate produces the
//! ordered list of `(media type, encoding)` candidates a negotiation layer
//! matches against a request's `Accept` header. Index 0 is the default when
//! the client expresses no preference.
//!
//! # Components
//!
//! - **Tables**: the hand-authored baseline per kind, with and without the
//!   legacy Atom/XML encoding
//! - **Resolver**: clones a baseline once and prepends the JSON variants
//!   (`odata.metadata`, `odata.streaming`, `IEEE754Compatible`), most
//!   specific first
//! - **Extensions**: deployment-supplied encodings appended after the base
//!   candidates for selected kinds, by composition rather than subclassing
//!
//! # Example
//!
//! ```
//! use odata_format::{Encoding, MediaTypeProvider, MediaTypeResolver};
//! use odata_types::PayloadKind;
//!
//! let resolver = MediaTypeResolver::shared(false);
//! let formats = resolver.media_type_formats(PayloadKind::EntityReferenceLinks);
//! assert_eq!(formats[0].encoding, Encoding::Json);
//! assert_eq!(formats.len(), 13);
//! ```

mod config;
mod encoding;
mod extension;
mod resolver;
mod table;

pub use config::ResolverConfig;
pub use encoding::{Encoding, MediaTypeFormat};
pub use extension::{ExtendedResolver, FormatExtension};
pub use resolver::{MediaTypeProvider, MediaTypeResolver};
pub use table::{json_media_types, JSON_OPTIONAL_PARAMETERS, JSON_PAYLOAD_KINDS};
