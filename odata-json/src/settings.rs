//! Per-pass reader and writer settings.

use crate::{context_url, AnnotationFilter, JsonError, JsonResult};
use odata_format::{Encoding, MediaTypeFormat};
use odata_types::MediaType;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default maximum payload size accepted by the readers (16 MiB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

const IEEE754_COMPATIBLE: &str = "IEEE754Compatible";

/// Settings for one write pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterSettings {
    /// Value of `@odata.context`.
    pub context_url: String,
    /// Which instance annotations are written.
    pub annotation_filter: AnnotationFilter,
    /// Write `Int64` values and `@odata.count` as JSON strings.
    pub ieee754_compatible: bool,
}

impl WriterSettings {
    /// Settings with every annotation included and plain JSON numbers.
    pub fn new(context_url: impl Into<String>) -> Self {
        Self {
            context_url: context_url.into(),
            ..Self::default()
        }
    }

    /// Settings for a collection payload rooted at `service_root`.
    #[must_use]
    pub fn for_service_root(service_root: &Url) -> Self {
        Self::new(context_url::entity_reference_links(service_root))
    }

    /// Settings matching a negotiated media type. `IEEE754Compatible=true`
    /// switches on string-encoded 64-bit integers.
    pub fn for_media_type(context_url: impl Into<String>, media_type: &MediaType) -> Self {
        Self {
            ieee754_compatible: ieee754_compatible(media_type),
            ..Self::new(context_url)
        }
    }

    /// Like [`WriterSettings::for_media_type`], but rejects formats these
    /// codecs cannot produce.
    pub fn for_format(context_url: impl Into<String>, format: &MediaTypeFormat) -> JsonResult<Self> {
        if format.encoding != Encoding::Json {
            return Err(JsonError::UnsupportedEncoding(format.encoding.clone()));
        }
        Ok(Self::for_media_type(context_url, &format.media_type))
    }

    #[must_use]
    pub fn with_annotation_filter(mut self, filter: AnnotationFilter) -> Self {
        self.annotation_filter = filter;
        self
    }
}

/// Settings for one read pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Which instance annotations are kept. Filtered-out annotations are
    /// still checked for duplicates.
    pub annotation_filter: AnnotationFilter,
    /// Largest payload the stream readers buffer before giving up.
    pub max_payload_size: usize,
    /// Read integer-valued strings in annotation values as `Int64`, the
    /// counterpart of [`WriterSettings::ieee754_compatible`].
    pub ieee754_compatible: bool,
}

impl ReaderSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings matching the media type the payload was sent with.
    #[must_use]
    pub fn for_media_type(media_type: &MediaType) -> Self {
        Self {
            ieee754_compatible: ieee754_compatible(media_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_annotation_filter(mut self, filter: AnnotationFilter) -> Self {
        self.annotation_filter = filter;
        self
    }

    #[must_use]
    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            annotation_filter: AnnotationFilter::all(),
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            ieee754_compatible: false,
        }
    }
}

fn ieee754_compatible(media_type: &MediaType) -> bool {
    media_type
        .parameter(IEEE754_COMPATIBLE)
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}
