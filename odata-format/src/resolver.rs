//! The media type resolver and the provider capability it implements.

use crate::table::{json_media_types, DEFAULT_FORMATS, JSON_PAYLOAD_KINDS, LEGACY_FORMATS};
use crate::{Encoding, MediaTypeFormat};
use odata_types::PayloadKind;
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Something that can list the negotiation candidates for a payload kind.
///
/// Implementations return candidates in descending precedence. Callers get a
/// snapshot; a decorating provider builds a new sequence rather than editing
/// the one it was handed.
pub trait MediaTypeProvider: Send + Sync {
    /// Returns the supported media types and encodings for `kind`, sorted by
    /// priority.
    fn media_type_formats(&self, kind: PayloadKind) -> Cow<'_, [MediaTypeFormat]>;
}

/// Resolves payload kinds into ordered `(media type, encoding)` candidates.
///
/// Built once from a baseline table plus the JSON expansion; read-only
/// afterwards, so it can be shared across threads without locking.
#[derive(Debug, Clone)]
pub struct MediaTypeResolver {
    formats: [Vec<MediaTypeFormat>; PayloadKind::COUNT],
    legacy_enabled: bool,
}

impl MediaTypeResolver {
    /// Builds a resolver with its own copy of the baseline table.
    #[must_use]
    pub fn new(enable_legacy: bool) -> Self {
        let baseline = if enable_legacy {
            &LEGACY_FORMATS
        } else {
            &DEFAULT_FORMATS
        };
        let mut formats: [Vec<MediaTypeFormat>; PayloadKind::COUNT] =
            std::array::from_fn(|i| baseline[i].iter().map(|f| f.to_format()).collect());

        let json: Vec<MediaTypeFormat> = json_media_types()
            .into_iter()
            .map(|media_type| MediaTypeFormat::new(media_type, Encoding::Json))
            .collect();
        for kind in JSON_PAYLOAD_KINDS {
            formats[kind.index()].splice(0..0, json.iter().cloned());
        }

        debug!(
            legacy_enabled = enable_legacy,
            json_variants = json.len(),
            json_kinds = JSON_PAYLOAD_KINDS.len(),
            "Media type resolver built"
        );

        Self {
            formats,
            legacy_enabled: enable_legacy,
        }
    }

    /// Returns the process-wide resolver for the given legacy mode.
    ///
    /// Each instance is built on first use and never mutated.
    #[must_use]
    pub fn shared(enable_legacy: bool) -> &'static MediaTypeResolver {
        static WITH_LEGACY: OnceLock<MediaTypeResolver> = OnceLock::new();
        static WITHOUT_LEGACY: OnceLock<MediaTypeResolver> = OnceLock::new();

        let cell = if enable_legacy {
            &WITH_LEGACY
        } else {
            &WITHOUT_LEGACY
        };
        cell.get_or_init(|| MediaTypeResolver::new(enable_legacy))
    }

    /// Whether the legacy Atom/XML candidates are part of this resolver.
    #[must_use]
    pub fn legacy_enabled(&self) -> bool {
        self.legacy_enabled
    }

    /// Returns the candidates for `kind`.
    #[must_use]
    pub fn formats(&self, kind: PayloadKind) -> &[MediaTypeFormat] {
        &self.formats[kind.index()]
    }

    /// Returns the candidate used when the client expresses no preference.
    #[must_use]
    pub fn default_format(&self, kind: PayloadKind) -> Option<&MediaTypeFormat> {
        self.formats(kind).first()
    }
}

impl Default for MediaTypeResolver {
    fn default() -> Self {
        Self::new(false)
    }
}

impl MediaTypeProvider for MediaTypeResolver {
    fn media_type_formats(&self, kind: PayloadKind) -> Cow<'_, [MediaTypeFormat]> {
        Cow::Borrowed(self.formats(kind))
    }
}

impl<T: MediaTypeProvider + ?Sized> MediaTypeProvider for &T {
    fn media_type_formats(&self, kind: PayloadKind) -> Cow<'_, [MediaTypeFormat]> {
        (**self).media_type_formats(kind)
    }
}

impl<T: MediaTypeProvider + ?Sized> MediaTypeProvider for Arc<T> {
    fn media_type_formats(&self, kind: PayloadKind) -> Cow<'_, [MediaTypeFormat]> {
        (**self).media_type_formats(kind)
    }
}

impl<T: MediaTypeProvider + ?Sized> MediaTypeProvider for Box<T> {
    fn media_type_formats(&self, kind: PayloadKind) -> Cow<'_, [MediaTypeFormat]> {
        (**self).media_type_formats(kind)
    }
}
