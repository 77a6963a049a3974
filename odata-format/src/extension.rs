//! Deployment-supplied formats layered over a base provider.

use crate::{Encoding, MediaTypeFormat, MediaTypeProvider};
use odata_types::{MediaType, PayloadKind};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Extra candidates registered for a set of payload kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatExtension {
    pub kinds: Vec<PayloadKind>,
    pub formats: Vec<MediaTypeFormat>,
}

impl FormatExtension {
    /// Creates an extension.
    #[must_use]
    pub fn new(kinds: Vec<PayloadKind>, formats: Vec<MediaTypeFormat>) -> Self {
        Self { kinds, formats }
    }

    /// `text/x-vCard` for properties.
    #[must_use]
    pub fn vcard() -> Self {
        Self::new(
            vec![PayloadKind::Property],
            vec![MediaTypeFormat::new(
                MediaType::new("text", "x-vCard"),
                Encoding::custom("VCard"),
            )],
        )
    }

    /// `avro/binary` for resources, properties, collections, parameters and
    /// errors.
    #[must_use]
    pub fn avro() -> Self {
        Self::new(
            vec![
                PayloadKind::ResourceSet,
                PayloadKind::Resource,
                PayloadKind::Property,
                PayloadKind::Collection,
                PayloadKind::Parameter,
                PayloadKind::Error,
            ],
            vec![MediaTypeFormat::new(
                MediaType::new("avro", "binary"),
                Encoding::custom("Avro"),
            )],
        )
    }

    /// Returns `true` if this extension contributes candidates for `kind`.
    #[must_use]
    pub fn applies_to(&self, kind: PayloadKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// A provider that appends extension candidates after its base provider's.
///
/// Base candidates come back unchanged and in order; extension candidates
/// follow in registration order and always rank below every base candidate.
/// A candidate whose media type is already present is skipped.
#[derive(Debug, Clone)]
pub struct ExtendedResolver<P> {
    base: P,
    extensions: Vec<FormatExtension>,
}

impl<P: MediaTypeProvider> ExtendedResolver<P> {
    /// Wraps `base` with the given extensions.
    pub fn new(base: P, extensions: Vec<FormatExtension>) -> Self {
        Self { base, extensions }
    }

    /// Adds another extension after the ones already registered.
    #[must_use]
    pub fn with_extension(mut self, extension: FormatExtension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// The wrapped provider.
    pub fn base(&self) -> &P {
        &self.base
    }

    /// The registered extensions.
    pub fn extensions(&self) -> &[FormatExtension] {
        &self.extensions
    }
}

impl<P: MediaTypeProvider> MediaTypeProvider for ExtendedResolver<P> {
    fn media_type_formats(&self, kind: PayloadKind) -> Cow<'_, [MediaTypeFormat]> {
        let base = self.base.media_type_formats(kind);
        let mut extras = self
            .extensions
            .iter()
            .filter(|extension| extension.applies_to(kind))
            .flat_map(|extension| extension.formats.iter())
            .peekable();
        if extras.peek().is_none() {
            return base;
        }

        let mut formats = base.into_owned();
        for extra in extras {
            if !formats.iter().any(|f| f.media_type == extra.media_type) {
                formats.push(extra.clone());
            }
        }
        Cow::Owned(formats)
    }
}
