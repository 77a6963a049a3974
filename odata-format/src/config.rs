use crate::{ExtendedResolver, FormatExtension, MediaTypeResolver};
use serde::{Deserialize, Serialize};

/// Configuration for the media type provider handed to readers and writers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Include the legacy Atom/XML candidates.
    #[serde(default)]
    pub enable_legacy: bool,
    /// Extra formats, appended in order after the base candidates.
    #[serde(default)]
    pub extensions: Vec<FormatExtension>,
}

impl ResolverConfig {
    /// Builds a provider over the shared resolver for the configured mode.
    #[must_use]
    pub fn build(&self) -> ExtendedResolver<&'static MediaTypeResolver> {
        ExtendedResolver::new(
            MediaTypeResolver::shared(self.enable_legacy),
            self.extensions.clone(),
        )
    }
}
