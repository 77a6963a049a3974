//! `@odata.context` values for reference-link payloads.

use url::Url;

/// Context URL of a collection of entity reference links.
#[must_use]
pub fn entity_reference_links(service_root: &Url) -> String {
    format!("{}/$metadata#Collection($ref)", trimmed(service_root))
}

/// Context URL of a single entity reference link.
#[must_use]
pub fn entity_reference_link(service_root: &Url) -> String {
    format!("{}/$metadata#$ref", trimmed(service_root))
}

fn trimmed(service_root: &Url) -> &str {
    service_root.as_str().trim_end_matches('/')
}
