//! The entity reference link (`$ref`) object model.

use crate::{InstanceAnnotation, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// A single entity reference link: the URL of a resource plus any
/// instance annotations attached to it, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityReferenceLink {
    pub url: Url,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instance_annotations: Vec<InstanceAnnotation>,
}

impl EntityReferenceLink {
    /// Creates a link without annotations.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            instance_annotations: Vec::new(),
        }
    }

    /// Parses `url` and creates a link without annotations.
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(url)?))
    }

    /// Appends an instance annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: InstanceAnnotation) -> Self {
        self.instance_annotations.push(annotation);
        self
    }
}

/// A collection of entity reference links.
///
/// `links` is `None` until populated; `Some(vec![])` is a populated,
/// empty collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityReferenceLinks {
    pub links: Option<Vec<EntityReferenceLink>>,
    /// Total number of links on the server (`@odata.count`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    /// Link to the next page of results (`@odata.nextLink`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_link: Option<Url>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instance_annotations: Vec<InstanceAnnotation>,
}

impl EntityReferenceLinks {
    /// Creates an unpopulated collection (`links` is `None`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a populated collection.
    #[must_use]
    pub fn with_links(links: Vec<EntityReferenceLink>) -> Self {
        Self {
            links: Some(links),
            ..Self::default()
        }
    }

    /// Appends a collection-level instance annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: InstanceAnnotation) -> Self {
        self.instance_annotations.push(annotation);
        self
    }

    /// Returns the links, treating an unpopulated collection as empty.
    #[must_use]
    pub fn links(&self) -> &[EntityReferenceLink] {
        self.links.as_deref().unwrap_or_default()
    }

    /// Returns `true` once `links` has been set, even to an empty list.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.links.is_some()
    }
}
