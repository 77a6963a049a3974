//! Duplicate instance annotation detection.

use crate::{JsonError, JsonResult};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;

/// The object an instance annotation is attached to.
///
/// Each owner is its own uniqueness domain: a name may appear once on the
/// collection and once on every link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationOwner {
    /// The top-level collection object.
    Collection,
    /// The link at this position in the `value` array.
    Link(usize),
}

impl fmt::Display for AnnotationOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationOwner::Collection => f.write_str("the collection"),
            AnnotationOwner::Link(index) => write!(f, "link {index}"),
        }
    }
}

/// Tracks annotation names seen per owner during one read or write pass.
///
/// Create a fresh guard for every pass; a guard is never reset or shared.
#[derive(Debug, Default)]
pub struct AnnotationGuard {
    seen: HashMap<AnnotationOwner, HashSet<String>>,
}

impl AnnotationGuard {
    /// Creates an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` for `owner`, failing on its second occurrence.
    pub fn track(&mut self, owner: AnnotationOwner, name: &str) -> JsonResult<()> {
        let names = self.seen.entry(owner).or_default();
        if names.contains(name) {
            debug!(annotation = name, %owner, "Duplicate instance annotation");
            return Err(JsonError::DuplicateAnnotation {
                name: name.to_string(),
                owner,
            });
        }
        names.insert(name.to_string());
        Ok(())
    }

    /// Number of distinct names recorded for `owner`.
    #[must_use]
    pub fn seen(&self, owner: AnnotationOwner) -> usize {
        self.seen.get(&owner).map_or(0, HashSet::len)
    }
}
