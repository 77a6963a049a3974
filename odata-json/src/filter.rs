//! Instance annotation filters (`odata.include-annotations`).
//!
//! A filter is a comma-separated list of patterns:
//! - `*` matches every annotation
//! - `Namespace.*` matches every annotation in `Namespace` (and below)
//! - `Namespace.term` matches exactly one annotation
//!
//! Any pattern may be prefixed with `-` to exclude instead of include. The
//! most specific matching pattern decides; when an include and an exclude
//! are equally specific, the exclude wins.

use crate::{JsonError, JsonResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    All,
    Namespace(String),
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pattern {
    target: Target,
    exclude: bool,
}

impl Pattern {
    fn parse(raw: &str) -> JsonResult<Self> {
        let (exclude, body) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest.trim()),
            None => (false, raw),
        };
        let target = if body == "*" {
            Target::All
        } else if let Some(namespace) = body.strip_suffix(".*") {
            if namespace.is_empty() || namespace.contains('*') {
                return Err(JsonError::InvalidFilter(raw.to_string()));
            }
            Target::Namespace(namespace.to_string())
        } else if body.is_empty() || body.contains('*') {
            return Err(JsonError::InvalidFilter(raw.to_string()));
        } else {
            Target::Exact(body.to_string())
        };
        Ok(Self { target, exclude })
    }

    /// Specificity of this pattern against `name`, or `None` if it does
    /// not match.
    fn specificity(&self, name: &str) -> Option<usize> {
        match &self.target {
            Target::All => Some(0),
            Target::Namespace(namespace) => name
                .strip_prefix(namespace.as_str())
                .filter(|rest| rest.starts_with('.'))
                .map(|_| 1 + namespace.len()),
            Target::Exact(exact) => (exact == name).then_some(usize::MAX),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exclude {
            f.write_str("-")?;
        }
        match &self.target {
            Target::All => f.write_str("*"),
            Target::Namespace(namespace) => write!(f, "{namespace}.*"),
            Target::Exact(exact) => f.write_str(exact),
        }
    }
}

/// Decides which instance annotations are read or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnnotationFilter {
    patterns: Vec<Pattern>,
}

impl AnnotationFilter {
    /// A filter that includes every annotation (`*`).
    #[must_use]
    pub fn all() -> Self {
        Self {
            patterns: vec![Pattern {
                target: Target::All,
                exclude: false,
            }],
        }
    }

    /// A filter that includes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Parses a comma-separated pattern list. An empty string yields
    /// [`AnnotationFilter::none`].
    pub fn parse(s: &str) -> JsonResult<Self> {
        if s.trim().is_empty() {
            return Ok(Self::none());
        }
        let patterns = s
            .split(',')
            .map(|raw| Pattern::parse(raw.trim()))
            .collect::<JsonResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Returns `true` if an annotation named `name` passes the filter.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let mut best: Option<(usize, bool)> = None;
        for pattern in &self.patterns {
            let Some(specificity) = pattern.specificity(name) else {
                continue;
            };
            best = match best {
                Some((current, exclude)) if current > specificity => Some((current, exclude)),
                Some((current, exclude)) if current == specificity => {
                    Some((current, exclude || pattern.exclude))
                }
                _ => Some((specificity, pattern.exclude)),
            };
        }
        matches!(best, Some((_, false)))
    }
}

impl Default for AnnotationFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for AnnotationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pattern) in self.patterns.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{pattern}")?;
        }
        Ok(())
    }
}

impl FromStr for AnnotationFilter {
    type Err = JsonError;

    fn from_str(s: &str) -> JsonResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AnnotationFilter {
    type Error = JsonError;

    fn try_from(s: String) -> JsonResult<Self> {
        Self::parse(&s)
    }
}

impl From<AnnotationFilter> for String {
    fn from(filter: AnnotationFilter) -> Self {
        filter.to_string()
    }
}
