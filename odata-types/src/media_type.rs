//! Media types (MIME types) with ordered parameters.
//!
//! A media type is compared structurally: two values are the same candidate
//! only if type, subtype and the parameter sequence (including order) are
//! identical. Parameter *lookup* is case-insensitive and order-free.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An immutable `type/subtype` pair plus ordered, name-unique parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaType {
    type_name: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl MediaType {
    /// Creates a media type without parameters.
    #[must_use]
    pub fn new(type_name: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            subtype: subtype.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a media type with the given parameters.
    ///
    /// Later parameters replace earlier ones with the same (case-insensitive)
    /// name, keeping the position of the first occurrence.
    pub fn with_parameters<I, N, V>(
        type_name: impl Into<String>,
        subtype: impl Into<String>,
        parameters: I,
    ) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        parameters
            .into_iter()
            .fold(Self::new(type_name, subtype), |media_type, (name, value)| {
                media_type.with_parameter(name, value)
            })
    }

    /// Returns a copy of this media type with `name=value` appended.
    ///
    /// If a parameter with the same name already exists its value is replaced
    /// in place.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .parameters
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.parameters.push((name, value)),
        }
        self
    }

    /// Parses a media type such as `application/json;odata.metadata=minimal`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut segments = split_unquoted(s, ';').into_iter();
        let full_type = segments.next().unwrap_or_default().trim();
        let (type_name, subtype) = full_type
            .split_once('/')
            .ok_or_else(|| Error::InvalidMediaType(format!("missing '/' in {s:?}")))?;
        let (type_name, subtype) = (type_name.trim(), subtype.trim());
        if !is_token(type_name) || !is_token(subtype) {
            return Err(Error::InvalidMediaType(format!(
                "invalid type or subtype in {s:?}"
            )));
        }

        let mut media_type = Self::new(type_name, subtype);
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, value) = segment.split_once('=').ok_or_else(|| {
                Error::InvalidMediaType(format!("parameter without value: {segment:?}"))
            })?;
            let name = name.trim();
            if !is_token(name) {
                return Err(Error::InvalidMediaType(format!(
                    "invalid parameter name: {name:?}"
                )));
            }
            if media_type.parameter(name).is_some() {
                return Err(Error::InvalidMediaType(format!(
                    "duplicate parameter: {name:?}"
                )));
            }
            media_type
                .parameters
                .push((name.to_string(), unquote(value.trim())?));
        }
        Ok(media_type)
    }

    /// The top-level type, e.g. `application`.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The subtype, e.g. `json`.
    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// The parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Looks up a parameter value by case-insensitive name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if type and subtype match, ignoring ASCII case and
    /// parameters.
    #[must_use]
    pub fn has_same_type(&self, other: &MediaType) -> bool {
        self.type_name.eq_ignore_ascii_case(&other.type_name)
            && self.subtype.eq_ignore_ascii_case(&other.subtype)
    }

    /// Returns `true` if both media types carry the same parameter set,
    /// regardless of order. Names compare case-insensitively, values exactly.
    #[must_use]
    pub fn has_same_parameters(&self, other: &MediaType) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .all(|(name, value)| other.parameter(name) == Some(value.as_str()))
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Splits on `sep`, ignoring separators inside quoted strings.
fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == sep && !in_quotes => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn unquote(value: &str) -> Result<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return Ok(value.to_string());
    };
    let inner = inner
        .strip_suffix('"')
        .ok_or_else(|| Error::InvalidMediaType(format!("unterminated quoted value: {value:?}")))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name, self.subtype)?;
        for (name, value) in &self.parameters {
            if is_token(value) {
                write!(f, ";{name}={value}")?;
            } else {
                write!(f, ";{name}=\"")?;
                for c in value.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")?;
            }
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MediaType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<MediaType> for String {
    fn from(media_type: MediaType) -> Self {
        media_type.to_string()
    }
}
