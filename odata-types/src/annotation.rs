use crate::ODataValue;
use serde::{Deserialize, Serialize};

/// A named, typed out-of-band value attached to a resource or collection.
///
/// Names are case-sensitive and are conventionally namespace-qualified
/// (`Namespace.term`). Uniqueness per owner is checked by the codecs at
/// read/write time, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceAnnotation {
    pub name: String,
    pub value: ODataValue,
}

impl InstanceAnnotation {
    /// Creates a new instance annotation.
    pub fn new(name: impl Into<String>, value: impl Into<ODataValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
