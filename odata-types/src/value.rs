//! Typed protocol values carried by instance annotations.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// A protocol value.
///
/// Resource values keep their member order, so a value read from the wire
/// serializes back to the same member sequence.
///
/// `Int32` and `Int64` compare by numeric value: the wire carries no width,
/// so `Int64(5)` and `Int32(5)` are the same value.
#[derive(Debug, Clone)]
pub enum ODataValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    Collection(Vec<ODataValue>),
    Resource(Vec<(String, ODataValue)>),
}

impl ODataValue {
    /// Returns `true` for [`ODataValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ODataValue::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ODataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as `i64` if it is an integer of either width.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ODataValue::Int32(n) => Some(i64::from(*n)),
            ODataValue::Int64(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ODataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The protocol spelling of a non-finite double (`NaN`, `INF`, `-INF`),
    /// which JSON has no number literal for.
    #[must_use]
    pub fn non_finite_literal(n: f64) -> Option<&'static str> {
        if n.is_nan() {
            Some("NaN")
        } else if n.is_infinite() {
            Some(if n > 0.0 { "INF" } else { "-INF" })
        } else {
            None
        }
    }

    /// Narrows an integer to the smallest variant that holds it.
    fn integer(n: i64) -> Self {
        i32::try_from(n).map_or(ODataValue::Int64(n), ODataValue::Int32)
    }
}

impl PartialEq for ODataValue {
    fn eq(&self, other: &Self) -> bool {
        use ODataValue::*;
        match (self, other) {
            (Int32(_) | Int64(_), Int32(_) | Int64(_)) => self.as_i64() == other.as_i64(),
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Collection(a), Collection(b)) => a == b,
            (Resource(a), Resource(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for ODataValue {
    fn from(b: bool) -> Self {
        ODataValue::Boolean(b)
    }
}

impl From<i32> for ODataValue {
    fn from(n: i32) -> Self {
        ODataValue::Int32(n)
    }
}

impl From<i64> for ODataValue {
    fn from(n: i64) -> Self {
        ODataValue::Int64(n)
    }
}

impl From<f64> for ODataValue {
    fn from(n: f64) -> Self {
        ODataValue::Double(n)
    }
}

impl From<&str> for ODataValue {
    fn from(s: &str) -> Self {
        ODataValue::String(s.to_string())
    }
}

impl From<String> for ODataValue {
    fn from(s: String) -> Self {
        ODataValue::String(s)
    }
}

impl<T: Into<ODataValue>> From<Vec<T>> for ODataValue {
    fn from(items: Vec<T>) -> Self {
        ODataValue::Collection(items.into_iter().map(Into::into).collect())
    }
}

impl Serialize for ODataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ODataValue::Null => serializer.serialize_unit(),
            ODataValue::Boolean(b) => serializer.serialize_bool(*b),
            ODataValue::Int32(n) => serializer.serialize_i32(*n),
            ODataValue::Int64(n) => serializer.serialize_i64(*n),
            ODataValue::Double(n) => match ODataValue::non_finite_literal(*n) {
                Some(literal) => serializer.serialize_str(literal),
                None => serializer.serialize_f64(*n),
            },
            ODataValue::String(s) => serializer.serialize_str(s),
            ODataValue::Collection(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ODataValue::Resource(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (name, value) in members {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ODataValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ODataValueVisitor)
    }
}

struct ODataValueVisitor;

impl<'de> Visitor<'de> for ODataValueVisitor {
    type Value = ODataValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a protocol value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<ODataValue, E> {
        Ok(ODataValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<ODataValue, E> {
        Ok(ODataValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ODataValue, D::Error> {
        ODataValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<ODataValue, E> {
        Ok(ODataValue::Boolean(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<ODataValue, E> {
        Ok(ODataValue::integer(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<ODataValue, E> {
        match i64::try_from(n) {
            Ok(n) => Ok(ODataValue::integer(n)),
            // Out of Int64 range; keep the magnitude as a double.
            Err(_) => Ok(ODataValue::Double(n as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<ODataValue, E> {
        Ok(ODataValue::Double(n))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<ODataValue, E> {
        Ok(ODataValue::String(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<ODataValue, E> {
        Ok(ODataValue::String(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ODataValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ODataValue::Collection(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ODataValue, A::Error> {
        let mut members: Vec<(String, ODataValue)> = Vec::new();
        while let Some((name, value)) = map.next_entry::<String, ODataValue>()? {
            if members.iter().any(|(existing, _)| *existing == name) {
                return Err(de::Error::custom(format!("duplicate member name: {name}")));
            }
            members.push((name, value));
        }
        Ok(ODataValue::Resource(members))
    }
}
