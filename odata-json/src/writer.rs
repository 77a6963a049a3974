//! A compact, order-preserving JSON writer.
//!
//! Object members are written in the order the caller emits them, and the
//! writer never merges or reorders names; duplicate checks are the caller's
//! job (see [`AnnotationGuard`](crate::AnnotationGuard)).

use crate::JsonResult;
use odata_types::ODataValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Object,
    Array,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    items: usize,
}

#[derive(Debug)]
pub(crate) struct JsonWriter {
    buf: Vec<u8>,
    scopes: Vec<Scope>,
    ieee754_compatible: bool,
}

impl JsonWriter {
    /// With `ieee754_compatible`, `Int64` values are written as strings.
    pub(crate) fn new(ieee754_compatible: bool) -> Self {
        Self {
            buf: Vec::with_capacity(256),
            scopes: Vec::new(),
            ieee754_compatible,
        }
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        debug_assert!(self.scopes.is_empty(), "unclosed JSON scope");
        self.buf
    }

    pub(crate) fn start_object(&mut self) {
        self.before_value();
        self.buf.push(b'{');
        self.scopes.push(Scope {
            kind: ScopeKind::Object,
            items: 0,
        });
    }

    pub(crate) fn end_object(&mut self) {
        debug_assert_eq!(self.scopes.last().map(|s| s.kind), Some(ScopeKind::Object));
        self.scopes.pop();
        self.buf.push(b'}');
    }

    pub(crate) fn start_array(&mut self) {
        self.before_value();
        self.buf.push(b'[');
        self.scopes.push(Scope {
            kind: ScopeKind::Array,
            items: 0,
        });
    }

    pub(crate) fn end_array(&mut self) {
        debug_assert_eq!(self.scopes.last().map(|s| s.kind), Some(ScopeKind::Array));
        self.scopes.pop();
        self.buf.push(b']');
    }

    /// Writes an object member name; the next write is its value.
    pub(crate) fn write_name(&mut self, name: &str) -> JsonResult<()> {
        if let Some(scope) = self.scopes.last_mut() {
            debug_assert_eq!(scope.kind, ScopeKind::Object);
            if scope.items > 0 {
                self.buf.push(b',');
            }
            scope.items += 1;
        }
        serde_json::to_writer(&mut self.buf, name)?;
        self.buf.push(b':');
        Ok(())
    }

    pub(crate) fn write_str(&mut self, s: &str) -> JsonResult<()> {
        self.before_value();
        serde_json::to_writer(&mut self.buf, s)?;
        Ok(())
    }

    pub(crate) fn write_i64(&mut self, n: i64) -> JsonResult<()> {
        self.before_value();
        if self.ieee754_compatible {
            serde_json::to_writer(&mut self.buf, &n.to_string())?;
        } else {
            self.buf.extend_from_slice(n.to_string().as_bytes());
        }
        Ok(())
    }

    pub(crate) fn write_value(&mut self, value: &ODataValue) -> JsonResult<()> {
        match value {
            ODataValue::Null => self.write_raw(b"null"),
            ODataValue::Boolean(true) => self.write_raw(b"true"),
            ODataValue::Boolean(false) => self.write_raw(b"false"),
            ODataValue::Int32(n) => self.write_raw(n.to_string().as_bytes()),
            ODataValue::Int64(n) => self.write_i64(*n)?,
            ODataValue::Double(n) => self.write_f64(*n)?,
            ODataValue::String(s) => self.write_str(s)?,
            ODataValue::Collection(items) => {
                self.start_array();
                for item in items {
                    self.write_value(item)?;
                }
                self.end_array();
            }
            ODataValue::Resource(members) => {
                self.start_object();
                for (name, member) in members {
                    self.write_name(name)?;
                    self.write_value(member)?;
                }
                self.end_object();
            }
        }
        Ok(())
    }

    fn write_f64(&mut self, n: f64) -> JsonResult<()> {
        if let Some(literal) = ODataValue::non_finite_literal(n) {
            return self.write_str(literal);
        }
        self.before_value();
        serde_json::to_writer(&mut self.buf, &n)?;
        Ok(())
    }

    fn write_raw(&mut self, bytes: &[u8]) {
        self.before_value();
        self.buf.extend_from_slice(bytes);
    }

    /// Inserts the separator for array elements. Object member values need
    /// none; their separator was written with the name.
    fn before_value(&mut self) {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.kind == ScopeKind::Array {
                if scope.items > 0 {
                    self.buf.push(b',');
                }
                scope.items += 1;
            }
        }
    }
}
