//! Reading entity reference link payloads.
//!
//! The payload is walked member by member through serde's `MapAccess`, so
//! repeated names stay visible to the annotation guard instead of being
//! collapsed by an intermediate map.

use crate::{
    AnnotationFilter, AnnotationGuard, AnnotationOwner, JsonError, JsonResult, ReaderSettings,
    ODATA_CONTEXT, ODATA_COUNT, ODATA_ID, ODATA_NAMESPACE, ODATA_NEXT_LINK, VALUE,
};
use odata_types::{EntityReferenceLink, EntityReferenceLinks, InstanceAnnotation, ODataValue};
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::de::SliceRead;
use std::fmt;
use std::io::Read;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;
use url::Url;

/// Deserializes entity reference links from JSON.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLinksDeserializer {
    settings: ReaderSettings,
}

impl ReferenceLinksDeserializer {
    #[must_use]
    pub fn new(settings: ReaderSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Parses a collection payload. A duplicate annotation aborts the pass
    /// with no partial result.
    pub fn read_entity_reference_links(&self, bytes: &[u8]) -> JsonResult<EntityReferenceLinks> {
        let links = self.parse(bytes, |de, state| LinksSeed { state }.deserialize(de))?;
        trace!(
            links = links.links().len(),
            bytes = bytes.len(),
            "Read entity reference links"
        );
        Ok(links)
    }

    /// Parses a single-link payload.
    pub fn read_entity_reference_link(&self, bytes: &[u8]) -> JsonResult<EntityReferenceLink> {
        let link = self.parse(bytes, |de, state| {
            LinkSeed {
                state,
                owner: AnnotationOwner::Link(0),
                top_level: true,
            }
            .deserialize(de)
        })?;
        trace!(bytes = bytes.len(), "Read entity reference link");
        Ok(link)
    }

    /// Buffers a blocking stream, then parses it as a collection payload.
    pub fn read_from<R: Read>(&self, reader: R) -> JsonResult<EntityReferenceLinks> {
        let bytes = self.buffer(reader)?;
        self.read_entity_reference_links(&bytes)
    }

    /// Buffers a blocking stream, then parses it as a single-link payload.
    pub fn read_link_from<R: Read>(&self, reader: R) -> JsonResult<EntityReferenceLink> {
        let bytes = self.buffer(reader)?;
        self.read_entity_reference_link(&bytes)
    }

    /// Buffers an async stream, then parses it as a collection payload.
    pub async fn read_from_async<R>(&self, reader: R) -> JsonResult<EntityReferenceLinks>
    where
        R: AsyncRead + Unpin,
    {
        let bytes = self.buffer_async(reader).await?;
        self.read_entity_reference_links(&bytes)
    }

    /// Buffers an async stream, then parses it as a single-link payload.
    pub async fn read_link_from_async<R>(&self, reader: R) -> JsonResult<EntityReferenceLink>
    where
        R: AsyncRead + Unpin,
    {
        let bytes = self.buffer_async(reader).await?;
        self.read_entity_reference_link(&bytes)
    }

    fn parse<'b, T>(
        &self,
        bytes: &'b [u8],
        read: impl FnOnce(
            &mut serde_json::Deserializer<SliceRead<'b>>,
            &mut ReadState<'_>,
        ) -> Result<T, serde_json::Error>,
    ) -> JsonResult<T> {
        let mut state = ReadState::new(&self.settings);
        let mut de = serde_json::Deserializer::from_slice(bytes);
        let result = read(&mut de, &mut state).and_then(|value| de.end().map(|()| value));
        result.map_err(|err| state.failure.take().unwrap_or_else(|| classify(err)))
    }

    fn buffer<R: Read>(&self, reader: R) -> JsonResult<Vec<u8>> {
        let limit = self.settings.max_payload_size;
        let mut bytes = Vec::new();
        reader.take(read_limit(limit)).read_to_end(&mut bytes)?;
        check_size(bytes, limit)
    }

    async fn buffer_async<R>(&self, reader: R) -> JsonResult<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let limit = self.settings.max_payload_size;
        let mut bytes = Vec::new();
        reader.take(read_limit(limit)).read_to_end(&mut bytes).await?;
        check_size(bytes, limit)
    }
}

/// One byte past the limit, so an oversized stream is detectable.
fn read_limit(limit: usize) -> u64 {
    u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1)
}

fn check_size(bytes: Vec<u8>, limit: usize) -> JsonResult<Vec<u8>> {
    if bytes.len() > limit {
        return Err(JsonError::PayloadTooLarge(limit));
    }
    Ok(bytes)
}

/// Syntax errors stay JSON errors; well-formed JSON of the wrong shape is
/// a malformed payload.
fn classify(err: serde_json::Error) -> JsonError {
    if err.is_data() {
        JsonError::Malformed(err.to_string())
    } else {
        JsonError::Json(err)
    }
}

/// Undoes the IEEE754-compatible encoding, which writes every `Int64` as a
/// JSON string.
fn restore_int64(value: ODataValue) -> ODataValue {
    match value {
        ODataValue::String(s) => match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => ODataValue::Int64(n),
            _ => ODataValue::String(s),
        },
        ODataValue::Collection(items) => {
            ODataValue::Collection(items.into_iter().map(restore_int64).collect())
        }
        ODataValue::Resource(members) => ODataValue::Resource(
            members
                .into_iter()
                .map(|(name, member)| (name, restore_int64(member)))
                .collect(),
        ),
        other => other,
    }
}

/// Shared state of one read pass.
struct ReadState<'f> {
    guard: AnnotationGuard,
    filter: &'f AnnotationFilter,
    /// Integer-valued strings in annotation values are read as `Int64`.
    ieee754_compatible: bool,
    /// The typed error behind the most recent serde error, if any.
    failure: Option<JsonError>,
}

impl<'f> ReadState<'f> {
    fn new(settings: &'f ReaderSettings) -> Self {
        Self {
            guard: AnnotationGuard::new(),
            filter: &settings.annotation_filter,
            ieee754_compatible: settings.ieee754_compatible,
            failure: None,
        }
    }

    fn fail<E: de::Error>(&mut self, err: JsonError) -> E {
        let serde_err = E::custom(&err);
        self.failure = Some(err);
        serde_err
    }

    fn malformed<E: de::Error>(&mut self, message: impl Into<String>) -> E {
        self.fail(JsonError::Malformed(message.into()))
    }

    /// Reads the value of an `@name` member: reserved names are rejected,
    /// the name is tracked, and the annotation is kept if the filter allows.
    fn annotation<'de, A: MapAccess<'de>>(
        &mut self,
        map: &mut A,
        owner: AnnotationOwner,
        name: &str,
        out: &mut Vec<InstanceAnnotation>,
    ) -> Result<(), A::Error> {
        if name.is_empty() || name.starts_with(ODATA_NAMESPACE) {
            return Err(self.malformed(format!("unexpected annotation '@{name}' on {owner}")));
        }
        if let Err(err) = self.guard.track(owner, name) {
            return Err(self.fail(err));
        }
        let mut value: ODataValue = map.next_value()?;
        if self.ieee754_compatible {
            value = restore_int64(value);
        }
        if self.filter.matches(name) {
            out.push(InstanceAnnotation {
                name: name.to_string(),
                value,
            });
        }
        Ok(())
    }

    fn url<E: de::Error>(&mut self, member: &str, raw: &str) -> Result<Url, E> {
        Url::parse(raw).map_err(|err| self.malformed(format!("invalid URL in '{member}': {err}")))
    }
}

// ── Collection ─────────────────────────────────────────────────────

struct LinksSeed<'s, 'f> {
    state: &'s mut ReadState<'f>,
}

impl<'de> DeserializeSeed<'de> for LinksSeed<'_, '_> {
    type Value = EntityReferenceLinks;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for LinksSeed<'_, '_> {
    type Value = EntityReferenceLinks;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an entity reference links object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let state = self.state;
        let mut result = EntityReferenceLinks::new();
        let mut seen_context = false;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                ODATA_CONTEXT => {
                    if std::mem::replace(&mut seen_context, true) {
                        return Err(state.malformed("duplicate '@odata.context'"));
                    }
                    map.next_value::<IgnoredAny>()?;
                }
                ODATA_COUNT => {
                    if result.count.is_some() {
                        return Err(state.malformed("duplicate '@odata.count'"));
                    }
                    result.count = Some(map.next_value::<Count>()?.0);
                }
                ODATA_NEXT_LINK => {
                    if result.next_page_link.is_some() {
                        return Err(state.malformed("duplicate '@odata.nextLink'"));
                    }
                    let raw: String = map.next_value()?;
                    result.next_page_link = Some(state.url::<A::Error>(ODATA_NEXT_LINK, &raw)?);
                }
                VALUE => {
                    if result.links.is_some() {
                        return Err(state.malformed("duplicate 'value' property"));
                    }
                    result.links = Some(map.next_value_seed(LinkArraySeed {
                        state: &mut *state,
                    })?);
                }
                other => match other.strip_prefix('@') {
                    Some(name) => state.annotation(
                        &mut map,
                        AnnotationOwner::Collection,
                        name,
                        &mut result.instance_annotations,
                    )?,
                    None => {
                        return Err(state.malformed(format!("unexpected property '{other}'")));
                    }
                },
            }
        }

        if result.links.is_none() {
            return Err(state.malformed("missing 'value' property"));
        }
        Ok(result)
    }
}

struct LinkArraySeed<'s, 'f> {
    state: &'s mut ReadState<'f>,
}

impl<'de> DeserializeSeed<'de> for LinkArraySeed<'_, '_> {
    type Value = Vec<EntityReferenceLink>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for LinkArraySeed<'_, '_> {
    type Value = Vec<EntityReferenceLink>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of entity reference links")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut links = Vec::new();
        loop {
            let seed = LinkSeed {
                state: &mut *self.state,
                owner: AnnotationOwner::Link(links.len()),
                top_level: false,
            };
            match seq.next_element_seed(seed)? {
                Some(link) => links.push(link),
                None => break,
            }
        }
        Ok(links)
    }
}

// ── Link ───────────────────────────────────────────────────────────

struct LinkSeed<'s, 'f> {
    state: &'s mut ReadState<'f>,
    owner: AnnotationOwner,
    /// A single-link payload may carry `@odata.context`.
    top_level: bool,
}

impl<'de> DeserializeSeed<'de> for LinkSeed<'_, '_> {
    type Value = EntityReferenceLink;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for LinkSeed<'_, '_> {
    type Value = EntityReferenceLink;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an entity reference link object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let LinkSeed {
            state,
            owner,
            top_level,
        } = self;
        let mut url: Option<Url> = None;
        let mut annotations = Vec::new();
        let mut seen_context = false;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                ODATA_ID => {
                    if url.is_some() {
                        return Err(state.malformed(format!("duplicate '@odata.id' on {owner}")));
                    }
                    let raw: String = map.next_value()?;
                    url = Some(state.url::<A::Error>(ODATA_ID, &raw)?);
                }
                ODATA_CONTEXT if top_level => {
                    if std::mem::replace(&mut seen_context, true) {
                        return Err(state.malformed("duplicate '@odata.context'"));
                    }
                    map.next_value::<IgnoredAny>()?;
                }
                other => match other.strip_prefix('@') {
                    Some(name) => state.annotation(&mut map, owner, name, &mut annotations)?,
                    None => {
                        return Err(
                            state.malformed(format!("unexpected property '{other}' on {owner}"))
                        );
                    }
                },
            }
        }

        let Some(url) = url else {
            return Err(state.malformed(format!("missing '@odata.id' on {owner}")));
        };
        Ok(EntityReferenceLink {
            url,
            instance_annotations: annotations,
        })
    }
}

// ── Count ──────────────────────────────────────────────────────────

/// `@odata.count` as a JSON number or, from IEEE754-compatible writers, a
/// numeric string.
struct Count(i64);

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CountVisitor)
    }
}

struct CountVisitor;

impl Visitor<'_> for CountVisitor {
    type Value = Count;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer count")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Count, E> {
        Ok(Count(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Count, E> {
        i64::try_from(v)
            .map(Count)
            .map_err(|_| E::custom(format!("count {v} out of range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Count, E> {
        v.parse()
            .map(Count)
            .map_err(|_| E::custom(format!("invalid count '{v}'")))
    }
}
