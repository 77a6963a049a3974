//! Writing entity reference link payloads.

use crate::writer::JsonWriter;
use crate::{
    AnnotationGuard, AnnotationOwner, JsonError, JsonResult, WriterSettings, ODATA_CONTEXT,
    ODATA_COUNT, ODATA_ID, ODATA_NAMESPACE, ODATA_NEXT_LINK, VALUE,
};
use odata_types::{EntityReferenceLink, EntityReferenceLinks, InstanceAnnotation};
use std::io::Write;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Serializes entity reference links to compact JSON.
///
/// Every pass renders the complete payload into memory before touching the
/// output stream, so a failed pass writes nothing in blocking and async
/// mode alike.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLinksSerializer {
    settings: WriterSettings,
}

impl ReferenceLinksSerializer {
    #[must_use]
    pub fn new(settings: WriterSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// Renders a collection payload:
    /// `@odata.context`, `@odata.count`, collection annotations, `value`,
    /// `@odata.nextLink`. An unpopulated collection is written with an
    /// empty `value` array.
    pub fn write_entity_reference_links(&self, links: &EntityReferenceLinks) -> JsonResult<Vec<u8>> {
        let mut guard = AnnotationGuard::new();
        let mut writer = JsonWriter::new(self.settings.ieee754_compatible);

        writer.start_object();
        writer.write_name(ODATA_CONTEXT)?;
        writer.write_str(&self.settings.context_url)?;

        if let Some(count) = links.count {
            writer.write_name(ODATA_COUNT)?;
            writer.write_i64(count)?;
        }

        self.write_annotations(
            &mut writer,
            &mut guard,
            AnnotationOwner::Collection,
            &links.instance_annotations,
        )?;

        writer.write_name(VALUE)?;
        writer.start_array();
        for (index, link) in links.links().iter().enumerate() {
            writer.start_object();
            self.write_link_members(&mut writer, &mut guard, AnnotationOwner::Link(index), link)?;
            writer.end_object();
        }
        writer.end_array();

        if let Some(next_page_link) = &links.next_page_link {
            writer.write_name(ODATA_NEXT_LINK)?;
            writer.write_str(next_page_link.as_str())?;
        }
        writer.end_object();

        let bytes = writer.into_inner();
        trace!(
            links = links.links().len(),
            bytes = bytes.len(),
            "Wrote entity reference links"
        );
        Ok(bytes)
    }

    /// Renders a single-link payload:
    /// `{"@odata.context":…,"@odata.id":…,<annotations>}`.
    pub fn write_entity_reference_link(&self, link: &EntityReferenceLink) -> JsonResult<Vec<u8>> {
        let mut guard = AnnotationGuard::new();
        let mut writer = JsonWriter::new(self.settings.ieee754_compatible);

        writer.start_object();
        writer.write_name(ODATA_CONTEXT)?;
        writer.write_str(&self.settings.context_url)?;
        self.write_link_members(&mut writer, &mut guard, AnnotationOwner::Link(0), link)?;
        writer.end_object();

        let bytes = writer.into_inner();
        trace!(bytes = bytes.len(), "Wrote entity reference link");
        Ok(bytes)
    }

    /// Writes a collection payload to a blocking stream and flushes it.
    pub fn write_to<W: Write>(&self, mut writer: W, links: &EntityReferenceLinks) -> JsonResult<()> {
        let bytes = self.write_entity_reference_links(links)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes a single-link payload to a blocking stream and flushes it.
    pub fn write_link_to<W: Write>(&self, mut writer: W, link: &EntityReferenceLink) -> JsonResult<()> {
        let bytes = self.write_entity_reference_link(link)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes a collection payload to an async stream and flushes it.
    pub async fn write_to_async<W>(&self, mut writer: W, links: &EntityReferenceLinks) -> JsonResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = self.write_entity_reference_links(links)?;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Writes a single-link payload to an async stream and flushes it.
    pub async fn write_link_to_async<W>(&self, mut writer: W, link: &EntityReferenceLink) -> JsonResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = self.write_entity_reference_link(link)?;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    fn write_link_members(
        &self,
        writer: &mut JsonWriter,
        guard: &mut AnnotationGuard,
        owner: AnnotationOwner,
        link: &EntityReferenceLink,
    ) -> JsonResult<()> {
        writer.write_name(ODATA_ID)?;
        writer.write_str(link.url.as_str())?;
        self.write_annotations(writer, guard, owner, &link.instance_annotations)
    }

    /// Every annotation is checked for duplicates, including those the
    /// filter then leaves out.
    fn write_annotations(
        &self,
        writer: &mut JsonWriter,
        guard: &mut AnnotationGuard,
        owner: AnnotationOwner,
        annotations: &[InstanceAnnotation],
    ) -> JsonResult<()> {
        for annotation in annotations {
            let name = annotation.name.as_str();
            if name.is_empty() || name.starts_with(ODATA_NAMESPACE) {
                return Err(JsonError::InvalidAnnotationName(name.to_string()));
            }
            guard.track(owner, name)?;
            if !self.settings.annotation_filter.matches(name) {
                continue;
            }
            writer.write_name(&format!("@{name}"))?;
            writer.write_value(&annotation.value)?;
        }
        Ok(())
    }
}
