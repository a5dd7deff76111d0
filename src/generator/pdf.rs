use async_trait::async_trait;

use crate::assets::FallbackIcon;
use crate::error::{ThumbError, ThumbResult};
use crate::generator::{Generator, Thumbnail};
use crate::media::MediaDescriptor;
use crate::metadata::MediaKind;

/// PDFs are not rendered; the bundled document icon is their thumbnail.
#[derive(Debug, Default)]
pub struct PdfGenerator;

impl PdfGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Generator for PdfGenerator {
    fn kind(&self) -> MediaKind {
        MediaKind::Pdf
    }

    async fn exists(&self, media: &mut MediaDescriptor) -> bool {
        let available = FallbackIcon::Pdf.is_available();
        let modified = available.then(|| media.source_modified());
        media.set_thumb_modified(modified);
        available
    }

    async fn expired(&self, media: &mut MediaDescriptor) -> bool {
        !self.exists(media).await
    }

    async fn generate(&self, media: &mut MediaDescriptor) -> ThumbResult<()> {
        if !self.exists(media).await {
            return Err(ThumbError::generation("no pdf thumbnail available"));
        }
        Ok(())
    }

    async fn retrieve(&self, _media: &MediaDescriptor) -> ThumbResult<Thumbnail> {
        let icon = FallbackIcon::Pdf;
        Ok(Thumbnail {
            path: icon.name().to_string(),
            content_type: icon.content_type(),
            modified: None,
            stream: icon.stream(),
        })
    }
}
