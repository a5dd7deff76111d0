use async_trait::async_trait;

use crate::error::{ThumbError, ThumbErrorKind, ThumbResult};
use crate::generator::{thumb_content_type, Generator, GeneratorContext, Thumbnail};
use crate::media::MediaDescriptor;
use crate::metadata::MediaKind;

/// Vector images are served as their own thumbnail.
pub struct SvgGenerator {
    context: GeneratorContext,
}

impl SvgGenerator {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Generator for SvgGenerator {
    fn kind(&self) -> MediaKind {
        MediaKind::Svg
    }

    async fn exists(&self, media: &mut MediaDescriptor) -> bool {
        let found = media.refresh_source(&*self.context.source).await;
        let modified = found.then(|| media.source_modified());
        media.set_thumb_modified(modified);
        found
    }

    async fn expired(&self, media: &mut MediaDescriptor) -> bool {
        !self.exists(media).await
    }

    async fn generate(&self, media: &mut MediaDescriptor) -> ThumbResult<()> {
        if self.exists(media).await {
            Ok(())
        } else {
            Err(ThumbError::generation(format!(
                "svg source disappeared: {}",
                media.source_path()
            )))
        }
    }

    async fn retrieve(&self, media: &MediaDescriptor) -> ThumbResult<Thumbnail> {
        let content_type = thumb_content_type(media)?;
        let stream = self.context.source.open(media.source_path()).await.map_err(|e| {
            ThumbError::with_source(
                ThumbErrorKind::ThumbNotFound,
                format!("svg not found: {}", media.source_path()),
                Box::new(e),
            )
        })?;
        Ok(Thumbnail {
            path: media.thumb_path().to_string(),
            content_type,
            modified: Some(media.source_modified()),
            stream,
        })
    }
}
