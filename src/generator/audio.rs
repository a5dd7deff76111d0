use async_trait::async_trait;
use tracing::debug;

use crate::error::{ThumbError, ThumbResult};
use crate::generator::{not_possible, Generator, GeneratorContext, Thumbnail};
use crate::media::MediaDescriptor;
use crate::metadata::MediaKind;
use crate::transcoder::{cover_art_args, waveform_args};

/// Audio files: embedded cover art, or a rendered waveform when there is none.
///
/// Without a transcoder the cache is bypassed entirely and retrieval reports
/// `ThumbNotPossible`.
pub struct AudioGenerator {
    context: GeneratorContext,
}

impl AudioGenerator {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Generator for AudioGenerator {
    fn kind(&self) -> MediaKind {
        MediaKind::Audio
    }

    async fn exists(&self, media: &mut MediaDescriptor) -> bool {
        if self.context.transcoder.is_none() {
            return true;
        }
        self.context.cache.exists(media).await
    }

    async fn expired(&self, media: &mut MediaDescriptor) -> bool {
        if self.context.transcoder.is_none() {
            return false;
        }
        self.context.cache.expired(media).await
    }

    async fn generate(&self, media: &mut MediaDescriptor) -> ThumbResult<()> {
        let Some(transcoder) = self.context.transcoder.as_ref() else {
            return Ok(());
        };
        let file = self.context.source_file(media)?;
        let config = &self.context.config;

        let cover = match transcoder.capture(cover_art_args(&file, config.thumb_width)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %media.source_path(), error = %e, "cover art extraction failed");
                Vec::new()
            }
        };

        let thumb = if !cover.is_empty() {
            cover
        } else {
            debug!(path = %media.source_path(), "no cover art, rendering waveform");
            transcoder
                .capture(waveform_args(
                    &file,
                    config.thumb_width,
                    config.thumb_height,
                    &config.waveform_background,
                    &config.waveform_color,
                ))
                .await?
        };

        if thumb.is_empty() {
            return Err(ThumbError::generation(format!(
                "failed to generate thumbnail: {}",
                media.source_path()
            )));
        }
        self.context.cache.write(media, &thumb).await
    }

    async fn retrieve(&self, media: &MediaDescriptor) -> ThumbResult<Thumbnail> {
        if self.context.transcoder.is_none() {
            return Err(not_possible(media));
        }
        self.context.open_cached(media).await
    }
}
