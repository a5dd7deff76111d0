use async_trait::async_trait;
use tracing::debug;

use crate::error::{ThumbError, ThumbResult};
use crate::generator::{not_possible, Generator, GeneratorContext, Thumbnail};
use crate::media::MediaDescriptor;
use crate::metadata::MediaKind;
use crate::timecode;
use crate::transcoder::{find_duration, video_frame_args};

/// Videos: one frame a third of the way in, scaled by the transcoder.
pub struct VideoGenerator {
    context: GeneratorContext,
}

impl VideoGenerator {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Generator for VideoGenerator {
    fn kind(&self) -> MediaKind {
        MediaKind::Video
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

        let probe = transcoder.probe(&file).await?;
        let duration = find_duration(&probe).ok_or_else(|| {
            ThumbError::generation(format!(
                "cannot find video duration: {}",
                media.source_path()
            ))
        })?;
        let offset = timecode::thumbnail_offset(duration);
        debug!(path = %media.source_path(), %duration, %offset, "extracting video frame");

        let config = &self.context.config;
        let frame = transcoder
            .capture(video_frame_args(&file, &offset, config.thumb_width, config.thumb_height))
            .await?;
        if frame.is_empty() {
            return Err(ThumbError::generation(format!(
                "empty thumbnail: {}",
                media.thumb_path()
            )));
        }
        self.context.cache.write(media, &frame).await
    }

    async fn retrieve(&self, media: &MediaDescriptor) -> ThumbResult<Thumbnail> {
        if self.context.transcoder.is_none() {
            return Err(not_possible(media));
        }
        self.context.open_cached(media).await
    }
}
