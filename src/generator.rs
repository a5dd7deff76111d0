//! Thumbnail generators
//!
//! Every [`MediaKind`] except `Unsupported` has exactly one [`Generator`] in the
//! [`GeneratorTable`]. Callers never branch on the kind themselves: they look the
//! generator up and go through `exists`/`expired`/`generate`/`retrieve`.

pub mod audio;
pub mod image;
pub mod pdf;
pub mod svg;
pub mod video;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use crate::cache::ThumbnailCache;
use crate::config::ThumbConfig;
use crate::error::{ThumbError, ThumbErrorKind, ThumbResult};
use crate::iostream::InputStream;
use crate::media::MediaDescriptor;
use crate::metadata::MediaKind;
use crate::store::SourceStore;
use crate::transcoder::Transcoder;

pub use self::audio::AudioGenerator;
pub use self::image::ImageGenerator;
pub use self::pdf::PdfGenerator;
pub use self::svg::SvgGenerator;
pub use self::video::VideoGenerator;

/// A readable thumbnail, ready to be served.
pub struct Thumbnail {
    pub path: String,
    pub content_type: &'static str,
    pub modified: Option<SystemTime>,
    pub stream: Box<dyn InputStream>,
}

impl Thumbnail {
    pub async fn into_bytes(mut self) -> ThumbResult<Vec<u8>> {
        let mut data = Vec::new();
        self.stream.read_to_end(&mut data).await?;
        self.stream.close()?;
        Ok(data)
    }
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("path", &self.path)
            .field("content_type", &self.content_type)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Generator: Send + Sync {
    fn kind(&self) -> MediaKind;

    /// Whether a thumbnail is available, refreshing `thumb_modified`.
    async fn exists(&self, media: &mut MediaDescriptor) -> bool;

    /// Whether `generate` has to run before `retrieve`.
    async fn expired(&self, media: &mut MediaDescriptor) -> bool {
        !self.exists(media).await || !media.is_fresh()
    }

    async fn generate(&self, media: &mut MediaDescriptor) -> ThumbResult<()>;

    async fn retrieve(&self, media: &MediaDescriptor) -> ThumbResult<Thumbnail>;
}

/// Everything a generator needs, shared by all of them.
#[derive(Clone)]
pub struct GeneratorContext {
    pub source: Arc<dyn SourceStore>,
    pub cache: ThumbnailCache,
    pub config: Arc<ThumbConfig>,
    pub transcoder: Option<Arc<dyn Transcoder>>,
}

impl GeneratorContext {
    pub(crate) async fn read_source(&self, media: &MediaDescriptor) -> ThumbResult<Vec<u8>> {
        let mut input = self.source.open(media.source_path()).await?;
        let mut data = Vec::new();
        input.read_to_end(&mut data).await?;
        input.close()?;
        Ok(data)
    }

    /// On-disk source path for the transcoder.
    pub(crate) fn source_file(&self, media: &MediaDescriptor) -> ThumbResult<PathBuf> {
        self.source.local_path(media.source_path()).ok_or_else(|| {
            ThumbError::generation(format!(
                "source has no local path for the transcoder: {}",
                media.source_path()
            ))
        })
    }

    pub(crate) async fn open_cached(&self, media: &MediaDescriptor) -> ThumbResult<Thumbnail> {
        let content_type = thumb_content_type(media)?;
        let stream = self.cache.open(media).await?;
        Ok(Thumbnail {
            path: media.thumb_path().to_string(),
            content_type,
            modified: media.thumb_modified(),
            stream,
        })
    }
}

pub(crate) fn thumb_content_type(media: &MediaDescriptor) -> ThumbResult<&'static str> {
    media.kind().thumb_content_type().ok_or_else(|| {
        ThumbError::new(
            ThumbErrorKind::NotValid,
            format!("no thumbnail type for {}", media.source_path()),
        )
    })
}

pub(crate) fn not_possible(media: &MediaDescriptor) -> ThumbError {
    ThumbError::new(
        ThumbErrorKind::ThumbNotPossible,
        format!("no transcoder configured for {}", media.source_path()),
    )
}

/// Dispatch table from media kind to generator.
pub struct GeneratorTable {
    image: ImageGenerator,
    svg: SvgGenerator,
    audio: AudioGenerator,
    video: VideoGenerator,
    pdf: PdfGenerator,
}

impl GeneratorTable {
    pub fn new(context: GeneratorContext) -> Self {
        Self {
            image: ImageGenerator::new(context.clone()),
            svg: SvgGenerator::new(context.clone()),
            audio: AudioGenerator::new(context.clone()),
            video: VideoGenerator::new(context),
            pdf: PdfGenerator::new(),
        }
    }

    pub fn get(&self, kind: MediaKind) -> ThumbResult<&dyn Generator> {
        match kind {
            MediaKind::Image => Ok(&self.image),
            MediaKind::Svg => Ok(&self.svg),
            MediaKind::Audio => Ok(&self.audio),
            MediaKind::Video => Ok(&self.video),
            MediaKind::Pdf => Ok(&self.pdf),
            MediaKind::Unsupported => Err(ThumbError::new(
                ThumbErrorKind::NotValid,
                "no generator for unsupported media",
            )),
        }
    }
}
