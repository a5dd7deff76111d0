// Thumbnail service implementation
// Resolves request paths to media, regenerates stale thumbnails and serves them,
// substituting bundled icons where a thumbnail cannot be produced.

use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::assets::FallbackIcon;
use crate::cache::ThumbnailCache;
use crate::config::ThumbConfig;
use crate::error::{ThumbErrorKind, ThumbResult};
use crate::generator::{Generator, GeneratorContext, GeneratorTable, Thumbnail};
use crate::media::MediaDescriptor;
use crate::metadata::{MediaKind, MimeResolver};
use crate::service::inflight::InflightLocks;
use crate::store::{CacheStore, SourceStore};
use crate::transcoder::{FfmpegTranscoder, Transcoder};

/// Event emitted when thumbnail generation completes
#[derive(Debug, Clone)]
pub enum ThumbnailEvent {
    /// Thumbnail was successfully generated
    ThumbnailReady {
        path: String,
        kind: MediaKind,
        thumb_path: String,
    },
    /// Thumbnail generation failed
    ThumbnailFailed {
        path: String,
        kind: MediaKind,
        error_kind: ThumbErrorKind,
        error_message: String,
    },
}

/// How a [`Preview`] came about; lets an HTTP layer pick the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    /// A real thumbnail (or the SVG itself, or the PDF icon).
    Thumbnail,
    /// The kind's icon, because no transcoder is configured.
    Fallback,
    /// Unsupported, hidden or missing source; serve with a 404.
    NotFound,
    /// Generation failed.
    Broken,
}

/// A fully read preview body.
#[derive(Debug, Clone)]
pub struct Preview {
    pub status: PreviewStatus,
    pub path: String,
    pub content_type: &'static str,
    pub modified: Option<SystemTime>,
    pub body: Vec<u8>,
}

impl Preview {
    fn icon(icon: FallbackIcon, status: PreviewStatus) -> Self {
        Self {
            status,
            path: icon.name().to_string(),
            content_type: icon.content_type(),
            modified: None,
            body: icon.bytes().to_vec(),
        }
    }
}

/// Thumbnail service for media under a source store
pub struct ThumbnailService {
    source: Arc<dyn SourceStore>,
    cache: ThumbnailCache,
    config: Arc<ThumbConfig>,
    generators: GeneratorTable,
    inflight: InflightLocks,
    event_sender: broadcast::Sender<ThumbnailEvent>,
}

impl ThumbnailService {
    /// Creates the service, running the transcoder named by `config` (if any).
    pub fn new(
        source: Arc<dyn SourceStore>,
        cache: Arc<dyn CacheStore>,
        config: ThumbConfig,
    ) -> ThumbResult<Self> {
        let transcoder = config.transcoder_path().map(|program| {
            let ffmpeg = FfmpegTranscoder::new(program).with_timeout(config.transcoder_timeout());
            info!(program = %ffmpeg.program().display(), "transcoder enabled");
            Arc::new(ffmpeg) as Arc<dyn Transcoder>
        });
        Self::with_transcoder(source, cache, config, transcoder)
    }

    /// Creates the service with an explicit transcoder; `None` disables audio and video.
    pub fn with_transcoder(
        source: Arc<dyn SourceStore>,
        cache: Arc<dyn CacheStore>,
        config: ThumbConfig,
        transcoder: Option<Arc<dyn Transcoder>>,
    ) -> ThumbResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let cache = ThumbnailCache::new(cache);
        let generators = GeneratorTable::new(GeneratorContext {
            source: source.clone(),
            cache: cache.clone(),
            config: config.clone(),
            transcoder,
        });
        let (sender, _) = broadcast::channel(100);

        Ok(Self {
            source,
            cache,
            config,
            generators,
            inflight: InflightLocks::new(),
            event_sender: sender,
        })
    }

    pub fn config(&self) -> &ThumbConfig {
        &self.config
    }

    pub fn cache(&self) -> &ThumbnailCache {
        &self.cache
    }

    /// Subscribe to thumbnail events
    pub fn subscribe(&self) -> broadcast::Receiver<ThumbnailEvent> {
        self.event_sender.subscribe()
    }

    pub fn classify(&self, name: &str) -> MediaKind {
        MimeResolver::classify(name)
    }

    /// Whether `name` would be listed in a gallery and can be previewed.
    pub fn is_valid_media(&self, name: &str) -> bool {
        MimeResolver::is_valid_media(name)
    }

    /// Classifies `path` and stats it on the source store.
    pub async fn describe(&self, path: &str) -> ThumbResult<MediaDescriptor> {
        MediaDescriptor::new(&*self.source, path).await
    }

    fn generator(&self, media: &MediaDescriptor) -> ThumbResult<&dyn Generator> {
        self.generators.get(media.kind())
    }

    pub async fn expired(&self, media: &mut MediaDescriptor) -> ThumbResult<bool> {
        Ok(self.generator(media)?.expired(media).await)
    }

    /// Runs the generator for `media` unconditionally and reports the outcome.
    pub async fn generate(&self, media: &mut MediaDescriptor) -> ThumbResult<()> {
        let generator = self.generator(media)?;
        debug!(path = %media.source_path(), kind = ?generator.kind(), "generating thumbnail");
        match generator.generate(media).await {
            Ok(()) => {
                info!(
                    path = %media.source_path(),
                    thumb = %media.thumb_path(),
                    "thumbnail generated"
                );
                let _ = self.event_sender.send(ThumbnailEvent::ThumbnailReady {
                    path: media.source_path().to_string(),
                    kind: media.kind(),
                    thumb_path: media.thumb_path().to_string(),
                });
                Ok(())
            }
            Err(e) => {
                warn!(path = %media.source_path(), error = %e, "thumbnail generation failed");
                let _ = self.event_sender.send(ThumbnailEvent::ThumbnailFailed {
                    path: media.source_path().to_string(),
                    kind: media.kind(),
                    error_kind: e.kind(),
                    error_message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Regenerates the thumbnail of `media` if it is stale.
    ///
    /// Generation for one cache key is serialized: a request that waited on
    /// another re-checks freshness and reuses its result.
    pub async fn ensure_fresh(&self, media: &mut MediaDescriptor) -> ThumbResult<()> {
        let generator = self.generator(media)?;
        if !generator.expired(media).await {
            debug!(path = %media.source_path(), kind = ?generator.kind(), "thumbnail is fresh");
            return Ok(());
        }

        let _guard = self.inflight.lock(media.thumb_path()).await;
        if !generator.expired(media).await {
            debug!(path = %media.source_path(), "thumbnail generated by a concurrent request");
            return Ok(());
        }
        self.generate(media).await
    }

    pub async fn retrieve(&self, media: &MediaDescriptor) -> ThumbResult<Thumbnail> {
        self.generator(media)?.retrieve(media).await
    }

    /// Describes `path`, regenerates its thumbnail when stale and opens it.
    pub async fn get_or_generate(&self, path: &str) -> ThumbResult<Thumbnail> {
        let mut media = self.describe(path).await?;
        self.ensure_fresh(&mut media).await?;
        self.retrieve(&media).await
    }

    /// Like [`get_or_generate`](Self::get_or_generate), but never fails: every
    /// error is turned into the appropriate bundled icon.
    pub async fn preview(&self, path: &str) -> Preview {
        let mut media = match self.describe(path).await {
            Ok(media) => media,
            Err(e) => {
                debug!(path, error = %e, "no preview");
                return Preview::icon(FallbackIcon::Broken, PreviewStatus::NotFound);
            }
        };

        if self.ensure_fresh(&mut media).await.is_err() {
            return Preview::icon(FallbackIcon::Broken, PreviewStatus::Broken);
        }

        let thumbnail = match self.retrieve(&media).await {
            Ok(thumbnail) => thumbnail,
            Err(e) if e.kind() == ThumbErrorKind::ThumbNotPossible => {
                return Preview::icon(FallbackIcon::for_kind(media.kind()), PreviewStatus::Fallback);
            }
            Err(e) => {
                warn!(path = %media.source_path(), error = %e, "thumbnail unavailable");
                return Preview::icon(FallbackIcon::Broken, PreviewStatus::NotFound);
            }
        };

        let (thumb_path, content_type, modified) =
            (thumbnail.path.clone(), thumbnail.content_type, thumbnail.modified);
        match thumbnail.into_bytes().await {
            Ok(body) => Preview {
                status: PreviewStatus::Thumbnail,
                path: thumb_path,
                content_type,
                modified,
                body,
            },
            Err(e) => {
                warn!(path = %media.source_path(), error = %e, "failed to read thumbnail");
                Preview::icon(FallbackIcon::Broken, PreviewStatus::Broken)
            }
        }
    }

    /// Removes the cached thumbnail of `path`. Kinds without a cache entry are left alone.
    pub async fn delete_thumbnail(&self, path: &str) -> ThumbResult<()> {
        let media = self.describe(path).await?;
        match media.kind() {
            MediaKind::Image | MediaKind::Audio | MediaKind::Video => {
                match self.cache.remove(&media).await {
                    Err(e) if e.kind() != ThumbErrorKind::FileNotFound => Err(e),
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}
