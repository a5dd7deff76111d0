//! Thumbnail cache freshness and storage
//!
//! Freshness is recomputed from store metadata on every request: an entry is
//! stale when it is missing or strictly older than its source.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{ThumbError, ThumbErrorKind, ThumbResult};
use crate::iostream::InputStream;
use crate::media::MediaDescriptor;
use crate::path::{file_name, parent};
use crate::store::CacheStore;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique hidden sibling of `path` used to stage a write before renaming it into place.
fn temp_path_for(path: &str) -> String {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!(".{}.{}-{}.tmp", file_name(path), std::process::id(), n);
    match parent(path) {
        Some(dir) => format!("{}/{}", dir, name),
        None => name,
    }
}

#[derive(Clone)]
pub struct ThumbnailCache {
    store: Arc<dyn CacheStore>,
}

impl ThumbnailCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Stats the cache entry, refreshing `thumb_modified`.
    ///
    /// Any stat error counts as "missing"; the caller will regenerate.
    pub async fn exists(&self, media: &mut MediaDescriptor) -> bool {
        match self.store.stat(media.thumb_path()).await {
            Ok(info) if !info.is_dir() => {
                media.set_thumb_modified(Some(info.modified()));
                true
            }
            _ => {
                media.set_thumb_modified(None);
                false
            }
        }
    }

    /// Missing, or strictly older than the source. Equal timestamps are fresh.
    pub async fn expired(&self, media: &mut MediaDescriptor) -> bool {
        !self.exists(media).await || !media.is_fresh()
    }

    /// Stores `data` as the thumbnail of `media`.
    ///
    /// The bytes are staged under a temporary name and renamed over the entry,
    /// so readers never see a partial thumbnail.
    pub async fn write(&self, media: &mut MediaDescriptor, data: &[u8]) -> ThumbResult<()> {
        let thumb_path = media.thumb_path().to_string();
        self.stage(&thumb_path, data)
            .await
            .map_err(|e| e.into_generation(format!("failed to store thumbnail {}", thumb_path)))?;

        let info = self.store.stat(&thumb_path).await.map_err(|e| {
            e.into_generation(format!("thumbnail vanished after write {}", thumb_path))
        })?;
        media.set_thumb_modified(Some(info.modified()));
        Ok(())
    }

    async fn stage(&self, thumb_path: &str, data: &[u8]) -> ThumbResult<()> {
        if let Some(dir) = parent(thumb_path) {
            self.store.mkdir_all(dir).await?;
        }

        let temp = temp_path_for(thumb_path);
        let staged = async {
            self.store.write(&temp, data).await?;
            self.store.rename(&temp, thumb_path).await
        }
        .await;

        if staged.is_err() {
            if let Err(e) = self.store.remove(&temp).await {
                tracing::debug!(path = %temp, error = %e, "could not remove staged thumbnail");
            }
        }
        staged
    }

    /// Opens the cached thumbnail for reading.
    pub async fn open(&self, media: &MediaDescriptor) -> ThumbResult<Box<dyn InputStream>> {
        self.store.open(media.thumb_path()).await.map_err(|e| {
            ThumbError::with_source(
                ThumbErrorKind::ThumbNotFound,
                format!("thumbnail not found: {}", media.thumb_path()),
                Box::new(e),
            )
        })
    }

    pub async fn remove(&self, media: &MediaDescriptor) -> ThumbResult<()> {
        self.store.remove(media.thumb_path()).await
    }
}
