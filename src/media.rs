//! Per-request media descriptors

use std::time::SystemTime;

use crate::error::{ThumbError, ThumbErrorKind, ThumbResult};
use crate::metadata::{MediaKind, MimeResolver};
use crate::path::{contains_dot_file, sanitize_path};
use crate::store::SourceStore;

/// Extension appended to the source path to name raster thumbnails.
pub const THUMB_EXTENSION: &str = "jpg";

/// One addressable media item for the duration of a request.
///
/// The cache key (`thumb_path`) depends only on the source path and kind.
/// `thumb_modified` is `None` until an existence check has found the cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    source_path: String,
    source_modified: SystemTime,
    thumb_path: String,
    thumb_modified: Option<SystemTime>,
    kind: MediaKind,
}

impl MediaDescriptor {
    /// Classifies and stats `path` on the source store.
    pub async fn new(source: &dyn SourceStore, path: &str) -> ThumbResult<Self> {
        let source_path = sanitize_path(path);
        if source_path == "." || contains_dot_file(&source_path) {
            return Err(ThumbError::new(
                ThumbErrorKind::NotValid,
                format!("not a media path: {}", path),
            ));
        }

        let kind = MimeResolver::classify(&source_path);
        if kind == MediaKind::Unsupported {
            return Err(ThumbError::new(
                ThumbErrorKind::NotValid,
                format!("unsupported media type: {}", source_path),
            ));
        }

        let info = source.stat(&source_path).await.map_err(|e| {
            ThumbError::with_source(
                ThumbErrorKind::FileNotFound,
                format!("source not found: {}", source_path),
                Box::new(e),
            )
        })?;
        if info.is_dir() {
            return Err(ThumbError::new(
                ThumbErrorKind::FileNotFound,
                format!("source is a directory: {}", source_path),
            ));
        }

        Ok(Self::from_parts(source_path, kind, info.modified()))
    }

    /// Builds a descriptor from an already sanitized path and a known kind.
    pub fn from_parts(
        source_path: impl Into<String>,
        kind: MediaKind,
        source_modified: SystemTime,
    ) -> Self {
        let source_path = source_path.into();
        Self {
            thumb_path: Self::thumb_path_for(&source_path, kind),
            source_path,
            source_modified,
            thumb_modified: None,
            kind,
        }
    }

    /// Cache key of the thumbnail for `source_path`. SVGs are their own thumbnail.
    pub fn thumb_path_for(source_path: &str, kind: MediaKind) -> String {
        match kind {
            MediaKind::Svg => source_path.to_string(),
            _ => format!("{}.{}", source_path, THUMB_EXTENSION),
        }
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn source_modified(&self) -> SystemTime {
        self.source_modified
    }

    pub fn thumb_path(&self) -> &str {
        &self.thumb_path
    }

    pub fn thumb_modified(&self) -> Option<SystemTime> {
        self.thumb_modified
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// True iff the thumbnail is known to exist and is not older than the source.
    pub fn is_fresh(&self) -> bool {
        self.thumb_modified
            .is_some_and(|thumb| thumb >= self.source_modified)
    }

    /// Re-stats the source, refreshing its modification time. False if it is gone.
    pub async fn refresh_source(&mut self, source: &dyn SourceStore) -> bool {
        match source.stat(&self.source_path).await {
            Ok(info) if !info.is_dir() => {
                self.source_modified = info.modified();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_thumb_modified(&mut self, modified: Option<SystemTime>) {
        self.thumb_modified = modified;
    }
}
