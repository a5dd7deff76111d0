//! Store abstractions
//!
//! The thumbnail pipeline reads sources from a read-only [`SourceStore`] and
//! keeps its output in a writable [`CacheStore`]. Paths are relative and
//! slash-separated; implementations resolve them against their own root.

pub mod local;
pub mod memory;

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::ThumbResult;
use crate::file_info::FileInfo;
use crate::iostream::{InputStream, OutputStream};

/// Read-only view on the content tree.
#[async_trait]
pub trait SourceStore: Send + Sync {
    /// Queries size, modification time and type of the entry at `path`.
    async fn stat(&self, path: &str) -> ThumbResult<FileInfo>;

    /// Opens the entry at `path` for reading.
    async fn open(&self, path: &str) -> ThumbResult<Box<dyn InputStream>>;

    /// On-disk location of `path`, if the store is backed by a filesystem.
    /// External tools can only be pointed at entries that have one.
    fn local_path(&self, path: &str) -> Option<PathBuf>;
}

/// Writable store holding generated thumbnails.
#[async_trait]
pub trait CacheStore: SourceStore {
    /// Creates (or truncates) the entry at `path` for writing.
    async fn create(&self, path: &str) -> ThumbResult<Box<dyn OutputStream>>;

    /// Creates `path` and all missing parents.
    async fn mkdir_all(&self, path: &str) -> ThumbResult<()>;

    /// Replaces `to` with `from`.
    async fn rename(&self, from: &str, to: &str) -> ThumbResult<()>;

    async fn remove(&self, path: &str) -> ThumbResult<()>;

    /// Creates `path` and writes all of `data` into it.
    async fn write(&self, path: &str, data: &[u8]) -> ThumbResult<()> {
        let mut output = self.create(path).await?;
        output.write_all(data).await?;
        output.shutdown().await?;
        output.close()
    }
}
