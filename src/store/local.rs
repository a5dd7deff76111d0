use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};

use crate::error::ThumbResult;
use crate::file_info::FileInfo;
use crate::iostream::{InputStream, OutputStream};
use crate::path::{file_name, sanitize_path};
use crate::store::{CacheStore, SourceStore};

/// Store backed by a directory on the local filesystem.
///
/// Every path is sanitized before it is joined to the root, so nothing
/// outside the root is reachable.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(sanitize_path(path))
    }
}

#[async_trait]
impl SourceStore for LocalStore {
    async fn stat(&self, path: &str) -> ThumbResult<FileInfo> {
        let metadata = fs::metadata(self.resolve(path)).await?;
        Ok(FileInfo::from_metadata(file_name(path), &metadata))
    }

    async fn open(&self, path: &str) -> ThumbResult<Box<dyn InputStream>> {
        let file = fs::File::open(self.resolve(path)).await?;
        Ok(Box::new(file))
    }

    fn local_path(&self, path: &str) -> Option<PathBuf> {
        Some(self.resolve(path))
    }
}

#[async_trait]
impl CacheStore for LocalStore {
    async fn create(&self, path: &str) -> ThumbResult<Box<dyn OutputStream>> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.resolve(path))
            .await?;
        Ok(Box::new(file))
    }

    async fn mkdir_all(&self, path: &str) -> ThumbResult<()> {
        fs::create_dir_all(self.resolve(path)).await?;
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> ThumbResult<()> {
        fs::rename(self.resolve(from), self.resolve(to)).await?;
        Ok(())
    }

    async fn remove(&self, path: &str) -> ThumbResult<()> {
        fs::remove_file(self.resolve(path)).await?;
        Ok(())
    }
}
