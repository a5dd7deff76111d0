use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::task::{Context, Poll};
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::error::{ThumbError, ThumbResult};
use crate::file_info::{FileInfo, FileType};
use crate::iostream::{InputStream, OutputStream};
use crate::path::{file_name, parent, sanitize_path};
use crate::store::{CacheStore, SourceStore};

#[derive(Debug, Clone)]
struct MemoryEntry {
    data: Vec<u8>,
    modified: SystemTime,
}

type Entries = Arc<RwLock<HashMap<String, MemoryEntry>>>;

fn read(entries: &Entries) -> RwLockReadGuard<'_, HashMap<String, MemoryEntry>> {
    entries.read().unwrap_or_else(|e| {
        tracing::warn!("memory store lock poisoned, recovering");
        e.into_inner()
    })
}

fn write(entries: &Entries) -> RwLockWriteGuard<'_, HashMap<String, MemoryEntry>> {
    entries.write().unwrap_or_else(|e| {
        tracing::warn!("memory store lock poisoned, recovering");
        e.into_inner()
    })
}

fn not_found(path: &str) -> ThumbError {
    io::Error::new(io::ErrorKind::NotFound, format!("no such entry: {}", path)).into()
}

/// In-process store keeping entries in a map.
///
/// Usable as either store. Modification times can be set explicitly, and
/// `create`/`open` calls are counted so callers can observe cache traffic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Entries,
    dirs: RwLock<HashSet<String>>,
    local_root: Option<PathBuf>,
    creates: AtomicUsize,
    opens: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `local_root/<path>` as the on-disk location of every entry.
    pub fn with_local_root(root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: Some(root.into()),
            ..Self::default()
        }
    }

    pub fn insert(&self, path: &str, data: impl Into<Vec<u8>>, modified: SystemTime) {
        let entry = MemoryEntry {
            data: data.into(),
            modified,
        };
        write(&self.entries).insert(sanitize_path(path), entry);
    }

    /// Overrides the modification time of an existing entry.
    pub fn set_modified(&self, path: &str, modified: SystemTime) -> ThumbResult<()> {
        let mut entries = write(&self.entries);
        let entry = entries
            .get_mut(&sanitize_path(path))
            .ok_or_else(|| not_found(path))?;
        entry.modified = modified;
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        read(&self.entries)
            .get(&sanitize_path(path))
            .map(|entry| entry.data.clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        read(&self.entries).contains_key(&sanitize_path(path))
    }

    /// Paths of all file entries, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = read(&self.entries).keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Number of `create` calls so far (every cache write goes through one).
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn is_dir(&self, path: &str) -> bool {
        if path == "." {
            return true;
        }
        self.dirs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(path)
    }
}

#[async_trait]
impl SourceStore for MemoryStore {
    async fn stat(&self, path: &str) -> ThumbResult<FileInfo> {
        let key = sanitize_path(path);
        if let Some(entry) = read(&self.entries).get(&key) {
            return Ok(FileInfo::new(
                file_name(&key),
                entry.data.len() as u64,
                entry.modified,
                FileType::Regular,
            ));
        }
        if self.is_dir(&key) {
            return Ok(FileInfo::new(
                file_name(&key),
                0,
                SystemTime::UNIX_EPOCH,
                FileType::Directory,
            ));
        }
        Err(not_found(path))
    }

    async fn open(&self, path: &str) -> ThumbResult<Box<dyn InputStream>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let data = self.get(path).ok_or_else(|| not_found(path))?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn local_path(&self, path: &str) -> Option<PathBuf> {
        self.local_root
            .as_ref()
            .map(|root| root.join(sanitize_path(path)))
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn create(&self, path: &str) -> ThumbResult<Box<dyn OutputStream>> {
        let key = sanitize_path(path);
        if let Some(dir) = parent(&key) {
            if !self.is_dir(dir) {
                return Err(not_found(dir));
            }
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        write(&self.entries).insert(
            key.clone(),
            MemoryEntry {
                data: Vec::new(),
                modified: SystemTime::now(),
            },
        );
        Ok(Box::new(MemoryWriter {
            entries: self.entries.clone(),
            path: key,
        }))
    }

    async fn mkdir_all(&self, path: &str) -> ThumbResult<()> {
        let key = sanitize_path(path);
        let mut dirs = self.dirs.write().unwrap_or_else(PoisonError::into_inner);
        let mut current = Some(key.as_str());
        while let Some(dir) = current {
            if dir != "." {
                dirs.insert(dir.to_string());
            }
            current = parent(dir);
        }
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> ThumbResult<()> {
        let mut entries = write(&self.entries);
        let entry = entries
            .remove(&sanitize_path(from))
            .ok_or_else(|| not_found(from))?;
        entries.insert(sanitize_path(to), entry);
        Ok(())
    }

    async fn remove(&self, path: &str) -> ThumbResult<()> {
        write(&self.entries)
            .remove(&sanitize_path(path))
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }
}

/// Appends straight into the shared map, so readers can observe a partially written entry.
struct MemoryWriter {
    entries: Entries,
    path: String,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut entries = write(&self.entries);
        let entry = entries.entry(self.path.clone()).or_insert_with(|| MemoryEntry {
            data: Vec::new(),
            modified: SystemTime::now(),
        });
        entry.data.extend_from_slice(buf);
        entry.modified = SystemTime::now();
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

impl OutputStream for MemoryWriter {
    fn close(&mut self) -> ThumbResult<()> {
        Ok(())
    }
}
