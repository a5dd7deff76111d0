//! # galthumb - gallery thumbnails
//!
//! Renders fixed-size previews for media files found on a read-only content
//! tree, keeps them on a separate writable cache store, and regenerates them
//! when the source changes.
//!
//! ## Core Concepts
//!
//! - **MediaKind**: the handling strategy for a file, derived from its extension
//! - **MediaDescriptor**: one media item for the duration of a request
//! - **Stores**: a read-only source store and a writable cache store
//! - **Generators**: one per media kind; images are resized in-process, audio and
//!   video go through an external transcoder (ffmpeg)
//! - **ThumbnailService**: freshness checks, single-flight generation and
//!   retrieval with fallback icons
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use galthumb::{LocalStore, ThumbConfig, ThumbnailService};
//!
//! # async fn example() -> galthumb::ThumbResult<()> {
//! let config = ThumbConfig::new(400, 400).resolve_transcoder();
//! let service = ThumbnailService::new(
//!     Arc::new(LocalStore::new("/srv/gallery")),
//!     Arc::new(LocalStore::new("/var/cache/gallery")),
//!     config,
//! )?;
//!
//! let preview = service.preview("holidays/beach.jpg").await;
//! println!("{} bytes of {}", preview.body.len(), preview.content_type);
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod cache;
pub mod config;
pub mod error;
pub mod file_info;
pub mod generator;
pub mod iostream;
pub mod media;
pub mod metadata;
pub mod path;
pub mod service;
pub mod store;
pub mod timecode;
pub mod transcoder;

pub use assets::FallbackIcon;
pub use cache::ThumbnailCache;
pub use config::ThumbConfig;
pub use error::{ThumbError, ThumbErrorKind, ThumbResult};
pub use file_info::{FileInfo, FileType};
pub use generator::{Generator, GeneratorContext, GeneratorTable, Thumbnail};
pub use iostream::{InputStream, OutputStream};
pub use media::MediaDescriptor;
pub use metadata::{classify, is_valid_media, MediaKind, MimeResolver};
pub use path::{contains_dot_file, sanitize_path};
pub use service::thumbnail::{Preview, PreviewStatus, ThumbnailEvent, ThumbnailService};
pub use store::local::LocalStore;
pub use store::memory::MemoryStore;
pub use store::{CacheStore, SourceStore};
pub use transcoder::{FfmpegTranscoder, Transcoder};
