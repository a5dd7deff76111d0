//! Thumbnail pipeline configuration
//!
//! The configuration is an explicit value handed to [`ThumbnailService`](crate::ThumbnailService)
//! at construction time. Where it comes from (flags, env, JSON) is the host's concern.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ThumbError, ThumbErrorKind, ThumbResult};

pub const DEFAULT_THUMB_WIDTH: u32 = 400;
pub const DEFAULT_THUMB_HEIGHT: u32 = 400;
pub const DEFAULT_JPEG_QUALITY: u8 = 75;
const DEFAULT_TRANSCODER: &str = "ffmpeg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbConfig {
    pub thumb_width: u32,
    pub thumb_height: u32,
    /// Transcoder executable. `None` (or an empty path) disables audio and video thumbnails.
    pub transcoder: Option<PathBuf>,
    pub jpeg_quality: u8,
    pub waveform_background: String,
    pub waveform_color: String,
    /// Kill the transcoder after this many seconds. `None` waits indefinitely.
    pub transcoder_timeout_secs: Option<u64>,
}

impl Default for ThumbConfig {
    fn default() -> Self {
        Self {
            thumb_width: DEFAULT_THUMB_WIDTH,
            thumb_height: DEFAULT_THUMB_HEIGHT,
            transcoder: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            waveform_background: "#2d2d2d".to_string(),
            waveform_color: "#d8d8d8".to_string(),
            transcoder_timeout_secs: None,
        }
    }
}

impl ThumbConfig {
    pub fn new(thumb_width: u32, thumb_height: u32) -> Self {
        Self {
            thumb_width,
            thumb_height,
            ..Self::default()
        }
    }

    pub fn with_transcoder(mut self, transcoder: impl Into<PathBuf>) -> Self {
        self.transcoder = Some(transcoder.into());
        self
    }

    pub fn validate(&self) -> ThumbResult<()> {
        if self.thumb_width == 0 || self.thumb_height == 0 {
            return Err(ThumbError::new(
                ThumbErrorKind::NotValid,
                format!(
                    "thumbnail dimensions must be positive, got {}x{}",
                    self.thumb_width, self.thumb_height
                ),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ThumbError::new(
                ThumbErrorKind::NotValid,
                format!("jpeg quality must be within 1..=100, got {}", self.jpeg_quality),
            ));
        }
        Ok(())
    }

    /// The configured transcoder, treating an empty path as unset.
    pub fn transcoder_path(&self) -> Option<&PathBuf> {
        self.transcoder
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn transcoder_timeout(&self) -> Option<Duration> {
        self.transcoder_timeout_secs.map(Duration::from_secs)
    }

    /// Looks the transcoder up on `PATH` (falling back to `ffmpeg` when unset).
    ///
    /// On success the absolute path is stored; when nothing is found the transcoder
    /// is disabled and audio/video previews fall back to icons.
    pub fn resolve_transcoder(mut self) -> Self {
        let wanted = self
            .transcoder_path()
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSCODER));

        match which::which(&wanted) {
            Ok(found) => {
                tracing::info!(path = %found.display(), "transcoder found");
                self.transcoder = Some(found);
            }
            Err(e) => {
                tracing::info!(
                    wanted = %wanted.display(),
                    error = %e,
                    "no transcoder, audio and video thumbnails disabled"
                );
                self.transcoder = None;
            }
        }
        self
    }
}
