//! Icons compiled into the crate, served when a real thumbnail is not available.

use std::io::Cursor;

use crate::iostream::InputStream;
use crate::metadata::MediaKind;

static AUDIO_SVG: &[u8] = include_bytes!("../res/audio.svg");
static VIDEO_SVG: &[u8] = include_bytes!("../res/video.svg");
static PDF_SVG: &[u8] = include_bytes!("../res/pdf.svg");
static BROKEN_SVG: &[u8] = include_bytes!("../res/broken.svg");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackIcon {
    Audio,
    Video,
    Pdf,
    Broken,
}

impl FallbackIcon {
    /// Icon that stands in for a kind whose thumbnail cannot be produced.
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Audio => FallbackIcon::Audio,
            MediaKind::Video => FallbackIcon::Video,
            MediaKind::Pdf => FallbackIcon::Pdf,
            _ => FallbackIcon::Broken,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FallbackIcon::Audio => "res/audio.svg",
            FallbackIcon::Video => "res/video.svg",
            FallbackIcon::Pdf => "res/pdf.svg",
            FallbackIcon::Broken => "res/broken.svg",
        }
    }

    pub fn bytes(&self) -> &'static [u8] {
        match self {
            FallbackIcon::Audio => AUDIO_SVG,
            FallbackIcon::Video => VIDEO_SVG,
            FallbackIcon::Pdf => PDF_SVG,
            FallbackIcon::Broken => BROKEN_SVG,
        }
    }

    pub fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }

    pub fn is_available(&self) -> bool {
        !self.bytes().is_empty()
    }

    pub fn stream(&self) -> Box<dyn InputStream> {
        Box::new(Cursor::new(self.bytes()))
    }
}
