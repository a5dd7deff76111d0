//! Media classification
//!
//! A file's extension is the only signal: it is mapped to a content type and the
//! content type prefix decides the [`MediaKind`]. Directory listings and the
//! thumbnail pipeline both go through [`MimeResolver::classify`], so an item is
//! listed if and only if a thumbnail can be requested for it.

use std::path::Path;

use mime_guess::MimeGuess;

/// Handling strategy for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Svg,
    Audio,
    Video,
    Pdf,
    Unsupported,
}

impl MediaKind {
    /// Maps a content type to a kind by prefix.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/svg") {
            MediaKind::Svg
        } else if content_type.starts_with("image/") {
            MediaKind::Image
        } else if content_type.starts_with("audio/") {
            MediaKind::Audio
        } else if content_type.starts_with("video/") {
            MediaKind::Video
        } else if content_type.starts_with("application/pdf") {
            MediaKind::Pdf
        } else {
            MediaKind::Unsupported
        }
    }

    /// Short class name, as used for CSS classes in gallery listings.
    pub fn class_name(&self) -> &'static str {
        match self {
            MediaKind::Image | MediaKind::Svg => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Pdf => "pdf",
            MediaKind::Unsupported => "",
        }
    }

    /// Content type of the thumbnail served for this kind.
    pub fn thumb_content_type(&self) -> Option<&'static str> {
        match self {
            MediaKind::Image | MediaKind::Audio | MediaKind::Video => Some("image/jpeg"),
            MediaKind::Svg | MediaKind::Pdf => Some("image/svg+xml"),
            MediaKind::Unsupported => None,
        }
    }

    pub fn needs_transcoder(&self) -> bool {
        matches!(self, MediaKind::Audio | MediaKind::Video)
    }
}

pub struct MimeResolver;

impl MimeResolver {
    /// Guesses the content type of a file from its extension, case-insensitively.
    pub fn content_type(name: &str) -> Option<String> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        MimeGuess::from_ext(&ext).first().map(|mime| mime.essence_str().to_string())
    }

    pub fn classify(name: &str) -> MediaKind {
        match Self::content_type(name) {
            Some(content_type) => MediaKind::from_content_type(&content_type),
            None => MediaKind::Unsupported,
        }
    }

    pub fn is_valid_media(name: &str) -> bool {
        Self::classify(name) != MediaKind::Unsupported
    }
}

pub fn classify(name: &str) -> MediaKind {
    MimeResolver::classify(name)
}

pub fn is_valid_media(name: &str) -> bool {
    MimeResolver::is_valid_media(name)
}
