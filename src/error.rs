use std::fmt;
use std::io;

/// Failure classes of the thumbnail pipeline.
///
/// `NotValid` and `FileNotFound` mean "nothing to show here" and map to a 404
/// at an HTTP boundary. `ThumbNotPossible` is a capability gate, not a fault:
/// callers substitute the kind's fallback icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbErrorKind {
    NotValid,
    FileNotFound,
    ThumbNotFound,
    ThumbNotPossible,
    GenerationFailed,
    Io,
}

#[derive(Debug)]
pub struct ThumbError {
    kind: ThumbErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ThumbError {
    pub fn new(kind: ThumbErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ThumbErrorKind,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(ThumbErrorKind::GenerationFailed, message)
    }

    pub fn kind(&self) -> ThumbErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for errors that should surface as "not found" rather than a server fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ThumbErrorKind::NotValid | ThumbErrorKind::FileNotFound)
    }

    /// Re-labels an error as a generation failure, keeping it as the source.
    pub(crate) fn into_generation(self, context: impl fmt::Display) -> Self {
        if self.kind == ThumbErrorKind::GenerationFailed {
            return self;
        }
        let message = format!("{}: {}", context, self.message);
        Self::with_source(ThumbErrorKind::GenerationFailed, message, Box::new(self))
    }
}

impl fmt::Display for ThumbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ThumbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_deref().map(|e| e as &dyn std::error::Error)
    }
}

impl From<io::Error> for ThumbError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ThumbErrorKind::FileNotFound,
            _ => ThumbErrorKind::Io,
        };
        Self::with_source(kind, err.to_string(), Box::new(err))
    }
}

impl From<image::ImageError> for ThumbError {
    fn from(err: image::ImageError) -> Self {
        Self::with_source(ThumbErrorKind::GenerationFailed, err.to_string(), Box::new(err))
    }
}

pub type ThumbResult<T> = Result<T, ThumbError>;
