use std::io::Cursor;

use tokio::fs;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::ThumbResult;

/// Trait representing an input stream (source of bytes).
/// Extends AsyncRead to integrate with Tokio.
pub trait InputStream: AsyncRead + Send + Unpin {
    fn close(&mut self) -> ThumbResult<()>;
}

impl InputStream for Box<dyn InputStream> {
    fn close(&mut self) -> ThumbResult<()> {
        (**self).close()
    }
}

impl InputStream for fs::File {
    fn close(&mut self) -> ThumbResult<()> {
        Ok(())
    }
}

// In-memory bodies: memory store entries and bundled icons.
impl InputStream for Cursor<Vec<u8>> {
    fn close(&mut self) -> ThumbResult<()> {
        Ok(())
    }
}

impl InputStream for Cursor<&'static [u8]> {
    fn close(&mut self) -> ThumbResult<()> {
        Ok(())
    }
}

/// Trait representing an output stream (sink for bytes).
/// Extends AsyncWrite to integrate with Tokio.
pub trait OutputStream: AsyncWrite + Send + Unpin {
    fn close(&mut self) -> ThumbResult<()>;
}

impl OutputStream for Box<dyn OutputStream> {
    fn close(&mut self) -> ThumbResult<()> {
        (**self).close()
    }
}

impl OutputStream for fs::File {
    fn close(&mut self) -> ThumbResult<()> {
        Ok(())
    }
}
