//! Services built on top of the stores and generators
//!
//! - ThumbnailService: freshness checks, single-flight generation and retrieval
//!   with fallback icons

pub mod inflight;
pub mod thumbnail;
