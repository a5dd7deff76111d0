// Renders the preview of one file, optionally saving the body to a file.
//
// Usage: cargo run --example preview -- <source-root> <cache-root> <path> [out-file]

use std::sync::Arc;

use galthumb::{LocalStore, PreviewStatus, ThumbConfig, ThumbnailEvent, ThumbnailService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("usage: {} <source-root> <cache-root> <path> [out-file]", args[0]);
        std::process::exit(2);
    }

    let config = ThumbConfig::default().resolve_transcoder();
    let service = ThumbnailService::new(
        Arc::new(LocalStore::new(&args[1])),
        Arc::new(LocalStore::new(&args[2])),
        config,
    )?;

    let mut events = service.subscribe();
    let preview = service.preview(&args[3]).await;

    while let Ok(event) = events.try_recv() {
        match event {
            ThumbnailEvent::ThumbnailReady { path, thumb_path, .. } => {
                println!("generated {} -> {}", path, thumb_path);
            }
            ThumbnailEvent::ThumbnailFailed { path, error_message, .. } => {
                println!("failed {}: {}", path, error_message);
            }
        }
    }

    let status = match preview.status {
        PreviewStatus::Thumbnail => "thumbnail",
        PreviewStatus::Fallback => "fallback icon",
        PreviewStatus::NotFound => "not found",
        PreviewStatus::Broken => "broken",
    };
    println!(
        "{}: {} ({}, {} bytes)",
        status,
        preview.path,
        preview.content_type,
        preview.body.len()
    );

    if let Some(out) = args.get(4) {
        tokio::fs::write(out, &preview.body).await?;
        println!("wrote {}", out);
    }
    Ok(())
}
