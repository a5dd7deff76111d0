// Shared helpers for the integration tests

#![allow(dead_code)]

use std::ffi::OsString;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use galthumb::{ThumbResult, Transcoder};
use image::{ImageFormat, Rgba, RgbaImage};

/// Transcoder stand-in answering by invocation type and recording every call.
#[derive(Default)]
pub struct StubTranscoder {
    pub probe_output: String,
    pub frame: Vec<u8>,
    pub cover: Vec<u8>,
    pub waveform: Vec<u8>,
    pub delay: Option<Duration>,
    probes: AtomicUsize,
    captures: Mutex<Vec<Vec<OsString>>>,
}

impl StubTranscoder {
    pub fn video(duration: &str, frame: &[u8]) -> Self {
        Self {
            probe_output: format!(
                "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'movie.mp4':\n  Duration: {}.04, start: 0.000000, bitrate: 2091 kb/s\n",
                duration
            ),
            frame: frame.to_vec(),
            ..Self::default()
        }
    }

    pub fn audio(cover: &[u8], waveform: &[u8]) -> Self {
        Self {
            cover: cover.to_vec(),
            waveform: waveform.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn captures(&self) -> Vec<Vec<String>> {
        self.captures
            .lock()
            .unwrap()
            .iter()
            .map(|args| args.iter().map(|a| a.to_string_lossy().into_owned()).collect())
            .collect()
    }

    pub fn capture_count(&self) -> usize {
        self.captures.lock().unwrap().len()
    }
}

#[async_trait]
impl Transcoder for StubTranscoder {
    async fn probe(&self, _source: &Path) -> ThumbResult<String> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(self.probe_output.clone())
    }

    async fn capture(&self, args: Vec<OsString>) -> ThumbResult<Vec<u8>> {
        let has = |flag: &str| args.iter().any(|a| a == flag);
        let output = if has("-vframes") {
            self.frame.clone()
        } else if has("-filter_complex") {
            self.waveform.clone()
        } else if has("-filter:v") {
            self.cover.clone()
        } else {
            Vec::new()
        };
        self.captures.lock().unwrap().push(args);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(output)
    }
}

pub fn png_bytes(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, pixel);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn an_hour_ago() -> SystemTime {
    SystemTime::now() - Duration::from_secs(3600)
}

/// Fresh, empty scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("galthumb_{}", name));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
