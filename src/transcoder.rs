//! External transcoder (ffmpeg) invocation
//!
//! A capture succeeds when the tool writes something to stdout. Empty output
//! and non-zero exits are both failures; the generators decide what that means.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use crate::error::{ThumbError, ThumbErrorKind, ThumbResult};

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duration: (\d{2}:\d{2}:\d{2})").expect("duration pattern is valid")
});

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Runs the tool in info mode on `source` and returns stdout followed by stderr.
    async fn probe(&self, source: &Path) -> ThumbResult<String>;

    /// Runs the tool with `args` and returns whatever it wrote to stdout.
    async fn capture(&self, args: Vec<OsString>) -> ThumbResult<Vec<u8>>;
}

/// Extracts the `HH:MM:SS` part of the `Duration:` banner line.
pub fn find_duration(probe_output: &str) -> Option<&str> {
    DURATION_RE
        .captures(probe_output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    items.into_iter().map(Into::into).collect()
}

pub fn probe_args(source: &Path) -> Vec<OsString> {
    let mut list = args(["-hide_banner", "-i"]);
    list.push(source.as_os_str().to_owned());
    list
}

/// One frame at `offset`, scaled down to fit `width`x`height`.
pub fn video_frame_args(source: &Path, offset: &str, width: u32, height: u32) -> Vec<OsString> {
    let mut list = args([
        "-hide_banner",
        "-loglevel",
        "quiet",
        "-noaccurate_seek",
        "-ss",
        offset,
        "-i",
    ]);
    list.push(source.as_os_str().to_owned());
    list.extend(args([
        "-vf".to_string(),
        format!(
            "scale={}x{}:flags=lanczos:force_original_aspect_ratio=decrease",
            width, height
        ),
        "-vframes".to_string(),
        "1".to_string(),
        "-f".to_string(),
        "image2pipe".to_string(),
        "-".to_string(),
    ]));
    list
}

/// Embedded cover art of an audio file, `width` wide.
pub fn cover_art_args(source: &Path, width: u32) -> Vec<OsString> {
    let mut list = args(["-hide_banner", "-loglevel", "quiet", "-i"]);
    list.push(source.as_os_str().to_owned());
    list.extend(args([
        "-filter:v".to_string(),
        format!("scale={}:-2", width),
        "-an".to_string(),
        "-f".to_string(),
        "image2pipe".to_string(),
        "-".to_string(),
    ]));
    list
}

/// Filter graph drawing the mono waveform of input 0 over a solid background.
pub fn waveform_filter(width: u32, height: u32, background: &str, color: &str) -> String {
    format!(
        "color=c={bg}:s={w}x{h}[bg];\
         [0:a]aformat=channel_layouts=mono,showwavespic=s={w}x{h}:colors={fg}[fg];\
         [bg][fg]overlay=format=auto",
        bg = background,
        fg = color,
        w = width,
        h = height,
    )
}

pub fn waveform_args(
    source: &Path,
    width: u32,
    height: u32,
    background: &str,
    color: &str,
) -> Vec<OsString> {
    let mut list = args(["-hide_banner", "-loglevel", "quiet", "-i"]);
    list.push(source.as_os_str().to_owned());
    list.extend(args([
        "-filter_complex".to_string(),
        waveform_filter(width, height, background, color),
        "-frames:v".to_string(),
        "1".to_string(),
        "-f".to_string(),
        "image2pipe".to_string(),
        "-".to_string(),
    ]));
    list
}

/// Runs a real ffmpeg-compatible executable.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kills the process and fails the call once `timeout` elapses.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn run(&self, args: &[OsString]) -> ThumbResult<Output> {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = command.output();
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, output).await.map_err(|_| {
                ThumbError::generation(format!(
                    "{} timed out after {:?}",
                    self.program.display(),
                    limit
                ))
            })?,
            None => output.await,
        };

        result.map_err(|e| {
            ThumbError::with_source(
                ThumbErrorKind::GenerationFailed,
                format!("failed to run {}", self.program.display()),
                Box::new(e),
            )
        })
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn probe(&self, source: &Path) -> ThumbResult<String> {
        // Info mode always exits non-zero (no output file); only the text matters.
        let output = self.run(&probe_args(source)).await?;
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }

    async fn capture(&self, args: Vec<OsString>) -> ThumbResult<Vec<u8>> {
        let output = self.run(&args).await?;
        if !output.status.success() {
            tracing::debug!(
                program = %self.program.display(),
                status = %output.status,
                "transcoder exited unsuccessfully"
            );
            return Ok(Vec::new());
        }
        Ok(output.stdout)
    }
}
