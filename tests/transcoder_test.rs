mod common;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use galthumb::transcoder::{
    cover_art_args, find_duration, probe_args, video_frame_args, waveform_args, waveform_filter,
};
use galthumb::{
    FfmpegTranscoder, MemoryStore, PreviewStatus, ThumbConfig, ThumbErrorKind, ThumbnailService,
    Transcoder,
};

use common::{an_hour_ago, StubTranscoder};

fn strings(args: Vec<std::ffi::OsString>) -> Vec<String> {
    args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

fn service_with(
    source: &Arc<MemoryStore>,
    cache: &Arc<MemoryStore>,
    transcoder: &Arc<StubTranscoder>,
) -> ThumbnailService {
    ThumbnailService::with_transcoder(
        source.clone(),
        cache.clone(),
        ThumbConfig::new(200, 200),
        Some(transcoder.clone() as Arc<dyn Transcoder>),
    )
    .unwrap()
}

#[test]
fn test_find_duration() {
    let banner = "Input #0, matroska,webm, from 'a.mkv':\n  Duration: 01:30:00.00, start: 0.000000, bitrate: N/A\n";
    assert_eq!(find_duration(banner), Some("01:30:00"));
    assert_eq!(find_duration("Duration: N/A, bitrate: N/A"), None);
    assert_eq!(find_duration(""), None);
}

#[test]
fn test_argument_lists() {
    let file = Path::new("/srv/media/movie.mp4");

    assert_eq!(
        strings(probe_args(file)),
        ["-hide_banner", "-i", "/srv/media/movie.mp4"]
    );
    assert_eq!(
        strings(video_frame_args(file, "00:30:00", 320, 240)),
        [
            "-hide_banner",
            "-loglevel",
            "quiet",
            "-noaccurate_seek",
            "-ss",
            "00:30:00",
            "-i",
            "/srv/media/movie.mp4",
            "-vf",
            "scale=320x240:flags=lanczos:force_original_aspect_ratio=decrease",
            "-vframes",
            "1",
            "-f",
            "image2pipe",
            "-",
        ]
    );
    assert_eq!(
        strings(cover_art_args(Path::new("a.mp3"), 320)),
        [
            "-hide_banner",
            "-loglevel",
            "quiet",
            "-i",
            "a.mp3",
            "-filter:v",
            "scale=320:-2",
            "-an",
            "-f",
            "image2pipe",
            "-",
        ]
    );

    let waveform = strings(waveform_args(Path::new("a.mp3"), 320, 240, "black", "white"));
    assert_eq!(waveform[..5], ["-hide_banner", "-loglevel", "quiet", "-i", "a.mp3"]);
    assert_eq!(waveform[5], "-filter_complex");
    assert_eq!(waveform[6], waveform_filter(320, 240, "black", "white"));
    assert_eq!(waveform[7..], ["-frames:v", "1", "-f", "image2pipe", "-"]);
}

#[test]
fn test_waveform_filter_graph() {
    let graph = waveform_filter(320, 240, "black", "white");
    assert!(graph.starts_with("color=c=black:s=320x240[bg];"));
    assert!(graph.contains("aformat=channel_layouts=mono"));
    assert!(graph.contains("showwavespic=s=320x240:colors=white"));
    assert!(graph.ends_with("[bg][fg]overlay=format=auto"));
}

#[tokio::test]
async fn test_video_seeks_to_a_third_of_the_duration() {
    let source = Arc::new(MemoryStore::with_local_root("/srv/media"));
    let cache = Arc::new(MemoryStore::new());
    source.insert("clips/movie.mp4", b"video".to_vec(), an_hour_ago());
    let transcoder = Arc::new(StubTranscoder::video("01:30:00", b"frame-jpeg"));
    let service = service_with(&source, &cache, &transcoder);

    let thumb = service.get_or_generate("clips/movie.mp4").await.unwrap();
    assert_eq!(thumb.content_type, "image/jpeg");
    assert_eq!(thumb.into_bytes().await.unwrap(), b"frame-jpeg");

    assert_eq!(transcoder.probe_count(), 1);
    let captures = transcoder.captures();
    assert_eq!(captures.len(), 1);
    let args = &captures[0];
    let ss = args.iter().position(|a| a == "-ss").unwrap();
    assert_eq!(args[ss + 1], "00:30:00");
    assert!(args.contains(&"/srv/media/clips/movie.mp4".to_string()));
    assert!(args.contains(
        &"scale=200x200:flags=lanczos:force_original_aspect_ratio=decrease".to_string()
    ));
    assert_eq!(cache.get("clips/movie.mp4.jpg").unwrap(), b"frame-jpeg");
}

#[tokio::test]
async fn test_video_without_duration_aborts_before_extraction() {
    let source = Arc::new(MemoryStore::with_local_root("/srv/media"));
    let cache = Arc::new(MemoryStore::new());
    source.insert("broken.mp4", b"video".to_vec(), an_hour_ago());
    let mut stub = StubTranscoder::video("00:10:00", b"frame");
    stub.probe_output = "broken.mp4: Invalid data found when processing input".to_string();
    let transcoder = Arc::new(stub);
    let service = service_with(&source, &cache, &transcoder);

    let err = service.get_or_generate("broken.mp4").await.unwrap_err();
    assert_eq!(err.kind(), ThumbErrorKind::GenerationFailed);
    assert!(err.message().contains("broken.mp4"));
    assert_eq!(transcoder.capture_count(), 0);
    assert_eq!(cache.create_count(), 0);

    let preview = service.preview("broken.mp4").await;
    assert_eq!(preview.status, PreviewStatus::Broken);
}

#[tokio::test]
async fn test_video_with_empty_frame_fails() {
    let source = Arc::new(MemoryStore::with_local_root("/srv/media"));
    let cache = Arc::new(MemoryStore::new());
    source.insert("dark.mp4", b"video".to_vec(), an_hour_ago());
    let transcoder = Arc::new(StubTranscoder::video("00:00:09", b""));
    let service = service_with(&source, &cache, &transcoder);

    let err = service.get_or_generate("dark.mp4").await.unwrap_err();
    assert_eq!(err.kind(), ThumbErrorKind::GenerationFailed);
    assert_eq!(transcoder.capture_count(), 1);
    assert!(!cache.contains("dark.mp4.jpg"));
}

#[tokio::test]
async fn test_source_without_local_path_cannot_be_transcoded() {
    let source = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryStore::new());
    source.insert("movie.mp4", b"video".to_vec(), an_hour_ago());
    let transcoder = Arc::new(StubTranscoder::video("00:10:00", b"frame"));
    let service = service_with(&source, &cache, &transcoder);

    let err = service.get_or_generate("movie.mp4").await.unwrap_err();
    assert_eq!(err.kind(), ThumbErrorKind::GenerationFailed);
    assert_eq!(transcoder.probe_count(), 0);
}

#[tokio::test]
async fn test_audio_prefers_cover_art() {
    let source = Arc::new(MemoryStore::with_local_root("/music"));
    let cache = Arc::new(MemoryStore::new());
    source.insert("album/track.mp3", b"ID3".to_vec(), an_hour_ago());
    let transcoder = Arc::new(StubTranscoder::audio(b"cover", b"waveform"));
    let service = service_with(&source, &cache, &transcoder);

    let thumb = service.get_or_generate("album/track.mp3").await.unwrap();
    assert_eq!(thumb.into_bytes().await.unwrap(), b"cover");
    assert_eq!(transcoder.capture_count(), 1);
    assert!(transcoder.captures()[0].contains(&"scale=200:-2".to_string()));
}

#[tokio::test]
async fn test_audio_falls_back_to_waveform() {
    let source = Arc::new(MemoryStore::with_local_root("/music"));
    let cache = Arc::new(MemoryStore::new());
    source.insert("podcast.mp3", b"ID3".to_vec(), an_hour_ago());
    let transcoder = Arc::new(StubTranscoder::audio(b"", b"waveform"));
    let service = service_with(&source, &cache, &transcoder);

    let thumb = service.get_or_generate("podcast.mp3").await.unwrap();
    assert_eq!(thumb.into_bytes().await.unwrap(), b"waveform");

    let captures = transcoder.captures();
    assert_eq!(captures.len(), 2);
    assert!(captures[1].contains(&"-filter_complex".to_string()));
}

#[tokio::test]
async fn test_audio_with_no_output_fails() {
    let source = Arc::new(MemoryStore::with_local_root("/music"));
    let cache = Arc::new(MemoryStore::new());
    source.insert("silence.mp3", b"ID3".to_vec(), an_hour_ago());
    let transcoder = Arc::new(StubTranscoder::audio(b"", b""));
    let service = service_with(&source, &cache, &transcoder);

    let err = service.get_or_generate("silence.mp3").await.unwrap_err();
    assert_eq!(err.kind(), ThumbErrorKind::GenerationFailed);
    assert!(err.message().contains("failed to generate thumbnail"));
    assert_eq!(cache.create_count(), 0);
}

#[tokio::test]
async fn test_concurrent_requests_generate_once() {
    let source = Arc::new(MemoryStore::with_local_root("/srv/media"));
    let cache = Arc::new(MemoryStore::new());
    source.insert("movie.mp4", b"video".to_vec(), an_hour_ago());
    let transcoder = Arc::new(
        StubTranscoder::video("00:03:00", b"frame").with_delay(Duration::from_millis(50)),
    );
    let service = service_with(&source, &cache, &transcoder);

    let (first, second, third) = tokio::join!(
        service.get_or_generate("movie.mp4"),
        service.get_or_generate("movie.mp4"),
        service.get_or_generate("movie.mp4"),
    );
    assert_eq!(first.unwrap().into_bytes().await.unwrap(), b"frame");
    assert_eq!(second.unwrap().into_bytes().await.unwrap(), b"frame");
    assert_eq!(third.unwrap().into_bytes().await.unwrap(), b"frame");

    assert_eq!(transcoder.probe_count(), 1);
    assert_eq!(transcoder.capture_count(), 1);
    assert_eq!(cache.create_count(), 1);
}

#[tokio::test]
async fn test_missing_transcoder_binary_is_a_generation_error() {
    let transcoder = FfmpegTranscoder::new("/nonexistent/galthumb-ffmpeg");
    let err = transcoder
        .capture(probe_args(Path::new("a.mp4")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ThumbErrorKind::GenerationFailed);
    assert!(transcoder.probe(Path::new("a.mp4")).await.is_err());
}

#[tokio::test]
async fn test_transcoder_timeout_kills_the_process() {
    let transcoder = FfmpegTranscoder::new("sleep").with_timeout(Some(Duration::from_millis(200)));
    assert_eq!(transcoder.program(), Path::new("sleep"));

    let started = Instant::now();
    let err = transcoder.capture(vec!["5".into()]).await.unwrap_err();
    assert_eq!(err.kind(), ThumbErrorKind::GenerationFailed);
    assert!(err.message().contains("timed out"));
    assert!(started.elapsed() < Duration::from_secs(3));
}
