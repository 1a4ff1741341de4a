//! Test fixtures for integration tests
//!
//! Provides a scripted extraction backend so the HTTP layer can be
//! exercised without yt-dlp or network access.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use futures_util::stream;

use crate::config::ServerConfig;
use crate::error::ExtractError;
use crate::extract::{
    Extractor, MediaStream, QualityPreference, StreamFormat, Thumbnail, VideoDetails,
};
use crate::http::create_router;
use crate::state::AppState;

/// What the fake backend does when a download stream is opened
pub enum StreamScript {
    /// Yield these chunks, then end
    Chunks(Vec<Bytes>),
    /// Fail with this diagnostic before producing any data
    Fail(String),
    /// Yield chunks forever; sets the flag once the stream is dropped
    Endless(Arc<AtomicBool>),
}

/// Scripted extraction backend
pub struct FakeExtractor {
    details: Result<VideoDetails, String>,
    stream: StreamScript,
    /// URLs passed to resolve/open_stream, in call order
    pub seen_urls: Mutex<Vec<String>>,
    /// Quality passed to the last open_stream call
    pub seen_quality: Mutex<Option<QualityPreference>>,
}

impl FakeExtractor {
    /// Resolves every URL to the given metadata record
    pub fn resolving(details: VideoDetails) -> Self {
        Self::scripted(
            Ok(details),
            StreamScript::Chunks(vec![Bytes::from_static(b"test-bytes")]),
        )
    }

    /// Fails both operations with the given diagnostic
    pub fn failing(message: &str) -> Self {
        Self::scripted(
            Err(message.to_string()),
            StreamScript::Fail(message.to_string()),
        )
    }

    /// Streams the given chunks for every download
    pub fn streaming(chunks: Vec<Bytes>) -> Self {
        Self::scripted(Ok(sample_details()), StreamScript::Chunks(chunks))
    }

    /// Streams forever; the flag records when the stream gets dropped
    pub fn endless(flag: Arc<AtomicBool>) -> Self {
        Self::scripted(Ok(sample_details()), StreamScript::Endless(flag))
    }

    fn scripted(details: Result<VideoDetails, String>, stream: StreamScript) -> Self {
        Self {
            details,
            stream,
            seen_urls: Mutex::new(Vec::new()),
            seen_quality: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn resolve(&self, url: &str) -> Result<VideoDetails, ExtractError> {
        self.seen_urls.lock().unwrap().push(url.to_string());
        self.details.clone().map_err(ExtractError::Failed)
    }

    async fn open_stream(
        &self,
        url: &str,
        quality: QualityPreference,
    ) -> Result<MediaStream, ExtractError> {
        self.seen_urls.lock().unwrap().push(url.to_string());
        *self.seen_quality.lock().unwrap() = Some(quality);
        match &self.stream {
            StreamScript::Chunks(chunks) => {
                let chunks: Vec<io::Result<Bytes>> = chunks.iter().cloned().map(Ok).collect();
                Ok(MediaStream::new(stream::iter(chunks)))
            }
            StreamScript::Fail(message) => Err(ExtractError::Failed(message.clone())),
            StreamScript::Endless(flag) => Ok(endless_stream(flag.clone())),
        }
    }
}

/// Sets its flag when dropped
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn endless_stream(flag: Arc<AtomicBool>) -> MediaStream {
    let guard = DropFlag(flag);
    MediaStream::new(stream::unfold(guard, |guard| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Some((Ok::<Bytes, io::Error>(Bytes::from(vec![0u8; 1024])), guard))
    }))
}

/// Build a router on top of the given fake backend
pub fn app_with(extractor: Arc<FakeExtractor>) -> Router {
    let state = Arc::new(AppState::with_extractor(ServerConfig::default(), extractor));
    create_router(state)
}

/// A representative metadata record with a mixed format list: two
/// directly downloadable renditions plus video-only, audio-only, and
/// wrong-container entries that the summary must drop.
pub fn sample_details() -> VideoDetails {
    VideoDetails {
        title: "Never Gonna Give You Up".to_string(),
        canonical_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
        length_seconds: 213,
        thumbnails: vec![
            thumbnail("https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg", 120, 90),
            thumbnail(
                "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
                1280,
                720,
            ),
        ],
        formats: vec![
            format("18", Some("mp4"), Some("360p"), true, true),
            format("137", Some("mp4"), Some("1080p"), true, false),
            format("251", Some("webm"), None, false, true),
            format("43", Some("webm"), Some("360p"), true, true),
            format("22", Some("mp4"), Some("720p"), true, true),
        ],
    }
}

fn thumbnail(url: &str, width: u32, height: u32) -> Thumbnail {
    Thumbnail {
        url: url.to_string(),
        width: Some(width),
        height: Some(height),
    }
}

fn format(
    id: &str,
    container: Option<&str>,
    quality: Option<&str>,
    video: bool,
    audio: bool,
) -> StreamFormat {
    StreamFormat {
        format_id: id.to_string(),
        container: container.map(str::to_string),
        quality_label: quality.map(str::to_string),
        audio_bitrate: audio.then_some(128),
        has_video: video,
        has_audio: audio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn test_sample_details_has_mixed_formats() {
        let details = sample_details();
        assert_eq!(details.formats.len(), 5);
        assert_eq!(details.thumbnails.len(), 2);
        assert!(details.formats.iter().any(|f| !f.has_audio));
        assert!(details.formats.iter().any(|f| !f.has_video));
    }

    #[tokio::test]
    async fn test_fake_extractor_records_calls() {
        let fake = FakeExtractor::resolving(sample_details());
        fake.resolve("https://youtu.be/abc").await.unwrap();
        let mut stream = fake
            .open_stream("https://youtu.be/def", QualityPreference::Highest)
            .await
            .unwrap();
        while stream.next().await.is_some() {}

        let urls = fake.seen_urls.lock().unwrap().clone();
        assert_eq!(urls, vec!["https://youtu.be/abc", "https://youtu.be/def"]);
        assert_eq!(
            *fake.seen_quality.lock().unwrap(),
            Some(QualityPreference::Highest)
        );
    }

    #[tokio::test]
    async fn test_fake_extractor_failure_script() {
        let fake = FakeExtractor::failing("Video unavailable");
        let err = fake.resolve("https://youtu.be/abc").await.unwrap_err();
        assert_eq!(err.to_string(), "Video unavailable");
    }

    #[tokio::test]
    async fn test_endless_stream_reports_drop() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut stream = endless_stream(flag.clone());
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1024);
        assert!(!flag.load(Ordering::SeqCst));
        drop(stream);
        assert!(flag.load(Ordering::SeqCst));
    }
}
