//! Extraction backend
//!
//! This module abstracts the video extraction capability:
//! - `Extractor` trait: resolve metadata, open download streams
//! - `MediaStream`: byte stream whose drop releases the upstream
//! - `YtDlpExtractor`: production backend shelling out to yt-dlp
//! - Data model (`VideoDetails`, `Thumbnail`, `StreamFormat`)

pub mod types;
pub mod ytdlp;

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::Stream;

use crate::error::ExtractError;

pub use types::{QualityPreference, StreamFormat, Thumbnail, VideoDetails};
pub use ytdlp::YtDlpExtractor;

/// A backend that resolves video metadata and opens download streams.
///
/// Object-safe so request handlers can hold it behind `Arc<dyn ...>`
/// and tests can substitute an in-process fake.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Fetch the full metadata record for a video URL
    async fn resolve(&self, url: &str) -> Result<VideoDetails, ExtractError>;

    /// Open a byte stream of the video at the given quality preference.
    /// Succeeds only once the stream has actually produced data, so the
    /// caller can still answer with an error response on failure.
    async fn open_stream(
        &self,
        url: &str,
        quality: QualityPreference,
    ) -> Result<MediaStream, ExtractError>;
}

/// Byte stream handed out by an extraction backend.
///
/// Owns whatever feeds it; dropping the stream mid-transfer (client
/// disconnect) releases the upstream resource.
pub struct MediaStream {
    inner: BoxStream<'static, io::Result<Bytes>>,
}

impl MediaStream {
    pub fn new(inner: impl Stream<Item = io::Result<Bytes>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(inner),
        }
    }
}

impl Stream for MediaStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

// The boxed stream has no Debug of its own.
impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream").finish_non_exhaustive()
    }
}
