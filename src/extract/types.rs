//! Data model reported by the extraction backend.

use serde::{Deserialize, Serialize};

/// One thumbnail rendition. Extractors list these smallest to largest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One downloadable rendition of a video.
///
/// Serialized field names follow the wire convention of the summary
/// endpoint (camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamFormat {
    /// Extractor-assigned identifier, e.g. "22"
    pub format_id: String,
    /// Container, e.g. "mp4" or "webm"
    pub container: Option<String>,
    /// Human-readable quality, e.g. "720p"
    pub quality_label: Option<String>,
    /// Audio bitrate in kbit/s
    pub audio_bitrate: Option<u32>,
    /// Whether the rendition carries a video track
    pub has_video: bool,
    /// Whether the rendition carries an audio track
    pub has_audio: bool,
}

/// Full metadata record for one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub title: String,
    /// Canonical watch-page URL
    pub canonical_url: String,
    /// Total duration in whole seconds
    pub length_seconds: u64,
    /// Thumbnail renditions in extractor order
    pub thumbnails: Vec<Thumbnail>,
    /// Downloadable renditions in extractor order
    pub formats: Vec<StreamFormat>,
}

/// Server-side quality policy for download streaming.
///
/// Downloads are streamed straight to the response body, which rules
/// out post-download muxing; only renditions that already carry both
/// tracks qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreference {
    /// Highest-quality premerged rendition, mp4 preferred
    #[default]
    Highest,
}

impl QualityPreference {
    /// yt-dlp format selector equivalent of this preference
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Highest => "best[ext=mp4]/best",
        }
    }
}
