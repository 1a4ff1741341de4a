//! Client-facing video summary
//!
//! Turns the extraction backend's metadata record into the JSON payload
//! the API answers with: display title, one thumbnail URL, a formatted
//! duration, the canonical URL, and the directly downloadable formats.

use serde::{Deserialize, Serialize};

use crate::extract::{StreamFormat, Thumbnail, VideoDetails};

/// Response payload for a metadata lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub title: String,
    /// URL of the sharpest thumbnail rendition
    pub thumbnail: String,
    /// Duration formatted for display, e.g. "12:34" or "1:01:01"
    pub length: String,
    /// Canonical watch-page URL
    pub url: String,
    /// Renditions a browser can save directly
    pub formats: Vec<StreamFormat>,
}

impl VideoSummary {
    pub fn from_details(details: VideoDetails) -> Self {
        Self {
            title: details.title,
            thumbnail: select_thumbnail(&details.thumbnails),
            length: format_duration(details.length_seconds),
            url: details.canonical_url,
            formats: downloadable_formats(details.formats),
        }
    }
}

/// Renders a second count as `m:ss`, switching to `h:mm:ss` once the
/// duration reaches an hour. Minutes are only zero-padded in the hour
/// form; seconds always are.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Picks the thumbnail URL to advertise. Extractors order renditions
/// smallest to largest, so the last entry is the sharpest one. An empty
/// list yields an empty URL rather than an error.
fn select_thumbnail(thumbnails: &[Thumbnail]) -> String {
    thumbnails
        .last()
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

/// Keeps only renditions a browser can save as a single file: mp4
/// container carrying both audio and video. Input order is preserved.
fn downloadable_formats(formats: Vec<StreamFormat>) -> Vec<StreamFormat> {
    formats
        .into_iter()
        .filter(|f| f.has_video && f.has_audio && f.container.as_deref() == Some("mp4"))
        .collect()
}
