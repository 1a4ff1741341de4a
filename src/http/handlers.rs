//! HTTP request handlers
//!
//! Implements the video API endpoints and serves the front-end page.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ExtractError;
use crate::extract::QualityPreference;
use crate::state::AppState;
use crate::summary::VideoSummary;

/// Front-end page, embedded at compile time
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// HTTP error type
///
/// Only two kinds exist: the request carried no usable URL, or the
/// extraction backend failed. Both answer 400 with a JSON message.
#[derive(Debug)]
pub enum HttpError {
    InvalidInput(String),
    ExtractionFailure(String),
}

/// JSON body for error responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let message = match self {
            HttpError::InvalidInput(message) => message,
            HttpError::ExtractionFailure(message) => message,
        };
        (StatusCode::BAD_REQUEST, Json(ErrorMessage { message })).into_response()
    }
}

impl From<ExtractError> for HttpError {
    fn from(err: ExtractError) -> Self {
        HttpError::ExtractionFailure(err.to_string())
    }
}

/// Body of a metadata lookup request
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Query string of a download request
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    pub url: Option<String>,
}

/// Front-end page
/// GET /
pub async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("ytdl-proxy v", env!("CARGO_PKG_VERSION"))
}

/// Metadata lookup endpoint
/// POST /api/yt with JSON body {"url": "..."}
pub async fn video_summary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<VideoSummary>, HttpError> {
    let url = required_url(request.url)?;
    tracing::info!("metadata lookup for {}", url);

    let details = state.extractor.resolve(&url).await.map_err(|err| {
        tracing::warn!("extraction failed for {}: {}", url, err);
        HttpError::from(err)
    })?;

    Ok(Json(VideoSummary::from_details(details)))
}

/// Download proxy endpoint
/// GET /api/yt?url=...
pub async fn download_video(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, HttpError> {
    let url = required_url(query.url)?;
    tracing::info!("download requested for {}", url);

    // open_stream succeeds only once upstream bytes exist, so any
    // failure here still becomes a clean 400 instead of an empty 200
    // body. After this point errors can only truncate the stream.
    let stream = state
        .extractor
        .open_stream(&url, QualityPreference::Highest)
        .await
        .map_err(|err| {
            tracing::warn!("failed to open download stream for {}: {}", url, err);
            HttpError::from(err)
        })?;

    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", HeaderValue::from_static("video/mp4"));
    headers.insert(
        "Content-Disposition",
        HeaderValue::from_static("attachment; filename=video.mp4"),
    );

    Ok((headers, Body::from_stream(stream)).into_response())
}

/// A `url` key that is absent or holds an empty string counts as
/// missing; anything else passes through to the extraction backend
/// untouched.
fn required_url(url: Option<String>) -> Result<String, HttpError> {
    match url {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(HttpError::InvalidInput("No URL provided".to_string())),
    }
}
