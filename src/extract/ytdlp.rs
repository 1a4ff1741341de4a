//! yt-dlp backed extraction
//!
//! Metadata comes from `--dump-single-json`; downloads stream straight
//! from the child's stdout without touching the disk. Children are
//! spawned kill-on-drop so a dropped response body (client disconnect,
//! timeout) also terminates the transfer upstream.

use std::io;
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, ReadBuf};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio_util::io::ReaderStream;

use crate::config::YtDlpConfig;
use crate::error::ExtractError;

use super::types::{QualityPreference, StreamFormat, Thumbnail, VideoDetails};
use super::{Extractor, MediaStream};

/// Read buffer size for download streaming
const STREAM_BUF_SIZE: usize = 64 * 1024;

/// Extraction backend that shells out to the yt-dlp binary
pub struct YtDlpExtractor {
    config: YtDlpConfig,
}

impl YtDlpExtractor {
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }

    /// Command skeleton shared by both operations. kill_on_drop covers
    /// futures abandoned mid-request; a child must never outlive the
    /// request that spawned it.
    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.binary);
        cmd.arg("--no-warnings")
            .arg("--no-playlist")
            .arg("--no-progress")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, source: io::Error) -> ExtractError {
        ExtractError::Spawn {
            binary: self.config.binary.clone(),
            source,
        }
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, url: &str) -> Result<VideoDetails, ExtractError> {
        let mut cmd = self.base_command();
        cmd.arg("--dump-single-json").arg("--").arg(url);

        tracing::debug!("probing metadata for {}", url);
        let deadline = Duration::from_secs(self.config.resolve_timeout_secs);
        let output = tokio::time::timeout(deadline, cmd.output())
            .await
            .map_err(|_| ExtractError::Timeout {
                seconds: self.config.resolve_timeout_secs,
            })?
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Failed(failure_message(&stderr)));
        }

        let json: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ExtractError::Parse(e.to_string()))?;
        parse_details(url, &json)
    }

    async fn open_stream(
        &self,
        url: &str,
        quality: QualityPreference,
    ) -> Result<MediaStream, ExtractError> {
        let mut cmd = self.base_command();
        cmd.arg("-f")
            .arg(quality.selector())
            .arg("-o")
            .arg("-")
            .arg("--")
            .arg(url);

        tracing::debug!("opening download stream for {}", url);
        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
        let stdout = child.stdout.take().ok_or_else(|| {
            self.spawn_error(io::Error::new(io::ErrorKind::BrokenPipe, "no stdout pipe"))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            self.spawn_error(io::Error::new(io::ErrorKind::BrokenPipe, "no stderr pipe"))
        })?;

        // Drain stderr for the life of the process; yt-dlp stalls when
        // the pipe fills up. The task ends at pipe EOF.
        let diagnostics = tokio::spawn(drain_stderr(stderr));

        // The reader owns the child, so the HTTP response body keeps it
        // alive exactly as long as bytes are still wanted.
        let mut reader = ReaderStream::with_capacity(
            ProcessReader {
                _child: child,
                stdout,
            },
            STREAM_BUF_SIZE,
        );

        // Wait for the first chunk before declaring the stream open.
        // A child that dies without output maps to a client error; a
        // child that produced data streams on without further deadline.
        let deadline = Duration::from_secs(self.config.open_timeout_secs);
        let first = match tokio::time::timeout(deadline, reader.next()).await {
            Err(_) => {
                return Err(ExtractError::Timeout {
                    seconds: self.config.open_timeout_secs,
                })
            }
            Ok(None) => {
                let stderr_tail = diagnostics.await.unwrap_or_default();
                return Err(ExtractError::Failed(failure_message(&stderr_tail)));
            }
            Ok(Some(Err(e))) => return Err(ExtractError::Stream(e)),
            Ok(Some(Ok(chunk))) => chunk,
        };

        tracing::debug!("download stream open, first chunk {} bytes", first.len());
        Ok(MediaStream::new(
            stream::iter([Ok::<Bytes, io::Error>(first)]).chain(reader),
        ))
    }
}

/// Stdout reader that owns the child process. Dropping it (with the
/// response body) kills yt-dlp via kill_on_drop.
struct ProcessReader {
    _child: Child,
    stdout: ChildStdout,
}

impl AsyncRead for ProcessReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().stdout).poll_read(cx, buf)
    }
}

/// Drains the child's stderr, logging each line and keeping the most
/// relevant one for diagnostics.
async fn drain_stderr(stderr: ChildStderr) -> String {
    let mut lines = BufReader::new(stderr).lines();
    let mut last_error = String::new();
    let mut last_line = String::new();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        tracing::debug!("yt-dlp: {}", line);
        if line.trim_start().starts_with("ERROR:") {
            last_error = line;
        } else {
            last_line = line;
        }
    }
    if last_error.is_empty() {
        last_line
    } else {
        last_error
    }
}

/// Reduces raw yt-dlp stderr to the single diagnostic surfaced to the
/// client: the last ERROR line if any, otherwise the last non-empty
/// line, with the "ERROR:" prefix stripped.
fn failure_message(stderr: &str) -> String {
    let line = stderr
        .lines()
        .rev()
        .find(|l| l.trim_start().starts_with("ERROR:"))
        .or_else(|| stderr.lines().rev().find(|l| !l.trim().is_empty()))
        .unwrap_or("");
    let message = line.trim().trim_start_matches("ERROR:").trim();
    if message.is_empty() {
        "extraction failed with no diagnostic output".to_string()
    } else {
        message.to_string()
    }
}

/// Builds a VideoDetails out of `--dump-single-json` output.
fn parse_details(url: &str, json: &Value) -> Result<VideoDetails, ExtractError> {
    if !json.is_object() {
        return Err(ExtractError::Parse(
            "metadata is not a JSON object".to_string(),
        ));
    }

    let title = json
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    let canonical_url = json
        .get("webpage_url")
        .and_then(Value::as_str)
        .unwrap_or(url)
        .to_string();
    let length_seconds = json
        .get("duration")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .max(0.0) as u64;

    let mut thumbnails: Vec<Thumbnail> = json
        .get("thumbnails")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_thumbnail).collect())
        .unwrap_or_default();
    if thumbnails.is_empty() {
        // Some extractors only report a single top-level thumbnail.
        if let Some(single) = json.get("thumbnail").and_then(Value::as_str) {
            thumbnails.push(Thumbnail {
                url: single.to_string(),
                width: None,
                height: None,
            });
        }
    }

    let formats = json
        .get("formats")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(parse_format).collect())
        .unwrap_or_default();

    Ok(VideoDetails {
        title,
        canonical_url,
        length_seconds,
        thumbnails,
        formats,
    })
}

fn parse_thumbnail(entry: &Value) -> Option<Thumbnail> {
    Some(Thumbnail {
        url: entry.get("url")?.as_str()?.to_string(),
        width: entry.get("width").and_then(Value::as_u64).map(|w| w as u32),
        height: entry
            .get("height")
            .and_then(Value::as_u64)
            .map(|h| h as u32),
    })
}

/// Maps one yt-dlp format entry. Track presence follows the yt-dlp
/// convention: a codec of "none" (or absent) means no such track.
fn parse_format(entry: &Value) -> Option<StreamFormat> {
    let format_id = entry.get("format_id")?.as_str()?.to_string();
    let container = entry
        .get("ext")
        .and_then(Value::as_str)
        .map(str::to_string);
    let quality_label = entry
        .get("format_note")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            entry
                .get("height")
                .and_then(Value::as_u64)
                .map(|h| format!("{}p", h))
        });
    let audio_bitrate = entry
        .get("abr")
        .and_then(Value::as_f64)
        .map(|b| b.round() as u32);

    Some(StreamFormat {
        format_id,
        container,
        quality_label,
        audio_bitrate,
        has_video: codec_present(entry.get("vcodec")),
        has_audio: codec_present(entry.get("acodec")),
    })
}

fn codec_present(value: Option<&Value>) -> bool {
    matches!(value.and_then(Value::as_str), Some(codec) if !codec.is_empty() && codec != "none")
}
