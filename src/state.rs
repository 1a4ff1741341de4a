//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - Server configuration
//! - The extraction backend handle
//!
//! All request data is per-request; nothing here mutates after startup.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::extract::{Extractor, YtDlpExtractor};

/// Application state shared across request handlers
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Extraction backend used by both endpoints
    pub extractor: Arc<dyn Extractor>,
}

impl AppState {
    /// Create application state backed by the yt-dlp extractor
    pub fn new(config: ServerConfig) -> Self {
        let extractor = Arc::new(YtDlpExtractor::new(config.ytdlp.clone()));
        Self { config, extractor }
    }

    /// Create application state with a caller-supplied backend
    /// (used by tests to inject a fake extractor)
    pub fn with_extractor(config: ServerConfig, extractor: Arc<dyn Extractor>) -> Self {
        Self { config, extractor }
    }
}
