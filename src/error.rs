use thiserror::Error;

/// Main error type for the proxy server
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised by the extraction backend
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The backend binary could not be started at all.
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend gave no answer within the configured deadline.
    #[error("extraction timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The backend ran and rejected the URL. Displays the backend's own
    /// diagnostic so the client sees the same message we log.
    #[error("{0}")]
    Failed(String),

    /// The backend answered with output we could not understand.
    #[error("invalid metadata from extractor: {0}")]
    Parse(String),

    /// Stream I/O failed while opening a download.
    #[error("stream error: {0}")]
    Stream(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ProxyError>;
