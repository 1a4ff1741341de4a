//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{LoggingConfig, ServerConfig, YtDlpConfig};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Extraction backend settings
    pub ytdlp: Option<YtDlpSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YtDlpSettings {
    /// Name or path of the yt-dlp binary
    pub binary: Option<String>,
    /// Deadline for a metadata probe in seconds
    pub resolve_timeout_secs: Option<u64>,
    /// Deadline for the first byte of a download stream in seconds
    pub open_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_enabled: Some(true),
            },
            ytdlp: Some(YtDlpSettings {
                binary: Some("yt-dlp".to_string()),
                resolve_timeout_secs: Some(30),
                open_timeout_secs: Some(30),
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = YtDlpConfig::default();
        let ytdlp = match self.ytdlp {
            Some(y) => YtDlpConfig {
                binary: y.binary.unwrap_or(defaults.binary),
                resolve_timeout_secs: y.resolve_timeout_secs.unwrap_or(defaults.resolve_timeout_secs),
                open_timeout_secs: y.open_timeout_secs.unwrap_or(defaults.open_timeout_secs),
            },
            None => defaults,
        };
        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            ytdlp,
            logging: LoggingConfig {
                level: self
                    .logging
                    .map(|l| l.level)
                    .unwrap_or_else(|| "info".to_string()),
            },
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
