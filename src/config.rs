//! Configuration types for the search service.

use std::path::{Path, PathBuf};

use corpsite_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Top-level service configuration, loaded from `config.toml`.
///
/// Every section is optional; missing sections and fields fall back to
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Where content collections are read from.
    pub content: ContentConfig,
    /// Search engine tuning.
    pub search: SearchConfig,
    /// Search audit log.
    pub audit: AuditConfig,
    /// Log filtering and output.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` suitable for [`tokio::net::TcpListener::bind`].
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Content storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding one JSON file per content domain.
    pub data_dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            data_dir: crate::site_dirs::content_dir(),
        }
    }
}

/// Search audit log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Append audit events to [`AuditConfig::path`]. When disabled, events
    /// only go to the tracing log.
    pub enabled: bool,
    /// JSONL file the audit events are appended to.
    pub path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: crate::site_dirs::audit_file(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub filter: String,
    /// Also write daily-rotated log files into this directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "corpsite=info,corpsite_search=info".to_owned(),
            directory: None,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SiteError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| SiteError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `config_dir()/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::site_dirs::config_file()
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Config`] for an empty host or logging filter, and
    /// [`SiteError::Search`] if the search section is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(SiteError::Config("server.host must not be empty".into()));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(SiteError::Config("logging.filter must not be empty".into()));
        }
        self.search.validate()?;
        Ok(())
    }
}
