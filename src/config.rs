//! Application-level configuration loaded from a JSON file named by the environment.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use serde_with::{DurationSeconds, serde_as};
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "GAME_SAVER_CONFIG_PATH";
/// Fallback variable kept for deployments that already export it.
pub const LEGACY_CONFIG_PATH_ENV: &str = "CONFIG_PATH";
/// Optional override for [`AppConfig::storage_url`].
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Failures that prevent the process from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither path variable is set.
    #[error("GAME_SAVER_CONFIG_PATH (or CONFIG_PATH) is not set")]
    MissingPath,
    /// The named file does not exist.
    #[error("config file does not exist: {}", .path.display())]
    NotFound {
        /// Path taken from the environment.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("cannot read config file {}", .path.display())]
    Read {
        /// Path taken from the environment.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid configuration document.
    #[error("cannot parse config file {}", .path.display())]
    Parse {
        /// Path taken from the environment.
        path: PathBuf,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Deployment flavour; drives the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer machine: pretty logs.
    Local,
    /// Shared development deployment: JSON logs.
    Dev,
    /// Production: JSON logs.
    Prod,
}

/// HTTP server deadlines.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpServerConfig {
    /// Upper bound on handling a single request, in seconds.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// How long graceful shutdown waits for open connections to drain, in seconds.
    ///
    /// This is a shutdown deadline, not a keep-alive idle timeout: idle keep-alive
    /// connections are not closed early while the server is running.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: Duration,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_idle_timeout() -> Duration {
    DEFAULT_IDLE_TIMEOUT
}

/// Immutable runtime configuration read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Deployment flavour.
    pub env: Environment,
    /// Socket address the HTTP server binds to, e.g. `0.0.0.0:8080`.
    pub address: String,
    /// Request and shutdown deadlines.
    #[serde(default)]
    pub http_server: HttpServerConfig,
    /// `postgres://…` or `sqlite:…` connection string.
    pub storage_url: String,
}

impl AppConfig {
    /// Resolve the configuration path from the environment and load it.
    ///
    /// Unlike optional settings elsewhere, a missing path or file is fatal: there is no
    /// sensible default database to fall back to.
    pub fn load() -> Result<Self, ConfigError> {
        let path = resolve_config_path().ok_or(ConfigError::MissingPath)?;
        let mut config = Self::load_from(&path)?;
        if let Some(url) = env::var(DATABASE_URL_ENV).ok().filter(|url| !url.is_empty()) {
            config.storage_url = url;
        }
        Ok(config)
    }

    /// Parse the JSON document at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    [CONFIG_PATH_ENV, LEGACY_CONFIG_PATH_ENV]
        .into_iter()
        .filter_map(env::var_os)
        .map(PathBuf::from)
        .find(|path| !path.as_os_str().is_empty())
}
