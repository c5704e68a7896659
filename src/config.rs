//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\zvuk-fetch\config.toml
//! - macOS: ~/Library/Application Support/zvuk-fetch/config.toml
//! - Linux: ~/.config/zvuk-fetch/config.toml
//!
//! Every section is optional. CLI flags override the loaded values and the
//! result is turned into a [`ClientConfig`] that every network component
//! receives explicitly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default catalog endpoint
pub const DEFAULT_BASE_URL: &str = "https://zvuk.com";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Auth token storage
    pub auth: AuthConfig,

    /// Catalog service settings
    pub catalog: CatalogConfig,

    /// Download placement and worker settings
    pub download: DownloadConfig,
}

/// Where the 32-character auth token lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Flat text credential file
    pub token_path: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_path: PathBuf::from("token.txt"),
        }
    }
}

/// Catalog service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog service
    pub base_url: String,

    /// Verify TLS certificates (disable only for debugging proxies)
    pub verify_tls: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            verify_tls: true,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Download placement and worker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Root under which loose files and album/playlist folders are created
    pub output_dir: PathBuf,

    /// Directory for the transient per-release cover images
    pub cache_dir: Option<PathBuf>,

    /// Tracks materialized concurrently within a batch (1 = sequential)
    pub jobs: usize,

    /// Folder name used for the favorites collection
    pub favorites_folder: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            cache_dir: None,
            jobs: 1,
            favorites_folder: "Favorites".to_string(),
        }
    }
}

impl DownloadConfig {
    /// Resolved cover cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("zvuk-fetch")
                .join("covers")
        })
    }
}

/// Explicit network configuration handed to every component that talks to
/// the catalog or fetches binary objects.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` for unauthenticated calls (login)
    pub token: Option<String>,
    pub verify_tls: bool,
    pub user_agent: String,
}

impl ClientConfig {
    /// Build a client config from the catalog section.
    pub fn from_catalog(catalog: &CatalogConfig, token: Option<String>) -> Self {
        Self {
            base_url: catalog.base_url.trim_end_matches('/').to_string(),
            token,
            verify_tls: catalog.verify_tls,
            user_agent: catalog.user_agent.clone(),
        }
    }

    /// Build the underlying HTTP client.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        reqwest::Client::builder()
            .gzip(true)
            .user_agent(self.user_agent.clone())
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("zvuk-fetch"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl From<ConfigError> for crate::error::Error {
    fn from(err: ConfigError) -> Self {
        crate::error::Error::config(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
