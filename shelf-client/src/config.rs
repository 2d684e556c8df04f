//! Configuration loading for shelf-client.
//!
//! Configuration is loaded from a TOML file (default: `shelf.toml`).

use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration for the Shelf client.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Remote search API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Search pipeline configuration.
    #[serde(default)]
    pub search: SearchConfig,
    /// Favorite persistence configuration.
    #[serde(default)]
    pub favorites: FavoritesConfig,
    /// Favorites view configuration.
    #[serde(default)]
    pub view: ViewConfig,
}

/// Remote search API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the search service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// REST API key. Usually supplied via the environment instead.
    #[serde(default)]
    pub api_key: String,
}

/// Search pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Page size requested from the search service (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Debounce window in milliseconds (default: 500).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Favorite persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: PathBuf,
}

/// Favorites view configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// Upper bound offered by the price filter UI (default: 100000).
    ///
    /// A presentation default, not a domain constraint; the pipeline
    /// accepts any inclusive range.
    #[serde(default = "default_price_ceiling")]
    pub price_ceiling: i64,
}

// Default value functions
fn default_base_url() -> String {
    "https://dapi.kakao.com".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_database_path() -> PathBuf {
    PathBuf::from("shelf.db")
}

fn default_price_ceiling() -> i64 {
    100_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            price_ceiling: default_price_ceiling(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            search: SearchConfig::default(),
            favorites: FavoritesConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
