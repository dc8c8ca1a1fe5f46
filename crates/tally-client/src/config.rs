//! # Register Configuration
//!
//! Where the backend lives and how the register talks to it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the register)     │
//! │     --api-url http://10.0.0.5:3000                                     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     TALLY_API_URL, TALLY_API_TOKEN, TALLY_API_TIMEOUT_SECS             │
//! │     TALLY_SEARCH_LIMIT, TALLY_CURRENCY_SYMBOL                          │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/tally-pos/register.toml (Linux)                          │
//! │     ~/Library/Application Support/com.tally.pos/register.toml (macOS)  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     http://localhost:3000, 10 results, 15s timeout, "$"                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [api]
//! base_url = "https://pos.example.com/api"
//! token = "eyJhbGciOi..."
//! timeout_secs = 15
//!
//! [catalog]
//! search_limit = 10
//!
//! [display]
//! currency_symbol = "$"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tally_core::validation::validate_search_limit;
use tally_core::DEFAULT_SEARCH_LIMIT;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the REST API. Paths such as `products` are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent as `Authorization` when present.
    #[serde(default)]
    pub token: Option<String>,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Catalog & Display Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Results requested per search.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            search_limit: default_search_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Main Register Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl RegisterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (register.toml); an explicit path must exist
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                info!(?path, "Loading register config from file");
                Self::from_toml(&std::fs::read_to_string(&path)?)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(?path, "Loading register config from file");
                    Self::from_toml(&std::fs::read_to_string(&path)?)?
                }
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a `register.toml` document.
    pub fn from_toml(contents: &str) -> ClientResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.api_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        validate_search_limit(self.catalog.search_limit)
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("TALLY_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = var("TALLY_API_TOKEN") {
            self.api.token = Some(token).filter(|t| !t.trim().is_empty());
        }

        if let Some(timeout) = var("TALLY_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid TALLY_API_TIMEOUT_SECS"),
            }
        }

        if let Some(limit) = var("TALLY_SEARCH_LIMIT") {
            match limit.parse::<u32>() {
                Ok(limit) => self.catalog.search_limit = limit,
                Err(_) => warn!(value = %limit, "Ignoring invalid TALLY_SEARCH_LIMIT"),
            }
        }

        if let Some(symbol) = var("TALLY_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "pos")
            .map(|dirs| dirs.config_dir().join("register.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The API base URL, with a trailing slash so relative joins keep any path prefix.
    pub fn api_url(&self) -> ClientResult<Url> {
        let base = self.api.base_url.trim();
        if base.ends_with('/') {
            Ok(Url::parse(base)?)
        } else {
            Ok(Url::parse(&format!("{}/", base))?)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn search_limit(&self) -> u32 {
        self.catalog.search_limit
    }

    pub fn currency_symbol(&self) -> &str {
        &self.display.currency_symbol
    }
}
