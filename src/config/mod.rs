//! Configuration for redscrape.
//!
//! Configuration is read from `~/.config/redscrape/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::Credentials;
use crate::table::PAGE_SIZE;

pub const DEFAULT_USER_AGENT: &str = "redscrape/0.1 (subreddit post exporter)";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reddit: RedditConfig,
    pub fetch: FetchConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl RedditConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Credentials from the file, if both halves are present.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => {
                let credentials = Credentials::new(id.trim(), secret.trim());
                credentials.is_complete().then_some(credentials)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Pause between per-post extractions in milliseconds (default: 100)
    pub pacing_ms: u64,
    pub default_limit: usize,
    /// Generate demo data when no live connection can be made (default: true)
    pub fallback_to_demo: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 100,
            default_limit: 25,
            fallback_to_demo: true,
        }
    }
}

impl FetchConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: Option<PathBuf>,
    pub page_size: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            page_size: PAGE_SIZE,
        }
    }
}

impl ExportConfig {
    pub fn directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/redscrape/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("redscrape").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# redscrape configuration
#
# Create a "script" app at https://www.reddit.com/prefs/apps
# (redirect URI http://localhost:8080) and paste its id and secret below.
# Both can also be given on the command line with --client-id/--client-secret.

[reddit]
# client_id = ""
# client_secret = ""
user_agent = "redscrape/0.1 (subreddit post exporter)"

# Request timeout in seconds
timeout_secs = 10

[fetch]
# Pause between per-post extractions (milliseconds)
pacing_ms = 100

# Posts requested when --limit is not given (10-100)
default_limit = 25

# Show demo data instead of failing when no connection can be made
fallback_to_demo = true

[export]
# Directory for exported CSV files (default: current directory)
# directory = "/home/me/exports"

# Posts shown per page
page_size = 10
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
