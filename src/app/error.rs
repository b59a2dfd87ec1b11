use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Reddit client not initialized")]
    NotConnected,

    #[error("Subreddit 'r/{0}' not found or is private")]
    CommunityNotFound(String),

    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error("Error processing post: {0}")]
    TransientFetch(String),

    #[error("Reddit API unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ScrapeError {
    /// Stable name of the failure kind, for callers that present labeled errors.
    pub fn label(&self) -> &'static str {
        match self {
            ScrapeError::NotConnected => "NotConnected",
            ScrapeError::CommunityNotFound(_) => "CommunityNotFound",
            ScrapeError::InvalidMode(_) => "InvalidMode",
            ScrapeError::TransientFetch(_) => "TransientFetchError",
            ScrapeError::RemoteUnavailable(_) => "RemoteUnavailable",
            ScrapeError::Csv(_) => "Csv",
            ScrapeError::Io(_) => "Io",
            ScrapeError::Config(_) => "Config",
        }
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::RemoteUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::RemoteUnavailable(format!("malformed response: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
