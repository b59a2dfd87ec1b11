pub mod http_fetcher;

use async_trait::async_trait;
use serde_json::Value;

use crate::app::Result;
use crate::domain::{SearchSort, TimeWindow};

/// Application credential pair for the script-app OAuth flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

/// Bearer token returned by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rate-limit metadata reported by the remote API on each response.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateLimits {
    pub remaining: Option<f64>,
    pub used: Option<u64>,
    pub reset_in_secs: Option<u64>,
}

/// What a single retrieval asks the remote listing for.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingKind {
    Hot,
    New,
    Top(TimeWindow),
    Search {
        query: String,
        sort: SearchSort,
        window: TimeWindow,
    },
}

impl ListingKind {
    /// Path segment under `/r/{name}/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ListingKind::Hot => "hot",
            ListingKind::New => "new",
            ListingKind::Top(_) => "top",
            ListingKind::Search { .. } => "search",
        }
    }

    /// Query parameters specific to this listing, excluding paging.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            ListingKind::Hot | ListingKind::New => Vec::new(),
            ListingKind::Top(window) => vec![("t", window.as_str().to_string())],
            ListingKind::Search {
                query,
                sort,
                window,
            } => vec![
                ("q", query.clone()),
                ("restrict_sr", "1".to_string()),
                ("sort", sort.as_str().to_string()),
                ("t", window.as_str().to_string()),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub kind: ListingKind,
    pub limit: usize,
}

/// The remote content API, as far as retrieval needs it.
///
/// Listing calls return the raw `data` object of each post in remote order;
/// turning them into records is the normalizer's job.
#[async_trait]
pub trait RedditApi {
    async fn authorize(&self, credentials: &Credentials) -> Result<AccessToken>;

    async fn rate_limits(&self, token: &AccessToken) -> Result<RateLimits>;

    /// Raw `about` payload of a subreddit. Fails with `CommunityNotFound`
    /// when it does not exist or is not visible.
    async fn community(&self, token: &AccessToken, name: &str) -> Result<Value>;

    async fn listing(
        &self,
        token: &AccessToken,
        name: &str,
        request: &ListingRequest,
    ) -> Result<Vec<Value>>;
}
