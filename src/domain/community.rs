use serde::{Deserialize, Serialize};

/// Descriptive metadata for a subreddit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityInfo {
    pub name: String,
    pub title: String,
    pub description: String,
    pub subscribers: u64,
    pub created_utc: f64,
    pub over18: bool,
    pub lang: String,
    pub url: String,
}

impl CommunityInfo {
    pub fn canonical_url(display_name: &str) -> String {
        format!("https://reddit.com/r/{}", display_name)
    }
}
