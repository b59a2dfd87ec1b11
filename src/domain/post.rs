use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column order of the exported table. Matches the field order of [`PostRecord`].
pub const COLUMNS: [&str; 18] = [
    "title",
    "author",
    "score",
    "upvote_ratio",
    "num_comments",
    "created_utc",
    "created_date",
    "url",
    "permalink",
    "selftext",
    "is_self",
    "subreddit",
    "post_id",
    "domain",
    "over_18",
    "spoiler",
    "stickied",
    "locked",
];

pub const DELETED_AUTHOR: &str = "[deleted]";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One post in the uniform tabular schema.
///
/// Field order is significant: the CSV exporter serializes fields in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub title: String,
    pub author: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    pub created_utc: f64,
    pub created_date: String,
    pub url: String,
    pub permalink: String,
    pub selftext: String,
    pub is_self: bool,
    pub subreddit: String,
    pub post_id: String,
    pub domain: String,
    pub over_18: bool,
    pub spoiler: bool,
    pub stickied: bool,
    pub locked: bool,
}

impl PostRecord {
    /// Render epoch seconds as the `created_date` column (UTC).
    pub fn format_created(created_utc: f64) -> String {
        Self::try_format_created(created_utc).unwrap_or_default()
    }

    /// `None` when the timestamp falls outside what chrono can represent.
    pub fn try_format_created(created_utc: f64) -> Option<String> {
        if !created_utc.is_finite() {
            return None;
        }
        DateTime::<Utc>::from_timestamp(created_utc.trunc() as i64, 0)
            .map(|dt| dt.format(DATE_FORMAT).to_string())
    }

    pub fn kind_label(&self) -> &'static str {
        if self.is_self {
            "Text Post"
        } else {
            "Link Post"
        }
    }

    /// Body text cut to `max_chars` characters, with an ellipsis when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        if self.selftext.chars().count() > max_chars {
            let cut: String = self.selftext.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            self.selftext.clone()
        }
    }
}

/// Stable sort by score, highest first. Ties keep their incoming order.
pub fn sort_by_score(records: &mut [PostRecord]) {
    records.sort_by(|a, b| b.score.cmp(&a.score));
}
