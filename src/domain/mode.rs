use std::fmt;
use std::str::FromStr;

use crate::app::{Result, ScrapeError};

/// Window used by the `top` listing and by search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Year,
        TimeWindow::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            "year" => Ok(TimeWindow::Year),
            "all" => Ok(TimeWindow::All),
            other => Err(ScrapeError::InvalidMode(format!(
                "unknown time window '{}' (expected day, week, month, year or all)",
                other
            ))),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing mode for [`crate::client::RetrievalClient::list_posts`].
///
/// The time window only exists for `Top`, so it cannot be passed where it
/// would be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostMode {
    Hot,
    New,
    Top(TimeWindow),
}

impl PostMode {
    /// Parse a mode name plus the window string the caller offered.
    ///
    /// The window is only validated when the mode is `top`.
    pub fn parse(mode: &str, window: &str) -> Result<Self> {
        match mode.trim().to_lowercase().as_str() {
            "hot" => Ok(PostMode::Hot),
            "new" => Ok(PostMode::New),
            "top" => Ok(PostMode::Top(window.parse()?)),
            other => Err(ScrapeError::InvalidMode(format!(
                "invalid post type '{}' (expected hot, new or top)",
                other
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PostMode::Hot => "hot",
            PostMode::New => "new",
            PostMode::Top(_) => "top",
        }
    }
}

impl fmt::Display for PostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostMode::Top(window) => write!(f, "top ({})", window),
            other => f.write_str(other.name()),
        }
    }
}

/// Result ordering requested from the remote search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchSort {
    #[default]
    Relevance,
    Hot,
    Top,
    New,
    Comments,
}

impl SearchSort {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchSort::Relevance => "relevance",
            SearchSort::Hot => "hot",
            SearchSort::Top => "top",
            SearchSort::New => "new",
            SearchSort::Comments => "comments",
        }
    }
}

impl FromStr for SearchSort {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SearchSort::Relevance),
            "hot" => Ok(SearchSort::Hot),
            "top" => Ok(SearchSort::Top),
            "new" => Ok(SearchSort::New),
            "comments" => Ok(SearchSort::Comments),
            other => Err(ScrapeError::InvalidMode(format!(
                "invalid search sort '{}'",
                other
            ))),
        }
    }
}
