//! # redscrape
//!
//! Fetch posts from a subreddit, filter and page through them, export CSV.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Client → Table / Export
//!                 ↑
//!               Demo
//! ```
//!
//! - [`fetcher`]: the remote API seam and its reqwest implementation
//! - [`normalizer`]: converts raw post objects into [`PostRecord`](domain::PostRecord)s
//! - [`client`]: the retrieval client (connect, probe, list, search)
//! - [`demo`]: synthetic posts when no credentials are available
//! - [`table`]: filtering, pagination and summary metrics
//! - [`export`]: CSV serialization
//!
//! ## Quick Start
//!
//! ```bash
//! # Top posts of the week, second page, only posts with 10+ comments
//! redscrape fetch rust --mode top --time week --min-comments 10 --page 2
//!
//! # Export demo data without any credentials
//! redscrape fetch --demo --export
//!
//! # Search within a subreddit
//! redscrape search rust "error handling" --sort top
//! ```

/// Application context, session state and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config,
/// retrieval client and the per-user [`Session`](app::Session).
pub mod app;

/// Command-line interface using clap.
///
/// - `fetch [subreddit]` - hot/new/top posts, or demo data
/// - `search <subreddit> <query>` - search within a subreddit
/// - `info <subreddit>` - subreddit metadata
/// - `status` - connection and rate-limit status
pub mod cli;

/// Retrieval client over the remote API.
pub mod client;

/// Configuration loaded from `~/.config/redscrape/config.toml`.
pub mod config;

/// Demo data generator.
pub mod demo;

/// Core domain models: [`PostRecord`](domain::PostRecord),
/// [`CommunityInfo`](domain::CommunityInfo) and retrieval modes.
pub mod domain;

/// CSV export.
pub mod export;

/// Remote API access.
///
/// - [`RedditApi`](fetcher::RedditApi): async trait for the remote calls
/// - [`HttpRedditApi`](fetcher::http_fetcher::HttpRedditApi): reqwest-based implementation
pub mod fetcher;

/// Raw post normalization.
pub mod normalizer;

/// Filtering, pagination and summary of fetched tables.
pub mod table;
