pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::fetcher::Credentials;

#[derive(Parser)]
#[command(name = "redscrape")]
#[command(about = "Fetch, filter and export subreddit posts", long_about = None)]
pub struct Cli {
    /// Reddit app client id (overrides the config file)
    #[arg(long, global = true, env = "REDSCRAPE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Reddit app client secret (overrides the config file)
    #[arg(long, global = true, env = "REDSCRAPE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Alternative config file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Command-line credentials; both halves are needed to override the config.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Some(Credentials::new(id.as_str(), secret.as_str())),
            (Some(_), None) => {
                tracing::warn!("--client-id given without --client-secret, ignoring both");
                None
            }
            (None, Some(_)) => {
                tracing::warn!("--client-secret given without --client-id, ignoring both");
                None
            }
            (None, None) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch hot, new or top posts from a subreddit
    Fetch(FetchArgs),
    /// Search posts within a subreddit
    Search(SearchArgs),
    /// Show subreddit metadata
    Info {
        /// Subreddit name without the r/ prefix
        subreddit: String,
    },
    /// Check the Reddit API connection
    Status,
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Subreddit name without the r/ prefix
    pub subreddit: Option<String>,

    /// Post type: hot, new or top
    #[arg(short, long, default_value = "hot")]
    pub mode: String,

    /// Time period for top posts: day, week, month, year or all
    #[arg(short, long, default_value = "all")]
    pub time: String,

    /// Number of posts to fetch
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(10..=100))]
    pub limit: Option<u64>,

    /// Use generated demo data instead of the live API
    #[arg(long)]
    pub demo: bool,

    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Subreddit name without the r/ prefix
    pub subreddit: String,

    /// Search query
    pub query: String,

    /// Sort: relevance, hot, top, new or comments
    #[arg(short, long, default_value = "relevance")]
    pub sort: String,

    /// Time period: day, week, month, year or all
    #[arg(short, long, default_value = "all")]
    pub time: String,

    /// Number of posts to fetch
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(10..=100))]
    pub limit: Option<u64>,

    #[command(flatten)]
    pub view: ViewArgs,
}

/// Filtering, paging and export options shared by listing commands.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Only show posts with at least this score
    #[arg(long, default_value_t = 0)]
    pub min_score: i64,

    /// Only show posts with at least this many comments
    #[arg(long, default_value_t = 0)]
    pub min_comments: u64,

    /// Page to display (10 posts per page by default)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Write the filtered posts to a CSV file
    #[arg(long)]
    pub export: bool,
}
