use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use redscrape::app::AppContext;
use redscrape::cli::{commands, Cli, Commands};
use redscrape::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut ctx = AppContext::new(config)?;
    let credentials = cli.credentials();

    let result = match &cli.command {
        Commands::Fetch(args) => commands::fetch_posts(&mut ctx, credentials, args).await,
        Commands::Search(args) => commands::search_posts(&mut ctx, credentials, args).await,
        Commands::Info { subreddit } => {
            commands::community_info(&mut ctx, credentials, subreddit).await
        }
        Commands::Status => commands::status(&mut ctx, credentials).await,
    };

    if let Err(e) = result {
        eprintln!("Error [{}]: {}", e.label(), e);
        std::process::exit(1);
    }

    Ok(())
}
