use chrono::Local;

use crate::app::{AppContext, Result, ScrapeError};
use crate::cli::{FetchArgs, SearchArgs, ViewArgs};
use crate::client::community_name;
use crate::demo::DemoGenerator;
use crate::domain::{PostMode, PostRecord, SearchSort, TimeWindow};
use crate::export::write_csv;
use crate::fetcher::Credentials;
use crate::table::{filter_records, paginate, Summary};

const PREVIEW_CHARS: usize = 200;

pub async fn fetch_posts(
    ctx: &mut AppContext,
    credentials: Option<Credentials>,
    args: &FetchArgs,
) -> Result<()> {
    let mode = PostMode::parse(&args.mode, &args.time)?;
    let limit = resolve_limit(ctx, args.limit);
    let subreddit = args.subreddit.as_deref();

    let use_demo = args.demo || !connect_or_fallback(ctx, credentials).await?;

    let (label, records) = if use_demo {
        let label = match subreddit {
            Some(name) if !name.trim().is_empty() => community_name(name)?,
            _ => "demo".to_string(),
        };
        ctx.session.set_demo_mode(true);
        println!("Demo mode: showing sample data. Configure Reddit API credentials to fetch real posts.");
        let records = DemoGenerator::new().generate(&label, mode, limit);
        (label, records)
    } else {
        let Some(subreddit) = subreddit else {
            println!("Please enter a subreddit name or try demo mode first!");
            return Ok(());
        };
        let label = community_name(subreddit)?;
        ctx.session.leave_demo_mode();
        println!("Fetching {} posts from r/{}...", mode, label);
        let records = ctx.client.list_posts(&ctx.session, &label, mode, limit).await?;
        (label, records)
    };

    if records.is_empty() {
        println!(
            "No posts found in r/{}. The subreddit might be empty or private.",
            label
        );
        return Ok(());
    }

    ctx.session.store_fetch(records);
    show_results(ctx, &label, &args.view)
}

pub async fn search_posts(
    ctx: &mut AppContext,
    credentials: Option<Credentials>,
    args: &SearchArgs,
) -> Result<()> {
    let sort: SearchSort = args.sort.parse()?;
    let window: TimeWindow = args.time.parse()?;
    let limit = resolve_limit(ctx, args.limit);
    let query = args.query.as_str();

    require_connection(ctx, credentials).await?;

    let label = community_name(&args.subreddit)?;
    println!("Searching r/{} for \"{}\"...", label, query);
    let records = ctx
        .client
        .search_posts(&ctx.session, &label, query, sort, window, limit)
        .await?;

    if records.is_empty() {
        println!("No posts in r/{} match \"{}\"", label, query);
        return Ok(());
    }

    ctx.session.store_fetch(records);
    show_results(ctx, &label, &args.view)
}

pub async fn community_info(
    ctx: &mut AppContext,
    credentials: Option<Credentials>,
    subreddit: &str,
) -> Result<()> {
    require_connection(ctx, credentials).await?;

    let info = ctx.client.community_info(&ctx.session, subreddit).await?;
    let created = PostRecord::format_created(info.created_utc);

    println!("r/{} - {}", info.name, info.title);
    if !info.description.is_empty() {
        println!("  {}", info.description);
    }
    println!("  Subscribers: {}", info.subscribers);
    println!("  Created:     {}", created);
    println!("  Language:    {}", info.lang);
    println!("  NSFW:        {}", if info.over18 { "yes" } else { "no" });
    println!("  URL:         {}", info.url);
    Ok(())
}

pub async fn status(ctx: &mut AppContext, credentials: Option<Credentials>) -> Result<()> {
    if !ctx.connect(credentials).await {
        println!("Reddit API not connected");
        println!("Create a script app at https://www.reddit.com/prefs/apps and pass --client-id/--client-secret.");
        return Ok(());
    }

    if ctx.client.is_connected(&ctx.session).await {
        println!("Reddit API connected");
    } else {
        println!("Reddit API credentials accepted, but the API is not responding");
    }

    if let Some(limits) = ctx.session.rate_limits() {
        if let Some(remaining) = limits.remaining {
            println!("  Requests remaining: {:.0}", remaining);
        }
        if let Some(used) = limits.used {
            println!("  Requests used:      {}", used);
        }
        if let Some(reset) = limits.reset_in_secs {
            println!("  Window resets in:   {}s", reset);
        }
    }
    Ok(())
}

fn resolve_limit(ctx: &AppContext, limit: Option<u64>) -> usize {
    limit
        .map(|l| l as usize)
        .unwrap_or(ctx.config.fetch.default_limit)
        .clamp(10, 100)
}

async fn require_connection(ctx: &mut AppContext, credentials: Option<Credentials>) -> Result<()> {
    if ctx.connect(credentials).await {
        Ok(())
    } else {
        Err(ScrapeError::NotConnected)
    }
}

/// Whether a live connection is available; `Ok(false)` means use demo data.
async fn connect_or_fallback(ctx: &mut AppContext, credentials: Option<Credentials>) -> Result<bool> {
    if ctx.connect(credentials).await {
        return Ok(true);
    }
    if ctx.config.fetch.fallback_to_demo {
        tracing::warn!("Cannot connect to Reddit API, falling back to demo data");
        Ok(false)
    } else {
        Err(ScrapeError::NotConnected)
    }
}

fn show_results(ctx: &AppContext, label: &str, view: &ViewArgs) -> Result<()> {
    let Some(records) = ctx.session.last_fetch() else {
        return Ok(());
    };

    let summary = Summary::of(records);
    println!(
        "Total posts: {} | Avg score: {:.1} | Total comments: {} | Avg upvote: {:.1}%",
        summary.total_posts, summary.avg_score, summary.total_comments, summary.avg_upvote_pct
    );

    let filtered = filter_records(records, view.min_score, view.min_comments);
    if filtered.is_empty() {
        println!("No posts match the current filters.");
        return Ok(());
    }
    if filtered.len() < records.len() {
        println!(
            "Showing {} of {} posts after filtering",
            filtered.len(),
            records.len()
        );
    }

    if view.export {
        let path = write_csv(
            &ctx.config.export.directory(),
            label,
            &Local::now(),
            &filtered,
        )?;
        println!("Exported {} posts to {}", filtered.len(), path.display());
    }

    let page = paginate(&filtered, view.page, ctx.config.export.page_size);
    if page.total_pages > 1 {
        println!("{}", page.label());
    }
    println!();

    for post in page.records {
        print_post(post);
    }
    Ok(())
}

fn print_post(post: &PostRecord) {
    println!("{}", post.title);
    println!(
        "  score {} | {} comments | u/{} | {} | {:.0}% upvoted | {}",
        post.score,
        post.num_comments,
        post.author,
        post.created_date,
        post.upvote_ratio * 100.0,
        post.kind_label()
    );
    if !post.selftext.is_empty() {
        println!("  {}", post.preview(PREVIEW_CHARS));
    }
    if !post.is_self && !post.url.is_empty() {
        println!("  Link: {}", post.url);
    }
    println!("  {}", post.permalink);
    println!();
}
