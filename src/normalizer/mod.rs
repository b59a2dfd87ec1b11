use html_escape::decode_html_entities;
use serde::Deserialize;
use serde_json::Value;

use crate::app::{Result, ScrapeError};
use crate::domain::{CommunityInfo, PostRecord, DELETED_AUTHOR};

pub const PERMALINK_BASE: &str = "https://reddit.com";

/// Fields consumed from a remote post object. Anything else is ignored.
#[derive(Debug, Deserialize)]
struct RawPost {
    id: String,
    title: String,
    author: Option<String>,
    score: i64,
    upvote_ratio: f64,
    num_comments: u64,
    created_utc: f64,
    url: String,
    permalink: String,
    #[serde(default)]
    selftext: Option<String>,
    is_self: bool,
    subreddit: String,
    #[serde(default)]
    domain: Option<String>,
    over_18: bool,
    spoiler: bool,
    stickied: bool,
    locked: bool,
}

#[derive(Debug, Deserialize)]
struct RawCommunity {
    display_name: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    public_description: Option<String>,
    #[serde(default)]
    subscribers: Option<u64>,
    #[serde(default)]
    created_utc: Option<f64>,
    #[serde(default)]
    over18: Option<bool>,
    #[serde(default)]
    lang: Option<String>,
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Convert one raw post into a record, or fail with `TransientFetch`.
    ///
    /// A record is either complete or not produced at all.
    pub fn normalize_post(&self, raw: Value) -> Result<PostRecord> {
        let post: RawPost =
            serde_json::from_value(raw).map_err(|e| ScrapeError::TransientFetch(e.to_string()))?;

        if !(0.0..=1.0).contains(&post.upvote_ratio) {
            return Err(ScrapeError::TransientFetch(format!(
                "post {} has upvote ratio {} outside [0, 1]",
                post.id, post.upvote_ratio
            )));
        }
        let Some(created_date) = PostRecord::try_format_created(post.created_utc) else {
            return Err(ScrapeError::TransientFetch(format!(
                "post {} has no usable creation time",
                post.id
            )));
        };

        let author = match post.author {
            Some(name) if !name.is_empty() => name,
            _ => DELETED_AUTHOR.to_string(),
        };

        Ok(PostRecord {
            title: decode(&post.title),
            author,
            score: post.score,
            upvote_ratio: post.upvote_ratio,
            num_comments: post.num_comments,
            created_utc: post.created_utc,
            created_date,
            url: decode(&post.url),
            permalink: format!("{}{}", PERMALINK_BASE, post.permalink),
            selftext: post.selftext.as_deref().map(decode).unwrap_or_default(),
            is_self: post.is_self,
            subreddit: post.subreddit,
            post_id: post.id,
            domain: post.domain.unwrap_or_default(),
            over_18: post.over_18,
            spoiler: post.spoiler,
            stickied: post.stickied,
            locked: post.locked,
        })
    }

    pub fn normalize_community(&self, raw: Value) -> Result<CommunityInfo> {
        let about: RawCommunity = serde_json::from_value(raw)?;

        Ok(CommunityInfo {
            url: CommunityInfo::canonical_url(&about.display_name),
            title: about.title.as_deref().map(decode).unwrap_or_default(),
            description: about
                .public_description
                .as_deref()
                .map(decode)
                .unwrap_or_default(),
            subscribers: about.subscribers.unwrap_or(0),
            created_utc: about.created_utc.unwrap_or(0.0),
            over18: about.over18.unwrap_or(false),
            lang: about.lang.unwrap_or_default(),
            name: about.display_name,
        })
    }
}

fn decode(s: &str) -> String {
    decode_html_entities(s).to_string()
}
