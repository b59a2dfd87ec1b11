use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::app::{Result, ScrapeError};
use crate::fetcher::{AccessToken, Credentials, ListingRequest, RateLimits, RedditApi};

pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const API_BASE: &str = "https://oauth.reddit.com";

/// Largest page the listing endpoints hand out per request.
const MAX_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

pub struct HttpRedditApi {
    client: Client,
    api_base: String,
}

impl HttpRedditApi {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        // Unknown subreddits answer with a redirect to the search page.
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            api_base: API_BASE.to_string(),
        })
    }

    /// `{api_base}/r/{name}/{endpoint}` with `name` pushed as one encoded segment.
    fn community_url(&self, name: &str, endpoint: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| ScrapeError::RemoteUnavailable(format!("bad api base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ScrapeError::RemoteUnavailable("api base cannot hold a path".into()))?
            .pop_if_empty()
            .push("r")
            .push(name)
            .push(endpoint);
        Ok(url)
    }

    fn listing_url(
        &self,
        name: &str,
        request: &ListingRequest,
        page_size: usize,
        after: Option<&str>,
    ) -> Result<Url> {
        let mut url = self.community_url(name, request.kind.endpoint())?;
        {
            let mut query = url.query_pairs_mut();
            query.extend_pairs(request.kind.params());
            query.append_pair("limit", &page_size.to_string());
            if let Some(after) = after {
                query.append_pair("after", after);
            }
        }
        Ok(url)
    }

    async fn get_json(&self, token: &AccessToken, url: Url, name: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await?;

        check_community_status(response.status(), name)?;
        response.error_for_status_ref()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl RedditApi for HttpRedditApi {
    async fn authorize(&self, credentials: &Credentials) -> Result<AccessToken> {
        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        response.error_for_status_ref()?;
        let body: TokenResponse = response.json().await?;

        match (body.access_token, body.error) {
            (Some(token), None) => Ok(AccessToken(token)),
            (_, Some(error)) => Err(ScrapeError::RemoteUnavailable(format!(
                "token request rejected: {}",
                error
            ))),
            (None, None) => Err(ScrapeError::RemoteUnavailable(
                "token response carried no access token".into(),
            )),
        }
    }

    async fn rate_limits(&self, token: &AccessToken) -> Result<RateLimits> {
        let response = self
            .client
            .get(format!("{}/api/v1/scopes", self.api_base))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        response.error_for_status_ref()?;
        Ok(parse_rate_limits(response.headers()))
    }

    async fn community(&self, token: &AccessToken, name: &str) -> Result<Value> {
        let url = self.community_url(name, "about")?;
        let thing: Thing = serde_json::from_value(self.get_json(token, url, name).await?)?;

        if thing.kind != "t5" {
            return Err(ScrapeError::CommunityNotFound(name.to_string()));
        }
        Ok(thing.data)
    }

    async fn listing(
        &self,
        token: &AccessToken,
        name: &str,
        request: &ListingRequest,
    ) -> Result<Vec<Value>> {
        collect_pages(request.limit, move |page_size, after: Option<String>| async move {
            let url = self.listing_url(name, request, page_size, after.as_deref())?;
            let listing: Listing = serde_json::from_value(self.get_json(token, url, name).await?)?;
            Ok::<Listing, ScrapeError>(listing)
        })
        .await
    }
}

/// Follow `after` cursors until `limit` posts are collected or the remote
/// runs dry. `next_page` receives the page size and the cursor to resume from.
async fn collect_pages<F, Fut>(limit: usize, mut next_page: F) -> Result<Vec<Value>>
where
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: Future<Output = Result<Listing>>,
{
    let mut posts = Vec::new();
    let mut after: Option<String> = None;

    while posts.len() < limit {
        let page_size = (limit - posts.len()).min(MAX_PAGE);
        let listing = next_page(page_size, after.take()).await?;
        match absorb_page(&mut posts, listing) {
            Some(next) => after = Some(next),
            None => break,
        }
    }

    posts.truncate(limit);
    Ok(posts)
}

/// Keep the post (`t3`) children of one page; returns the cursor to continue
/// from, or `None` once the listing is exhausted.
fn absorb_page(posts: &mut Vec<Value>, listing: Listing) -> Option<String> {
    let ListingData { children, after } = listing.data;
    let fetched = children.len();
    posts.extend(
        children
            .into_iter()
            .filter(|thing| thing.kind == "t3")
            .map(|thing| thing.data),
    );
    after.filter(|_| fetched > 0)
}

fn check_community_status(status: StatusCode, name: &str) -> Result<()> {
    if status == StatusCode::NOT_FOUND
        || status == StatusCode::FORBIDDEN
        || status.is_redirection()
    {
        return Err(ScrapeError::CommunityNotFound(name.to_string()));
    }
    Ok(())
}

fn parse_rate_limits(headers: &HeaderMap) -> RateLimits {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
    };

    RateLimits {
        remaining: header("x-ratelimit-remaining").and_then(|v| v.parse().ok()),
        used: header("x-ratelimit-used").and_then(|v| v.parse().ok()),
        reset_in_secs: header("x-ratelimit-reset").and_then(|v| v.parse().ok()),
    }
}
