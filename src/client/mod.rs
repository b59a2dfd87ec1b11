//! Retrieval client: the only owner of the remote API dependency.
//!
//! Every listing, whether a plain `hot`/`new`/`top` listing or a search, goes
//! through one retrieval path: resolve the community, fetch the raw listing,
//! extract records one by one with a pacing delay, skip what cannot be
//! normalized.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::app::session::{Connection, Session};
use crate::app::{Result, ScrapeError};
use crate::domain::{sort_by_score, CommunityInfo, PostMode, PostRecord, SearchSort, TimeWindow};
use crate::fetcher::{Credentials, ListingKind, ListingRequest, RedditApi};
use crate::normalizer::Normalizer;

/// Pause between per-post extractions.
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Public community used for the liveness probe.
pub const PROBE_COMMUNITY: &str = "python";

pub struct RetrievalClient {
    api: Arc<dyn RedditApi + Send + Sync>,
    normalizer: Normalizer,
    pacing: Duration,
}

impl RetrievalClient {
    pub fn new(api: Arc<dyn RedditApi + Send + Sync>) -> Self {
        Self::with_pacing(api, DEFAULT_PACING)
    }

    pub fn with_pacing(api: Arc<dyn RedditApi + Send + Sync>, pacing: Duration) -> Self {
        Self {
            api,
            normalizer: Normalizer::new(),
            pacing,
        }
    }

    /// Store credentials on the session and try to establish a connection.
    ///
    /// Blank arguments keep whatever credentials the session already holds.
    /// Never fails outward: any error clears the handle and yields `false`.
    pub async fn configure(
        &self,
        session: &mut Session,
        client_id: &str,
        client_secret: &str,
    ) -> bool {
        let offered = Credentials::new(client_id.trim(), client_secret.trim());
        if offered.is_complete() {
            session.set_credentials(offered);
        }

        let credentials = match session.credentials() {
            Some(c) if c.is_complete() => c.clone(),
            _ => {
                session.set_connection(None);
                return false;
            }
        };

        match self.connect(&credentials).await {
            Ok(connection) => {
                tracing::info!(
                    "Connected to Reddit API (rate limit remaining: {:?})",
                    connection.limits.remaining
                );
                session.set_connection(Some(connection));
                true
            }
            Err(e) => {
                tracing::warn!("Error setting up Reddit client: {}", e);
                session.set_connection(None);
                false
            }
        }
    }

    async fn connect(&self, credentials: &Credentials) -> Result<Connection> {
        let token = self.api.authorize(credentials).await?;
        let limits = self.api.rate_limits(&token).await?;
        Ok(Connection { token, limits })
    }

    /// Live probe: lists one post from a known public community.
    pub async fn is_connected(&self, session: &Session) -> bool {
        let Some(connection) = session.connection() else {
            return false;
        };

        let probe = ListingRequest {
            kind: ListingKind::Hot,
            limit: 1,
        };
        match self
            .api
            .listing(&connection.token, PROBE_COMMUNITY, &probe)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("API status check failed: {}", e);
                false
            }
        }
    }

    /// Posts from a listing, sorted by score descending.
    pub async fn list_posts(
        &self,
        session: &Session,
        subreddit: &str,
        mode: PostMode,
        limit: usize,
    ) -> Result<Vec<PostRecord>> {
        let kind = match mode {
            PostMode::Hot => ListingKind::Hot,
            PostMode::New => ListingKind::New,
            PostMode::Top(window) => ListingKind::Top(window),
        };

        let mut records = self.retrieve(session, subreddit, kind, limit).await?;
        sort_by_score(&mut records);
        Ok(records)
    }

    /// Search results in the order the remote ranked them.
    pub async fn search_posts(
        &self,
        session: &Session,
        subreddit: &str,
        query: &str,
        sort: SearchSort,
        window: TimeWindow,
        limit: usize,
    ) -> Result<Vec<PostRecord>> {
        let kind = ListingKind::Search {
            query: query.to_string(),
            sort,
            window,
        };
        self.retrieve(session, subreddit, kind, limit).await
    }

    pub async fn community_info(&self, session: &Session, subreddit: &str) -> Result<CommunityInfo> {
        let connection = session.connection().ok_or(ScrapeError::NotConnected)?;
        let name = community_name(subreddit)?;

        let raw = self.api.community(&connection.token, &name).await?;
        self.normalizer.normalize_community(raw)
    }

    async fn retrieve(
        &self,
        session: &Session,
        subreddit: &str,
        kind: ListingKind,
        limit: usize,
    ) -> Result<Vec<PostRecord>> {
        let connection = session.connection().ok_or(ScrapeError::NotConnected)?;
        let name = community_name(subreddit)?;

        self.api.community(&connection.token, &name).await?;

        let request = ListingRequest { kind, limit };
        let raw_posts = self.api.listing(&connection.token, &name, &request).await?;
        tracing::debug!(
            "Fetched {} raw posts from r/{} ({})",
            raw_posts.len(),
            name,
            request.kind.endpoint()
        );

        let records = self.extract(raw_posts).await;
        tracing::info!("Retrieved {} posts from r/{}", records.len(), name);
        Ok(records)
    }

    async fn extract(&self, raw_posts: Vec<Value>) -> Vec<PostRecord> {
        let mut records = Vec::with_capacity(raw_posts.len());
        let mut seen = HashSet::new();

        for (i, raw) in raw_posts.into_iter().enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            match self.normalizer.normalize_post(raw) {
                Ok(record) => {
                    if seen.insert(record.post_id.clone()) {
                        records.push(record);
                    } else {
                        tracing::debug!("Skipping duplicate post {}", record.post_id);
                    }
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                }
            }
        }

        records
    }
}

/// Strip `/`, `r/` prefixes and whitespace, then require a name Reddit could
/// have issued: 2 to 21 ASCII letters, digits or underscores.
pub fn community_name(input: &str) -> Result<String> {
    let name = input
        .trim()
        .trim_start_matches('/')
        .trim_start_matches("r/")
        .trim_matches('/')
        .trim();

    let valid = (2..=21).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(ScrapeError::CommunityNotFound(input.trim().to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{AccessToken, RateLimits};
    use crate::normalizer::fixtures::raw_post;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Calls {
        authorize: usize,
        community: usize,
        listing: usize,
        last_request: Option<ListingRequest>,
    }

    /// Scripted remote: one community with a fixed listing.
    #[derive(Default)]
    struct FakeApi {
        posts: Vec<Value>,
        missing: Vec<String>,
        reject_auth: bool,
        listing_down: bool,
        calls: Mutex<Calls>,
    }

    impl FakeApi {
        fn with_posts(posts: Vec<Value>) -> Self {
            Self {
                posts,
                ..Default::default()
            }
        }

        fn remote_calls(&self) -> usize {
            let calls = self.calls.lock().unwrap();
            calls.community + calls.listing
        }
    }

    #[async_trait]
    impl RedditApi for FakeApi {
        async fn authorize(&self, _credentials: &Credentials) -> Result<AccessToken> {
            self.calls.lock().unwrap().authorize += 1;
            if self.reject_auth {
                return Err(ScrapeError::RemoteUnavailable("401 Unauthorized".into()));
            }
            Ok(AccessToken("token".into()))
        }

        async fn rate_limits(&self, _token: &AccessToken) -> Result<RateLimits> {
            Ok(RateLimits {
                remaining: Some(600.0),
                used: Some(0),
                reset_in_secs: Some(600),
            })
        }

        async fn community(&self, _token: &AccessToken, name: &str) -> Result<Value> {
            self.calls.lock().unwrap().community += 1;
            if self.missing.iter().any(|m| m == name) {
                return Err(ScrapeError::CommunityNotFound(name.to_string()));
            }
            Ok(serde_json::json!({
                "display_name": name,
                "title": "Test community",
                "public_description": "For tests",
                "subscribers": 1234,
                "created_utc": 1_500_000_000.0,
                "over18": false,
                "lang": "en"
            }))
        }

        async fn listing(
            &self,
            _token: &AccessToken,
            _name: &str,
            request: &ListingRequest,
        ) -> Result<Vec<Value>> {
            {
                let mut calls = self.calls.lock().unwrap();
                calls.listing += 1;
                calls.last_request = Some(request.clone());
            }
            if self.listing_down {
                return Err(ScrapeError::RemoteUnavailable("503 Service Unavailable".into()));
            }
            Ok(self.posts.iter().take(request.limit).cloned().collect())
        }
    }

    fn client(api: &Arc<FakeApi>) -> RetrievalClient {
        RetrievalClient::with_pacing(api.clone(), Duration::ZERO)
    }

    async fn connected(client: &RetrievalClient) -> Session {
        let mut session = Session::new();
        assert!(client.configure(&mut session, "id", "secret").await);
        session
    }

    fn scores(records: &[PostRecord]) -> Vec<i64> {
        records.iter().map(|r| r.score).collect()
    }

    #[tokio::test]
    async fn test_configure_stores_handle_and_limits() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        let session = connected(&client).await;

        assert!(session.connection().is_some());
        assert_eq!(session.rate_limits().unwrap().remaining, Some(600.0));
        assert_eq!(session.credentials().unwrap().client_id, "id");
    }

    #[tokio::test]
    async fn test_configure_failure_clears_handle() {
        let api = Arc::new(FakeApi {
            reject_auth: true,
            ..Default::default()
        });
        let client = client(&api);
        let mut session = Session::new();
        session.set_connection(Some(Connection {
            token: AccessToken("stale".into()),
            limits: RateLimits::default(),
        }));

        assert!(!client.configure(&mut session, "id", "wrong").await);
        assert!(session.connection().is_none());
    }

    #[tokio::test]
    async fn test_configure_without_credentials_skips_remote() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        let mut session = Session::new();

        assert!(!client.configure(&mut session, "", "").await);
        assert_eq!(api.calls.lock().unwrap().authorize, 0);
    }

    #[tokio::test]
    async fn test_configure_reuses_stored_credentials() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        let mut session = connected(&client).await;

        assert!(client.configure(&mut session, "", "").await);
        assert_eq!(api.calls.lock().unwrap().authorize, 2);
    }

    #[tokio::test]
    async fn test_is_connected_without_handle() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        assert!(!client.is_connected(&Session::new()).await);
        assert_eq!(api.remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_is_connected_probes_every_time() {
        let api = Arc::new(FakeApi::with_posts(vec![raw_post("a", 1)]));
        let client = client(&api);
        let session = connected(&client).await;

        assert!(client.is_connected(&session).await);
        assert!(client.is_connected(&session).await);
        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.listing, 2);
        assert_eq!(calls.last_request.as_ref().unwrap().limit, 1);
    }

    #[tokio::test]
    async fn test_is_connected_false_during_outage() {
        let api = Arc::new(FakeApi {
            listing_down: true,
            ..Default::default()
        });
        let client = client(&api);
        let session = connected(&client).await;
        assert!(!client.is_connected(&session).await);
    }

    #[tokio::test]
    async fn test_list_posts_sorts_by_score() {
        let api = Arc::new(FakeApi::with_posts(vec![
            raw_post("a", 10),
            raw_post("b", 50),
            raw_post("c", 30),
        ]));
        let client = client(&api);
        let session = connected(&client).await;

        let records = client
            .list_posts(&session, "rust", PostMode::Hot, 25)
            .await
            .unwrap();
        assert_eq!(scores(&records), vec![50, 30, 10]);
    }

    #[tokio::test]
    async fn test_list_posts_ties_keep_api_order() {
        let api = Arc::new(FakeApi::with_posts(vec![
            raw_post("first", 7),
            raw_post("top", 9),
            raw_post("second", 7),
        ]));
        let client = client(&api);
        let session = connected(&client).await;

        let records = client
            .list_posts(&session, "rust", PostMode::New, 25)
            .await
            .unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.post_id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second"]);
    }

    #[tokio::test]
    async fn test_list_posts_requires_connection() {
        let api = Arc::new(FakeApi::with_posts(vec![raw_post("a", 1)]));
        let client = client(&api);

        let err = client
            .list_posts(&Session::new(), "rust", PostMode::Hot, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::NotConnected));
        assert_eq!(api.remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_community_fails_before_network() {
        let api = Arc::new(FakeApi::with_posts(vec![raw_post("a", 1)]));
        let client = client(&api);
        let session = connected(&client).await;

        for name in ["", "   ", "r/", "/r/ "] {
            let err = client
                .list_posts(&session, name, PostMode::Hot, 10)
                .await
                .unwrap_err();
            assert!(matches!(err, ScrapeError::CommunityNotFound(_)));
        }
        assert_eq!(api.remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_community_propagates() {
        let api = Arc::new(FakeApi {
            posts: vec![raw_post("a", 1)],
            missing: vec!["secretclub".into()],
            ..Default::default()
        });
        let client = client(&api);
        let session = connected(&client).await;

        let err = client
            .list_posts(&session, "secretclub", PostMode::Hot, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::CommunityNotFound(name) if name == "secretclub"));
        assert_eq!(api.calls.lock().unwrap().listing, 0);
    }

    #[tokio::test]
    async fn test_malformed_post_is_skipped() {
        let mut broken = raw_post("broken", 99);
        broken.as_object_mut().unwrap().remove("title");
        let api = Arc::new(FakeApi::with_posts(vec![
            raw_post("a", 10),
            broken,
            raw_post("b", 20),
        ]));
        let client = client(&api);
        let session = connected(&client).await;

        let records = client
            .list_posts(&session, "rust", PostMode::Hot, 25)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.post_id != "broken"));
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_dropped() {
        let api = Arc::new(FakeApi::with_posts(vec![
            raw_post("a", 10),
            raw_post("a", 10),
            raw_post("b", 5),
        ]));
        let client = client(&api);
        let session = connected(&client).await;

        let records = client
            .list_posts(&session, "rust", PostMode::Hot, 25)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_an_error() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        let session = connected(&client).await;

        let records = client
            .list_posts(&session, "quietplace", PostMode::New, 25)
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_listing_outage_is_remote_unavailable() {
        let api = Arc::new(FakeApi {
            listing_down: true,
            ..Default::default()
        });
        let client = client(&api);
        let session = connected(&client).await;

        let err = client
            .list_posts(&session, "rust", PostMode::Hot, 25)
            .await
            .unwrap_err();
        assert_eq!(err.label(), "RemoteUnavailable");
    }

    #[tokio::test]
    async fn test_top_passes_window_and_limit() {
        let api = Arc::new(FakeApi::with_posts(vec![raw_post("a", 1)]));
        let client = client(&api);
        let session = connected(&client).await;

        client
            .list_posts(&session, "r/rust", PostMode::Top(TimeWindow::Week), 40)
            .await
            .unwrap();
        let calls = api.calls.lock().unwrap();
        assert_eq!(
            calls.last_request,
            Some(ListingRequest {
                kind: ListingKind::Top(TimeWindow::Week),
                limit: 40,
            })
        );
    }

    #[test]
    fn test_top_with_unknown_window_is_rejected() {
        let err = PostMode::parse("top", "decade").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidMode(_)));
    }

    #[tokio::test]
    async fn test_top_with_all_window_succeeds() {
        let api = Arc::new(FakeApi::with_posts(vec![raw_post("a", 3), raw_post("b", 8)]));
        let client = client(&api);
        let session = connected(&client).await;

        let mode = PostMode::parse("top", "all").unwrap();
        let records = client.list_posts(&session, "rust", mode, 10).await.unwrap();
        assert_eq!(scores(&records), vec![8, 3]);
    }

    #[tokio::test]
    async fn test_search_keeps_remote_order() {
        let api = Arc::new(FakeApi::with_posts(vec![
            raw_post("a", 10),
            raw_post("b", 50),
            raw_post("c", 30),
        ]));
        let client = client(&api);
        let session = connected(&client).await;

        let records = client
            .search_posts(
                &session,
                "rust",
                "borrow checker",
                SearchSort::Relevance,
                TimeWindow::All,
                25,
            )
            .await
            .unwrap();
        assert_eq!(scores(&records), vec![10, 50, 30]);
    }

    #[tokio::test]
    async fn test_search_skips_malformed_records() {
        let mut broken = raw_post("broken", 1);
        broken["upvote_ratio"] = serde_json::json!("high");
        let api = Arc::new(FakeApi::with_posts(vec![broken, raw_post("ok", 2)]));
        let client = client(&api);
        let session = connected(&client).await;

        let records = client
            .search_posts(&session, "rust", "q", SearchSort::New, TimeWindow::Day, 25)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].post_id, "ok");
    }

    #[tokio::test]
    async fn test_community_info() {
        let api = Arc::new(FakeApi::default());
        let client = client(&api);
        let session = connected(&client).await;

        let info = client.community_info(&session, " rust ").await.unwrap();
        assert_eq!(info.name, "rust");
        assert_eq!(info.subscribers, 1234);
        assert_eq!(info.url, "https://reddit.com/r/rust");
    }

    #[tokio::test]
    async fn test_community_info_errors() {
        let api = Arc::new(FakeApi {
            missing: vec!["gone".into()],
            ..Default::default()
        });
        let client = client(&api);

        assert!(matches!(
            client.community_info(&Session::new(), "rust").await,
            Err(ScrapeError::NotConnected)
        ));

        let session = connected(&client).await;
        assert!(matches!(
            client.community_info(&session, "gone").await,
            Err(ScrapeError::CommunityNotFound(_))
        ));
    }

    #[test]
    fn test_community_name_normalization() {
        assert_eq!(community_name("rust").unwrap(), "rust");
        assert_eq!(community_name("  r/rust ").unwrap(), "rust");
        assert_eq!(community_name("/r/rust/").unwrap(), "rust");
        assert!(community_name("  ").is_err());
    }

    #[test]
    fn test_community_name_rejects_path_and_query_characters() {
        for name in [
            "a/b",
            "rust/../python",
            "rust/../../api/v1/me#",
            "rust?x=1",
            "x",
            "this_name_is_far_too_long",
            "café",
        ] {
            assert!(
                matches!(community_name(name), Err(ScrapeError::CommunityNotFound(_))),
                "{name} should be rejected"
            );
        }
        assert_eq!(community_name("Rust_Beginners2").unwrap(), "Rust_Beginners2");
    }

    #[tokio::test]
    async fn test_traversal_name_never_reaches_remote() {
        let api = Arc::new(FakeApi::with_posts(vec![raw_post("a", 1)]));
        let client = client(&api);
        let session = connected(&client).await;

        for name in ["rust/../python", "rust?x=1"] {
            let err = client
                .list_posts(&session, name, PostMode::Hot, 10)
                .await
                .unwrap_err();
            assert!(matches!(err, ScrapeError::CommunityNotFound(_)));
            assert!(matches!(
                client.community_info(&session, name).await,
                Err(ScrapeError::CommunityNotFound(_))
            ));
        }
        assert_eq!(api.remote_calls(), 0);
    }
}
