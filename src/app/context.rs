use std::sync::Arc;

use crate::app::error::Result;
use crate::app::session::Session;
use crate::client::RetrievalClient;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpRedditApi;
use crate::fetcher::{Credentials, RedditApi};

pub struct AppContext {
    pub config: Config,
    pub client: RetrievalClient,
    pub session: Session,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let api: Arc<dyn RedditApi + Send + Sync> = Arc::new(HttpRedditApi::new(
            &config.reddit.user_agent,
            config.reddit.timeout(),
        )?);
        Ok(Self::with_api(config, api))
    }

    pub fn with_api(config: Config, api: Arc<dyn RedditApi + Send + Sync>) -> Self {
        let client = RetrievalClient::with_pacing(api, config.fetch.pacing());

        Self {
            config,
            client,
            session: Session::new(),
        }
    }

    /// Connect with explicit credentials, falling back to the config file.
    ///
    /// Returns whether a live connection is established.
    pub async fn connect(&mut self, overrides: Option<Credentials>) -> bool {
        let credentials = overrides
            .filter(Credentials::is_complete)
            .or_else(|| self.config.reddit.credentials());

        let Some(credentials) = credentials else {
            tracing::debug!("No Reddit API credentials configured");
            return false;
        };

        self.client
            .configure(
                &mut self.session,
                &credentials.client_id,
                &credentials.client_secret,
            )
            .await
    }
}
