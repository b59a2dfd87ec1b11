use crate::domain::PostRecord;
use crate::fetcher::{AccessToken, Credentials, RateLimits};

/// An established connection: the bearer token plus what the probe reported.
#[derive(Debug, Clone)]
pub struct Connection {
    pub token: AccessToken,
    pub limits: RateLimits,
}

/// Per-user state for one interactive session.
///
/// Created when the session starts, cleared by [`Session::reset_credentials`],
/// dropped when the session ends.
#[derive(Debug, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    connection: Option<Connection>,
    demo_mode: bool,
    last_fetch: Option<Vec<PostRecord>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub(crate) fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    pub(crate) fn set_connection(&mut self, connection: Option<Connection>) {
        self.connection = connection;
    }

    pub fn rate_limits(&self) -> Option<RateLimits> {
        self.connection.as_ref().map(|c| c.limits)
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn set_demo_mode(&mut self, enabled: bool) {
        self.demo_mode = enabled;
    }

    /// Switch back to live data: leaves demo mode and forgets the demo table.
    pub fn leave_demo_mode(&mut self) {
        self.demo_mode = false;
        self.last_fetch = None;
    }

    pub fn last_fetch(&self) -> Option<&[PostRecord]> {
        self.last_fetch.as_deref()
    }

    pub fn store_fetch(&mut self, records: Vec<PostRecord>) {
        self.last_fetch = Some(records);
    }

    /// Forget credentials, the connection handle and any fetched table.
    pub fn reset_credentials(&mut self) {
        self.credentials = None;
        self.connection = None;
        self.last_fetch = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::fixtures::record;

    fn connected() -> Session {
        let mut session = Session::new();
        session.set_credentials(Credentials::new("id", "secret"));
        session.set_connection(Some(Connection {
            token: AccessToken("tok".into()),
            limits: RateLimits::default(),
        }));
        session.store_fetch(vec![record("a", 1, 0)]);
        session
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.credentials().is_none());
        assert!(session.connection().is_none());
        assert!(session.last_fetch().is_none());
        assert!(!session.demo_mode());
    }

    #[test]
    fn test_reset_credentials_clears_everything() {
        let mut session = connected();
        session.reset_credentials();
        assert!(session.credentials().is_none());
        assert!(session.connection().is_none());
        assert!(session.last_fetch().is_none());
    }

    #[test]
    fn test_leave_demo_mode_drops_table() {
        let mut session = connected();
        session.set_demo_mode(true);
        session.leave_demo_mode();
        assert!(!session.demo_mode());
        assert!(session.last_fetch().is_none());
        assert!(session.connection().is_some());
    }
}
