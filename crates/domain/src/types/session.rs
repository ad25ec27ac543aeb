//! Session credential state for the remote platform
//!
//! The platform authenticates through three chained cookie-style tokens; all
//! business calls carry the full triple. `SessionState` is owned and mutated
//! exclusively by the session manager in `frostlink-infra`.

use std::time::{Duration, Instant};

/// The three-token credential set plus its freshness bookkeeping.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// `JSESSIONID` issued by the login service.
    pub primary_session_id: String,
    /// `sid` issued alongside the primary token.
    pub secondary_session_id: String,
    /// `JSESSIONID` re-issued in the app context during the open-app exchange.
    pub app_session_id: String,
    pub authenticated_at: Instant,
    pub ttl: Duration,
    /// Cleared when a later login chain fails; the token triple itself is
    /// left untouched so diagnostics can still see the prior state.
    pub logged_in: bool,
}

impl SessionState {
    pub fn new(
        primary_session_id: String,
        secondary_session_id: String,
        app_session_id: String,
        ttl: Duration,
    ) -> Self {
        Self {
            primary_session_id,
            secondary_session_id,
            app_session_id,
            authenticated_at: Instant::now(),
            ttl,
            logged_in: true,
        }
    }

    /// A state is usable only while all three tokens are present, the
    /// logged-in flag is set, and the TTL has not elapsed.
    pub fn is_valid(&self) -> bool {
        self.logged_in
            && !self.primary_session_id.is_empty()
            && !self.secondary_session_id.is_empty()
            && !self.app_session_id.is_empty()
            && self.authenticated_at.elapsed() <= self.ttl
    }
}
