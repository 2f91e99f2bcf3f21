//! Session state and the cached authentication check.
//!
//! Pages ask "is anyone signed in?" on every navigation. Hitting `/me` each
//! time would hammer the backend, so the answer is cached and reused for a
//! short window. Server-rendered checks never trust the cache: each inbound
//! page request may belong to a different visitor, so they always go to the
//! network with that request's forwarded cookie.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::User;

/// How long a completed session check stays fresh, in minutes.
/// Within this window repeated checks return the cached answer, positive or
/// negative, without a network call.
const CACHE_DURATION_MINUTES: i64 = 5;

/// Coarse answer to "is anyone signed in?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// No completed check on record
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// Snapshot of the session as last observed.
///
/// `user` is present exactly when `authenticated` is true; the mutators
/// below keep that pairing.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    authenticated: bool,
    user: Option<User>,
    loading: bool,
    last_checked: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a check is in flight right now
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// When the last check completed, if one has
    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    pub fn status(&self) -> AuthStatus {
        if self.authenticated {
            AuthStatus::Authenticated
        } else if self.last_checked.is_some() {
            AuthStatus::Unauthenticated
        } else {
            AuthStatus::Unknown
        }
    }

    /// Whether the last completed check is recent enough to reuse
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_checked {
            Some(at) => now - at < Duration::minutes(CACHE_DURATION_MINUTES),
            None => false,
        }
    }

    fn mark_authenticated(&mut self, user: User, at: DateTime<Utc>) {
        self.authenticated = true;
        self.user = Some(user);
        self.last_checked = Some(at);
    }

    /// `at` is the completion time of a check that came back negative, or
    /// `None` when the state is being reset rather than observed.
    fn mark_unauthenticated(&mut self, at: Option<DateTime<Utc>>) {
        self.authenticated = false;
        self.user = None;
        self.last_checked = at;
    }
}

/// Shared session guard in front of the `/me` endpoint.
///
/// Clone is cheap and clones share the same state, so every page or
/// component sees one session.
#[derive(Clone)]
pub struct AuthSession {
    client: ApiClient,
    state: Arc<RwLock<SessionState>>,
}

impl AuthSession {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.authenticated
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn status(&self) -> AuthStatus {
        self.state.read().await.status()
    }

    /// Check whether a user is signed in, reusing a fresh cached answer
    /// unless `force` is set or the client runs in a server context.
    ///
    /// Never fails: any error from the backend counts as "not signed in".
    /// The check time is captured on entry, so the freshness window runs
    /// from when the check started rather than when the response landed.
    /// Overlapping calls may each reach the network; whichever finishes
    /// last determines the state.
    pub async fn check_authenticated(&self, force: bool) -> bool {
        let now = Utc::now();

        if !force && !self.client.context().is_server() {
            let state = self.state.read().await;
            if state.is_fresh(now) {
                debug!(
                    authenticated = state.authenticated,
                    "Using cached session check"
                );
                return state.authenticated;
            }
        }

        {
            let mut state = self.state.write().await;
            state.loading = true;
        }

        // The lock is not held across the request.
        let result = self.client.me().await;

        let mut state = self.state.write().await;
        let authenticated = match result {
            Ok(user) => {
                debug!(user_id = %user.id, "Session check confirmed");
                state.mark_authenticated(user, now);
                true
            }
            Err(e) => {
                debug!(error = %e, "Session check negative");
                state.mark_unauthenticated(Some(now));
                false
            }
        };
        state.loading = false;
        authenticated
    }

    /// Force a check against the backend, ignoring any cached answer
    pub async fn refresh_authenticated(&self) -> bool {
        self.check_authenticated(true).await
    }

    /// Drop the cached state without talking to the backend. The next check
    /// goes to the network.
    pub async fn clear_authenticated(&self) {
        let mut state = self.state.write().await;
        state.mark_unauthenticated(None);
    }

    /// End the session. The backend call may fail (network down, session
    /// already gone); the local state is cleared regardless.
    pub async fn logout(&self) {
        {
            let mut state = self.state.write().await;
            state.loading = true;
        }

        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "Logout request failed, clearing local state anyway");
        }

        let mut state = self.state.write().await;
        state.mark_unauthenticated(None);
        state.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "68a1f0c2e4b0a1b2c3d4e5a1".to_string(),
            email: "alice@example.com".to_string(),
            username: Some("alice".to_string()),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_fresh_within_window() {
        let now = Utc::now();
        let mut state = SessionState::default();
        state.mark_authenticated(test_user(), now - Duration::minutes(4));
        assert!(state.is_fresh(now));
    }

    #[test]
    fn test_stale_at_window_boundary() {
        let now = Utc::now();
        let mut state = SessionState::default();
        state.mark_authenticated(test_user(), now - Duration::minutes(5));
        assert!(!state.is_fresh(now));

        state.mark_authenticated(test_user(), now - Duration::minutes(61));
        assert!(!state.is_fresh(now));
    }

    #[test]
    fn test_negative_checks_are_cached_too() {
        let now = Utc::now();
        let mut state = SessionState::default();
        state.mark_unauthenticated(Some(now - Duration::minutes(1)));
        assert!(state.is_fresh(now));
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_never_checked_is_not_fresh() {
        let state = SessionState::default();
        assert!(!state.is_fresh(Utc::now()));
    }

    #[test]
    fn test_user_tracks_authenticated() {
        let mut state = SessionState::default();
        assert!(state.user().is_none());

        state.mark_authenticated(test_user(), Utc::now());
        assert!(state.is_authenticated());
        assert!(state.user().is_some());

        state.mark_unauthenticated(None);
        assert!(!state.is_authenticated());
        assert!(state.user().is_none());
    }

    #[test]
    fn test_status_progression() {
        let mut state = SessionState::default();
        assert_eq!(state.status(), AuthStatus::Unknown);

        state.mark_unauthenticated(Some(Utc::now()));
        assert_eq!(state.status(), AuthStatus::Unauthenticated);

        state.mark_authenticated(test_user(), Utc::now());
        assert_eq!(state.status(), AuthStatus::Authenticated);

        // A reset forgets the check entirely
        state.mark_unauthenticated(None);
        assert_eq!(state.status(), AuthStatus::Unknown);
    }
}
