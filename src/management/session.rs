use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{spotify::SpotifyClient, types::Token};

/// Shared handle to the single process-wide session, injected into route
/// handlers via axum `Extension`.
pub type SharedSession = Arc<Mutex<SessionManager>>;

/// Owner of the single client and token slot.
///
/// At most one credential set and one token pair exist at a time; there is no
/// multi-user or multi-session support. The token pair is overwritten
/// wholesale on login completion and on refresh, and no expiry timestamp is
/// tracked: expiry is discovered reactively when a validity probe fails.
///
/// Concurrent logins or refreshes are not guarded against beyond the mutex
/// protecting individual slot accesses; two in-flight requests may both
/// trigger a refresh and the later write wins. This mirrors the observed
/// behavior of the system this bridge replaces.
pub struct SessionManager {
    client: Option<SpotifyClient>,
    token: Option<Token>,
}

impl SessionManager {
    /// Creates an uninitialized session: no client, no token.
    pub fn new() -> Self {
        SessionManager {
            client: None,
            token: None,
        }
    }

    /// Creates a session with a constructed client but no token yet.
    pub fn with_client(client: SpotifyClient) -> Self {
        SessionManager {
            client: Some(client),
            token: None,
        }
    }

    pub fn client(&self) -> Option<&SpotifyClient> {
        self.client.as_ref()
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Installs the client constructed from bootstrapped credentials. Called
    /// once at startup; later calls would replace the client wholesale.
    pub fn set_client(&mut self, client: SpotifyClient) {
        self.client = Some(client);
    }

    /// Overwrites the token pair wholesale.
    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
