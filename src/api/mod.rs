//! # API Module
//!
//! This module provides the HTTP route handlers served by the bridge. Every
//! handler is a thin pass-through: extract required parameters, forward the
//! request to the corresponding Spotify Web API operation, and relay the
//! result as JSON or plain text.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Redirects the caller to Spotify's authorization page
//! - [`callback`] - Completes the OAuth code exchange and stores the token
//!
//! ### Pass-through
//!
//! - [`playlists`] - Lists the user's playlists
//! - [`devices`] - Lists the user's playback devices
//! - [`search`] - Searches tracks by free-text query
//! - [`play`] - Starts playback of a context URI on a device
//! - [`stop`] - Pauses playback on a device
//!
//! ### Monitoring
//!
//! - [`health`] - Returns application status and version information
//!
//! ## Guard
//!
//! Protected handlers (everything except login, callback and health) call
//! [`ensure_authorized`] first: it rejects uninitialized or unauthenticated
//! sessions, probes token validity with a profile fetch, and attempts at most
//! one refresh when the probe fails. Parameter presence checks run before the
//! guard so that malformed requests never reach the upstream API.
//!
//! ## Error Responses
//!
//! Errors carry a short plain-text message and a generic status: 400 for a
//! missing parameter, 401 for a missing token, 500 for an uninitialized
//! session or any upstream failure. There is no structured error body.

mod callback;
mod devices;
mod health;
mod login;
mod playback;
mod playlists;
mod search;

pub use callback::callback;
pub use devices::devices;
pub use health::health;
pub use login::login;
pub use playback::{play, stop};
pub use playlists::playlists;
pub use search::search;

use axum::http::StatusCode;

use crate::{management::SharedSession, spotify::SpotifyClient, warning};

pub const UNINITIALIZED: &str = "Spotify client is not initialized";
pub const UNAUTHENTICATED: &str = "Not authenticated. Visit /login first";

/// Session guard run at the top of every protected handler.
///
/// Rejects with 500 when no client is constructed and with 401 when the
/// client holds no access token. Otherwise validates the token with a
/// profile fetch; if that fails, exactly one refresh is attempted. A
/// successful refresh overwrites the session token and the handler proceeds
/// with the new access token; a failed refresh is logged and the handler
/// proceeds with the stale token, so the triggering request may still fail
/// downstream.
pub async fn ensure_authorized(
    session: &SharedSession,
) -> Result<(SpotifyClient, String), (StatusCode, &'static str)> {
    let (client, token) = {
        let session = session.lock().await;
        let Some(client) = session.client().cloned() else {
            return Err((StatusCode::INTERNAL_SERVER_ERROR, UNINITIALIZED));
        };
        let Some(token) = session.token().cloned() else {
            return Err((StatusCode::UNAUTHORIZED, UNAUTHENTICATED));
        };
        (client, token)
    };

    if client.current_user(&token.access_token).await.is_ok() {
        return Ok((client, token.access_token));
    }

    match client.refresh(&token.refresh_token).await {
        Ok(new_token) => {
            let access_token = new_token.access_token.clone();
            session.lock().await.set_token(new_token);
            Ok((client, access_token))
        }
        Err(e) => {
            warning!("Token refresh failed: {}", e);
            Ok((client, token.access_token))
        }
    }
}
