//! Configuration management for the Spotify HTTP bridge.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, endpoint URLs, server settings,
//! and the credential bootstrap policy.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf, time::Duration};

use crate::{types::Credentials, warning};

/// Default maximum number of remote credential fetch attempts at startup.
pub const DEFAULT_BOOTSTRAP_MAX_ATTEMPTS: u32 = 3;

/// Default fixed delay between failed credential fetch attempts.
pub const DEFAULT_BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `spotbridge/.env`. This allows users to store
/// configuration securely without hardcoding sensitive values.
///
/// A missing `.env` file is not an error: deployments that fetch their
/// credentials from the remote configuration endpoint typically have no local
/// file at all, so the function only emits a warning and continues with the
/// process environment.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spotbridge/.env`
/// - macOS: `~/Library/Application Support/spotbridge/.env`
/// - Windows: `%LOCALAPPDATA%/spotbridge/.env`
///
/// # Returns
///
/// Returns `Ok(())` unless the parent directory cannot be created.
///
/// # Example
///
/// ```
/// use spotbridge::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotbridge/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if dotenv::from_path(&path).is_err() {
        warning!(
            "No .env file at {}; relying on process environment.",
            path.display()
        );
    }
    Ok(())
}

/// Returns the listen address for the bridge HTTP server.
///
/// Retrieves the `SERVER_ADDRESS` environment variable which specifies
/// the address and port where the HTTP server should bind, e.g.
/// `127.0.0.1:3001`.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the statically configured Spotify client credentials, if any.
///
/// Reads `SPOTIFY_API_AUTH_CLIENT_ID`, `SPOTIFY_API_AUTH_CLIENT_SECRET` and
/// `SPOTIFY_API_REDIRECT_URI` from the environment. All three must be present
/// for a static credential set; a partial set is treated as absent so that
/// the remote bootstrap can take over.
///
/// # Example
///
/// ```
/// if let Some(creds) = config::static_credentials() {
///     // skip the remote bootstrap entirely
/// }
/// ```
pub fn static_credentials() -> Option<Credentials> {
    let client_id = env::var("SPOTIFY_API_AUTH_CLIENT_ID").ok()?;
    let client_secret = env::var("SPOTIFY_API_AUTH_CLIENT_SECRET").ok()?;
    let redirect_uri = env::var("SPOTIFY_API_REDIRECT_URI").ok()?;
    Some(Credentials {
        client_id,
        client_secret,
        redirect_uri,
    })
}

/// Returns the remote credential endpoint URL, if configured.
///
/// Retrieves the `SPOTIFY_CREDENTIALS_URL` environment variable which points
/// at a remote configuration endpoint returning a JSON object with
/// `CLIENT_ID`, `CLIENT_SECRET` and `REDIRECT_URI` fields. When unset and no
/// static credentials are present, the bridge starts uninitialized.
pub fn credentials_url() -> Option<String> {
    env::var("SPOTIFY_CREDENTIALS_URL").ok()
}

/// Returns the maximum number of credential fetch attempts at startup.
///
/// Read from `SPOTIFY_CREDENTIALS_MAX_ATTEMPTS`; unset or unparsable values
/// fall back to [`DEFAULT_BOOTSTRAP_MAX_ATTEMPTS`].
pub fn bootstrap_max_attempts() -> u32 {
    env::var("SPOTIFY_CREDENTIALS_MAX_ATTEMPTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_BOOTSTRAP_MAX_ATTEMPTS)
}

/// Returns the fixed delay between failed credential fetch attempts.
///
/// Read from `SPOTIFY_CREDENTIALS_RETRY_DELAY` in whole seconds; unset or
/// unparsable values fall back to [`DEFAULT_BOOTSTRAP_RETRY_DELAY`].
pub fn bootstrap_retry_delay() -> Duration {
    env::var("SPOTIFY_CREDENTIALS_RETRY_DELAY")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_BOOTSTRAP_RETRY_DELAY)
}

/// Returns the Spotify API scope permissions.
///
/// Retrieves the `SPOTIFY_API_AUTH_SCOPE` environment variable which defines
/// the scope of permissions requested during OAuth authentication. Defaults to
/// the fixed scope set the bridge needs for playback control and listing.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|_| {
        "user-read-playback-state user-modify-playback-state playlist-read-private \
         user-read-currently-playing user-library-read"
            .to_string()
    })
}

/// Returns the Spotify OAuth authorization URL.
///
/// Retrieves the `SPOTIFY_API_AUTH_URL` environment variable which contains
/// the base URL for Spotify's OAuth authorization endpoint. This is where
/// users are redirected to grant permissions to the application.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Retrieves the `SPOTIFY_API_TOKEN_URL` environment variable which contains
/// the URL for exchanging authorization codes for access tokens and for
/// refresh-token grants.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Spotify Web API base URL.
///
/// Retrieves the `SPOTIFY_API_URL` environment variable which contains the
/// base URL for Spotify's Web API endpoints. This is used for all API
/// operations after authentication.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}
