//! # Spotify Integration Module
//!
//! This module provides the bridge's interface to the Spotify Web API and the
//! Spotify accounts service. It handles the OAuth 2.0 authorization-code flow
//! (authorization URL construction, code exchange, token refresh) and the
//! pass-through API operations the bridge exposes over HTTP.
//!
//! ## Overview
//!
//! All vendor communication goes through [`SpotifyClient`], which bundles a
//! shared [`reqwest::Client`], the client credential triple, and the endpoint
//! set (authorization URL, token URL, API base URL, scope). Bundling the
//! endpoints instead of reading them ambiently keeps the client injectable:
//! production code builds it with [`SpotifyClient::from_config`], tests point
//! it at local mock servers with [`SpotifyClient::new`].
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow: authorization URL, code
//!   exchange, and refresh-token grants using HTTP Basic client authentication
//! - [`library`] - User library operations: profile fetch (token validity
//!   probe), playlist listing, and track search
//! - [`player`] - Player operations: device listing, starting playback of a
//!   context URI, and pausing playback
//!
//! ## Pass-through Contract
//!
//! Device, playlist and track records are defined entirely by the upstream
//! API. The bridge relays them as opaque `serde_json::Value`s and neither
//! validates nor transforms their shape; the only unwrapping performed is
//! extracting the `tracks.items` array from search responses.
//!
//! ## Error Types
//!
//! Vendor API calls return `Result<_, reqwest::Error>`. Token-management
//! calls return `Result<_, String>` where a flattened error message is all
//! the caller can act on.

pub mod auth;
pub mod library;
pub mod player;

use reqwest::Client;

use crate::{
    config,
    types::{ApiEndpoints, Credentials},
};

/// Authenticated client for the Spotify Web API and accounts service.
///
/// Holds the credential triple and endpoint set for the lifetime of the
/// process. Cloning is cheap: the inner `reqwest::Client` is reference
/// counted, so handlers clone the client out of the shared session and drop
/// the session lock before performing network calls.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    credentials: Credentials,
    endpoints: ApiEndpoints,
}

impl SpotifyClient {
    /// Creates a client with an explicit endpoint set.
    pub fn new(credentials: Credentials, endpoints: ApiEndpoints) -> Self {
        SpotifyClient {
            http: Client::new(),
            credentials,
            endpoints,
        }
    }

    /// Creates a client using the endpoint set from the environment.
    pub fn from_config(credentials: Credentials) -> Self {
        Self::new(
            credentials,
            ApiEndpoints {
                auth_url: config::spotify_apiauth_url(),
                token_url: config::spotify_apitoken_url(),
                api_url: config::spotify_apiurl(),
                scope: config::spotify_scope(),
            },
        )
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }
}
