use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::Value;

use crate::{spotify::SpotifyClient, types::Token, utils};

impl SpotifyClient {
    /// Constructs the provider authorization URL for the configured scope set.
    ///
    /// The caller is redirected here to grant permissions; the provider then
    /// redirects back to the configured redirect URI with an authorization
    /// code in the query string.
    ///
    /// # Example
    ///
    /// ```
    /// let url = client.authorize_url();
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn authorize_url(&self) -> String {
        format!(
            "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
            auth_url = self.endpoints().auth_url,
            client_id = self.credentials().client_id,
            redirect_uri = self.credentials().redirect_uri,
            scope = utils::encode_scope(&self.endpoints().scope),
        )
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    ///
    /// Completes the OAuth 2.0 authorization-code flow by posting the code
    /// received on the callback route to the token endpoint, authenticating
    /// the client with HTTP Basic auth (base64 of `client_id:client_secret`).
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code received from the OAuth callback
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Token)` - Access and refresh token pair
    /// - `Err(reqwest::Error)` - HTTP error, network error, or API error
    ///
    /// # Error Handling
    ///
    /// Common failure scenarios:
    /// - Invalid or expired authorization code
    /// - Redirect URI mismatch with the registered application
    /// - Network connectivity issues
    /// - Spotify API service errors
    pub async fn exchange_code(&self, code: &str) -> Result<Token, reqwest::Error> {
        let res = self
            .http()
            .post(&self.endpoints().token_url)
            .header("Authorization", self.basic_auth_header())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", &self.credentials().redirect_uri),
            ])
            .send()
            .await?
            .error_for_status()?;

        let json: Value = res.json().await?;
        Ok(token_from_json(&json))
    }

    /// Refreshes an expired access token using a refresh token.
    ///
    /// Exchanges a refresh token for a new access token when a validity probe
    /// has failed. The session token is overwritten wholesale with whatever
    /// the provider returns; fields absent from the response come back empty.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - Refresh token obtained from a previous exchange
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(Token)` - New token pair
    /// - `Err(String)` - Error message describing the failure
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token, String> {
        let res = self
            .http()
            .post(&self.endpoints().token_url)
            .header("Authorization", self.basic_auth_header())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let json: Value = res.json().await.map_err(|e| e.to_string())?;
        Ok(token_from_json(&json))
    }

    fn basic_auth_header(&self) -> String {
        let raw = format!(
            "{}:{}",
            self.credentials().client_id,
            self.credentials().client_secret
        );
        format!("Basic {}", STANDARD.encode(raw))
    }
}

fn token_from_json(json: &Value) -> Token {
    Token {
        access_token: json["access_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
    }
}
