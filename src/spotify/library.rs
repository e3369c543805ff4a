use serde_json::Value;

use crate::{spotify::SpotifyClient, types::SearchTracksResponse};

impl SpotifyClient {
    /// Fetches the authenticated user's profile.
    ///
    /// Used as the lightweight token-validity probe before protected routes:
    /// a failing profile fetch is the only signal that the access token has
    /// expired, since no expiry timestamp is tracked.
    pub async fn current_user(&self, token: &str) -> Result<Value, reqwest::Error> {
        let api_url = format!("{uri}/me", uri = self.endpoints().api_url);

        let res = self
            .http()
            .get(&api_url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        res.json().await
    }

    /// Fetches the authenticated user's playlists.
    ///
    /// The response is relayed to the caller unmodified.
    pub async fn playlists(&self, token: &str) -> Result<Value, reqwest::Error> {
        let api_url = format!("{uri}/me/playlists", uri = self.endpoints().api_url);

        let res = self
            .http()
            .get(&api_url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        res.json().await
    }

    /// Searches tracks by free-text query.
    ///
    /// Relays the `tracks.items` array from the search response; the track
    /// records themselves are opaque.
    pub async fn search_tracks(
        &self,
        token: &str,
        query: &str,
    ) -> Result<Vec<Value>, reqwest::Error> {
        let api_url = format!("{uri}/search", uri = self.endpoints().api_url);

        let res = self
            .http()
            .get(&api_url)
            .query(&[("q", query), ("type", "track")])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        let body: SearchTracksResponse = res.json().await?;
        Ok(body.tracks.items)
    }
}
