use serde_json::{Value, json};

use crate::spotify::SpotifyClient;

impl SpotifyClient {
    /// Lists the user's available playback devices.
    ///
    /// The response is relayed to the caller unmodified.
    pub async fn devices(&self, token: &str) -> Result<Value, reqwest::Error> {
        let api_url = format!("{uri}/me/player/devices", uri = self.endpoints().api_url);

        let res = self
            .http()
            .get(&api_url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        res.json().await
    }

    /// Starts playback of a context URI on the given device.
    ///
    /// Issues `PUT /me/player/play` with the context URI in the body. Spotify
    /// answers 204 No Content on success, so only the status is inspected.
    pub async fn play(
        &self,
        token: &str,
        device_id: &str,
        uri: &str,
    ) -> Result<(), reqwest::Error> {
        let api_url = format!("{api}/me/player/play", api = self.endpoints().api_url);

        self.http()
            .put(&api_url)
            .query(&[("device_id", device_id)])
            .bearer_auth(token)
            .json(&json!({ "context_uri": uri }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Pauses playback on the given device.
    pub async fn pause(&self, token: &str, device_id: &str) -> Result<(), reqwest::Error> {
        let api_url = format!("{api}/me/player/pause", api = self.endpoints().api_url);

        self.http()
            .put(&api_url)
            .query(&[("device_id", device_id)])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
