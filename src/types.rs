use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "CLIENT_ID")]
    pub client_id: String,
    #[serde(rename = "CLIENT_SECRET")]
    pub client_secret: String,
    #[serde(rename = "REDIRECT_URI")]
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scope: String,
}

// Search responses are relayed as-is; only the `tracks.items` array is
// unwrapped, the track records themselves stay opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracksResponse {
    pub tracks: TracksContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksContainer {
    pub items: Vec<Value>,
}
