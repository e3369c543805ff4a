use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;

use crate::{Res, config, info, success, types::Credentials, warning};

/// Bounded-retry fetcher for client credentials from a remote configuration
/// endpoint.
///
/// At process start the bridge attempts up to `max_attempts` fetches against
/// the credential endpoint, sleeping a fixed `retry_delay` between failed
/// attempts. The first response carrying a complete
/// `{CLIENT_ID, CLIENT_SECRET, REDIRECT_URI}` triple wins and no further
/// attempts are made, even if the values later prove invalid. Exhaustion is
/// non-fatal: the server keeps running with an uninitialized session and
/// every protected route reports the uninitialized error.
pub struct CredentialBootstrapper {
    url: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl CredentialBootstrapper {
    /// Creates a bootstrapper with an explicit retry policy.
    pub fn new(url: String, max_attempts: u32, retry_delay: Duration) -> Self {
        CredentialBootstrapper {
            url,
            max_attempts,
            retry_delay,
        }
    }

    /// Creates a bootstrapper for the given endpoint with the retry policy
    /// from the environment.
    pub fn from_config(url: String) -> Self {
        Self::new(
            url,
            config::bootstrap_max_attempts(),
            config::bootstrap_retry_delay(),
        )
    }

    /// Runs the bounded retry loop.
    ///
    /// Network errors, non-success statuses and responses missing any of the
    /// three required fields all count as a failed attempt; each failure is
    /// logged and never aborts the process. Returns `None` after exhaustion.
    pub async fn run(&self) -> Option<Credentials> {
        let client = Client::new();

        for attempt in 1..=self.max_attempts {
            info!(
                "Fetching client credentials (attempt {}/{})...",
                attempt, self.max_attempts
            );

            match fetch_credentials(&client, &self.url).await {
                Ok(credentials) => {
                    success!("Client credentials obtained.");
                    return Some(credentials);
                }
                Err(e) => {
                    warning!("Credential fetch attempt {} failed: {}", attempt, e);
                }
            }

            if attempt < self.max_attempts {
                sleep(self.retry_delay).await;
            }
        }

        warning!(
            "Could not obtain client credentials after {} attempts; starting uninitialized.",
            self.max_attempts
        );
        None
    }
}

async fn fetch_credentials(client: &Client, url: &str) -> Res<Credentials> {
    let res = client.get(url).send().await?.error_for_status()?;
    // Missing fields surface as a deserialization error and count as a
    // failed attempt.
    let credentials: Credentials = res.json().await?;
    Ok(credentials)
}
