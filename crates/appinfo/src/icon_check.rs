//! Best-effort icon URL verification.
//!
//! Callers fire the check and move on; the outcome is a deferred boolean
//! resolved on a background task. Network errors, non-2xx statuses, and
//! malformed URLs all read uniformly as "invalid"; verification never
//! fails a request.

use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinHandle;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

enum Deferred {
    /// Decided without any network call (e.g. empty URL).
    Ready(bool),
    Pending(JoinHandle<bool>),
}

/// Deferred result of one verification.
pub struct IconCheck {
    deferred: Deferred,
}

impl IconCheck {
    /// Await the verification outcome.
    pub async fn outcome(self) -> bool {
        match self.deferred {
            Deferred::Ready(value) => value,
            // A cancelled/panicked worker counts as "invalid".
            Deferred::Pending(handle) => handle.await.unwrap_or(false),
        }
    }
}

/// Fire-and-forget HEAD checker for icon URLs.
#[derive(Clone)]
pub struct IconVerifier {
    http_client: Client,
}

impl IconVerifier {
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
        }
    }

    /// Start verifying `url` without blocking the caller.
    ///
    /// An empty or whitespace-only URL resolves to `false` immediately, with
    /// no network call.
    pub fn verify(&self, url: &str) -> IconCheck {
        let url = url.trim().to_string();
        if url.is_empty() {
            return IconCheck {
                deferred: Deferred::Ready(false),
            };
        }

        let client = self.http_client.clone();
        let handle = tokio::spawn(async move {
            let exists = head_exists(&client, &url).await;
            if !exists {
                tracing::debug!(%url, "icon url did not verify");
            }
            exists
        });
        IconCheck {
            deferred: Deferred::Pending(handle),
        }
    }
}

impl Default for IconVerifier {
    fn default() -> Self {
        Self::new()
    }
}

async fn head_exists(client: &Client, url: &str) -> bool {
    match client.head(url).timeout(REQUEST_TIMEOUT).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}
