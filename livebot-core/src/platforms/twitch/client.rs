// File: livebot-core/src/platforms/twitch/client.rs

use std::sync::Arc;

use twitch_oauth2::ClientId;

use crate::http::HttpClient;
use crate::platforms::twitch::HELIX_BASE_URL;

/// A small wrapper client for calling Helix endpoints.
///
/// The bearer token is deliberately not stored here: the live-check task owns
/// it and passes it in per request, so a refresh never has to reach into the
/// client.
pub struct TwitchHelixClient {
    http: Arc<dyn HttpClient>,
    client_id: ClientId,
    base_url: String,
}

impl TwitchHelixClient {
    pub fn new(http: Arc<dyn HttpClient>, client_id: ClientId) -> Self {
        Self {
            http,
            client_id,
            base_url: HELIX_BASE_URL.to_string(),
        }
    }

    /// Points the client at another Helix-compatible host (e.g. the Twitch CLI mock API).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Expose the client_id for Helix requests that require it.
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient> {
        self.http.clone()
    }
}
