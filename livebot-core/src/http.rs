//! HTTP client abstraction for the streaming-platform integration.
//!
//! Twitch request code talks to [`HttpClient`] instead of `reqwest` directly,
//! so the status handling (401 vs. other failures) and payload parsing can be
//! exercised in tests without real network requests.
//!
//! Unlike `reqwest`'s `error_for_status`, the trait hands back non-2xx
//! responses as data; callers decide what a given status means.
//!
//! # Example Usage:
//! ```ignore
//! use crate::http::{HttpClient, DefaultHttpClient};
//!
//! let helix = TwitchHelixClient::new(Arc::new(DefaultHttpClient::new()), client_id);
//!
//! // In tests
//! let helix = TwitchHelixClient::new(Arc::new(MockHttpClient::new()), client_id);
//! ```

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;

use crate::Error;

/// Outbound calls are capped so a hung API cannot stall a poll tick forever.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// A generic trait for making HTTP requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn post_form(&self, url: String, form: HashMap<String, String>) -> Result<HttpResponse, Error>;
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for DefaultHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn post_form(&self, url: String, form: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let response = self.client
            .post(&url)
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
