use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use twitch_oauth2::{AccessToken, ClientId, ClientSecret};

use crate::Error;
use crate::http::HttpClient;
use crate::platforms::twitch::OAUTH_TOKEN_URL;
use livebot_common::traits::TokenSource;

/// Matches Twitch's JSON from the token endpoint for a client-credentials grant.
#[derive(Deserialize)]
struct AppTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    token_type: String,
}

/// Obtains app access tokens via the OAuth client-credentials flow.
///
/// App tokens carry no refresh token; "refreshing" simply means asking for a
/// new one with the same client id/secret.
pub struct TwitchAppAuthenticator {
    http: Arc<dyn HttpClient>,
    client_id: ClientId,
    client_secret: ClientSecret,
    token_url: String,
}

impl TwitchAppAuthenticator {
    pub fn new(http: Arc<dyn HttpClient>, client_id: ClientId, client_secret: ClientSecret) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            token_url: OAUTH_TOKEN_URL.to_string(),
        }
    }
}

#[async_trait]
impl TokenSource for TwitchAppAuthenticator {
    async fn request_app_token(&self) -> Result<AccessToken, Error> {
        let params = HashMap::from([
            ("client_id".to_string(),     self.client_id.as_str().to_string()),
            ("client_secret".to_string(), self.client_secret.secret().to_string()),
            ("grant_type".to_string(),    "client_credentials".to_string()),
        ]);

        let resp = self
            .http
            .post_form(self.token_url.clone(), params)
            .await
            .map_err(|e| Error::Auth(format!("HTTP error requesting app token: {e}")))?;

        if !resp.status.is_success() {
            return Err(Error::Auth(format!(
                "Twitch token endpoint error: HTTP {} => {}",
                resp.status, resp.body
            )));
        }

        let token: AppTokenResponse = serde_json::from_str(&resp.body)
            .map_err(|e| Error::Auth(format!("Parse error on token JSON: {e}")))?;

        if token.access_token.is_empty() {
            return Err(Error::Auth("Twitch token endpoint returned an empty access_token".into()));
        }

        debug!(
            "Obtained Twitch app token (type='{}', expires_in={}s)",
            token.token_type, token.expires_in
        );
        Ok(AccessToken::new(token.access_token))
    }
}
