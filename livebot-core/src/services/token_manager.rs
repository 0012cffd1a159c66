use std::sync::Arc;

use tracing::{error, info};
use twitch_oauth2::AccessToken;

use livebot_common::traits::TokenSource;

/// Holds the current Helix bearer token and replaces it on demand.
///
/// Starts out empty. A failed refresh keeps whatever token was there before;
/// the next rejected request will trigger another attempt.
pub struct TokenManager {
    source: Arc<dyn TokenSource>,
    token: AccessToken,
}

impl TokenManager {
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            token: AccessToken::new(String::new()),
        }
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn has_token(&self) -> bool {
        !self.token.secret().is_empty()
    }

    /// Requests a fresh app token. Returns true when a new token was stored.
    pub async fn refresh(&mut self) -> bool {
        match self.source.request_app_token().await {
            Ok(token) => {
                self.token = token;
                info!("Twitch access token refreshed");
                true
            }
            Err(e) => {
                error!("Failed to refresh Twitch access token: {}", e);
                false
            }
        }
    }
}
