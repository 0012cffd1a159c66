use async_trait::async_trait;
use twitch_oauth2::AccessToken;

use crate::error::Error;
use crate::models::StreamSnapshot;

/// "Get current streams for a user login" on the streaming platform.
#[async_trait]
pub trait StreamsApi: Send + Sync {
    /// Returns every active stream for `user_login`; empty means offline.
    ///
    /// A rejected token must surface as [`Error::Unauthorized`].
    async fn get_streams(
        &self,
        user_login: &str,
        token: &AccessToken,
    ) -> Result<Vec<StreamSnapshot>, Error>;
}

/// Issues app access tokens (OAuth client-credentials grant).
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn request_app_token(&self) -> Result<AccessToken, Error>;
}
