// ========================================================
// File: livebot-core/src/platforms/twitch/requests/stream.rs
// ========================================================
use std::collections::HashMap;

use async_trait::async_trait;
use http::StatusCode;
use tracing::{debug, trace};
use twitch_oauth2::AccessToken;

use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;
use livebot_common::models::{StreamSnapshot, StreamsResponse};
use livebot_common::traits::StreamsApi;

/// Calls Helix "Get Streams" for a single login.
///
/// Returns the (possibly empty) list of active streams. A 401 is reported as
/// [`Error::Unauthorized`] so the caller can swap its token; every other
/// non-2xx status becomes [`Error::Platform`].
pub async fn fetch_streams(
    client: &TwitchHelixClient,
    user_login: &str,
    token: &AccessToken,
) -> Result<Vec<StreamSnapshot>, Error> {
    let url = format!(
        "{}/streams?user_login={}",
        client.base_url(),
        urlencoding::encode(user_login)
    );

    let headers = HashMap::from([
        ("Client-Id".to_string(), client.client_id().as_str().to_string()),
        ("Authorization".to_string(), format!("Bearer {}", token.secret())),
    ]);

    let resp = client
        .http_client()
        .get(url, headers)
        .await
        .map_err(|e| Error::Platform(format!("fetch_streams network error: {}", e)))?;

    if resp.status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized(format!("fetch_streams: HTTP 401 => {}", resp.body)));
    }
    if !resp.status.is_success() {
        return Err(Error::Platform(format!(
            "fetch_streams: HTTP {} => {}",
            resp.status, resp.body
        )));
    }

    trace!("fetch_streams raw body: {}", resp.body);
    let parsed: StreamsResponse = serde_json::from_str(&resp.body)
        .map_err(|e| Error::Platform(format!("fetch_streams parse error: {}", e)))?;

    debug!("Helix reports {} active stream(s) for '{}'", parsed.data.len(), user_login);
    Ok(parsed.data)
}

#[async_trait]
impl StreamsApi for TwitchHelixClient {
    async fn get_streams(
        &self,
        user_login: &str,
        token: &AccessToken,
    ) -> Result<Vec<StreamSnapshot>, Error> {
        fetch_streams(self, user_login, token).await
    }
}
