// ========================================================
// File: livebot-common/src/models/stream.rs
// ========================================================
use serde::{Deserialize, Serialize};

/// Response from the Helix "Get Streams" endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    pub data: Vec<StreamSnapshot>,
}

/// One active stream as reported by a single status check.
///
/// Helix leaves `title` and `game_name` empty rather than omitting them, and
/// everything we do not need is ignored, so every field falls back to its
/// default when missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StreamSnapshot {
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub viewer_count: u64,
    /// Contains `{width}` and `{height}` placeholders.
    #[serde(default)]
    pub thumbnail_url: String,
}

impl StreamSnapshot {
    /// The thumbnail template with its size placeholders filled in.
    pub fn thumbnail_url_sized(&self, width: u32, height: u32) -> String {
        self.thumbnail_url
            .replace("{width}", &width.to_string())
            .replace("{height}", &height.to_string())
    }
}
