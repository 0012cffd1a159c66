// ========================================================
// File: livebot-core/src/services/notifier.rs
// ========================================================
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use twilight_model::channel::message::Embed;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;
use twilight_model::util::Timestamp;
use twilight_util::builder::embed::{
    EmbedAuthorBuilder, EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder, ImageSource,
};

use livebot_common::models::StreamSnapshot;
use livebot_common::traits::{ChannelSink, LiveNotifier, NotifyOutcome};

pub const TWITCH_PURPLE: u32 = 0x9146FF;
pub const TITLE_FALLBACK: &str = "No title set";
pub const GAME_FALLBACK: &str = "No category";
pub const FOOTER_TEXT: &str = "Twitch Live Alert";
pub const THUMBNAIL_WIDTH: u32 = 320;
pub const THUMBNAIL_HEIGHT: u32 = 180;

/// Posts go-live announcements to one Discord channel.
pub struct StreamNotifier {
    sink: Arc<dyn ChannelSink>,
    channel_id: Id<ChannelMarker>,
}

impl StreamNotifier {
    pub fn new(sink: Arc<dyn ChannelSink>, channel_id: Id<ChannelMarker>) -> Self {
        Self { sink, channel_id }
    }
}

#[async_trait]
impl LiveNotifier for StreamNotifier {
    async fn notify(&self, snapshot: &StreamSnapshot) -> NotifyOutcome {
        if !self.sink.has_channel(self.channel_id) {
            error!(
                "Announcement channel {} not found in Discord cache; dropping notification for '{}'",
                self.channel_id, snapshot.user_name
            );
            return NotifyOutcome::ChannelNotFound;
        }

        let embed = build_live_embed(snapshot, chrono::Utc::now().timestamp());
        let content = announcement_content(snapshot);

        match self.sink.send_embed(self.channel_id, &content, embed).await {
            Ok(()) => {
                info!("Sent live announcement for '{}' to channel {}", snapshot.user_name, self.channel_id);
                NotifyOutcome::Sent
            }
            Err(e) => {
                error!("Failed to send live announcement for '{}': {}", snapshot.user_name, e);
                NotifyOutcome::SendFailed
            }
        }
    }
}

pub fn channel_url(snapshot: &StreamSnapshot) -> String {
    let login = if snapshot.user_login.is_empty() {
        snapshot.user_name.to_lowercase()
    } else {
        snapshot.user_login.clone()
    };
    format!("https://twitch.tv/{}", login)
}

/// Plain message body sent alongside the embed.
pub fn announcement_content(snapshot: &StreamSnapshot) -> String {
    format!(
        "@everyone {} is now live on Twitch! {}",
        snapshot.user_name,
        channel_url(snapshot)
    )
}

/// Builds the rich embed for a stream that just went live.
pub fn build_live_embed(snapshot: &StreamSnapshot, unix_secs: i64) -> Embed {
    let link = channel_url(snapshot);
    let title = non_empty_or(&snapshot.title, TITLE_FALLBACK);
    let game = non_empty_or(&snapshot.game_name, GAME_FALLBACK);

    let mut builder = EmbedBuilder::new()
        .title(format!("🔴 {} is now LIVE!", snapshot.user_name))
        .url(link.clone())
        .description(title)
        .color(TWITCH_PURPLE)
        .author(EmbedAuthorBuilder::new(snapshot.user_name.clone()).url(link).build())
        .field(EmbedFieldBuilder::new("Game", game).inline().build())
        .field(EmbedFieldBuilder::new("Viewers", snapshot.viewer_count.to_string()).inline().build())
        .footer(EmbedFooterBuilder::new(FOOTER_TEXT).build());

    let thumbnail = snapshot.thumbnail_url_sized(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT);
    if !thumbnail.is_empty() {
        match ImageSource::url(thumbnail.as_str()) {
            Ok(source) => builder = builder.thumbnail(source),
            Err(e) => warn!("Skipping stream thumbnail '{}': {}", thumbnail, e),
        }
    }

    match Timestamp::from_secs(unix_secs) {
        Ok(ts) => builder = builder.timestamp(ts),
        Err(e) => warn!("Skipping embed timestamp {}: {}", unix_secs, e),
    }

    builder.build()
}

/// Stand-in stream data used for the startup test announcement.
pub fn placeholder_snapshot(user_login: &str) -> StreamSnapshot {
    StreamSnapshot {
        user_login: user_login.to_string(),
        user_name: user_login.to_string(),
        title: "Test stream: this is what a live announcement looks like".to_string(),
        game_name: "Just Chatting".to_string(),
        viewer_count: 0,
        thumbnail_url: format!(
            "https://static-cdn.jtvnw.net/previews-ttv/live_user_{}-{{width}}x{{height}}.jpg",
            user_login
        ),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() { fallback.to_string() } else { trimmed.to_string() }
}
