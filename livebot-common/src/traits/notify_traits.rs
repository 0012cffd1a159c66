use async_trait::async_trait;
use twilight_model::channel::message::Embed;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

use crate::error::Error;
use crate::models::StreamSnapshot;

/// What happened to a single go-live announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    ChannelNotFound,
    SendFailed,
}

/// The slice of a chat client the notifier needs.
#[async_trait]
pub trait ChannelSink: Send + Sync {
    /// Looks the channel up in the client's cached channel set.
    fn has_channel(&self, channel_id: Id<ChannelMarker>) -> bool;

    async fn send_embed(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &str,
        embed: Embed,
    ) -> Result<(), Error>;
}

/// Announces a live transition. Never fails; problems are logged.
#[async_trait]
pub trait LiveNotifier: Send + Sync {
    async fn notify(&self, snapshot: &StreamSnapshot) -> NotifyOutcome;
}
