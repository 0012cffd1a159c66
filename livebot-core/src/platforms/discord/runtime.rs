use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_cache_inmemory::{DefaultInMemoryCache, ResourceType};
use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_http::client::ClientBuilder;
use twilight_model::channel::message::{AllowedMentions, Embed, MentionType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker};

use crate::Error;
use livebot_common::traits::ChannelSink;

/// The shard runner:
///   - calls `shard.next_event(...)`
///   - updates the in-memory cache
///   - flips `ready_tx` once every guild announced in READY has been cached.
async fn shard_runner(
    mut shard: Shard,
    cache: Arc<DefaultInMemoryCache>,
    ready_tx: watch::Sender<bool>,
) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    let mut pending_guilds: Option<HashSet<Id<GuildMarker>>> = None;

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        match item {
            Ok(event) => {
                cache.update(&event);

                match &event {
                    Event::Ready(ready) => {
                        info!(
                            "Shard {shard_id} => READY as {} (ID={}), {} guild(s)",
                            ready.user.name,
                            ready.user.id,
                            ready.guilds.len()
                        );
                        pending_guilds = Some(ready.guilds.iter().map(|g| g.id).collect());
                    }
                    Event::GuildCreate(_) => {
                        trace!("Shard {shard_id} => guild create");
                    }
                    _ => {
                        trace!("Shard {shard_id} => unhandled event: {:?}", event.kind());
                    }
                }

                if let Some(pending) = pending_guilds.as_mut() {
                    pending.retain(|guild_id| cache.guild(*guild_id).is_none());
                    if pending.is_empty() && !*ready_tx.borrow() {
                        info!("Shard {shard_id} => guild cache populated");
                        let _ = ready_tx.send(true);
                    }
                }
            }
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

/// Discord bot session: REST client, gateway shards, and the channel cache
/// the shards keep up to date.
pub struct DiscordPlatform {
    pub token: String,

    pub shard_tasks: Vec<JoinHandle<()>>,
    pub shard_senders: Vec<MessageSender>,

    pub http: Option<Arc<HttpClient>>,
    pub cache: Option<Arc<DefaultInMemoryCache>>,

    ready_tx: watch::Sender<bool>,
    ready_rx: watch::Receiver<bool>,
}

impl DiscordPlatform {
    pub fn new(token: String) -> Self {
        let (ready_tx, ready_rx) = watch::channel(false);
        Self {
            token,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
            http: None,
            cache: None,
            ready_tx,
            ready_rx,
        }
    }

    pub fn is_connected(&self) -> bool {
        !self.shard_tasks.is_empty()
    }

    /// Logs in and spawns the shard runners. Fails if Discord rejects the token.
    pub async fn connect(&mut self) -> Result<(), Error> {
        if self.is_connected() {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }
        if self.token.is_empty() {
            return Err(Error::Auth("Discord token is empty".into()));
        }

        let http_client = Arc::new(
            ClientBuilder::new()
                .token(self.token.clone())
                .timeout(Duration::from_secs(30))
                .build()
        );
        self.http = Some(http_client.clone());

        let cache = DefaultInMemoryCache::builder()
            .resource_types(ResourceType::GUILD | ResourceType::CHANNEL)
            .build();
        let cache = Arc::new(cache);
        self.cache = Some(cache.clone());

        // Only guild/channel metadata is needed for lookups.
        let config = Config::new(self.token.clone(), Intents::GUILDS);

        let shards = gateway::create_recommended(&http_client, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("Discord login failed: {e}")))?;

        for shard in shards {
            self.shard_senders.push(shard.sender());

            let cache_for_shard = cache.clone();
            let ready_for_shard = self.ready_tx.clone();
            let handle = tokio::spawn(async move {
                shard_runner(shard, cache_for_shard, ready_for_shard).await;
            });
            self.shard_tasks.push(handle);
        }

        Ok(())
    }

    /// Waits until the guild/channel cache has been filled after READY.
    /// Returns false if `timeout` elapses first.
    pub async fn wait_until_ready(&self, timeout: Duration) -> bool {
        let mut rx = self.ready_rx.clone();
        match tokio::time::timeout(timeout, rx.wait_for(|ready| *ready)).await {
            Ok(Ok(_)) => true,
            Ok(Err(_)) => false,
            Err(_) => {
                warn!("Discord cache not ready after {}s; continuing anyway", timeout.as_secs());
                false
            }
        }
    }

    /// Sends a normal close frame to every shard; their runner tasks then end.
    pub fn close_shards(&self) {
        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
    }
}

#[async_trait]
impl ChannelSink for DiscordPlatform {
    fn has_channel(&self, channel_id: Id<ChannelMarker>) -> bool {
        match &self.cache {
            Some(cache) => cache.channel(channel_id).is_some(),
            None => {
                debug!("Discord cache not available");
                false
            }
        }
    }

    async fn send_embed(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &str,
        embed: Embed,
    ) -> Result<(), Error> {
        let http = self
            .http
            .as_ref()
            .ok_or_else(|| Error::Platform("Discord HTTP client not available".into()))?;

        let mentions = AllowedMentions {
            parse: vec![MentionType::Everyone],
            ..Default::default()
        };
        let embeds = [embed];

        http.create_message(channel_id)
            .content(content)
            .embeds(&embeds)
            .allowed_mentions(Some(&mentions))
            .await
            .map_err(|e| Error::Platform(format!("Error sending Discord message: {e:?}")))?;

        Ok(())
    }
}
