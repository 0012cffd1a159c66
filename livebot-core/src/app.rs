// File: livebot-core/src/app.rs

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::BotConfig;
use crate::services::TokenManager;
use crate::services::notifier::placeholder_snapshot;
use crate::tasks::{spawn_live_check_task, LiveCheck};
use livebot_common::traits::{LiveNotifier, NotifyOutcome, StreamsApi, TokenSource};

/// How startup went once the chat session is up.
#[derive(Debug)]
pub enum Startup {
    /// Test mode: one placeholder announcement was attempted, nothing scheduled.
    TestNotification(NotifyOutcome),
    /// The polling task is running.
    Polling(JoinHandle<()>),
    /// The initial token request failed; nothing is scheduled until restart.
    Inert,
}

/// Either sends the test announcement or fetches the first token and starts
/// polling.
pub async fn start(
    config: &BotConfig,
    streams: Arc<dyn StreamsApi>,
    token_source: Arc<dyn TokenSource>,
    notifier: Arc<dyn LiveNotifier>,
) -> Startup {
    if config.test_mode {
        info!("Test mode: sending one placeholder announcement; polling is disabled");
        let outcome = notifier
            .notify(&placeholder_snapshot(&config.twitch_username))
            .await;
        return Startup::TestNotification(outcome);
    }

    let mut tokens = TokenManager::new(token_source);
    if !tokens.refresh().await {
        error!("Could not obtain an initial Twitch access token; polling not started");
        return Startup::Inert;
    }

    let check = LiveCheck::new(config.twitch_username.clone(), streams, tokens, notifier);
    Startup::Polling(spawn_live_check_task(check, config.poll_interval))
}
