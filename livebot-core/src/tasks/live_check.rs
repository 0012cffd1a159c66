// src/tasks/live_check.rs

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::services::TokenManager;
use livebot_common::traits::{LiveNotifier, NotifyOutcome, StreamsApi};

/// What a single status check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// offline -> live; the notifier was invoked.
    WentLive(NotifyOutcome),
    /// live -> offline; no notification.
    WentOffline,
    StillLive,
    StillOffline,
    /// The status request failed; `token_refreshed` is `Some` only for 401s.
    Failed { token_refreshed: Option<bool> },
}

/// Edge detector for one broadcaster's live status.
///
/// Owns the liveness flag and (through [`TokenManager`]) the access token.
/// `is_live` only changes after a successful status request.
pub struct LiveCheck {
    user_login: String,
    streams: Arc<dyn StreamsApi>,
    tokens: TokenManager,
    notifier: Arc<dyn LiveNotifier>,
    is_live: bool,
}

impl LiveCheck {
    pub fn new(
        user_login: impl Into<String>,
        streams: Arc<dyn StreamsApi>,
        tokens: TokenManager,
        notifier: Arc<dyn LiveNotifier>,
    ) -> Self {
        Self {
            user_login: user_login.into(),
            streams,
            tokens,
            notifier,
            is_live: false,
        }
    }

    pub fn is_live(&self) -> bool {
        self.is_live
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Runs one status check. Errors are logged here and never escape.
    pub async fn tick(&mut self) -> TickOutcome {
        let streams = match self.streams.get_streams(&self.user_login, self.tokens.token()).await {
            Ok(s) => s,
            Err(e) if e.is_unauthorized() => {
                warn!("Twitch rejected the access token ({}); refreshing before next check", e);
                let refreshed = self.tokens.refresh().await;
                return TickOutcome::Failed { token_refreshed: Some(refreshed) };
            }
            Err(e) => {
                error!("Stream status check for '{}' failed: {}", self.user_login, e);
                return TickOutcome::Failed { token_refreshed: None };
            }
        };

        let currently_live = !streams.is_empty();
        match (self.is_live, streams.first()) {
            (false, Some(snapshot)) => {
                if streams.len() > 1 {
                    debug!("{} streams returned for '{}'; announcing the first", streams.len(), self.user_login);
                }
                info!("'{}' went live: {}", self.user_login, snapshot.title);
                let outcome = self.notifier.notify(snapshot).await;
                // A failed announcement still counts; it is not retried for this transition.
                self.is_live = true;
                TickOutcome::WentLive(outcome)
            }
            (true, None) => {
                info!("'{}' went offline", self.user_login);
                self.is_live = false;
                TickOutcome::WentOffline
            }
            _ if currently_live => TickOutcome::StillLive,
            _ => TickOutcome::StillOffline,
        }
    }
}

/// Spawns the polling loop. The first check runs one `period` after spawning.
///
/// Ticks are awaited one at a time; fires missed while a slow check is still
/// running are skipped, so checks never overlap. A panicking check is logged
/// and polling carries on.
pub fn spawn_live_check_task(mut check: LiveCheck, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Watching '{}' for live status every {}ms",
            check.user_login,
            period.as_millis()
        );
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            match AssertUnwindSafe(check.tick()).catch_unwind().await {
                Ok(outcome) => debug!("Live check finished: {:?}", outcome),
                Err(_) => error!("Live check panicked; continuing with the next tick"),
            }
        }
    })
}
