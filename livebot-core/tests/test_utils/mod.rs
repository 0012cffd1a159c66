// tests/test_utils/mod.rs
//
// Hand-rolled doubles for the seams the live-check loop talks through.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use twilight_model::channel::message::Embed;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;
use twitch_oauth2::AccessToken;

use livebot_common::models::StreamSnapshot;
use livebot_common::traits::{ChannelSink, LiveNotifier, NotifyOutcome, StreamsApi, TokenSource};
use livebot_core::Error;

pub fn live_snapshot(name: &str) -> StreamSnapshot {
    StreamSnapshot {
        user_login: name.to_lowercase(),
        user_name: name.to_string(),
        title: format!("{name} plays something"),
        game_name: "Celeste".into(),
        viewer_count: 17,
        thumbnail_url: format!(
            "https://static-cdn.jtvnw.net/previews-ttv/live_user_{}-{{width}}x{{height}}.jpg",
            name.to_lowercase()
        ),
    }
}

/// One scripted answer from the streams endpoint.
pub enum Reply {
    Offline,
    Live(Vec<StreamSnapshot>),
    Unauthorized,
    Down,
}

impl Reply {
    pub fn live() -> Self {
        Reply::Live(vec![live_snapshot("SomeStreamer")])
    }
}

/// Plays back scripted replies in order (offline once exhausted) and records
/// the bearer token each request carried.
#[derive(Default)]
pub struct ScriptedStreams {
    replies: Mutex<VecDeque<Reply>>,
    pub tokens_seen: Mutex<Vec<String>>,
}

impl ScriptedStreams {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamsApi for ScriptedStreams {
    async fn get_streams(
        &self,
        _user_login: &str,
        token: &AccessToken,
    ) -> Result<Vec<StreamSnapshot>, Error> {
        self.tokens_seen.lock().unwrap().push(token.secret().to_string());
        let next = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Offline);
        match next {
            Reply::Offline => Ok(Vec::new()),
            Reply::Live(streams) => Ok(streams),
            Reply::Unauthorized => Err(Error::Unauthorized("HTTP 401 => invalid token".into())),
            Reply::Down => Err(Error::Platform("HTTP 503 => service unavailable".into())),
        }
    }
}

/// Hands out "token-1", "token-2", ... and counts requests.
/// Fails while `fail_next` is non-zero.
#[derive(Default)]
pub struct CountingTokenSource {
    pub calls: AtomicUsize,
    pub fail_next: AtomicUsize,
}

impl CountingTokenSource {
    pub fn failing(times: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_next: AtomicUsize::new(times),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for CountingTokenSource {
    async fn request_app_token(&self) -> Result<AccessToken, Error> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_next.load(Ordering::SeqCst) > 0 {
            self.fail_next.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Auth("invalid client secret".into()));
        }
        Ok(AccessToken::new(format!("token-{n}")))
    }
}

/// Records every snapshot it is asked to announce.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notified: Mutex<Vec<StreamSnapshot>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.notified.lock().unwrap().len()
    }
}

#[async_trait]
impl LiveNotifier for RecordingNotifier {
    async fn notify(&self, snapshot: &StreamSnapshot) -> NotifyOutcome {
        self.notified.lock().unwrap().push(snapshot.clone());
        NotifyOutcome::Sent
    }
}

/// Fake chat channel set: knows exactly one channel and records messages.
pub struct RecordingSink {
    pub known_channel: Option<Id<ChannelMarker>>,
    pub fail_sends: bool,
    pub sent: Mutex<Vec<(Id<ChannelMarker>, String, Embed)>>,
    pub attempts: AtomicUsize,
}

impl RecordingSink {
    pub fn with_channel(channel: Id<ChannelMarker>) -> Self {
        Self {
            known_channel: Some(channel),
            fail_sends: false,
            sent: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn without_channels() -> Self {
        Self {
            known_channel: None,
            ..Self::with_channel(Id::new(1))
        }
    }

    pub fn failing(channel: Id<ChannelMarker>) -> Self {
        Self {
            fail_sends: true,
            ..Self::with_channel(channel)
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelSink for RecordingSink {
    fn has_channel(&self, channel_id: Id<ChannelMarker>) -> bool {
        self.known_channel == Some(channel_id)
    }

    async fn send_embed(
        &self,
        channel_id: Id<ChannelMarker>,
        content: &str,
        embed: Embed,
    ) -> Result<(), Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_sends {
            return Err(Error::Platform("Missing Permissions".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel_id, content.to_string(), embed));
        Ok(())
    }
}
