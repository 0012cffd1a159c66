// File: livebot-core/src/config.rs

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;
use twitch_oauth2::{ClientId, ClientSecret};

use crate::Error;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;

/// Everything the bot reads from its environment at startup.
#[derive(Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub twitch_client_id: ClientId,
    pub twitch_client_secret: ClientSecret,
    /// Login name of the broadcaster being watched.
    pub twitch_username: String,
    pub discord_channel_id: Id<ChannelMarker>,
    pub test_mode: bool,
    pub poll_interval: Duration,
}

impl BotConfig {
    /// Reads the process environment. Load any `.env` file before calling.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let discord_token = env.must("DISCORD_TOKEN")?;
        let twitch_client_id = ClientId::new(env.must("TWITCH_CLIENT_ID")?);
        let twitch_client_secret = ClientSecret::new(env.must("TWITCH_CLIENT_SECRET")?);
        let twitch_username = env.must("TWITCH_USERNAME")?.to_lowercase();

        let raw_channel = env.must("DISCORD_CHANNEL_ID")?;
        let discord_channel_id = parse_channel_id(&raw_channel)?;

        let test_mode = env
            .opt("TEST_MODE")
            .is_some_and(|v| parse_flag("TEST_MODE", &v));

        let poll_ms: u64 = env.parse("POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        if poll_ms == 0 {
            return Err(Error::Config("POLL_INTERVAL_MS must be greater than zero".into()));
        }

        Ok(Self {
            discord_token,
            twitch_client_id,
            twitch_client_secret,
            twitch_username,
            discord_channel_id,
            test_mode,
            poll_interval: Duration::from_millis(poll_ms),
        })
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("discord_token", &mask(&self.discord_token))
            .field("twitch_client_id", &self.twitch_client_id.as_str())
            .field("twitch_client_secret", &mask(self.twitch_client_secret.secret()))
            .field("twitch_username", &self.twitch_username)
            .field("discord_channel_id", &self.discord_channel_id)
            .field("test_mode", &self.test_mode)
            .field("poll_interval_ms", &self.poll_interval.as_millis())
            .finish()
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn opt(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn must(&self, key: &str) -> Result<String, Error> {
        self.opt(key)
            .ok_or_else(|| Error::Config(format!("missing required env: {key}")))
    }

    fn parse<T: FromStr>(&self, key: &str, default: T) -> Result<T, Error>
    where
        <T as FromStr>::Err: fmt::Display,
    {
        match self.opt(key) {
            Some(s) => s
                .parse::<T>()
                .map_err(|e| Error::Config(format!("failed to parse {key}='{s}': {e}"))),
            None => Ok(default),
        }
    }
}

fn parse_channel_id(raw: &str) -> Result<Id<ChannelMarker>, Error> {
    raw.parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| Error::Config(format!("DISCORD_CHANNEL_ID '{raw}' is not a valid channel id")))
}

/// Unrecognised values read as false.
fn parse_flag(key: &str, raw: &str) -> bool {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        other => {
            warn!("Unrecognised {key}='{other}'; treating it as false");
            false
        }
    }
}

fn mask(s: &str) -> String {
    if s.chars().count() <= 6 {
        "***".into()
    } else {
        format!("{}***", s.chars().take(3).collect::<String>())
    }
}
