// tests/startup_tests.rs

mod test_utils;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use livebot_common::traits::{LiveNotifier, NotifyOutcome};
use livebot_core::app::{self, Startup};
use livebot_core::services::StreamNotifier;
use livebot_core::services::notifier::GAME_FALLBACK;
use livebot_core::{BotConfig, Error};
use test_utils::{CountingTokenSource, RecordingNotifier, RecordingSink, Reply, ScriptedStreams};

fn config(test_mode: bool) -> Result<BotConfig, Error> {
    let env = HashMap::from([
        ("DISCORD_TOKEN", "discord-token"),
        ("TWITCH_CLIENT_ID", "cid"),
        ("TWITCH_CLIENT_SECRET", "secret"),
        ("TWITCH_USERNAME", "somestreamer"),
        ("DISCORD_CHANNEL_ID", "424242"),
        ("TEST_MODE", if test_mode { "true" } else { "false" }),
    ]);
    BotConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()))
}

#[tokio::test]
async fn test_mode_sends_one_placeholder_and_never_polls() -> Result<(), Error> {
    let cfg = config(true)?;
    let streams = Arc::new(ScriptedStreams::new(vec![Reply::live()]));
    let tokens = Arc::new(CountingTokenSource::default());
    let sink = Arc::new(RecordingSink::with_channel(cfg.discord_channel_id));
    let notifier: Arc<dyn LiveNotifier> =
        Arc::new(StreamNotifier::new(sink.clone(), cfg.discord_channel_id));

    let startup = app::start(&cfg, streams.clone(), tokens.clone(), notifier).await;
    assert!(matches!(startup, Startup::TestNotification(NotifyOutcome::Sent)));

    // Give a (nonexistent) polling task the chance to run.
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(sink.sent_count(), 1);
    assert_eq!(tokens.calls(), 0);
    assert!(streams.tokens().is_empty());

    let sent = sink.sent.lock().unwrap();
    let (channel, content, embed) = &sent[0];
    assert_eq!(*channel, cfg.discord_channel_id);
    assert!(content.starts_with("@everyone"));
    assert!(content.contains("somestreamer"));
    assert!(embed.description.as_deref().is_some_and(|d| !d.is_empty()));
    assert!(embed.fields.iter().any(|f| f.name == "Game" && f.value != GAME_FALLBACK));
    Ok(())
}

#[tokio::test]
async fn test_mode_with_unknown_channel_sends_nothing() -> Result<(), Error> {
    let cfg = config(true)?;
    let sink = Arc::new(RecordingSink::without_channels());
    let notifier: Arc<dyn LiveNotifier> =
        Arc::new(StreamNotifier::new(sink.clone(), cfg.discord_channel_id));

    let startup = app::start(
        &cfg,
        Arc::new(ScriptedStreams::default()),
        Arc::new(CountingTokenSource::default()),
        notifier,
    )
    .await;

    assert!(matches!(startup, Startup::TestNotification(NotifyOutcome::ChannelNotFound)));
    assert_eq!(sink.attempts(), 0);
    Ok(())
}

#[tokio::test]
async fn initial_token_failure_leaves_bot_inert() -> Result<(), Error> {
    let cfg = config(false)?;
    let streams = Arc::new(ScriptedStreams::new(vec![Reply::live()]));
    let tokens = Arc::new(CountingTokenSource::failing(1));
    let notifier = Arc::new(RecordingNotifier::default());

    let startup = app::start(&cfg, streams.clone(), tokens.clone(), notifier.clone()).await;
    assert!(matches!(startup, Startup::Inert));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(tokens.calls(), 1);
    assert!(streams.tokens().is_empty());
    assert_eq!(notifier.count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn normal_startup_fetches_token_then_polls_after_one_period() -> Result<(), Error> {
    let cfg = config(false)?;
    let streams = Arc::new(ScriptedStreams::new(vec![Reply::live()]));
    let tokens = Arc::new(CountingTokenSource::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let startup = app::start(&cfg, streams.clone(), tokens.clone(), notifier.clone()).await;
    let handle = match startup {
        Startup::Polling(handle) => handle,
        other => panic!("expected polling, got {other:?}"),
    };
    assert_eq!(tokens.calls(), 1);

    // Nothing is checked until the first period has elapsed.
    tokio::time::sleep(cfg.poll_interval / 2).await;
    assert!(streams.tokens().is_empty());
    assert_eq!(notifier.count(), 0);

    tokio::time::sleep(cfg.poll_interval).await;
    handle.abort();

    assert_eq!(notifier.count(), 1);
    assert_eq!(tokens.calls(), 1);
    assert_eq!(streams.tokens(), vec!["token-1"]);
    Ok(())
}
