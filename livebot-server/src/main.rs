use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use livebot_common::traits::{ChannelSink, LiveNotifier, NotifyOutcome};
use livebot_core::app::{self, Startup};
use livebot_core::platforms::discord::DiscordPlatform;
use livebot_core::platforms::twitch::{TwitchAppAuthenticator, TwitchHelixClient};
use livebot_core::services::StreamNotifier;
use livebot_core::{BotConfig, DefaultHttpClient, Error, HttpClient};

const DISCORD_READY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug, Clone)]
#[command(name = "livebot")]
#[command(author, version, about = "Posts a Discord announcement when a Twitch channel goes live")]
struct Args {
    /// Send one placeholder announcement at startup instead of polling
    /// (same as TEST_MODE=true).
    #[arg(long, default_value = "false")]
    test_mode: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

fn install_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        error!("Unhandled panic: {info}");
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match &args.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .map_err(|e| Error::Config(format!("could not load {}: {e}", path.display())))?;
        }
        None => {
            let _ = dotenv::dotenv();
        }
    }

    init_tracing();
    install_panic_logger();

    let mut config = BotConfig::from_env()?;
    if args.test_mode {
        config.test_mode = true;
    }
    info!("livebot starting: {:?}", config);

    if let Err(e) = run(config).await {
        error!("Fatal startup error: {}", e);
        return Err(e.into());
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run(config: BotConfig) -> Result<(), Error> {
    // 1) Discord session; a rejected login ends the process here.
    let mut discord = DiscordPlatform::new(config.discord_token.clone());
    discord.connect().await?;
    if discord.wait_until_ready(DISCORD_READY_TIMEOUT).await {
        info!("Discord session ready");
    }
    let discord = Arc::new(discord);

    // 2) Wire Twitch + notifier.
    let http: Arc<dyn HttpClient> = Arc::new(DefaultHttpClient::new());
    let helix = Arc::new(TwitchHelixClient::new(http.clone(), config.twitch_client_id.clone()));
    let authenticator = Arc::new(TwitchAppAuthenticator::new(
        http,
        config.twitch_client_id.clone(),
        config.twitch_client_secret.clone(),
    ));
    let sink: Arc<dyn ChannelSink> = discord.clone();
    let notifier: Arc<dyn LiveNotifier> =
        Arc::new(StreamNotifier::new(sink, config.discord_channel_id));

    // 3) Test announcement or polling.
    let poller = match app::start(&config, helix, authenticator, notifier).await {
        Startup::TestNotification(outcome) => {
            if outcome != NotifyOutcome::Sent {
                warn!("Test announcement was not delivered: {:?}", outcome);
            }
            None
        }
        Startup::Polling(handle) => Some(handle),
        Startup::Inert => {
            warn!("Running without polling; restart with valid Twitch credentials");
            None
        }
    };

    // 4) Run until Ctrl-C.
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
    }
    info!("Ctrl-C received; shutting down");

    if let Some(handle) = poller {
        handle.abort();
    }
    discord.close_shards();
    Ok(())
}
